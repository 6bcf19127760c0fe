// Orchestration core
// Registry, shared context, strategy execution, dispatch and the workflow
// coordinator that ties them together

pub mod context;
pub mod coordinator;
pub mod dispatcher;
pub mod errors;
pub mod events;
pub mod invoker;
pub mod registry;
pub mod strategy;

pub use context::{ContextEnvelope, SharedContext};
pub use coordinator::{CreatedWorkflow, WorkflowCoordinator, WorkflowStatusView};
pub use dispatcher::{channel, ChannelDispatcher, DispatchQueue, Dispatcher};
pub use errors::{InvocationError, OrchestrationError, OrchestrationResult};
pub use events::EventRecorder;
pub use invoker::{InvocationRequest, LocalInvoker, WorkerInvoker};
pub use registry::WorkerRegistry;
pub use strategy::StrategyExecutor;
