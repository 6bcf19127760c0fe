// Workflow domain module
// Contains the workflow aggregate root, its status value object and lifecycle events

#![allow(clippy::module_inception)]

pub mod events;
pub mod value_objects;
pub mod workflow;

pub use events::{LifecycleEvent, LifecycleEventKind};
pub use value_objects::WorkflowStatus;
pub use workflow::{Task, Workflow, WorkflowSummary};
