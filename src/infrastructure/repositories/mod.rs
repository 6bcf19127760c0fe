// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory_user_repository;
pub mod in_memory_workflow_store;
pub mod postgres_user_repository;
pub mod postgres_workflow_store;

pub use in_memory_user_repository::InMemoryUserRepository;
pub use in_memory_workflow_store::InMemoryWorkflowStore;
pub use postgres_user_repository::PostgresUserRepository;
pub use postgres_workflow_store::PostgresWorkflowStore;
