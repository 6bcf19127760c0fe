// Lifecycle event recorders

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryEventRecorder;
pub use postgres::PostgresEventRecorder;
