// Worker domain module
// Worker catalog entries and the per-invocation result record

pub mod result;
pub mod value_objects;

pub use result::{WorkerOutcome, WorkerResult};
pub use value_objects::{validate_worker_id, Worker, WorkerFilter, WorkerMetadata};
