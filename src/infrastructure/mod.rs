// Infrastructure layer module
// Database adapters, worker transport and definition loading
// Follows Hexagonal Architecture

pub mod definitions;
pub mod events;
pub mod http_invoker;
pub mod repositories;

pub use http_invoker::HttpInvoker;
