// HTTP handlers, one module per resource

pub mod analytics;
pub mod auth;
pub mod teams;
pub mod workers;
pub mod workflows;
