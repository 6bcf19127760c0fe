// User domain module
// Owners of workflows; identity comes from the bearer token

pub mod value_objects;

pub use value_objects::Username;
