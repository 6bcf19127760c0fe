//! Workflow Orchestration Engine Library
//!
//! Registers remote workers, runs teams of them under composable strategies
//! and executes persisted workflows asynchronously behind an HTTP API.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod orchestration;
