// Team domain module
// Team configuration, member seats, strategies and run results

#![allow(clippy::module_inception)]

pub mod team;
pub mod value_objects;

// Re-export main types for convenience
pub use team::{TeamConfiguration, TeamResult, TeamRunStatus, DEFAULT_TEAM_TIMEOUT_SECS};
pub use value_objects::{TeamMember, TeamStrategy};
