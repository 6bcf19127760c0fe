use serde::{Deserialize, Serialize};

/// Composition rule governing invocation order and result aggregation
///
/// # Strategies
/// ```text
/// Sequential      A -> B -> C            (priority order, same input)
/// Parallel        A | B | C              (same input, fan-out/fan-in)
/// Consensus       A | B | C -> group     (parallel, outputs grouped by key)
/// LeaderFollower  L -> F1 -> F2          (leader first, implicitly required)
/// Pipeline        A -> B -> C            (output of one is input of next)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStrategy {
    #[default]
    Sequential,
    Parallel,
    Consensus,
    LeaderFollower,
    Pipeline,
}

impl TeamStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamStrategy::Sequential => "sequential",
            TeamStrategy::Parallel => "parallel",
            TeamStrategy::Consensus => "consensus",
            TeamStrategy::LeaderFollower => "leader_follower",
            TeamStrategy::Pipeline => "pipeline",
        }
    }
}

impl std::fmt::Display for TeamStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TeamStrategy {
    type Err = String;

    /// Parses a strategy name, ignoring case and accepting `-` for `_`
    ///
    /// # Example
    /// ```
    /// use orchestration_engine::domain::team::TeamStrategy;
    ///
    /// assert_eq!("LEADER_FOLLOWER".parse(), Ok(TeamStrategy::LeaderFollower));
    /// assert!("round_robin".parse::<TeamStrategy>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sequential" => Ok(TeamStrategy::Sequential),
            "parallel" => Ok(TeamStrategy::Parallel),
            "consensus" => Ok(TeamStrategy::Consensus),
            "leader_follower" => Ok(TeamStrategy::LeaderFollower),
            "pipeline" => Ok(TeamStrategy::Pipeline),
            _ => Err(format!("Unknown strategy: {}", s)),
        }
    }
}

fn default_role() -> String {
    "contributor".to_string()
}

fn default_priority() -> i32 {
    1
}

fn default_required() -> bool {
    true
}

/// A worker's seat on a team
///
/// Higher `priority` runs earlier in sequential and pipeline runs. A
/// `required` member's failure fails the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(alias = "agent_id")]
    pub worker_id: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_required")]
    pub required: bool,
}

impl TeamMember {
    /// Required contributor with the given priority
    pub fn new(worker_id: impl Into<String>, priority: i32) -> Self {
        Self {
            worker_id: worker_id.into(),
            role: default_role(),
            priority,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}
