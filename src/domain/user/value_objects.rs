use serde::{Deserialize, Serialize};
use std::fmt;

/// Username value object
///
/// # Invariants
/// - 3 to 50 characters
/// - Only ASCII letters, digits, underscores and hyphens
/// - Immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 50;

    /// Creates a new Username value object
    ///
    /// # Example
    /// ```
    /// use orchestration_engine::domain::user::Username;
    ///
    /// let username = Username::new("ops_team-1").expect("valid username");
    /// assert_eq!(username.as_str(), "ops_team-1");
    /// assert!(Username::new("no spaces").is_err());
    /// ```
    pub fn new(username: impl Into<String>) -> Result<Self, String> {
        let username = username.into();

        if username.len() < Self::MIN_LEN || username.len() > Self::MAX_LEN {
            return Err(format!(
                "Username must be {}-{} characters",
                Self::MIN_LEN,
                Self::MAX_LEN
            ));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(
                "Username can only contain letters, numbers, underscores, and hyphens".to_string(),
            );
        }

        Ok(Username(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
