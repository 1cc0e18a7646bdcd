use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::TodoError;

/// Identifier of a todo: the string form of a random UUID.
///
/// Stored as the raw string so ids read from disk compare exactly as they
/// were written.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a caller-supplied id if it is a well-formed UUID.
    pub fn parse(s: &str) -> Result<Self, TodoError> {
        Uuid::parse_str(s)
            .map(|_| Self(s.to_owned()))
            .map_err(|_| TodoError::InvalidInput("Invalid UUID format".into()))
    }

    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TodoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
