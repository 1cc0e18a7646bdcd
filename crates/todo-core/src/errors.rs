/// Failure classes shared by every todo operation.
///
/// The message carried by each variant is safe to show to a client, except
/// for `Persistence`, whose detail is meant for logs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    /// Malformed JSON, blank title, unknown priority, bad UUID or empty patch.
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    /// The store could not be written (or read).
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl TodoError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound("Todo not found".into())
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::Persistence(_) => "persistence",
        }
    }
}
