use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use todo_core::TodoError;

/// An HTTP error with a plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<TodoError> for ApiError {
    fn from(error: TodoError) -> Self {
        match error {
            TodoError::InvalidInput(msg) => Self::bad_request(msg),
            TodoError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            // The cause was already logged by the store; keep it off the wire.
            TodoError::Persistence(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save todos")
            }
        }
    }
}
