//! HTTP handlers for the `/todos` resource.
//!
//! Handlers check the path id and decode the body themselves so every
//! client mistake comes back as a plain-text 400, whatever the
//! `Content-Type` header says.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;

use todo_core::{NewTodo, Todo, TodoId, TodoPatch, Todos};

use crate::error::ApiError;
use crate::server::AppState;

/// `GET /todos`
pub async fn list_todos(State(state): State<AppState>) -> Json<Todos> {
    Json(state.repo.list())
}

/// `GET /todos/{id}`
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = TodoId::parse(&id)?;
    Ok(Json(state.repo.get(&id)?))
}

/// `POST /todos`
pub async fn add_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let draft: NewTodo = decode_object(&body, "Failed to decode todo")?;
    let todo = state.repo.add(draft)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// `PUT /todos/{id}`
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let id = TodoId::parse(&id)?;
    let patch: TodoPatch = decode_object(&body, "Failed to decode updates")?;
    let changes = patch.into_changes()?;
    Ok(Json(state.repo.update(&id, &changes)?))
}

/// `DELETE /todos/{id}`
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = TodoId::parse(&id)?;
    state.repo.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Decode a JSON object body. Derived struct deserializers also accept
/// arrays (fields by position), so anything but an object is refused first.
fn decode_object<T: DeserializeOwned>(body: &[u8], error: &str) -> Result<T, ApiError> {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value @ serde_json::Value::Object(_)) => {
            serde_json::from_value(value).map_err(|_| ApiError::bad_request(error))
        }
        _ => Err(ApiError::bad_request(error)),
    }
}
