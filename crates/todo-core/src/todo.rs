use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::TodoError;
use crate::ids::TodoId;

const INVALID_PRIORITY: &str = "Invalid priority. Allowed values are: low, medium, high";
const TITLE_REQUIRED: &str = "Title is required";

/// Priority of a todo. `Unset` is stored as the empty string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    #[serde(rename = "")]
    Unset,
    Low,
    Medium,
    High,
}

impl Priority {
    /// Parse client input, ignoring case. The empty string is not accepted
    /// here; callers decide whether an empty value means "unset".
    pub fn parse_input(s: &str) -> Result<Self, TodoError> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(TodoError::invalid(INVALID_PRIORITY)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single task record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: String,
}

/// The whole list, in insertion order.
pub type Todos = Vec<Todo>;

impl Todo {
    /// Apply a validated patch. `completed_at` follows `completed` whenever
    /// `completed` is present, even if the value did not change.
    pub fn apply(&mut self, changes: &TodoChanges, now: DateTime<Utc>) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
            self.completed_at = completed.then_some(now);
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(notes) = &changes.notes {
            self.notes = notes.clone();
        }
    }
}

/// Body of a create request. Server-owned fields (`id`, `created_at`,
/// `completed_at`) are ignored if a client sends them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
    pub notes: Option<String>,
}

impl NewTodo {
    /// Validate the body and build the record the server will store.
    pub fn into_todo(self, id: TodoId, now: DateTime<Utc>) -> Result<Todo, TodoError> {
        let title = validated_title(self.title.as_deref().unwrap_or_default())?;
        let priority = match self.priority.as_deref() {
            None | Some("") => Priority::Unset,
            Some(p) => Priority::parse_input(p)?,
        };
        let completed = self.completed.unwrap_or(false);

        Ok(Todo {
            id,
            title,
            completed,
            created_at: now,
            completed_at: completed.then_some(now),
            priority,
            notes: self.notes.unwrap_or_default(),
        })
    }
}

/// Body of an update request. `None` means the field was absent (or null).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
    pub notes: Option<String>,
}

/// A patch that passed validation, with title trimmed and priority parsed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.notes.is_none()
    }

    pub fn into_changes(self) -> Result<TodoChanges, TodoError> {
        if self.is_empty() {
            return Err(TodoError::invalid("At least one field must be updated"));
        }
        let title = self.title.as_deref().map(validated_title).transpose()?;
        let priority = self.priority.as_deref().map(Priority::parse_input).transpose()?;

        Ok(TodoChanges {
            title,
            completed: self.completed,
            priority,
            notes: self.notes,
        })
    }
}

/// Surrounding whitespace is dropped from the stored title, not only
/// ignored when checking for emptiness.
fn validated_title(raw: &str) -> Result<String, TodoError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TodoError::invalid(TITLE_REQUIRED));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(now: DateTime<Utc>) -> Todo {
        NewTodo {
            title: Some("Buy milk".into()),
            ..Default::default()
        }
        .into_todo(TodoId::new(), now)
        .unwrap()
    }

    #[test]
    fn priority_input_is_case_insensitive() {
        assert_eq!(Priority::parse_input("LOW").unwrap(), Priority::Low);
        assert_eq!(Priority::parse_input("Medium").unwrap(), Priority::Medium);
        assert_eq!(Priority::parse_input("high").unwrap(), Priority::High);
    }

    #[test]
    fn priority_rejects_unknown_and_empty() {
        assert!(matches!(Priority::parse_input("urgent"), Err(TodoError::InvalidInput(_))));
        assert!(matches!(Priority::parse_input(""), Err(TodoError::InvalidInput(_))));
    }

    #[test]
    fn priority_serializes_lowercase_and_empty() {
        assert_eq!(serde_json::to_string(&Priority::Unset).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&Priority::Medium).unwrap(), "\"medium\"");
        let p: Priority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(p, Priority::High);
    }

    #[test]
    fn new_todo_defaults() {
        let now = Utc::now();
        let todo = sample(now);
        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.completed);
        assert_eq!(todo.completed_at, None);
        assert_eq!(todo.priority, Priority::Unset);
        assert_eq!(todo.notes, "");
        assert_eq!(todo.created_at, now);
    }

    #[test]
    fn new_todo_trims_title() {
        let todo = NewTodo {
            title: Some("  Walk dog \n".into()),
            ..Default::default()
        }
        .into_todo(TodoId::new(), Utc::now())
        .unwrap();
        assert_eq!(todo.title, "Walk dog");
    }

    #[test]
    fn new_todo_requires_title() {
        for title in [None, Some(""), Some("   ")] {
            let err = NewTodo {
                title: title.map(String::from),
                ..Default::default()
            }
            .into_todo(TodoId::new(), Utc::now())
            .unwrap_err();
            assert_eq!(err, TodoError::invalid("Title is required"));
        }
    }

    #[test]
    fn new_todo_normalizes_priority() {
        let todo = NewTodo {
            title: Some("x".into()),
            priority: Some("HIGH".into()),
            ..Default::default()
        }
        .into_todo(TodoId::new(), Utc::now())
        .unwrap();
        assert_eq!(todo.priority, Priority::High);
    }

    #[test]
    fn new_todo_rejects_bad_priority() {
        let err = NewTodo {
            title: Some("x".into()),
            priority: Some("urgent".into()),
            ..Default::default()
        }
        .into_todo(TodoId::new(), Utc::now())
        .unwrap_err();
        assert!(matches!(err, TodoError::InvalidInput(_)));
    }

    #[test]
    fn new_todo_created_completed_gets_timestamp() {
        let now = Utc::now();
        let todo = NewTodo {
            title: Some("x".into()),
            completed: Some(true),
            ..Default::default()
        }
        .into_todo(TodoId::new(), now)
        .unwrap();
        assert!(todo.completed);
        assert_eq!(todo.completed_at, Some(now));
    }

    #[test]
    fn new_todo_ignores_server_owned_fields() {
        let body = r#"{"id":"client-id","created_at":"2001-01-01T00:00:00Z","title":"x"}"#;
        let draft: NewTodo = serde_json::from_str(body).unwrap();
        let id = TodoId::new();
        let now = Utc::now();
        let todo = draft.into_todo(id.clone(), now).unwrap();
        assert_eq!(todo.id, id);
        assert_eq!(todo.created_at, now);
    }

    #[test]
    fn empty_patch_is_rejected() {
        let patch: TodoPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
        let err = patch.into_changes().unwrap_err();
        assert_eq!(err, TodoError::invalid("At least one field must be updated"));
    }

    #[test]
    fn null_fields_count_as_absent() {
        let patch: TodoPatch =
            serde_json::from_str(r#"{"title":null,"completed":null}"#).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_blank_title_rejected() {
        let patch = TodoPatch {
            title: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(patch.into_changes(), Err(TodoError::InvalidInput(_))));
    }

    #[test]
    fn patch_empty_priority_rejected() {
        let patch = TodoPatch {
            priority: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(patch.into_changes(), Err(TodoError::InvalidInput(_))));
    }

    #[test]
    fn patch_distinguishes_empty_notes_from_absent() {
        let patch: TodoPatch = serde_json::from_str(r#"{"notes":""}"#).unwrap();
        let changes = patch.into_changes().unwrap();
        assert_eq!(changes.notes.as_deref(), Some(""));
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let now = Utc::now();
        let mut todo = sample(now);
        todo.notes = "keep".into();
        let changes = TodoPatch {
            priority: Some("Medium".into()),
            ..Default::default()
        }
        .into_changes()
        .unwrap();
        todo.apply(&changes, now);
        assert_eq!(todo.priority, Priority::Medium);
        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.notes, "keep");
        assert!(!todo.completed);
    }

    #[test]
    fn completing_sets_and_clears_completed_at() {
        let created = Utc::now();
        let mut todo = sample(created);

        let done = TodoChanges {
            completed: Some(true),
            ..Default::default()
        };
        let later = created + Duration::seconds(5);
        todo.apply(&done, later);
        assert!(todo.completed);
        assert_eq!(todo.completed_at, Some(later));

        // Re-completing refreshes the timestamp.
        let even_later = later + Duration::seconds(5);
        todo.apply(&done, even_later);
        assert_eq!(todo.completed_at, Some(even_later));

        let undone = TodoChanges {
            completed: Some(false),
            ..Default::default()
        };
        todo.apply(&undone, even_later);
        assert!(!todo.completed);
        assert_eq!(todo.completed_at, None);
    }

    #[test]
    fn todo_json_field_names() {
        let todo = sample(Utc::now());
        let value = serde_json::to_value(&todo).unwrap();
        for field in ["id", "title", "completed", "created_at", "completed_at", "priority", "notes"] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
        assert!(value["completed_at"].is_null());
        assert_eq!(value["priority"], "");
    }

    #[test]
    fn stored_todo_tolerates_missing_optional_fields() {
        let json = r#"{"id":"6f1c2b0e-3a53-4c1e-9a57-0d7c1f6b2a10","title":"x","created_at":"2024-05-01T10:00:00+02:00"}"#;
        let todo: Todo = serde_json::from_str(json).unwrap();
        assert!(!todo.completed);
        assert_eq!(todo.priority, Priority::Unset);
        assert_eq!(todo.created_at.to_rfc3339(), "2024-05-01T08:00:00+00:00");
    }
}
