use std::path::Path;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{error, info, instrument};

use todo_core::{NewTodo, Todo, TodoChanges, TodoError, TodoId, Todos};

use crate::error::StoreError;
use crate::json_file::JsonFile;

/// The in-memory todo list and the file that mirrors it.
///
/// Every operation holds the list lock for its whole read-modify-persist
/// sequence. A mutation whose save fails is undone before the error is
/// returned, so memory never runs ahead of disk.
pub struct TodoRepo {
    todos: Mutex<Todos>,
    file: JsonFile<Todos>,
}

impl TodoRepo {
    /// Load the list from `path`. A missing file yields an empty list; an
    /// unreadable or corrupt one is an error.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let file = JsonFile::<Todos>::new(path);
        let todos = file.load()?;
        info!(path = %path.display(), count = todos.len(), "todo store loaded");
        Ok(Self::with_todos(file, todos))
    }

    /// Build a repo over an already-loaded list without touching disk.
    pub fn with_todos(file: JsonFile<Todos>, todos: Todos) -> Self {
        Self {
            todos: Mutex::new(todos),
            file,
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn len(&self) -> usize {
        self.todos.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.lock().is_empty()
    }

    /// Snapshot of the full list in insertion order.
    pub fn list(&self) -> Todos {
        self.todos.lock().clone()
    }

    pub fn get(&self, id: &TodoId) -> Result<Todo, TodoError> {
        self.todos
            .lock()
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(TodoError::not_found)
    }

    /// Validate and append a new todo. The server assigns `id` and
    /// `created_at`.
    #[instrument(skip_all)]
    pub fn add(&self, draft: NewTodo) -> Result<Todo, TodoError> {
        let mut todos = self.todos.lock();

        let mut id = TodoId::new();
        while todos.iter().any(|t| t.id == id) {
            id = TodoId::new();
        }
        let todo = draft.into_todo(id, Utc::now())?;

        todos.push(todo.clone());
        if let Err(e) = self.persist(&todos) {
            todos.pop();
            return Err(e);
        }

        info!(todo_id = %todo.id, count = todos.len(), "todo added");
        Ok(todo)
    }

    /// Apply a validated patch to the todo with `id`.
    #[instrument(skip_all, fields(todo_id = %id))]
    pub fn update(&self, id: &TodoId, changes: &TodoChanges) -> Result<Todo, TodoError> {
        let mut todos = self.todos.lock();

        let index = position(&todos, id)?;
        let previous = todos[index].clone();
        todos[index].apply(changes, Utc::now());

        if let Err(e) = self.persist(&todos) {
            todos[index] = previous;
            return Err(e);
        }

        info!("todo updated");
        Ok(todos[index].clone())
    }

    /// Remove the todo with `id`, keeping the order of the rest.
    #[instrument(skip_all, fields(todo_id = %id))]
    pub fn delete(&self, id: &TodoId) -> Result<(), TodoError> {
        let mut todos = self.todos.lock();

        let index = position(&todos, id)?;
        let removed = todos.remove(index);

        if let Err(e) = self.persist(&todos) {
            todos.insert(index, removed);
            return Err(e);
        }

        info!(count = todos.len(), "todo deleted");
        Ok(())
    }

    fn persist(&self, todos: &Todos) -> Result<(), TodoError> {
        self.file.save(todos).map_err(|e| {
            error!(path = %self.file.path().display(), error = %e, "failed to save todos");
            TodoError::from(e)
        })
    }
}

fn position(todos: &Todos, id: &TodoId) -> Result<usize, TodoError> {
    todos
        .iter()
        .position(|t| &t.id == id)
        .ok_or_else(TodoError::not_found)
}
