pub mod errors;
pub mod ids;
pub mod todo;

pub use errors::TodoError;
pub use ids::TodoId;
pub use todo::{NewTodo, Priority, Todo, TodoChanges, TodoPatch, Todos};
