use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier. Serialized as a bare integer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    #[serde(default)]
    pub deleted: bool,
}

impl Todo {
    /// Same todo with `completed` flipped.
    pub fn toggled(&self) -> Self {
        Self { completed: !self.completed, ..self.clone() }
    }

    pub fn retitled(&self, title: impl Into<String>) -> Self {
        Self { title: title.into(), ..self.clone() }
    }

    /// Same todo flagged as logically deleted.
    pub fn marked_deleted(&self) -> Self {
        Self { deleted: true, ..self.clone() }
    }
}

/// Body of a create request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), completed: false }
    }
}

/// Body of a full-resource replace. Any `id` in the payload is ignored; the
/// path decides which todo is replaced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplaceTodo {
    pub title: String,
    pub completed: bool,
    #[serde(default)]
    pub deleted: bool,
}

impl From<&Todo> for ReplaceTodo {
    fn from(todo: &Todo) -> Self {
        Self { title: todo.title.clone(), completed: todo.completed, deleted: todo.deleted }
    }
}

/// Response of a hard delete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteAck {
    pub success: bool,
    pub id: TodoId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleted_defaults_to_false_when_absent() {
        let todo: Todo = serde_json::from_str(r#"{"id":7,"title":"Buy milk","completed":false}"#).unwrap();
        assert_eq!(todo.id, TodoId(7));
        assert!(!todo.deleted);
    }

    #[test]
    fn id_serializes_as_plain_number() {
        let todo = Todo { id: TodoId(3), title: "x".into(), completed: true, deleted: false };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["completed"], true);
    }

    #[test]
    fn new_todo_completed_defaults_to_false() {
        let input: NewTodo = serde_json::from_str(r#"{"title":"Buy milk"}"#).unwrap();
        assert_eq!(input, NewTodo::new("Buy milk"));
    }

    #[test]
    fn helpers_touch_only_their_field() {
        let todo = Todo { id: TodoId(1), title: "a".into(), completed: false, deleted: false };
        assert_eq!(todo.toggled(), Todo { completed: true, ..todo.clone() });
        assert_eq!(todo.retitled("b"), Todo { title: "b".into(), ..todo.clone() });
        assert_eq!(todo.marked_deleted(), Todo { deleted: true, ..todo.clone() });
    }

    #[test]
    fn replace_body_ignores_foreign_id() {
        let body: ReplaceTodo = serde_json::from_str(r#"{"id":99,"title":"t","completed":true}"#).unwrap();
        assert_eq!(body, ReplaceTodo { title: "t".into(), completed: true, deleted: false });
    }
}
