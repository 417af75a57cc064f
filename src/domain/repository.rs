use async_trait::async_trait;
use super::todo::{NewTodo, ReplaceTodo, Todo, TodoId};

/// Server-side storage for todos.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    async fn create(&self, input: NewTodo) -> anyhow::Result<Todo>;
    async fn get(&self, id: TodoId) -> anyhow::Result<Option<Todo>>;
    /// Every stored todo, soft-deleted ones included, in id order.
    async fn list(&self) -> anyhow::Result<Vec<Todo>>;
    async fn replace(&self, id: TodoId, input: ReplaceTodo) -> anyhow::Result<Option<Todo>>;
    async fn delete(&self, id: TodoId) -> anyhow::Result<bool>;
}
