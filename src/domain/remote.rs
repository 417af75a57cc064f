use async_trait::async_trait;

use super::error::ApiError;
use super::todo::{DeleteAck, NewTodo, Todo, TodoId};

/// Client-side transport for the `todos` collection.
#[async_trait]
pub trait TodoRemote: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Todo>, ApiError>;
    async fn get(&self, id: TodoId) -> Result<Todo, ApiError>;
    async fn create(&self, input: &NewTodo) -> Result<Todo, ApiError>;
    /// Full-resource replace of `todo.id`.
    async fn replace(&self, todo: &Todo) -> Result<Todo, ApiError>;
    async fn delete(&self, id: TodoId) -> Result<DeleteAck, ApiError>;
}
