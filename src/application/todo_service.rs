use crate::domain::repository::TodoRepository;
use crate::domain::todo::{NewTodo, ReplaceTodo, Todo, TodoId};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn create(&self, input: NewTodo) -> Result<Todo>;
    async fn get(&self, id: TodoId) -> Result<Option<Todo>>;
    /// The active collection: soft-deleted todos are left out.
    async fn list(&self) -> Result<Vec<Todo>>;
    async fn replace(&self, id: TodoId, input: ReplaceTodo) -> Result<Option<Todo>>;
    async fn delete(&self, id: TodoId) -> Result<bool>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn create(&self, input: NewTodo) -> Result<Todo> { self.repo.create(input).await }
    async fn get(&self, id: TodoId) -> Result<Option<Todo>> { self.repo.get(id).await }
    async fn list(&self) -> Result<Vec<Todo>> {
        let mut todos = self.repo.list().await?;
        todos.retain(|t| !t.deleted);
        Ok(todos)
    }
    async fn replace(&self, id: TodoId, input: ReplaceTodo) -> Result<Option<Todo>> { self.repo.replace(id, input).await }
    async fn delete(&self, id: TodoId) -> Result<bool> { self.repo.delete(id).await }
}
