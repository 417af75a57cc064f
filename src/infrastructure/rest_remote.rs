use async_trait::async_trait;
use ::http::StatusCode;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::domain::{
    error::ApiError,
    remote::TodoRemote,
    todo::{DeleteAck, NewTodo, Todo, TodoId},
};

/// [`TodoRemote`] over HTTP+JSON.
#[derive(Clone)]
pub struct RestTodoRemote {
    http: Client,
    base_url: String,
}

impl RestTodoRemote {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    fn collection(&self) -> String { format!("{}/todos", self.base_url) }

    fn item(&self, id: TodoId) -> String { format!("{}/todos/{id}", self.base_url) }
}

#[async_trait]
impl TodoRemote for RestTodoRemote {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.http.get(self.collection()).send().await.map_err(transport)?;
        decode(response).await
    }

    async fn get(&self, id: TodoId) -> Result<Todo, ApiError> {
        let response = self.http.get(self.item(id)).send().await.map_err(transport)?;
        decode(response).await
    }

    async fn create(&self, input: &NewTodo) -> Result<Todo, ApiError> {
        let response = self.http.post(self.collection()).json(input).send().await.map_err(transport)?;
        decode(response).await
    }

    async fn replace(&self, todo: &Todo) -> Result<Todo, ApiError> {
        let response = self.http.put(self.item(todo.id)).json(todo).send().await.map_err(transport)?;
        decode(response).await
    }

    async fn delete(&self, id: TodoId) -> Result<DeleteAck, ApiError> {
        let response = self.http.delete(self.item(id)).send().await.map_err(transport)?;
        decode(response).await
    }
}

fn transport(err: reqwest::Error) -> ApiError { ApiError::Transport(err.to_string()) }

/// Maps non-2xx statuses to errors, then parses the JSON body.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status { status: status.as_u16(), body });
    }
    response.json().await.map_err(|e| ApiError::Decode(e.to_string()))
}
