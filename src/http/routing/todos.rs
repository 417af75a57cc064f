use axum::{extract::{Path, State}, http::StatusCode, routing::{get, post}, Json, Router};

use crate::{
    application::todo_service::TodoService,
    domain::todo::{DeleteAck, NewTodo, ReplaceTodo, Todo, TodoId},
    http::types::HttpError,
};

#[derive(Clone)]
pub struct AppState<S: TodoService> { pub service: S }

pub fn router<S: TodoService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todos", post(create_todo::<S>).get(list_todos::<S>))
        .route("/todos/:id", get(get_todo::<S>).put(replace_todo::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

async fn create_todo<S: TodoService>(State(state): State<AppState<S>>, Json(payload): Json<NewTodo>) -> Result<(StatusCode, Json<Todo>), HttpError> {
    let todo = state.service.create(payload).await.map_err(HttpError::internal)?;
    tracing::info!(id = %todo.id, "created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn list_todos<S: TodoService>(State(state): State<AppState<S>>) -> Result<Json<Vec<Todo>>, HttpError> {
    Ok(Json(state.service.list().await.map_err(HttpError::internal)?))
}

async fn get_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<i64>) -> Result<Json<Todo>, HttpError> {
    state.service.get(TodoId(id)).await.map_err(HttpError::internal)?.map(Json).ok_or_else(HttpError::not_found)
}

async fn replace_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<i64>, Json(payload): Json<ReplaceTodo>) -> Result<Json<Todo>, HttpError> {
    let replaced = state.service.replace(TodoId(id), payload).await.map_err(HttpError::internal)?;
    replaced.map(Json).ok_or_else(HttpError::not_found)
}

async fn delete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<i64>) -> Result<Json<DeleteAck>, HttpError> {
    let id = TodoId(id);
    if state.service.delete(id).await.map_err(HttpError::internal)? {
        tracing::info!(%id, "deleted");
        Ok(Json(DeleteAck { success: true, id }))
    } else {
        Err(HttpError::not_found())
    }
}
