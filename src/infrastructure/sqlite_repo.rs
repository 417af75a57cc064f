use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::{SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::domain::{
    repository::TodoRepository,
    todo::{NewTodo, ReplaceTodo, Todo, TodoId},
};

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        // Every pooled connection to `:memory:` would otherwise see its own database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                deleted INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn create(&self, input: NewTodo) -> Result<Todo> {
        let result = sqlx::query("INSERT INTO todos (title, completed, deleted) VALUES (?1, ?2, 0)")
            .bind(&input.title)
            .bind(input.completed)
            .execute(&*self.pool)
            .await?;
        Ok(Todo { id: TodoId(result.last_insert_rowid()), title: input.title, completed: input.completed, deleted: false })
    }

    async fn get(&self, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query("SELECT id, title, completed, deleted FROM todos WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await?;
        row.map(row_to_todo).transpose()
    }

    async fn list(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query("SELECT id, title, completed, deleted FROM todos ORDER BY id")
            .fetch_all(&*self.pool)
            .await?;
        rows.into_iter().map(row_to_todo).collect()
    }

    async fn replace(&self, id: TodoId, input: ReplaceTodo) -> Result<Option<Todo>> {
        let result = sqlx::query("UPDATE todos SET title = ?2, completed = ?3, deleted = ?4 WHERE id = ?1")
            .bind(id.0)
            .bind(&input.title)
            .bind(input.completed)
            .bind(input.deleted)
            .execute(&*self.pool)
            .await?;
        if result.rows_affected() == 0 { return Ok(None); }
        Ok(Some(Todo { id, title: input.title, completed: input.completed, deleted: input.deleted }))
    }

    async fn delete(&self, id: TodoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_todo(row: SqliteRow) -> Result<Todo> {
    Ok(Todo {
        id: TodoId(row.try_get("id")?),
        title: row.try_get("title")?,
        completed: row.try_get("completed")?,
        deleted: row.try_get("deleted")?,
    })
}

/// Makes sure the parent directory and file of a file-backed SQLite URL exist.
pub fn prepare_sqlite_file(database_url: &str) -> Result<()> {
    if database_url.starts_with("sqlite::memory:") { return Ok(()); }
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        // On Windows, absolute paths may look like /C:/path; strip the leading slash
        let path = if cfg!(windows) && path.len() >= 3 && path.as_bytes()[0] == b'/' && path.as_bytes()[2] == b':' {
            &path[1..]
        } else {
            path
        };
        use std::{fs, path::Path, fs::OpenOptions};
        let p = Path::new(path);
        if let Some(parent) = p.parent() { if !parent.as_os_str().is_empty() { fs::create_dir_all(parent)?; } }
        if !p.exists() {
            let _ = OpenOptions::new().create(true).append(true).open(p)?;
        }
    }
    Ok(())
}
