use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::application::cache::{Tag, TagCache};
use crate::domain::error::ApiError;
use crate::domain::remote::TodoRemote;
use crate::domain::todo::{DeleteAck, NewTodo, Todo, TodoId};

/// A list read tagged with the cache generation it was fetched at.
///
/// Generations only grow, so of two snapshots the one with the higher
/// generation reflects every mutation the lower one does.
#[derive(Debug, Clone)]
pub struct ListSnapshot {
    pub todos: Arc<Vec<Todo>>,
    pub generation: u64,
    pub fetched_at: DateTime<Utc>,
    /// A mutation landed while this list was in flight; it may not show it.
    pub stale: bool,
}

#[derive(Default)]
struct Caches {
    list: TagCache<(), Arc<Vec<Todo>>>,
    items: TagCache<TodoId, Arc<Todo>>,
}

impl Caches {
    fn invalidate(&mut self, tags: &[Tag]) -> usize {
        self.list.invalidate(tags) + self.items.invalidate(tags)
    }
}

/// Cached queries and tag-invalidating mutations over a [`TodoRemote`].
///
/// Queries are served from the cache while fresh. Mutations invalidate the
/// tags they affect once the server has accepted them, so the next read of an
/// affected query goes back to the server.
pub struct TodoApi<R: TodoRemote> {
    remote: R,
    caches: Mutex<Caches>,
}

impl<R: TodoRemote> TodoApi<R> {
    pub fn new(remote: R) -> Self { Self { remote, caches: Mutex::new(Caches::default()) } }

    /// All active todos. Provides one tag per item plus the list sentinel.
    pub async fn list(&self) -> Result<Arc<Vec<Todo>>, ApiError> {
        self.list_snapshot().await.map(|snapshot| snapshot.todos)
    }

    /// Like [`TodoApi::list`], but also reports which cache generation the
    /// result belongs to and whether a mutation overtook the fetch.
    pub async fn list_snapshot(&self) -> Result<ListSnapshot, ApiError> {
        let ticket = {
            let caches = self.caches();
            if let (Some(todos), Some(fetched_at)) = (caches.list.fresh(&()), caches.list.fetched_at(&())) {
                tracing::debug!(items = todos.len(), "todo list served from cache");
                return Ok(ListSnapshot { todos, generation: caches.list.generation(), fetched_at, stale: false });
            }
            caches.list.begin_fetch()
        };
        let todos = Arc::new(self.remote.list().await.inspect_err(|e| tracing::warn!(error = %e, "list todos failed"))?);
        let fetched_at = Utc::now();
        let tags = todos.iter().map(|t| Tag::Todo(t.id)).chain([Tag::TodoList]).collect::<Vec<_>>();
        let fresh = self.caches().list.insert((), todos.clone(), tags, ticket);
        if !fresh {
            tracing::debug!(generation = ticket.generation(), "todo list fetch overtaken by a mutation");
        }
        Ok(ListSnapshot { todos, generation: ticket.generation(), fetched_at, stale: !fresh })
    }

    /// Direct lookup by id, soft-deleted todos included.
    pub async fn get(&self, id: TodoId) -> Result<Arc<Todo>, ApiError> {
        let ticket = {
            let caches = self.caches();
            if let Some(hit) = caches.items.fresh(&id) {
                tracing::debug!(%id, "todo served from cache");
                return Ok(hit);
            }
            caches.items.begin_fetch()
        };
        let todo = Arc::new(self.remote.get(id).await.inspect_err(|e| tracing::warn!(%id, error = %e, "get todo failed"))?);
        self.caches().items.insert(id, todo.clone(), [Tag::Todo(id)], ticket);
        Ok(todo)
    }

    /// Creates an incomplete todo. Invalidates the list sentinel.
    pub async fn create(&self, title: &str) -> Result<Todo, ApiError> {
        let created = self.remote.create(&NewTodo::new(title)).await
            .inspect_err(|e| tracing::warn!(error = %e, "create todo failed"))?;
        tracing::info!(id = %created.id, "todo created");
        self.invalidate(&[Tag::TodoList]);
        Ok(created)
    }

    /// Replaces the todo identified by `todo.id`. Invalidates that item's tag.
    pub async fn update(&self, todo: &Todo) -> Result<Todo, ApiError> {
        let updated = self.remote.replace(todo).await
            .inspect_err(|e| tracing::warn!(id = %todo.id, error = %e, "update todo failed"))?;
        self.invalidate(&[Tag::Todo(todo.id)]);
        Ok(updated)
    }

    /// Same as [`TodoApi::update`] with `deleted` forced on.
    pub async fn soft_delete(&self, todo: &Todo) -> Result<Todo, ApiError> {
        self.update(&todo.marked_deleted()).await
    }

    /// Removes the todo on the server. Invalidates the item and the list sentinel.
    pub async fn hard_delete(&self, id: TodoId) -> Result<DeleteAck, ApiError> {
        let ack = self.remote.delete(id).await
            .inspect_err(|e| tracing::warn!(%id, error = %e, "delete todo failed"))?;
        tracing::info!(%id, "todo deleted");
        self.invalidate(&[Tag::Todo(id), Tag::TodoList]);
        Ok(ack)
    }

    /// Drops the cached list and fetches it again.
    pub async fn refresh(&self) -> Result<Arc<Vec<Todo>>, ApiError> {
        self.invalidate(&[Tag::TodoList]);
        self.list().await
    }

    /// When the list currently in cache was fetched.
    pub fn list_fetched_at(&self) -> Option<DateTime<Utc>> { self.caches().list.fetched_at(&()) }

    pub fn invalidate(&self, tags: &[Tag]) -> usize {
        let touched = self.caches().invalidate(tags);
        tracing::debug!(?tags, touched, "cache tags invalidated");
        touched
    }

    fn caches(&self) -> MutexGuard<'_, Caches> {
        // Critical sections never leave the maps half-written.
        self.caches.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
