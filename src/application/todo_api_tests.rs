#[cfg(test)]
mod tests {
    use super::super::todo_api::TodoApi;
    use crate::application::cache::Tag;
    use crate::domain::{error::ApiError, remote::TodoRemote, todo::{DeleteAck, NewTodo, Todo, TodoId}};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex, atomic::{AtomicBool, AtomicUsize, Ordering}};

    #[derive(Clone, Default)]
    struct InMemoryRemote {
        items: Arc<Mutex<BTreeMap<i64, Todo>>>,
        next_id: Arc<AtomicUsize>,
        list_calls: Arc<AtomicUsize>,
        get_calls: Arc<AtomicUsize>,
        offline: Arc<AtomicBool>,
    }

    impl InMemoryRemote {
        fn check(&self) -> Result<(), ApiError> {
            if self.offline.load(Ordering::SeqCst) { Err(ApiError::Transport("connection refused".into())) } else { Ok(()) }
        }
        fn list_calls(&self) -> usize { self.list_calls.load(Ordering::SeqCst) }
    }

    #[async_trait]
    impl TodoRemote for InMemoryRemote {
        async fn list(&self) -> Result<Vec<Todo>, ApiError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(self.items.lock().unwrap().values().filter(|t| !t.deleted).cloned().collect())
        }
        async fn get(&self, id: TodoId) -> Result<Todo, ApiError> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            self.items.lock().unwrap().get(&id.0).cloned().ok_or(ApiError::NotFound)
        }
        async fn create(&self, input: &NewTodo) -> Result<Todo, ApiError> {
            self.check()?;
            let id = TodoId(self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1);
            let todo = Todo { id, title: input.title.clone(), completed: input.completed, deleted: false };
            self.items.lock().unwrap().insert(id.0, todo.clone());
            Ok(todo)
        }
        async fn replace(&self, todo: &Todo) -> Result<Todo, ApiError> {
            self.check()?;
            let mut map = self.items.lock().unwrap();
            let slot = map.get_mut(&todo.id.0).ok_or(ApiError::NotFound)?;
            *slot = todo.clone();
            Ok(todo.clone())
        }
        async fn delete(&self, id: TodoId) -> Result<DeleteAck, ApiError> {
            self.check()?;
            self.items.lock().unwrap().remove(&id.0).map(|_| DeleteAck { success: true, id }).ok_or(ApiError::NotFound)
        }
    }

    fn api() -> (TodoApi<InMemoryRemote>, InMemoryRemote) {
        let remote = InMemoryRemote::default();
        (TodoApi::new(remote.clone()), remote)
    }

    #[tokio::test]
    async fn fresh_list_is_served_from_cache() {
        let (api, remote) = api();
        api.list().await.unwrap();
        api.list().await.unwrap();
        assert_eq!(remote.list_calls(), 1);
        assert!(api.list_fetched_at().is_some());
    }

    #[tokio::test]
    async fn create_invalidates_list_and_adds_incomplete_item() {
        let (api, remote) = api();
        let before = api.list().await.unwrap().len();
        let created = api.create("Buy milk").await.unwrap();
        let after = api.list().await.unwrap();
        assert_eq!(remote.list_calls(), 2);
        assert_eq!(after.len(), before + 1);
        let matching: Vec<_> = after.iter().filter(|t| t.title == "Buy milk").collect();
        assert_eq!(matching.len(), 1);
        assert!(!matching[0].completed);
        assert_eq!(matching[0].id, created.id);
    }

    #[tokio::test]
    async fn toggle_refetches_and_changes_only_completed() {
        let (api, remote) = api();
        let created = api.create("Walk dog").await.unwrap();
        let listed = api.list().await.unwrap();
        let original = listed.iter().find(|t| t.id == created.id).unwrap().clone();

        api.update(&original.toggled()).await.unwrap();
        let listed = api.list().await.unwrap();
        let after = listed.iter().find(|t| t.id == created.id).unwrap();
        assert_eq!(remote.list_calls(), 2);
        assert_eq!(after.completed, !original.completed);
        assert_eq!(after.title, original.title);
        assert_eq!(after.deleted, original.deleted);
    }

    #[tokio::test]
    async fn update_leaves_unrelated_item_queries_cached() {
        let (api, remote) = api();
        let a = api.create("a").await.unwrap();
        let b = api.create("b").await.unwrap();
        api.get(a.id).await.unwrap();
        api.get(b.id).await.unwrap();

        api.update(&a.retitled("a2")).await.unwrap();
        assert_eq!(api.get(b.id).await.unwrap().title, "b");
        assert_eq!(api.get(a.id).await.unwrap().title, "a2");
        assert_eq!(remote.get_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn soft_delete_hides_from_list_but_not_from_lookup() {
        let (api, _remote) = api();
        let created = api.create("Old").await.unwrap();
        api.list().await.unwrap();

        let updated = api.soft_delete(&created).await.unwrap();
        assert!(updated.deleted);
        assert!(api.list().await.unwrap().iter().all(|t| t.id != created.id));
        let looked_up = api.get(created.id).await.unwrap();
        assert!(looked_up.deleted);
        assert_eq!(looked_up.title, "Old");
    }

    #[tokio::test]
    async fn hard_delete_removes_item_and_second_delete_is_not_found() {
        let (api, _remote) = api();
        let created = api.create("Gone").await.unwrap();
        api.list().await.unwrap();

        let ack = api.hard_delete(created.id).await.unwrap();
        assert_eq!(ack, DeleteAck { success: true, id: created.id });
        assert!(api.list().await.unwrap().iter().all(|t| t.id != created.id));
        let err = api.hard_delete(created.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn failed_mutation_invalidates_nothing() {
        let (api, remote) = api();
        let created = api.create("Keep").await.unwrap();
        api.list().await.unwrap();

        remote.offline.store(true, Ordering::SeqCst);
        assert!(matches!(api.update(&created.toggled()).await, Err(ApiError::Transport(_))));
        assert!(api.hard_delete(created.id).await.is_err());
        remote.offline.store(false, Ordering::SeqCst);

        let listed = api.list().await.unwrap();
        assert_eq!(remote.list_calls(), 1);
        assert!(!listed[0].completed);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let (api, remote) = api();
        remote.offline.store(true, Ordering::SeqCst);
        assert!(api.list().await.is_err());
        remote.offline.store(false, Ordering::SeqCst);
        assert!(api.list().await.unwrap().is_empty());
        assert_eq!(remote.list_calls(), 2);
    }

    #[tokio::test]
    async fn refresh_always_goes_to_the_server() {
        let (api, remote) = api();
        api.list().await.unwrap();
        api.refresh().await.unwrap();
        assert_eq!(remote.list_calls(), 2);
        assert_eq!(api.invalidate(&[Tag::TodoList]), 1);
    }

    #[tokio::test]
    async fn snapshot_generation_advances_with_mutations() {
        let (api, remote) = api();
        let created = api.create("a").await.unwrap();
        let first = api.list_snapshot().await.unwrap();
        assert!(!first.stale);

        api.update(&created.toggled()).await.unwrap();
        let second = api.list_snapshot().await.unwrap();
        assert!(second.generation > first.generation);
        assert!(second.todos[0].completed);

        let cached = api.list_snapshot().await.unwrap();
        assert_eq!(cached.generation, second.generation);
        assert_eq!(remote.list_calls(), 2);
    }
}
