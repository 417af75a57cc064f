//! Query cache with tag-based invalidation.
//!
//! Every cached query result carries the set of tags it provides. A mutation
//! invalidates a set of tags; each entry whose tags intersect that set is
//! marked stale and must be refetched before it is read again.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::{DateTime, Utc};

use crate::domain::todo::TodoId;

/// Labels attached to cached query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// A single todo, provided by every query whose result contains it.
    Todo(TodoId),
    /// Sentinel for "the collection as a whole", invalidated when membership changes.
    TodoList,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    tags: HashSet<Tag>,
    fetched_at: DateTime<Utc>,
    generation: u64,
    stale: bool,
}

/// Marker returned by [`TagCache::begin_fetch`]; hands the cache's
/// invalidation generation back to [`TagCache::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn generation(self) -> u64 { self.0 }
}

#[derive(Debug)]
pub struct TagCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    generation: u64,
}

impl<K, V> Default for TagCache<K, V> {
    fn default() -> Self { Self { entries: HashMap::new(), generation: 0 } }
}

impl<K: Eq + Hash, V: Clone> TagCache<K, V> {
    pub fn new() -> Self { Self::default() }

    /// The cached value for `key`, unless missing or stale.
    pub fn fresh(&self, key: &K) -> Option<V> {
        self.entries.get(key).filter(|e| !e.stale).map(|e| e.value.clone())
    }

    pub fn is_stale(&self, key: &K) -> bool {
        self.entries.get(key).is_some_and(|e| e.stale)
    }

    pub fn fetched_at(&self, key: &K) -> Option<DateTime<Utc>> {
        self.entries.get(key).map(|e| e.fetched_at)
    }

    /// Bumped by every [`TagCache::invalidate`].
    pub fn generation(&self) -> u64 { self.generation }

    pub fn begin_fetch(&self) -> FetchTicket { FetchTicket(self.generation) }

    /// Stores a fetched value with the tags it provides and returns whether it
    /// went in fresh. If any invalidation ran after `ticket` was taken the
    /// value may predate that mutation, so it is stored already stale. A value
    /// fetched before the current entry was is discarded.
    pub fn insert(&mut self, key: K, value: V, tags: impl IntoIterator<Item = Tag>, ticket: FetchTicket) -> bool {
        if self.entries.get(&key).is_some_and(|e| e.generation > ticket.0) {
            return false;
        }
        let stale = ticket.0 != self.generation;
        let entry = Entry { value, tags: tags.into_iter().collect(), fetched_at: Utc::now(), generation: ticket.0, stale };
        self.entries.insert(key, entry);
        !stale
    }

    /// Marks every entry providing one of `tags` stale. Returns the number of
    /// entries that went from fresh to stale.
    pub fn invalidate(&mut self, tags: &[Tag]) -> usize {
        self.generation += 1;
        let mut touched = 0;
        for entry in self.entries.values_mut() {
            if !entry.stale && tags.iter().any(|t| entry.tags.contains(t)) {
                entry.stale = true;
                touched += 1;
            }
        }
        touched
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
