//! Instance registries keyed by scope

use super::singleton::SingletonInstance;
use super::{ComponentInstance, InstanceStatus};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use ioc_domain::TypeKey;
use once_cell::sync::Lazy;
use std::hash::Hash;
use std::sync::Arc;

/// Concurrent map from scope key to the wrapper for that key.
///
/// Wrappers are never removed individually; a disposed one stays in place.
pub(crate) struct InstanceRegistry<K, V> {
    entries: DashMap<K, Arc<V>>,
}

impl<K: Eq + Hash + Copy, V> InstanceRegistry<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Wrapper for `key`, inserting one built by `create` if absent
    pub(crate) fn get_or_insert_with(&self, key: K, create: impl FnOnce() -> V) -> Arc<V> {
        Arc::clone(
            self.entries
                .entry(key)
                .or_insert_with(|| Arc::new(create()))
                .value(),
        )
    }

    /// Wrapper for `key`, built by `create` if absent or if `stale` rejects
    /// the current one
    pub(crate) fn get_or_replace_with(
        &self,
        key: K,
        stale: impl FnOnce(&V) -> bool,
        create: impl FnOnce() -> V,
    ) -> Arc<V> {
        match self.entries.entry(key) {
            Entry::Occupied(mut entry) => {
                if stale(entry.get().as_ref()) {
                    entry.insert(Arc::new(create()));
                }
                Arc::clone(entry.get())
            }
            Entry::Vacant(entry) => Arc::clone(entry.insert(Arc::new(create())).value()),
        }
    }

    /// Number of wrappers holding a live object
    pub(crate) fn live(&self) -> usize
    where
        V: ComponentInstance,
    {
        self.entries
            .iter()
            .filter(|entry| entry.value().status() == InstanceStatus::Instantiated)
            .count()
    }

    pub(crate) fn clear(&self) {
        self.entries.clear();
    }
}

static GLOBAL_SINGLETONS: Lazy<SingletonRegistry> = Lazy::new(SingletonRegistry::new);

/// Registry of Global-scope instances, keyed by implementation type.
///
/// Repositories use the process-wide registry unless given their own;
/// child repositories inherit their parent's. Tests create a fresh registry
/// per test so that singletons never leak between them.
#[derive(Clone)]
pub struct SingletonRegistry {
    pub(crate) inner: Arc<InstanceRegistry<TypeKey, SingletonInstance>>,
}

impl SingletonRegistry {
    /// Create an empty, isolated registry
    pub fn new() -> Self {
        Self {
            inner: Arc::new(InstanceRegistry::new()),
        }
    }

    /// The process-wide registry
    pub fn global() -> Self {
        GLOBAL_SINGLETONS.clone()
    }

    /// Number of singletons currently alive
    pub fn len(&self) -> usize {
        self.inner.live()
    }

    /// Whether no singleton is alive
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the singleton for implementation type `T` is alive
    pub fn contains<T: 'static>(&self) -> bool {
        self.inner
            .get(&TypeKey::of::<T>())
            .is_some_and(|instance| instance.status() == InstanceStatus::Instantiated)
    }

    /// Whether both handles refer to the same registry
    pub fn ptr_eq(&self, other: &SingletonRegistry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for SingletonRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SingletonRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingletonRegistry")
            .field("instances", &self.len())
            .finish()
    }
}
