//! Bounded least-recently-used cache with one initialisation per key.
//!
//! The map only holds slots; the value inside a slot is produced by
//! [`OnceCell::get_or_init`] outside the map lock. Concurrent first lookups of the same key
//! share one slot, so exactly one of them runs the loader while the others block on the cell
//! and then observe the fully built value.

use ahash::AHashMap;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::sync::Arc;

struct Slot<V> {
    cell: Arc<OnceCell<V>>,
    last_used: u64,
}

struct CacheState<V> {
    slots: AHashMap<String, Slot<V>>,
    clock: u64,
}

pub(crate) struct LoadingLruCache<V> {
    capacity: usize,
    state: Mutex<CacheState<V>>,
}

impl<V: Clone> LoadingLruCache<V> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(CacheState {
                slots: AHashMap::with_capacity(capacity),
                clock: 0,
            }),
        }
    }

    /// Return the cached value for `key`, running `load` if no other caller has.
    pub(crate) fn get_or_load<F>(&self, key: &str, load: F) -> V
    where
        F: FnOnce() -> V,
    {
        let cell = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            state.clock += 1;
            let now = state.clock;

            if let Some(slot) = state.slots.get_mut(key) {
                slot.last_used = now;
                Arc::clone(&slot.cell)
            } else {
                if state.slots.len() >= self.capacity {
                    Self::evict_oldest(state);
                }
                let cell = Arc::new(OnceCell::new());
                state.slots.insert(
                    key.to_string(),
                    Slot {
                        cell: Arc::clone(&cell),
                        last_used: now,
                    },
                );
                cell
            }
        };

        cell.get_or_init(load).clone()
    }

    fn evict_oldest(state: &mut CacheState<V>) {
        let oldest = state
            .slots
            .iter()
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            tracing::debug!("Evicting stopword set '{}' from cache", key);
            state.slots.remove(&key);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().slots.len()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.state.lock().slots.contains_key(key)
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
}
