//! Per-key async locks.
//!
//! Mutations that target the same recommendation must not overlap, while
//! mutations on different recommendations may run freely. Each key gets its
//! own `tokio::sync::Mutex<()>`; entries are dropped once nobody holds or
//! waits on them.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Map of lazily created locks keyed by `K`.
#[derive(Debug)]
pub(crate) struct KeyedLocks<K> {
    slots: std::sync::Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            slots: std::sync::Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Wait for exclusive access to `key`.
    ///
    /// Waiters on the same key are served in arrival order.
    pub(crate) async fn acquire(&self, key: &K) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            // Only the map holds idle slots.
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(key.clone()).or_default())
        };
        slot.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
