//! Per-key async mutual exclusion.
//!
//! Task mutations and rating-aggregate recomputes are read-modify-write
//! sequences; each serializes on a key (task id, or assignee + due date)
//! while unrelated keys proceed concurrently. Entries are retained for the
//! lifetime of the lock table.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Map of independently lockable keys.
#[derive(Debug)]
pub struct KeyedLock<K> {
    entries: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> KeyedLock<K> {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash> KeyedLock<K> {
    /// Acquires the lock for a key, waiting until it is free.
    ///
    /// The returned guard releases the key when dropped.
    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let entry = {
            let mut entries = self
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(key).or_default())
        };
        entry.lock_owned().await
    }
}

impl<K> Default for KeyedLock<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn distinct_keys_do_not_contend() {
        let locks = KeyedLock::new();
        let first = locks.acquire("alpha").await;
        // Must not deadlock while "alpha" is held.
        let second = locks.acquire("beta").await;
        drop(first);
        drop(second);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn a_key_is_reacquirable_after_release() {
        let locks = KeyedLock::new();
        drop(locks.acquire(42_u64).await);
        drop(locks.acquire(42_u64).await);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn holders_of_the_same_key_serialize() {
        let locks = Arc::new(KeyedLock::new());
        let guard = locks.acquire("shared").await;

        let contender = Arc::clone(&locks);
        let handle = tokio::spawn(async move {
            let _guard = contender.acquire("shared").await;
        });

        // The contender cannot finish while the guard is held.
        tokio::task::yield_now().await;
        assert!(!handle.is_finished());

        drop(guard);
        handle.await.expect("contender should finish");
    }
}
