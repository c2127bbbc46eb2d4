//! Per-entity mutation locks.
//!
//! Concurrent requests against the same game session or character (two
//! browser tabs, double-submits) must not interleave their
//! read-modify-write cycles: story-log appends, gold changes, and
//! inventory edits would be lost. Every mutating operation takes the
//! entity's async mutex before loading state.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use fableforge_domain::{CharacterId, SessionId};

/// A table of per-key async mutexes.
pub struct MutationLocks<K: Eq + Hash> {
    locks: Arc<DashMap<K, Arc<Mutex<()>>>>,
}

impl<K: Eq + Hash> Clone for MutationLocks<K> {
    fn clone(&self) -> Self {
        Self {
            locks: self.locks.clone(),
        }
    }
}

impl<K: Eq + Hash> Default for MutationLocks<K> {
    fn default() -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> MutationLocks<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the mutex for a key, creating it on first use.
    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}

/// Locks for game-session mutations.
pub type SessionLocks = MutationLocks<SessionId>;

/// Locks for character-ledger mutations (shop buys/sells, updates).
pub type CharacterLocks = MutationLocks<CharacterId>;
