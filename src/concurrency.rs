//! Per-dataroom write serialization
//!
//! Saves and deletes of permission groups hold the dataroom's write lock, so
//! at most one write is in flight per dataroom. Reads take the shared lock
//! and never observe a half-written group set.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Lock manager keyed by dataroom id.
pub struct DataroomLockManager {
    locks: Arc<RwLock<HashMap<String, Arc<RwLock<()>>>>>,
}

impl DataroomLockManager {
    pub fn new() -> Self {
        Self {
            locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get or create the lock for a dataroom.
    pub fn get_lock(&self, dataroom_id: &str) -> Arc<RwLock<()>> {
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(dataroom_id) {
                return lock.clone();
            }
        }

        let mut map = self.locks.write();
        // Another thread may have created it between the two locks.
        map.entry(dataroom_id.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }

    /// Run `f` holding the dataroom's exclusive lock.
    pub fn with_write<T>(&self, dataroom_id: &str, f: impl FnOnce() -> T) -> T {
        let lock = self.get_lock(dataroom_id);
        let _guard = lock.write();
        f()
    }

    /// Run `f` holding the dataroom's shared lock.
    pub fn with_read<T>(&self, dataroom_id: &str, f: impl FnOnce() -> T) -> T {
        let lock = self.get_lock(dataroom_id);
        let _guard = lock.read();
        f()
    }
}

impl Default for DataroomLockManager {
    fn default() -> Self {
        Self::new()
    }
}
