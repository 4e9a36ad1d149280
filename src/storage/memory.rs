//! In-process store for tests and ephemeral runs

use super::{KeyValueStore, Scope};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// `HashMap`-backed store. Clones share the same map, so two stores built
/// from one another with different owners see the same shared keys.
#[derive(Clone)]
pub struct MemoryStore {
    owner: String,
    entries: Arc<RwLock<HashMap<(String, String), String>>>,
    fail_writes: Arc<AtomicBool>,
    fail_key: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            entries: Arc::new(RwLock::new(HashMap::new())),
            fail_writes: Arc::new(AtomicBool::new(false)),
            fail_key: Arc::new(Mutex::new(None)),
        }
    }

    /// Another user's view over the same entries
    pub fn for_owner(&self, owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            entries: Arc::clone(&self.entries),
            fail_writes: Arc::clone(&self.fail_writes),
            fail_key: Arc::clone(&self.fail_key),
        }
    }

    /// Make every subsequent `set` fail, to exercise write-failure paths
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make writes to one key fail while every other key still succeeds
    pub fn fail_writes_to(&self, key: Option<&str>) {
        if let Ok(mut slot) = self.fail_key.lock() {
            *slot = key.map(str::to_string);
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        let map = self
            .entries
            .read()
            .map_err(|_| Error::storage_read(key.to_string(), "memory store lock poisoned"))?;
        Ok(map.get(&(scope.namespace(&self.owner), key.to_string())).cloned())
    }

    async fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::storage_write(key.to_string(), "writes disabled"));
        }
        let key_blocked = self
            .fail_key
            .lock()
            .map(|slot| slot.as_deref() == Some(key))
            .unwrap_or(false);
        if key_blocked {
            return Err(Error::storage_write(key.to_string(), "writes disabled for key"));
        }
        let mut map = self
            .entries
            .write()
            .map_err(|_| Error::storage_write(key.to_string(), "memory store lock poisoned"))?;
        map.insert(
            (scope.namespace(&self.owner), key.to_string()),
            value.to_string(),
        );
        Ok(())
    }
}
