use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::CoreError;

use super::{validate_scope, SharedStore, StoreOp, StoreValue};

type Scope = HashMap<String, StoreValue>;

/// In-process store. Commits apply under a single write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    scopes: RwLock<HashMap<String, Scope>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held in `scope`.
    pub fn len(&self, scope: &str) -> usize {
        self.scopes
            .read()
            .map(|scopes| scopes.get(scope).map_or(0, HashMap::len))
            .unwrap_or(0)
    }
}

impl SharedStore for MemoryStore {
    fn get(&self, scope: &str, key: &str) -> Result<Option<StoreValue>, CoreError> {
        validate_scope(scope)?;
        let scopes = self
            .scopes
            .read()
            .map_err(|_| CoreError::StoreUnavailable("store lock poisoned".into()))?;
        Ok(scopes.get(scope).and_then(|s| s.get(key)).cloned())
    }

    fn commit(&self, scope: &str, ops: Vec<StoreOp>) -> Result<(), CoreError> {
        validate_scope(scope)?;
        let mut scopes = self
            .scopes
            .write()
            .map_err(|_| CoreError::StoreUnavailable("store lock poisoned".into()))?;
        let entries = scopes.entry(scope.to_string()).or_default();
        for op in ops {
            match op {
                StoreOp::Set(key, value) => {
                    entries.insert(key, value);
                }
                StoreOp::Remove(key) => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}
