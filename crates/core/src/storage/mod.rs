//! The shared key-value container both processes talk through.
//!
//! Keys live inside a scope (the app-group identifier). The app is the only
//! writer; the widget only reads. A batch handed to [`SharedStore::commit`]
//! becomes visible all at once, which is how the snapshot writer keeps the
//! scalar fields and the history blob from drifting apart.

pub mod file;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Scope used when a caller does not name an app group.
pub const STANDARD_SCOPE: &str = "standard";

/// A primitive value held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum StoreValue {
    Double(f64),
    Int(i64),
    Bool(bool),
    String(String),
    Data(Vec<u8>),
}

impl StoreValue {
    pub fn as_double(&self) -> Option<f64> {
        match self {
            StoreValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            StoreValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            StoreValue::Data(v) => Some(v),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            StoreValue::Double(_) => "double",
            StoreValue::Int(_) => "int",
            StoreValue::Bool(_) => "bool",
            StoreValue::String(_) => "string",
            StoreValue::Data(_) => "data",
        }
    }
}

/// One mutation inside a commit.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    Set(String, StoreValue),
    Remove(String),
}

impl StoreOp {
    pub fn set(key: impl Into<String>, value: StoreValue) -> Self {
        StoreOp::Set(key.into(), value)
    }

    pub fn remove(key: impl Into<String>) -> Self {
        StoreOp::Remove(key.into())
    }
}

/// Trait abstraction over the OS-owned shared container.
///
/// Implementations must make every `commit` atomic with respect to `get`:
/// a reader sees either all of a batch or none of it.
pub trait SharedStore: Send + Sync {
    /// Read one key. `Ok(None)` means the key is absent.
    fn get(&self, scope: &str, key: &str) -> Result<Option<StoreValue>, CoreError>;

    /// Apply a batch of mutations atomically.
    fn commit(&self, scope: &str, ops: Vec<StoreOp>) -> Result<(), CoreError>;

    fn set(&self, scope: &str, key: &str, value: StoreValue) -> Result<(), CoreError> {
        self.commit(scope, vec![StoreOp::set(key, value)])
    }

    fn remove(&self, scope: &str, key: &str) -> Result<(), CoreError> {
        self.commit(scope, vec![StoreOp::remove(key)])
    }
}

/// Reject scope names that cannot name a container.
pub(crate) fn validate_scope(scope: &str) -> Result<(), CoreError> {
    if scope.trim().is_empty() {
        return Err(CoreError::StoreUnavailable("scope name is empty".into()));
    }
    if scope.contains(|c: char| c == '/' || c == '\\') || scope == "." || scope == ".." {
        return Err(CoreError::StoreUnavailable(format!(
            "invalid scope name: {scope}"
        )));
    }
    Ok(())
}
