use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::{validate_scope, SharedStore, StoreOp, StoreValue};

/// Current on-disk document version.
pub const CURRENT_VERSION: u16 = 1;

/// On-disk layout of one scope: `<root>/<scope>.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ScopeDocument {
    version: u16,
    entries: BTreeMap<String, StoreValue>,
}

/// File-backed store shared by separate processes.
///
/// Each scope is one JSON document. A commit rewrites the document into a
/// temporary file next to it and renames it into place, so a reader in another
/// process sees either the old document or the new one, never a torn write.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

/// Serializes commits from every `FileStore` handle in this process, so two
/// handles on one root never interleave their read-modify-write cycles.
static COMMIT_LOCK: Mutex<()> = Mutex::new(());

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scope_path(&self, scope: &str) -> PathBuf {
        self.root.join(format!("{scope}.json"))
    }

    fn read_document(&self, scope: &str) -> Result<ScopeDocument, CoreError> {
        let path = self.scope_path(scope);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ScopeDocument {
                    version: CURRENT_VERSION,
                    entries: BTreeMap::new(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        let doc: ScopeDocument = serde_json::from_slice(&bytes).map_err(|e| {
            CoreError::StoreUnavailable(format!("unreadable scope document {}: {e}", path.display()))
        })?;
        if doc.version == 0 || doc.version > CURRENT_VERSION {
            return Err(CoreError::StoreUnavailable(format!(
                "unsupported scope document version: {}",
                doc.version
            )));
        }
        Ok(doc)
    }

    fn write_document(&self, scope: &str, doc: &ScopeDocument) -> Result<(), CoreError> {
        let bytes = serde_json::to_vec(doc)
            .map_err(|e| CoreError::Encode(format!("Failed to serialize scope document: {e}")))?;

        let path = self.scope_path(scope);
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{scope}.json."))
            .suffix(".tmp")
            .tempfile_in(&self.root)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| CoreError::from(e.error))?;
        Ok(())
    }
}

impl SharedStore for FileStore {
    fn get(&self, scope: &str, key: &str) -> Result<Option<StoreValue>, CoreError> {
        validate_scope(scope)?;
        let mut doc = self.read_document(scope)?;
        Ok(doc.entries.remove(key))
    }

    fn commit(&self, scope: &str, ops: Vec<StoreOp>) -> Result<(), CoreError> {
        validate_scope(scope)?;
        let _guard = COMMIT_LOCK
            .lock()
            .map_err(|_| CoreError::StoreUnavailable("store lock poisoned".into()))?;

        let mut doc = self.read_document(scope)?;
        doc.version = CURRENT_VERSION;
        for op in ops {
            match op {
                StoreOp::Set(key, StoreValue::Double(v)) if !v.is_finite() => {
                    return Err(CoreError::Encode(format!(
                        "non-finite double for key {key}: {v}"
                    )));
                }
                StoreOp::Set(key, value) => {
                    doc.entries.insert(key, value);
                }
                StoreOp::Remove(key) => {
                    doc.entries.remove(&key);
                }
            }
        }
        self.write_document(scope, &doc)
    }
}
