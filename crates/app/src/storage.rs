//! Persisted state.
//!
//! Each store is written as JSON under its own namespace, wrapped as
//! `{"state": ..., "version": 0}`.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use mockall::automock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Namespace holding the cart.
pub const CART_NAMESPACE: &str = "cart-storage";

/// Namespace holding the order history.
pub const ORDERS_NAMESPACE: &str = "orders-storage";

/// Layout version written into every envelope.
pub const STATE_VERSION: u32 = 0;

/// Errors that can occur while reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error.
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    /// Stored document is not valid JSON for its store.
    #[error("malformed stored state: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored document was written by an unknown layout version.
    #[error("unsupported state version {found} in {namespace}")]
    UnsupportedVersion {
        /// Namespace that was read
        namespace: String,

        /// Version found in the envelope
        found: u32,
    },
}

/// Key-value store for serialized state documents.
#[automock]
pub trait StateStorage: Send {
    /// Read a namespace. Missing namespaces read as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace exists but cannot be read.
    fn read(&self, namespace: &str) -> Result<Option<String>, StorageError>;

    /// Replace a namespace's contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the contents cannot be written.
    fn write(&mut self, namespace: &str, contents: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    state: T,
    version: u32,
}

/// Load and decode a namespace.
///
/// # Errors
///
/// Returns an error if the stored document cannot be read or decoded.
pub fn load_state<T: DeserializeOwned>(
    storage: &impl StateStorage,
    namespace: &str,
) -> Result<Option<T>, StorageError> {
    let Some(contents) = storage.read(namespace)? else {
        return Ok(None);
    };

    let envelope: Envelope<T> = serde_json::from_str(&contents)?;

    if envelope.version != STATE_VERSION {
        return Err(StorageError::UnsupportedVersion {
            namespace: namespace.to_string(),
            found: envelope.version,
        });
    }

    Ok(Some(envelope.state))
}

/// Encode and store a namespace.
///
/// # Errors
///
/// Returns an error if the state cannot be encoded or written.
pub fn save_state<T: Serialize>(
    storage: &mut impl StateStorage,
    namespace: &str,
    state: &T,
) -> Result<(), StorageError> {
    let contents = serde_json::to_string(&Envelope {
        state,
        version: STATE_VERSION,
    })?;

    storage.write(namespace, &contents)
}

/// Stores each namespace as `{dir}/{namespace}.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store files under `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the state files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{namespace}.json"))
    }
}

impl StateStorage for FileStorage {
    fn read(&self, namespace: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(namespace)) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&mut self, namespace: &str, contents: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path(namespace);
        let staging = path.with_extension("json.tmp");

        fs::write(&staging, contents)?;
        fs::rename(&staging, &path)?;

        Ok(())
    }
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    namespaces: FxHashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    fn read(&self, namespace: &str) -> Result<Option<String>, StorageError> {
        Ok(self.namespaces.get(namespace).cloned())
    }

    fn write(&mut self, namespace: &str, contents: &str) -> Result<(), StorageError> {
        self.namespaces
            .insert(namespace.to_string(), contents.to_string());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    #[test]
    fn missing_namespace_reads_as_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path().join("state"));

        assert_eq!(storage.read(CART_NAMESPACE)?, None);
        assert_eq!(load_state::<Counter>(&storage, CART_NAMESPACE)?, None);

        Ok(())
    }

    #[test]
    fn file_storage_round_trips_an_envelope() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut storage = FileStorage::new(dir.path().join("state"));

        save_state(&mut storage, ORDERS_NAMESPACE, &Counter { count: 3 })?;

        let raw = fs::read_to_string(dir.path().join("state/orders-storage.json"))?;

        assert_eq!(raw, r#"{"state":{"count":3},"version":0}"#);
        assert_eq!(
            load_state::<Counter>(&storage, ORDERS_NAMESPACE)?,
            Some(Counter { count: 3 })
        );
        assert_eq!(storage.read(CART_NAMESPACE)?, None);

        Ok(())
    }

    #[test]
    fn unknown_versions_are_rejected() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.write(CART_NAMESPACE, r#"{"state":{"count":1},"version":7}"#)?;

        let result = load_state::<Counter>(&storage, CART_NAMESPACE);

        assert!(matches!(
            result,
            Err(StorageError::UnsupportedVersion { found: 7, .. })
        ));

        Ok(())
    }

    #[test]
    fn malformed_documents_are_json_errors() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.write(CART_NAMESPACE, "not json")?;

        assert!(matches!(
            load_state::<Counter>(&storage, CART_NAMESPACE),
            Err(StorageError::Json(_))
        ));

        Ok(())
    }
}
