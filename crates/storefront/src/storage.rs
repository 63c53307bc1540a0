//! Persisted client-side key/value storage.
//!
//! Holds the auth token and the logged-in username between runs. Values are
//! kept in memory and, when a path is configured, written through to a JSON
//! file on every change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Storage key of the auth token.
pub const TOKEN_KEY: &str = "token";

/// Storage key of the logged-in username.
pub const USERNAME_KEY: &str = "username";

/// Errors reading or writing persisted storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Bearer token used to authenticate cart requests.
///
/// The value is never printed by `Debug`.
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    /// Wrap a raw token value.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

/// Cheaply cloneable handle to the client's key/value store.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    inner: Arc<LocalStorageInner>,
}

#[derive(Debug)]
struct LocalStorageInner {
    path: Option<PathBuf>,
    values: RwLock<BTreeMap<String, String>>,
}

impl LocalStorage {
    /// Open storage backed by a JSON file, creating it lazily on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| StorageError::Json {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = values.len(), "Opened client storage");

        Ok(Self {
            inner: Arc::new(LocalStorageInner {
                path: Some(path),
                values: RwLock::new(values),
            }),
        })
    }

    /// Storage that lives only in memory.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self {
            inner: Arc::new(LocalStorageInner {
                path: None,
                values: RwLock::new(BTreeMap::new()),
            }),
        }
    }

    /// Read a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Write a value and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be written.
    pub fn set(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let mut values = self
            .inner
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.into());
        self.persist(&values)
    }

    /// Remove a value and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be written.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self
            .inner
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }

    /// The stored auth token, if a non-empty one is present.
    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        self.get(TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .map(AuthToken::new)
    }

    /// Path of the backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };

        let io_err = |source| StorageError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(values).map_err(|source| StorageError::Json {
            path: path.clone(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("qkart-storage-test-{}-{name}", std::process::id()))
            .join("storage.json")
    }

    #[test]
    fn test_ephemeral_get_set_remove() {
        let storage = LocalStorage::ephemeral();
        assert_eq!(storage.get(TOKEN_KEY), None);

        storage.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc"));

        storage.remove(TOKEN_KEY).unwrap();
        assert_eq!(storage.get(TOKEN_KEY), None);
        assert!(storage.path().is_none());
    }

    #[test]
    fn test_token_ignores_empty_value() {
        let storage = LocalStorage::ephemeral();
        storage.set(TOKEN_KEY, "").unwrap();
        assert!(storage.token().is_none());

        storage.set(TOKEN_KEY, "jwt").unwrap();
        assert_eq!(storage.token().unwrap().bearer(), "Bearer jwt");
    }

    #[test]
    fn test_clones_share_values() {
        let storage = LocalStorage::ephemeral();
        let other = storage.clone();
        storage.set(USERNAME_KEY, "crio.do").unwrap();
        assert_eq!(other.get(USERNAME_KEY).as_deref(), Some("crio.do"));
    }

    #[test]
    fn test_file_roundtrip() {
        let path = temp_path("roundtrip");
        let _ = std::fs::remove_file(&path);

        let storage = LocalStorage::open(&path).unwrap();
        storage.set(TOKEN_KEY, "persisted").unwrap();
        storage.set(USERNAME_KEY, "alice").unwrap();

        let reopened = LocalStorage::open(&path).unwrap();
        assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("persisted"));
        assert_eq!(reopened.get(USERNAME_KEY).as_deref(), Some("alice"));

        reopened.remove(TOKEN_KEY).unwrap();
        let reopened = LocalStorage::open(&path).unwrap();
        assert!(reopened.token().is_none());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_open_rejects_corrupt_file() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let err = LocalStorage::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Json { .. }));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_auth_token_debug_redacts() {
        let token = AuthToken::new("super_secret_jwt");
        let debug_output = format!("{token:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_jwt"));
    }
}
