// SPDX-License-Identifier: MPL-2.0
//! Device key/value storage backends.

use crate::error::{Error, Result};
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Extension of the files written by [`FileStorage`].
const ENTRY_EXTENSION: &str = "cbor";

/// Async byte store keyed by string.
pub trait StorageBackend: Send + Sync + 'static {
    /// Returns the stored bytes, `None` if the key was never written.
    fn read(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>>>;

    fn write(&self, key: &str, bytes: Vec<u8>) -> BoxFuture<'_, Result<()>>;

    /// Deletes the entry; removing a missing key is not an error.
    fn remove(&self, key: &str) -> BoxFuture<'_, Result<()>>;
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage under the resolved app data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory can be determined.
    pub fn in_app_data_dir(override_dir: Option<PathBuf>) -> Result<Self> {
        crate::paths::get_app_data_dir_with_override(override_dir)
            .map(Self::new)
            .ok_or_else(|| Error::Io("no data directory available".to_string()))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maps a key such as `persist:root` to a portable file name.
    #[must_use]
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.{ENTRY_EXTENSION}"))
    }

    async fn read_entry(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.entry_path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_entry(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.entry_path(key);
        // Write-then-rename so a crash never leaves a half-written entry.
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove_entry(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>>> {
        let key = key.to_string();
        Box::pin(async move { self.read_entry(&key).await })
    }

    fn write(&self, key: &str, bytes: Vec<u8>) -> BoxFuture<'_, Result<()>> {
        let key = key.to_string();
        Box::pin(async move { self.write_entry(&key, bytes).await })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, Result<()>> {
        let key = key.to_string();
        Box::pin(async move { self.remove_entry(&key).await })
    }
}

/// In-process storage for tests and hosts without a writable disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    write_count: Mutex<usize>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates an entry.
    #[must_use]
    pub fn with_entry(self, key: &str, bytes: Vec<u8>) -> Self {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), bytes);
        self
    }

    /// Current bytes under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Number of writes performed so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        *self.write_count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>>> {
        let value = self.get(key);
        Box::pin(async move { Ok(value) })
    }

    fn write(&self, key: &str, bytes: Vec<u8>) -> BoxFuture<'_, Result<()>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), bytes);
        *self.write_count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Box::pin(async { Ok(()) })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, Result<()>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Box::pin(async { Ok(()) })
    }
}
