use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use super::{KeyValueStore, StorageError};

/// Key-value store backed by a directory on disk.
///
/// Each key maps to `<dir>/<key>.json`. Writes go to a temporary sibling file
/// first and are renamed into place, so a crash mid-write leaves the previous
/// value readable.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` if the key is empty or could escape
    /// the store directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| StorageError::InvalidData(e.to_string()))
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(path = %path.display(), "Stored value");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("@cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("cart"));

        store.set("@cart", "[]").await.unwrap();

        assert_eq!(store.get("@cart").await.unwrap().as_deref(), Some("[]"));
        assert!(store.dir().join("@cart.json").is_file());
    }

    #[tokio::test]
    async fn test_set_replaces_value_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set("@cart", "[1]").await.unwrap();
        store.set("@cart", "[2]").await.unwrap();

        assert_eq!(store.get("@cart").await.unwrap().as_deref(), Some("[2]"));
        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(files, ["@cart.json"]);
    }

    #[tokio::test]
    async fn test_get_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("@cart.json"), [0xff, 0xfe, 0x00]).unwrap();
        let store = FileStore::new(dir.path());

        let result = store.get("@cart").await;

        assert!(matches!(result, Err(StorageError::InvalidData(_))));
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let store = FileStore::new("/tmp/cart");
        for key in ["", ".", "..", "../etc/passwd", "a/b", "a\\b", "a\0b"] {
            assert!(
                matches!(store.path_for(key), Err(StorageError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
        assert!(store.path_for("@cart").is_ok());
    }
}
