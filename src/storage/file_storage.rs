use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use super::KeyValueStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// File-backed key-value store.
///
/// Each key maps to one JSON file in the base directory:
/// ```text
/// {data-dir}/
/// ├── aidict%3Aflashcards.json
/// ├── aidict%3Ahistory.json
/// └── aidict%3Asettings.json
/// ```
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("aidict"))
            .ok_or(StorageError::DataDirNotFound)
    }

    /// Initialize the storage directory
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        Ok(())
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Map a logical key (e.g. `aidict:flashcards`) to its file.
    ///
    /// Keys are percent-encoded, so distinct keys never share a file and no
    /// key can name a path outside the base directory.
    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.chars().all(|c| c == '.') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let file_stem = urlencoding::encode(key);
        Ok(self.base_path.join(format!("{}.json", file_stem)))
    }
}

impl KeyValueStore for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        Ok(Some(content))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        self.init()?;

        // Write to a sibling temp file and rename over the target so readers
        // never observe a half-written blob.
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("data"));
        (storage, temp_dir)
    }

    #[test]
    fn test_read_missing_key() {
        let (storage, _temp) = create_test_storage();
        assert_eq!(storage.read("aidict:flashcards").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let (storage, _temp) = create_test_storage();

        storage.write("aidict:flashcards", "[]").unwrap();
        assert_eq!(
            storage.read("aidict:flashcards").unwrap().as_deref(),
            Some("[]")
        );

        storage.write("aidict:flashcards", "[1]").unwrap();
        assert_eq!(
            storage.read("aidict:flashcards").unwrap().as_deref(),
            Some("[1]")
        );
    }

    #[test]
    fn test_key_maps_to_encoded_file() {
        let (storage, _temp) = create_test_storage();

        storage.write("aidict:history", "[]").unwrap();
        assert!(storage.base_path().join("aidict%3Ahistory.json").exists());
        assert!(!storage.base_path().join("aidict%3Ahistory.json.tmp").exists());
    }

    #[test]
    fn test_similar_keys_use_separate_files() {
        let (storage, _temp) = create_test_storage();

        storage.write("aidict:flashcards", "[1]").unwrap();
        storage.write("aidict-flashcards", "[2]").unwrap();
        storage.write("aidict/flashcards", "[3]").unwrap();

        assert_eq!(storage.read("aidict:flashcards").unwrap().as_deref(), Some("[1]"));
        assert_eq!(storage.read("aidict-flashcards").unwrap().as_deref(), Some("[2]"));
        assert_eq!(storage.read("aidict/flashcards").unwrap().as_deref(), Some("[3]"));
    }

    #[test]
    fn test_keys_cannot_escape_base_dir() {
        let (storage, _temp) = create_test_storage();

        storage.write("../outside", "{}").unwrap();
        assert!(storage.base_path().join("..%2Foutside.json").exists());
        assert!(!storage.base_path().join("../outside.json").exists());

        for key in ["", ".", ".."] {
            assert!(matches!(
                storage.read(key),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let (storage, _temp) = create_test_storage();

        // A directory where the blob should be cannot be read as text.
        fs::create_dir_all(storage.base_path().join("aidict%3Aflashcards.json")).unwrap();
        assert!(matches!(
            storage.read("aidict:flashcards"),
            Err(StorageError::Io(_))
        ));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (storage, _temp) = create_test_storage();

        storage.write("aidict:settings", "{}").unwrap();
        storage.remove("aidict:settings").unwrap();
        storage.remove("aidict:settings").unwrap();
        assert_eq!(storage.read("aidict:settings").unwrap(), None);
    }
}
