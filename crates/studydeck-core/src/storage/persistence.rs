//! JSON file persistence
//!
//! The catalog is one pretty-printed JSON file, rewritten in full on every
//! save. Writes go to a temporary sibling first and are renamed into place,
//! so readers never observe a half-written document.
//!
//! Storage location: `~/.local/share/studydeck/database.json` (configurable
//! via `Config`)

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};
use super::{DocumentStore, StorageStats};
use crate::config::Config;
use crate::document::{discarded_entries, Document};

/// Document store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the document at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store for the document named by the configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.document_path())
    }

    /// Path of the document file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable document is copied before it gets replaced
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".corrupt");
        self.path.with_file_name(name)
    }

    /// Check if the document exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn decode(&self, bytes: &[u8]) -> Option<Document> {
        let value: Value = match serde_json::from_slice(bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Document is not valid JSON, using an empty catalog");
                return None;
            }
        };

        let discarded = discarded_entries(&value);

        match Document::from_value(value) {
            Ok(doc) => {
                if !discarded.is_empty() {
                    warn!(
                        path = ?self.path,
                        entries = ?discarded,
                        "Document has entries that cannot be read; the next save drops them"
                    );
                    self.back_up(bytes);
                }
                Some(doc)
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Document has an invalid shape, using an empty catalog");
                None
            }
        }
    }

    /// Keep a copy of bytes we could not fully decode, since the next save
    /// replaces the file
    fn back_up(&self, bytes: &[u8]) {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return;
        }

        let backup_path = self.backup_path();
        match atomic_write(&backup_path, bytes) {
            Ok(()) => warn!(backup = ?backup_path, "Saved a copy of the original document"),
            Err(e) => warn!(backup = ?backup_path, error = %e, "Could not back up unreadable document"),
        }
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Document {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "No document yet, starting with an empty catalog");
                return Document::new();
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Could not read document, using an empty catalog");
                return Document::new();
            }
        };

        match self.decode(&bytes) {
            Some(doc) => {
                debug!(path = ?self.path, categories = doc.categories.len(), "Loaded document");
                doc
            }
            None => {
                self.back_up(&bytes);
                Document::new()
            }
        }
    }

    fn save(&self, doc: &Document) -> StorageResult<()> {
        let bytes = doc.to_vec_pretty()?;
        atomic_write(&self.path, &bytes)?;
        debug!(path = ?self.path, bytes = bytes.len(), "Saved document");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn stats(&self) -> StorageStats {
        let size = fs::metadata(&self.path).map(|m| m.len()).ok();
        StorageStats {
            document_exists: size.is_some(),
            document_size: size.unwrap_or(0),
        }
    }
}

/// Write data to a file atomically
///
/// 1. Write to a uniquely named temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    fs::create_dir_all(dir).map_err(|source| StorageError::CreateDirectory {
        path: dir.to_path_buf(),
        source,
    })?;

    // Same directory, so the rename stays on one filesystem
    let mut temp =
        NamedTempFile::new_in(dir).map_err(|e| StorageError::from_io(e, dir.to_path_buf()))?;
    let temp_path = temp.path().to_path_buf();

    temp.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    temp.persist(path)
        .map_err(|e| StorageError::AtomicWriteFailed {
            from: temp_path,
            to: path.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(temp_dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(temp_dir.path().join("database.json"))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        assert!(!store.exists());
        assert!(store.load().categories.is_empty());
        // Loading never creates the file
        assert!(!store.exists());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let mut doc = Document::new();
        doc.push_category(Category::new("Math"));
        store.save(&doc).unwrap();
        assert!(store.exists());

        let loaded = store.load();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_saved_file_is_plain_json() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store.save(&Document::new()).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value, json!({"categories": []}));
    }

    #[test]
    fn test_corrupt_file_loads_empty_and_is_backed_up() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::write(store.path(), "{\"categories\": [").unwrap();

        assert!(store.load().categories.is_empty());

        let backup = fs::read_to_string(store.backup_path()).unwrap();
        assert_eq!(backup, "{\"categories\": [");
        assert!(store.backup_path().ends_with("database.json.corrupt"));
    }

    #[test]
    fn test_empty_file_loads_empty_without_backup() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::write(store.path(), "").unwrap();

        assert!(store.load().categories.is_empty());
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn test_root_without_categories_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::write(store.path(), r#"{"decks": []}"#).unwrap();

        assert!(store.load().categories.is_empty());
    }

    #[test]
    fn test_non_object_root_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::write(store.path(), "[]").unwrap();

        assert!(store.load().categories.is_empty());
        assert!(store.backup_path().exists());
    }

    #[test]
    fn test_unknown_fields_survive_save() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::write(
            store.path(),
            r#"{"owner": "ana", "categories": [{"id": "cat-1", "name": "Math", "icon": "sigma"}]}"#,
        )
        .unwrap();

        let mut doc = store.load();
        doc.push_category(Category::new("History"));
        store.save(&doc).unwrap();

        let value: Value = serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(value["owner"], json!("ana"));
        assert_eq!(value["categories"][0]["icon"], json!("sigma"));
        assert_eq!(value["categories"][1]["name"], json!("History"));
    }

    #[test]
    fn test_skipped_entries_are_backed_up_before_save() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let original = r#"{"categories": [
            {"id": "cat-1", "name": "Math", "subtopics": [
                {"name": "Legacy subtopic without id", "sets": [{"id": "set-1", "name": "Ch 1", "flashcards": [{"front": "a"}]}]},
                "note: keep me",
                {"id": 1.5}
            ]},
            {"id": "cat-2", "name": "History", "subtopics": {"weird": true}}
        ]}"#;
        fs::write(store.path(), original).unwrap();

        let mut doc = store.load();
        assert_eq!(doc.categories.len(), 2);
        assert!(doc.categories[0].subtopics.is_empty());

        doc.push_category(Category::new("New"));
        store.save(&doc).unwrap();

        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), original);
    }

    #[test]
    fn test_well_formed_document_is_not_backed_up() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::write(
            store.path(),
            r#"{"categories": [{"id": 7, "name": "Legacy", "subtopics": null}]}"#,
        )
        .unwrap();

        assert_eq!(store.load().categories[0].id, "7");
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("a").join("b").join("database.json"));

        store.save(&Document::new()).unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store.save(&Document::new()).unwrap();
        store.save(&Document::new()).unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("database.json")]);
    }

    #[test]
    fn test_document_file_with_tmp_extension() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("catalog.tmp"));

        let mut doc = Document::new();
        doc.push_category(Category::new("Math"));
        store.save(&doc).unwrap();
        store.save(&doc).unwrap();

        assert_eq!(store.load(), doc);
    }

    #[test]
    fn test_concurrent_stores_on_one_path_never_fail() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("database.json");

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = JsonFileStore::new(&path);
                std::thread::spawn(move || {
                    for j in 0..25 {
                        let mut doc = store.load();
                        doc.push_category(Category::new(format!("writer {i} #{j}")));
                        store.save(&doc).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // Writers in separate stores may overwrite each other, but every
        // save completes and the file always holds a whole document
        let store = JsonFileStore::new(&path);
        assert!(!store.backup_path().exists());
        assert!(!store.load().categories.is_empty());
    }

    #[test]
    fn test_save_into_unwritable_location_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let store = JsonFileStore::new(blocker.join("database.json"));
        let err = store.save(&Document::new()).unwrap_err();
        assert!(matches!(err, StorageError::CreateDirectory { .. }));
    }

    #[test]
    fn test_stats() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let stats = store.stats();
        assert!(!stats.document_exists);
        assert_eq!(stats.document_size, 0);

        store.save(&Document::new()).unwrap();
        let stats = store.stats();
        assert!(stats.document_exists);
        assert!(stats.document_size > 0);
    }
}
