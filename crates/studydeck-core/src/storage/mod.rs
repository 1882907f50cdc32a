//! Storage layer
//!
//! The catalog is persisted as one document. Every operation loads it fresh,
//! and every mutating operation writes it back in full.
//!
//! ## Contract
//!
//! - `load` never fails: a missing, unreadable, or malformed document is
//!   replaced by an empty one.
//! - `save` replaces the whole document and reports write failures.
//!
//! `JsonFileStore` is the on-disk implementation; `MemoryStore` keeps the
//! document in process memory.

pub mod error;
pub mod memory;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use persistence::JsonFileStore;

use serde::Serialize;

use crate::document::Document;

/// Whole-document persistence
pub trait DocumentStore: Send + Sync {
    /// Load the current document, substituting an empty one on any failure
    fn load(&self) -> Document;

    /// Replace the persisted document
    fn save(&self, doc: &Document) -> StorageResult<()>;

    /// Human-readable location of the document
    fn location(&self) -> String;

    /// Storage statistics
    fn stats(&self) -> StorageStats;
}

/// Size information about the persisted document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    pub document_exists: bool,
    pub document_size: u64,
}

impl StorageStats {
    /// Document size formatted for humans (e.g. "1.2 KB")
    pub fn size_human(&self) -> String {
        let size = self.document_size;
        if size < 1024 {
            format!("{} B", size)
        } else if size < 1024 * 1024 {
            format!("{:.1} KB", size as f64 / 1024.0)
        } else {
            format!("{:.1} MB", size as f64 / (1024.0 * 1024.0))
        }
    }
}
