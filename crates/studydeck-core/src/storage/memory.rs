//! In-memory document store
//!
//! Holds the serialized document in process memory. Loads decode a fresh
//! copy each time, exactly like the file store, so no node is shared
//! between operations.

use std::sync::Mutex;

use tracing::warn;

use super::error::StorageResult;
use super::{DocumentStore, StorageStats};
use crate::document::Document;

/// Document store that keeps the encoded document in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    bytes: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store (no document saved yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with raw document bytes, which need not be
    /// a valid document
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes.into())),
        }
    }

    fn snapshot(&self) -> Option<Vec<u8>> {
        match self.bytes.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Document {
        let Some(bytes) = self.snapshot() else {
            return Document::new();
        };

        Document::from_slice(&bytes).unwrap_or_else(|e| {
            warn!(error = %e, "In-memory document is unreadable, using an empty catalog");
            Document::new()
        })
    }

    fn save(&self, doc: &Document) -> StorageResult<()> {
        let encoded = doc.to_vec_pretty()?;
        match self.bytes.lock() {
            Ok(mut guard) => *guard = Some(encoded),
            Err(poisoned) => *poisoned.into_inner() = Some(encoded),
        }
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }

    fn stats(&self) -> StorageStats {
        let size = self.snapshot().map(|bytes| bytes.len() as u64);
        StorageStats {
            document_exists: size.is_some(),
            document_size: size.unwrap_or(0),
        }
    }
}
