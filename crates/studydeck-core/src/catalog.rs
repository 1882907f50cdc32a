//! Catalog operations
//!
//! `Catalog` is the operation surface used by transports. Each operation
//! loads the document fresh from its store; mutating operations write it
//! back in full before returning.
//!
//! ## Concurrency
//!
//! Mutations run under a single-writer lock held from load to save, so two
//! writers sharing a `Catalog` can never overwrite each other's additions.
//! Reads take no lock. Writers in other processes are not coordinated with.

use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::info;

use crate::aggregate::{summarize_category, summarize_subtopic};
use crate::config::Config;
use crate::document::{Document, DocumentStats};
use crate::models::{
    Category, CategorySummary, NodeId, NodeKind, StudySet, Subtopic, SubtopicSummary,
};
use crate::storage::{DocumentStore, JsonFileStore, StorageError, StorageStats};

/// Errors returned by catalog operations
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Subtopic not found: {0}")]
    SubtopicNotFound(String),

    #[error("Field 'name' is required and must not be empty")]
    NameRequired,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::CategoryNotFound(_) | CatalogError::SubtopicNotFound(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CatalogError::NameRequired)
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// The study catalog
pub struct Catalog<S = JsonFileStore> {
    store: S,
    write_lock: Mutex<()>,
}

impl Catalog<JsonFileStore> {
    /// Open the catalog document named by the configuration
    pub fn open(config: &Config) -> Self {
        Self::new(JsonFileStore::from_config(config))
    }
}

impl<S: DocumentStore> Catalog<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// The underlying document store
    pub fn store(&self) -> &S {
        &self.store
    }

    // ==================== Reads ====================

    /// Summaries of every category, in insertion order
    pub fn list_categories(&self) -> Vec<CategorySummary> {
        self.store
            .load()
            .categories
            .iter()
            .map(summarize_category)
            .collect()
    }

    /// Summaries of every subtopic in a category
    pub fn list_subtopics(&self, category_id: &str) -> CatalogResult<Vec<SubtopicSummary>> {
        let doc = self.store.load();
        let category = find_category(&doc, category_id)?;
        Ok(category.subtopics.iter().map(summarize_subtopic).collect())
    }

    /// The full study sets of a subtopic, flashcards included
    pub fn list_sets(&self, category_id: &str, subtopic_id: &str) -> CatalogResult<Vec<StudySet>> {
        let mut doc = self.store.load();
        let subtopic = find_subtopic_mut(&mut doc, category_id, subtopic_id)?;
        Ok(std::mem::take(&mut subtopic.sets))
    }

    /// Totals over the whole document
    pub fn stats(&self) -> DocumentStats {
        self.store.load().stats()
    }

    pub fn storage_stats(&self) -> StorageStats {
        self.store.stats()
    }

    // ==================== Writes ====================

    /// Create a category at the end of the catalog
    pub fn add_category(&self, name: Option<&str>) -> CatalogResult<Category> {
        let name = validate_name(name)?;

        let category = self.write(|doc| {
            let id = fresh_id(doc, NodeKind::Category);
            let category = Category::with_id(id, name);
            doc.push_category(category.clone());
            Ok(category)
        })?;

        info!(id = %category.id, name = %category.name, "Created category");
        Ok(category)
    }

    /// Create a subtopic at the end of a category
    pub fn add_subtopic(&self, category_id: &str, name: Option<&str>) -> CatalogResult<Subtopic> {
        let subtopic = self.write(|doc| {
            let id = fresh_id(doc, NodeKind::Subtopic);
            let category = find_category_mut(doc, category_id)?;
            let name = validate_name(name)?;
            let subtopic = Subtopic::with_id(id, name);
            category.push_subtopic(subtopic.clone());
            Ok(subtopic)
        })?;

        info!(id = %subtopic.id, category = category_id, name = %subtopic.name, "Created subtopic");
        Ok(subtopic)
    }

    /// Create a study set at the end of a subtopic
    pub fn add_set(
        &self,
        category_id: &str,
        subtopic_id: &str,
        name: Option<&str>,
    ) -> CatalogResult<StudySet> {
        let set = self.write(|doc| {
            let id = fresh_id(doc, NodeKind::StudySet);
            let subtopic = find_subtopic_mut(doc, category_id, subtopic_id)?;
            let name = validate_name(name)?;
            let set = StudySet::with_id(id, name);
            subtopic.push_set(set.clone());
            Ok(set)
        })?;

        info!(id = %set.id, subtopic = subtopic_id, name = %set.name, "Created study set");
        Ok(set)
    }

    /// Run a read-modify-write cycle under the writer lock
    ///
    /// Nothing is saved when `mutate` fails.
    fn write<T>(
        &self,
        mutate: impl FnOnce(&mut Document) -> CatalogResult<T>,
    ) -> CatalogResult<T> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut doc = self.store.load();
        let result = mutate(&mut doc)?;
        self.store.save(&doc)?;
        Ok(result)
    }
}

fn find_category<'a>(doc: &'a Document, category_id: &str) -> CatalogResult<&'a Category> {
    doc.find_category(category_id)
        .ok_or_else(|| CatalogError::CategoryNotFound(category_id.to_string()))
}

fn find_category_mut<'a>(
    doc: &'a mut Document,
    category_id: &str,
) -> CatalogResult<&'a mut Category> {
    doc.find_category_mut(category_id)
        .ok_or_else(|| CatalogError::CategoryNotFound(category_id.to_string()))
}

fn find_subtopic_mut<'a>(
    doc: &'a mut Document,
    category_id: &str,
    subtopic_id: &str,
) -> CatalogResult<&'a mut Subtopic> {
    find_category_mut(doc, category_id)?
        .find_subtopic_mut(subtopic_id)
        .ok_or_else(|| CatalogError::SubtopicNotFound(subtopic_id.to_string()))
}

/// Names must contain something other than whitespace; they are stored trimmed
fn validate_name(name: Option<&str>) -> CatalogResult<String> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(CatalogError::NameRequired),
    }
}

/// Draw ids until one is not already used anywhere in the document
fn fresh_id(doc: &Document, kind: NodeKind) -> NodeId {
    loop {
        let id = NodeId::generate(kind);
        if !doc.contains_id(id.as_str()) {
            return id;
        }
    }
}
