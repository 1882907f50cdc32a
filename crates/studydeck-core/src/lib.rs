//! StudyDeck Core Library
//!
//! This crate provides the core functionality for StudyDeck, a study catalog
//! organised as categories, subtopics, study sets and flashcards, persisted
//! as a single JSON document.
//!
//! # Architecture
//!
//! - **Document**: the whole catalog, decoded leniently from storage
//! - **Store**: loads and saves the document as one unit
//! - **Catalog**: list and add operations with summary computation
//!
//! Every operation loads the document fresh; nothing is cached between
//! operations.
//!
//! # Quick Start
//!
//! ```text
//! let catalog = Catalog::open(&Config::load()?);
//!
//! let math = catalog.add_category(Some("Math"))?;
//! let algebra = catalog.add_subtopic(&math.id, Some("Algebra"))?;
//! catalog.add_set(&math.id, &algebra.id, Some("Chapter 1"))?;
//!
//! for summary in catalog.list_categories() {
//!     println!("{}: {} sets", summary.name, summary.total_sets);
//! }
//! ```
//!
//! # Modules
//!
//! - `catalog`: Operation surface (main entry point)
//! - `models`: Node types and summaries
//! - `document`: The catalog document and tree navigation
//! - `aggregate`: Summary computation
//! - `storage`: Document persistence
//! - `config`: Application configuration

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod document;
pub mod models;
pub mod storage;

pub use catalog::{Catalog, CatalogError, CatalogResult};
pub use config::Config;
pub use document::{Document, DocumentError, DocumentStats};
pub use models::{
    Category, CategorySummary, Flashcard, NodeId, NodeKind, StudySet, Subtopic, SubtopicSummary,
};
pub use storage::{
    DocumentStore, JsonFileStore, MemoryStore, StorageError, StorageResult, StorageStats,
};
