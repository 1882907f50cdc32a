//! Catalog document handling
//!
//! The whole catalog lives in one JSON document shaped as
//! `{categories: [{id, name, subtopics: [{id, name, sets: [{id, name, flashcards: [...]}]}]}]}`.
//!
//! Decoding is the single place where shape problems are absorbed: once a
//! `Document` exists, every node in it is well-typed and navigation needs no
//! further defensive checks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{lenient, Category, StudySet, Subtopic};

/// Errors that can occur while decoding or encoding a document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document root must be an object, found {0}")]
    InvalidRoot(&'static str),
}

/// Totals over the whole document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub categories: usize,
    pub subtopics: usize,
    pub sets: usize,
    pub flashcards: usize,
}

/// The root of the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub categories: Vec<Category>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// Create an empty document (`{categories: []}`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a document from raw bytes
    ///
    /// A missing or ill-typed `categories` field reads as empty; only bytes
    /// that are not JSON, or a root that is not an object, are errors.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Decode a document from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(DocumentError::InvalidRoot(json_type_name(&other))),
        }
    }

    /// Encode the full document as pretty-printed JSON
    pub fn to_vec_pretty(&self) -> Result<Vec<u8>, DocumentError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Find a category by id (first match in insertion order)
    pub fn find_category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn find_category_mut(&mut self, id: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|category| category.id == id)
    }

    /// Append a category at the end of the root sequence
    pub fn push_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Check whether any node in the document already uses `id`
    pub fn contains_id(&self, id: &str) -> bool {
        self.categories.iter().any(|category| {
            category.id == id
                || category.subtopics.iter().any(|subtopic| {
                    subtopic.id == id || subtopic.sets.iter().any(|set| set.id == id)
                })
        })
    }

    /// Count every node in the document
    pub fn stats(&self) -> DocumentStats {
        let mut stats = DocumentStats {
            categories: self.categories.len(),
            ..DocumentStats::default()
        };

        for category in &self.categories {
            stats.subtopics += category.subtopics.len();
            for subtopic in &category.subtopics {
                stats.sets += subtopic.sets.len();
                stats.flashcards += subtopic
                    .sets
                    .iter()
                    .map(|set| set.flashcards.len())
                    .sum::<usize>();
            }
        }

        stats
    }
}

impl Category {
    /// Find a subtopic by id (first match in insertion order)
    pub fn find_subtopic(&self, id: &str) -> Option<&Subtopic> {
        self.subtopics.iter().find(|subtopic| subtopic.id == id)
    }

    pub fn find_subtopic_mut(&mut self, id: &str) -> Option<&mut Subtopic> {
        self.subtopics.iter_mut().find(|subtopic| subtopic.id == id)
    }

    /// Append a subtopic at the end of this category
    pub fn push_subtopic(&mut self, subtopic: Subtopic) {
        self.subtopics.push(subtopic);
    }
}

impl Subtopic {
    /// Append a study set at the end of this subtopic
    pub fn push_set(&mut self, set: StudySet) {
        self.sets.push(set);
    }
}

/// Child sequence held by each level of the tree, root first
const CHILD_KEYS: [&str; 4] = ["categories", "subtopics", "sets", "flashcards"];

/// List the parts of a raw document that decoding throws away
///
/// Each entry is a path such as `categories[0].subtopics[2]`. Entries that
/// are not objects, nodes whose id is neither a string nor an integer,
/// non-string names and child lists that are not arrays all end up here.
/// An empty result means a load followed by a save keeps every value.
pub fn discarded_entries(value: &Value) -> Vec<String> {
    let mut discarded = Vec::new();
    if let Value::Object(root) = value {
        check_children(root, "", 0, &mut discarded);
    }
    discarded
}

fn check_children(
    node: &Map<String, Value>,
    path: &str,
    depth: usize,
    discarded: &mut Vec<String>,
) {
    let key = CHILD_KEYS[depth];
    let child_path = if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    };

    let children = match node.get(key) {
        None | Some(Value::Null) => return,
        Some(Value::Array(children)) => children,
        Some(_) => {
            discarded.push(child_path);
            return;
        }
    };

    // Flashcards are kept as opaque values
    if depth + 1 == CHILD_KEYS.len() {
        return;
    }

    for (index, child) in children.iter().enumerate() {
        let entry_path = format!("{child_path}[{index}]");
        let Value::Object(child) = child else {
            discarded.push(entry_path);
            continue;
        };

        match child.get("id") {
            Some(Value::String(_)) => {}
            Some(Value::Number(id)) if id.is_i64() || id.is_u64() => {}
            _ => {
                discarded.push(entry_path);
                continue;
            }
        }

        if !matches!(child.get("name"), None | Some(Value::Null | Value::String(_))) {
            discarded.push(format!("{entry_path}.name"));
        }

        check_children(child, &entry_path, depth + 1, discarded);
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
