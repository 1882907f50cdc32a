//! Data models for StudyDeck
//!
//! Defines the four nesting levels of the catalog: Category, Subtopic,
//! StudySet and Flashcard, plus the computed summaries served by list
//! operations.
//!
//! Nodes are decoded leniently so that older or partially-written documents
//! stay readable: child sequences default to empty, and entries that do not
//! decode as the expected node are dropped by the containing sequence.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The kind of node an id was generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Category,
    Subtopic,
    StudySet,
}

impl NodeKind {
    /// Human-readable id prefix for this kind
    pub fn prefix(self) -> &'static str {
        match self {
            NodeKind::Category => "cat",
            NodeKind::Subtopic => "sub",
            NodeKind::StudySet => "set",
        }
    }
}

/// Identifier of a catalog node, e.g. `cat-0b6e4c2e-...`
///
/// The prefix is a namespace for humans; uniqueness comes from the
/// random UUID suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(String);

impl NodeId {
    /// Generate a fresh id for a node of the given kind
    pub fn generate(kind: NodeKind) -> Self {
        Self(format!("{}-{}", kind.prefix(), Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Top-level grouping of study content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub subtopics: Vec<Subtopic>,
    /// Fields this core does not interpret, kept across load and save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    /// Create an empty category with a freshly generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(NodeId::generate(NodeKind::Category), name)
    }

    /// Create an empty category with a specific id
    pub fn with_id(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id: id.into_string(),
            name: name.into(),
            subtopics: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// A topic inside a category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subtopic {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub sets: Vec<StudySet>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subtopic {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(NodeId::generate(NodeKind::Subtopic), name)
    }

    pub fn with_id(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id: id.into_string(),
            name: name.into(),
            sets: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// A named set of flashcards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudySet {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub flashcards: Vec<Flashcard>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StudySet {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(NodeId::generate(NodeKind::StudySet), name)
    }

    pub fn with_id(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id: id.into_string(),
            name: name.into(),
            flashcards: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// A single flashcard
///
/// The card's fields (front/back content) are not interpreted here and are
/// stored exactly as found.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Flashcard(pub Value);

/// Aggregate view of a category, as returned by list operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub total_sets: usize,
    pub total_cards: usize,
    /// Reserved for review scheduling; always zero
    pub cards_to_review: usize,
}

/// Aggregate view of a subtopic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubtopicSummary {
    pub id: String,
    pub name: String,
    pub total_sets: usize,
    pub total_cards: usize,
}

/// Tolerant field decoders shared by the node types
pub(crate) mod lenient {
    use serde::de::{self, DeserializeOwned, Deserializer};
    use serde::Deserialize;
    use serde_json::Value;

    /// Decode a sequence, skipping entries that are not valid `T`.
    /// Anything other than an array reads as an empty sequence.
    pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let items = match Value::deserialize(deserializer)? {
            Value::Array(items) => items,
            _ => return Ok(Vec::new()),
        };

        Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect())
    }

    /// Node ids are strings; legacy documents used integers
    pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(id) => Ok(id),
            Value::Number(id) if id.is_i64() || id.is_u64() => Ok(id.to_string()),
            other => Err(de::Error::custom(format!("invalid node id: {other}"))),
        }
    }

    pub fn name<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(name) => Ok(name),
            _ => Ok(String::new()),
        }
    }
}
