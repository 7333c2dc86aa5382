//! Data types for raw document trees, retrievable units, and search results.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, Result};

/// A document identifier as it appears in source data: either a string
/// or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    /// A string identifier, used verbatim.
    Text(String),
    /// A numeric identifier, rendered in decimal.
    Number(i64),
}

impl NodeId {
    /// Render the identifier as the string form used in lineage keys.
    pub fn as_key(&self) -> String {
        match self {
            NodeId::Text(s) => s.clone(),
            NodeId::Number(n) => n.to_string(),
        }
    }
}

/// A node in a raw document tree: a document, section, or sub-section.
///
/// All fields are optional in source data and default when absent. The
/// nested sequence accepts both `subsections` and `children` as field
/// names. Raw nodes are never modified by this crate; flattening borrows
/// the tree and produces new values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    /// The node's own identifier, if the source assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<NodeId>,
    /// Section heading for this node.
    #[serde(default)]
    pub section: String,
    /// Body text for this node.
    #[serde(default)]
    pub content: String,
    /// Nested child nodes, in source order.
    #[serde(default, alias = "children", skip_serializing_if = "Vec::is_empty")]
    pub subsections: Vec<RawNode>,
}

/// An atomic retrievable unit produced by flattening a document tree.
///
/// The `doc_id` is a lineage key: each ancestor's identifier joined to its
/// parent's key with `_`, so a sub-section under document `3`, section `1`
/// carries `"3_1_<own>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievableUnit {
    /// Hierarchical lineage key for this unit.
    pub doc_id: String,
    /// Section heading carried from the source node.
    pub section: String,
    /// Body text carried from the source node.
    pub content: String,
}

/// Per-entry metadata stored alongside each indexed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Section heading, the only filterable field.
    pub section: String,
}

/// Description of an existing collection, returned by
/// [`SimilarityIndex::get_collection`](crate::index::SimilarityIndex::get_collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    /// The collection name.
    pub name: String,
    /// Collection-level metadata supplied at creation time.
    pub metadata: HashMap<String, String>,
}

/// A retrieved unit paired with its relevance scores.
///
/// `similarity_score` is `1 - distance`. For cosine distance this lands in
/// `[-1, 1]`; callers must tolerate negative scores without treating them
/// as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The unique key of the matched entry.
    pub doc_id: String,
    /// Section heading stored with the entry.
    pub section: String,
    /// The stored embedding text of the entry.
    pub content: String,
    /// Normalized relevance score, `1 - distance`.
    pub similarity_score: f32,
    /// Raw distance reported by the index, lower is more similar.
    pub distance: f32,
}

/// Parse a JSON array of raw document nodes.
///
/// Missing `doc_id`, `section`, `content`, and `subsections` fields default
/// per [`RawNode`]; malformed JSON is a [`CorpusError::Document`].
pub fn parse_documents(json: &str) -> Result<Vec<RawNode>> {
    serde_json::from_str(json)
        .map_err(|e| CorpusError::Document(format!("invalid document JSON: {e}")))
}

/// Load a JSON document corpus from a file.
pub fn load_documents(path: impl AsRef<Path>) -> Result<Vec<RawNode>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| {
        CorpusError::Document(format!("failed to read {}: {e}", path.display()))
    })?;
    parse_documents(&raw)
}
