//! Similarity index trait: the external engine that embeds, stores, and
//! searches corpus entries.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::document::{CollectionInfo, EntryMetadata};
use crate::error::Result;
use crate::filter::Filter;

/// The raw response to a nearest-neighbor query.
///
/// All four sequences are positionally aligned and sorted ascending by
/// distance, per the index's own contract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResponse {
    /// Unique keys of the matched entries.
    pub ids: Vec<String>,
    /// Stored embedding texts of the matched entries.
    pub documents: Vec<String>,
    /// Stored metadata of the matched entries.
    pub metadatas: Vec<EntryMetadata>,
    /// Distances to the query, lower is more similar.
    pub distances: Vec<f32>,
}

/// A storage and nearest-neighbor engine for embedded corpus entries.
///
/// Implementations own embedding: [`add`](SimilarityIndex::add) and
/// [`query`](SimilarityIndex::query) accept plain text. Collections are
/// addressed by name on every call.
///
/// # Example
///
/// ```rust,ignore
/// use corpus_rag::{InMemoryIndex, SimilarityIndex};
///
/// let index = InMemoryIndex::new(embedder);
/// index.create_collection("reports", HashMap::new()).await?;
/// index.add("reports", &keys, &texts, &metadatas).await?;
/// let response = index.query("reports", "funding outcomes", 5, None).await?;
/// ```
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Create a named collection, dropping any existing collection of the
    /// same name first.
    async fn create_collection(
        &self,
        name: &str,
        metadata: HashMap<String, String>,
    ) -> Result<()>;

    /// Look up a collection by name. Returns `None` if it does not exist.
    async fn get_collection(&self, name: &str) -> Result<Option<CollectionInfo>>;

    /// Add entries to a collection in one batch.
    ///
    /// `keys`, `texts`, and `metadatas` must be equal-length and
    /// positionally aligned; keys must be unique within the collection.
    async fn add(
        &self,
        collection: &str,
        keys: &[String],
        texts: &[String],
        metadatas: &[EntryMetadata],
    ) -> Result<()>;

    /// Query for the `top_k` nearest entries to `query_text`, optionally
    /// restricted by a metadata filter.
    async fn query(
        &self,
        collection: &str,
        query_text: &str,
        top_k: usize,
        filter: Option<&Filter>,
    ) -> Result<QueryResponse>;

    /// Remove every entry from a collection, keeping the collection itself.
    async fn delete_all(&self, collection: &str) -> Result<()>;

    /// Delete a collection and all its entries.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// List the names of all collections.
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Number of entries stored in a collection.
    async fn count(&self, collection: &str) -> Result<usize>;
}
