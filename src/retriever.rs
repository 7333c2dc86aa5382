//! Retrieval orchestrator.
//!
//! The [`Retriever`] coordinates the ingest-and-query workflow over a
//! [`SimilarityIndex`]: flatten → allocate → populate on the way in,
//! query → score-normalize on the way out.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use corpus_rag::{Retriever, RetrieverConfig, InMemoryIndex, HashEmbedder};
//!
//! let retriever = Retriever::builder()
//!     .config(RetrieverConfig::default())
//!     .index(Arc::new(InMemoryIndex::new(Arc::new(HashEmbedder::default()))))
//!     .build()?;
//!
//! retriever.create_collection("reports", HashMap::new()).await?;
//! retriever.populate_tree("reports", &documents).await?;
//! let results = retriever.search("reports", "funding outcomes", None).await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};

use crate::allocator::KeyAllocator;
use crate::config::RetrieverConfig;
use crate::document::{CollectionInfo, RawNode, RetrievableUnit, SearchResult};
use crate::error::{CorpusError, Result};
use crate::filter::Filter;
use crate::flatten::flatten;
use crate::index::{QueryResponse, SimilarityIndex};
use crate::ingest;

/// The retrieval orchestrator.
///
/// Owns a configuration and a shared handle to the external index.
/// Construct one via [`Retriever::builder()`]. All operations run
/// sequentially; population is expected to complete before queries begin.
pub struct Retriever {
    config: RetrieverConfig,
    index: Arc<dyn SimilarityIndex>,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("config", &self.config)
            .field("index", &"<dyn SimilarityIndex>")
            .finish()
    }
}

impl Retriever {
    /// Create a new [`RetrieverBuilder`].
    pub fn builder() -> RetrieverBuilder {
        RetrieverBuilder::default()
    }

    /// Return a reference to the retriever configuration.
    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Return a reference to the underlying index.
    pub fn index(&self) -> &Arc<dyn SimilarityIndex> {
        &self.index
    }

    /// Create a collection, dropping any prior collection of the same name.
    pub async fn create_collection(
        &self,
        name: &str,
        metadata: HashMap<String, String>,
    ) -> Result<()> {
        self.index.create_collection(name, metadata).await.inspect_err(|e| {
            error!(collection = name, error = %e, "failed to create collection");
        })
    }

    /// Look up a collection by name.
    pub async fn get_collection(&self, name: &str) -> Result<Option<CollectionInfo>> {
        self.index.get_collection(name).await
    }

    /// Delete a collection and all its entries.
    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        self.index.delete_collection(name).await.inspect_err(|e| {
            error!(collection = name, error = %e, "failed to delete collection");
        })
    }

    /// Remove every entry from a collection, keeping the collection itself.
    pub async fn clear_collection(&self, name: &str) -> Result<()> {
        self.index.delete_all(name).await.inspect_err(|e| {
            error!(collection = name, error = %e, "failed to clear collection");
        })
    }

    /// List the names of all collections in the index.
    pub async fn list_collections(&self) -> Result<Vec<String>> {
        self.index.list_collections().await
    }

    /// Number of entries stored in a collection.
    pub async fn collection_count(&self, name: &str) -> Result<usize> {
        self.index.count(name).await
    }

    /// Populate a collection from pre-flattened units.
    ///
    /// Pass the same `allocator` across calls to keep key uniqueness
    /// spanning multiple batches. Returns the number of entries added.
    pub async fn populate(
        &self,
        collection: &str,
        units: &[RetrievableUnit],
        allocator: &mut KeyAllocator,
    ) -> Result<usize> {
        ingest::populate(self.index.as_ref(), collection, units, allocator).await
    }

    /// Flatten document trees and populate a collection with the result.
    ///
    /// Uses a fresh [`KeyAllocator`] scoped to this call.
    pub async fn populate_tree(&self, collection: &str, roots: &[RawNode]) -> Result<usize> {
        let units = flatten(roots);
        let mut allocator = KeyAllocator::new();
        self.populate(collection, &units, &mut allocator).await
    }

    /// Search a collection using the configured `top_k`.
    pub async fn search(
        &self,
        collection: &str,
        query: &str,
        filter: Option<&Filter>,
    ) -> Result<Vec<SearchResult>> {
        self.search_top_k(collection, query, self.config.top_k, filter).await
    }

    /// Search a collection for the `top_k` most relevant entries.
    ///
    /// Results arrive in the index's order (ascending distance) with
    /// `similarity_score = 1 - distance`; they are never re-sorted. Zero
    /// neighbors yield an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// An empty query or `top_k == 0` is [`CorpusError::InvalidArgument`]
    /// regardless of the failure policy. Index failures follow
    /// [`RetrieverConfig::lenient_failures`]: when lenient (the default)
    /// they are logged and reported as an empty result set; when strict
    /// they are returned to the caller.
    pub async fn search_top_k(
        &self,
        collection: &str,
        query: &str,
        top_k: usize,
        filter: Option<&Filter>,
    ) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(CorpusError::InvalidArgument(
                "query text must not be empty".to_string(),
            ));
        }
        if top_k == 0 {
            return Err(CorpusError::InvalidArgument(
                "top_k must be greater than zero".to_string(),
            ));
        }

        match self.query_index(collection, query, top_k, filter).await {
            Ok(results) => {
                info!(collection, result_count = results.len(), "search completed");
                Ok(results)
            }
            Err(e) if self.config.lenient_failures => {
                error!(collection, error = %e, "search failed; reporting no results");
                Ok(Vec::new())
            }
            Err(e) => {
                error!(collection, error = %e, "search failed");
                Err(e)
            }
        }
    }

    async fn query_index(
        &self,
        collection: &str,
        query: &str,
        top_k: usize,
        filter: Option<&Filter>,
    ) -> Result<Vec<SearchResult>> {
        let response = self.index.query(collection, query, top_k, filter).await?;
        into_results(response)
    }
}

/// Convert an aligned query response into scored search results,
/// preserving the index's ordering.
fn into_results(response: QueryResponse) -> Result<Vec<SearchResult>> {
    let QueryResponse { ids, documents, metadatas, distances } = response;
    if ids.len() != documents.len()
        || ids.len() != metadatas.len()
        || ids.len() != distances.len()
    {
        return Err(CorpusError::Search(format!(
            "misaligned query response: {} ids, {} documents, {} metadatas, {} distances",
            ids.len(),
            documents.len(),
            metadatas.len(),
            distances.len()
        )));
    }

    Ok(ids
        .into_iter()
        .zip(documents)
        .zip(metadatas.into_iter().zip(distances))
        .map(|((doc_id, content), (metadata, distance))| SearchResult {
            doc_id,
            section: metadata.section,
            content,
            similarity_score: 1.0 - distance,
            distance,
        })
        .collect())
}

/// Builder for constructing a [`Retriever`].
///
/// Both fields are required. Call [`build()`](RetrieverBuilder::build) to
/// validate and produce the retriever.
#[derive(Default)]
pub struct RetrieverBuilder {
    config: Option<RetrieverConfig>,
    index: Option<Arc<dyn SimilarityIndex>>,
}

impl RetrieverBuilder {
    /// Set the retriever configuration.
    pub fn config(mut self, config: RetrieverConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the similarity index backend.
    pub fn index(mut self, index: Arc<dyn SimilarityIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the [`Retriever`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Config`] if a field is missing.
    pub fn build(self) -> Result<Retriever> {
        let config = self
            .config
            .ok_or_else(|| CorpusError::Config("config is required".to_string()))?;
        let index = self
            .index
            .ok_or_else(|| CorpusError::Config("index is required".to_string()))?;
        Ok(Retriever { config, index })
    }
}
