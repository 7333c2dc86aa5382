//! In-memory similarity index using cosine distance.
//!
//! [`InMemoryIndex`] is the crate's reference [`SimilarityIndex`]: entries
//! are embedded through an injected [`Embedder`] and held in a `HashMap`
//! behind a `tokio::sync::RwLock`. Suitable for development, testing, and
//! small corpora.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{CollectionInfo, EntryMetadata};
use crate::embedding::Embedder;
use crate::error::{CorpusError, Result};
use crate::filter::Filter;
use crate::index::{QueryResponse, SimilarityIndex};

struct StoredEntry {
    key: String,
    text: String,
    metadata: EntryMetadata,
    embedding: Vec<f32>,
}

#[derive(Default)]
struct Collection {
    metadata: HashMap<String, String>,
    entries: Vec<StoredEntry>,
}

/// An in-memory [`SimilarityIndex`] using cosine distance.
///
/// Distances are `1 - cosine_similarity`, bounded in `[0, 2]`.
/// `create_collection` recreates from scratch: any existing collection of
/// the same name is dropped first.
pub struct InMemoryIndex {
    embedder: Arc<dyn Embedder>,
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryIndex {
    /// Create an empty index that embeds entry text with `embedder`.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder, collections: RwLock::new(HashMap::new()) }
    }

    fn backend_err(message: impl Into<String>) -> CorpusError {
        CorpusError::Index { backend: "memory".to_string(), message: message.into() }
    }

    fn missing(collection: &str) -> CorpusError {
        Self::backend_err(format!("collection '{collection}' does not exist"))
    }
}

/// Cosine similarity of two vectors; 0.0 if either has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl SimilarityIndex for InMemoryIndex {
    async fn create_collection(
        &self,
        name: &str,
        metadata: HashMap<String, String>,
    ) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.insert(name.to_string(), Collection { metadata, entries: Vec::new() });
        Ok(())
    }

    async fn get_collection(&self, name: &str) -> Result<Option<CollectionInfo>> {
        let collections = self.collections.read().await;
        Ok(collections.get(name).map(|c| CollectionInfo {
            name: name.to_string(),
            metadata: c.metadata.clone(),
        }))
    }

    async fn add(
        &self,
        collection: &str,
        keys: &[String],
        texts: &[String],
        metadatas: &[EntryMetadata],
    ) -> Result<()> {
        if keys.len() != texts.len() || keys.len() != metadatas.len() {
            return Err(CorpusError::InvalidArgument(format!(
                "add batch must be aligned: {} keys, {} texts, {} metadatas",
                keys.len(),
                texts.len(),
                metadatas.len()
            )));
        }

        let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let embeddings = self.embedder.embed_batch(&text_refs).await?;

        let mut collections = self.collections.write().await;
        let store =
            collections.get_mut(collection).ok_or_else(|| Self::missing(collection))?;

        let mut seen: HashSet<&str> =
            store.entries.iter().map(|e| e.key.as_str()).collect();
        for key in keys {
            if !seen.insert(key) {
                return Err(Self::backend_err(format!(
                    "duplicate key '{key}' in collection '{collection}'"
                )));
            }
        }

        for ((key, text), (metadata, embedding)) in keys
            .iter()
            .zip(texts)
            .zip(metadatas.iter().zip(embeddings))
        {
            store.entries.push(StoredEntry {
                key: key.clone(),
                text: text.clone(),
                metadata: metadata.clone(),
                embedding,
            });
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        query_text: &str,
        top_k: usize,
        filter: Option<&Filter>,
    ) -> Result<QueryResponse> {
        let query_embedding = self.embedder.embed(query_text).await?;

        let collections = self.collections.read().await;
        let store =
            collections.get(collection).ok_or_else(|| Self::missing(collection))?;

        let mut scored: Vec<(&StoredEntry, f32)> = store
            .entries
            .iter()
            .filter(|entry| filter.is_none_or(|f| f.matches(&entry.metadata)))
            .map(|entry| {
                let distance = 1.0 - cosine_similarity(&entry.embedding, &query_embedding);
                (entry, distance)
            })
            .collect();

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        let mut response = QueryResponse::default();
        for (entry, distance) in scored {
            response.ids.push(entry.key.clone());
            response.documents.push(entry.text.clone());
            response.metadatas.push(entry.metadata.clone());
            response.distances.push(distance);
        }
        Ok(response)
    }

    async fn delete_all(&self, collection: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store =
            collections.get_mut(collection).ok_or_else(|| Self::missing(collection))?;
        store.entries.clear();
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.remove(name);
        Ok(())
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read().await;
        let store =
            collections.get(collection).ok_or_else(|| Self::missing(collection))?;
        Ok(store.entries.len())
    }
}
