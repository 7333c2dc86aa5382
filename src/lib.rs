//! # corpus-rag
//!
//! Hierarchical document corpus retrieval over a similarity index.
//!
//! Nested sectioned documents are flattened into atomic retrievable units
//! whose identifiers encode their full lineage, deduplicated, embedded and
//! stored in an external similarity index, then queried with optional
//! metadata filters into normalized, distance-ordered results — ready for
//! a text-generation layer or a CLI to consume.
//!
//! ## Architecture
//!
//! - **[`document`]** — raw tree, retrievable unit, and search result types;
//!   JSON corpus loading
//! - **[`flatten`](mod@flatten)** — document-tree flattening with lineage keys
//! - **[`allocator`]** — unique-key allocation for entries entering the index
//! - **[`filter`]** — metadata filter predicates and the index where-clause
//!   grammar
//! - **[`index`]** — the [`SimilarityIndex`] contract for external engines
//! - **[`embedding`]** — the [`Embedder`] trait and a deterministic dev/test
//!   embedder
//! - **[`inmemory`]** — cosine-distance reference index implementation
//! - **[`ingest`]** — corpus population (filter, template, key, batch add)
//! - **[`retriever`]** — the [`Retriever`] orchestrating populate and search
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use corpus_rag::{
//!     Filter, HashEmbedder, InMemoryIndex, Retriever, RetrieverConfig,
//!     parse_documents,
//! };
//!
//! let documents = parse_documents(
//!     r#"[{"doc_id": "1", "section": "Intro", "content": "A",
//!          "subsections": [{"section": "Sub", "content": "B"}]}]"#,
//! )?;
//!
//! let index = Arc::new(InMemoryIndex::new(Arc::new(HashEmbedder::default())));
//! let retriever = Retriever::builder()
//!     .config(RetrieverConfig::default())
//!     .index(index)
//!     .build()?;
//!
//! retriever.create_collection("reports", HashMap::new()).await?;
//! retriever.populate_tree("reports", &documents).await?;
//!
//! let filter = Filter::equals("section", "Sub");
//! let results = retriever.search("reports", "B", Some(&filter)).await?;
//! ```

pub mod allocator;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod filter;
pub mod flatten;
pub mod index;
pub mod ingest;
pub mod inmemory;
pub mod retriever;

pub use allocator::KeyAllocator;
pub use config::{RetrieverConfig, RetrieverConfigBuilder};
pub use document::{
    CollectionInfo, EntryMetadata, NodeId, RawNode, RetrievableUnit, SearchResult,
    load_documents, parse_documents,
};
pub use embedding::{Embedder, HashEmbedder};
pub use error::{CorpusError, Result};
pub use filter::Filter;
pub use flatten::flatten;
pub use index::{QueryResponse, SimilarityIndex};
pub use ingest::{embedding_text, populate};
pub use inmemory::InMemoryIndex;
pub use retriever::{Retriever, RetrieverBuilder};
