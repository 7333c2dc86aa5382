//! Corpus population: turning flat units into indexed entries.

use tracing::{error, info};

use crate::allocator::KeyAllocator;
use crate::document::{EntryMetadata, RetrievableUnit};
use crate::error::{CorpusError, Result};
use crate::index::SimilarityIndex;

/// Render the text that gets embedded for a unit.
///
/// The template is fixed: `"{section}: {content}. "`. This exact string is
/// what the index embeds, so changing it changes retrieval behavior.
pub fn embedding_text(unit: &RetrievableUnit) -> String {
    format!("{}: {}. ", unit.section, unit.content)
}

/// Populate a collection with an ordered sequence of retrievable units.
///
/// Units with empty `content` are skipped and do not count toward the
/// returned total. Each remaining unit receives a unique key from
/// `allocator` (pass the same allocator across calls to keep uniqueness
/// spanning multiple batches) and is submitted in one aligned batch.
///
/// Returns the number of entries actually added.
pub async fn populate(
    index: &dyn SimilarityIndex,
    collection: &str,
    units: &[RetrievableUnit],
    allocator: &mut KeyAllocator,
) -> Result<usize> {
    let mut keys = Vec::new();
    let mut texts = Vec::new();
    let mut metadatas = Vec::new();

    for unit in units.iter().filter(|u| !u.content.is_empty()) {
        keys.push(allocator.allocate(&unit.doc_id));
        texts.push(embedding_text(unit));
        metadatas.push(EntryMetadata { section: unit.section.clone() });
    }

    if keys.is_empty() {
        info!(collection, added = 0, "populated collection (no embeddable units)");
        return Ok(0);
    }

    index.add(collection, &keys, &texts, &metadatas).await.map_err(|e| {
        error!(collection, error = %e, "add failed during population");
        CorpusError::Ingest(format!("add failed for collection '{collection}': {e}"))
    })?;

    let added = keys.len();
    info!(collection, added, "populated collection");
    Ok(added)
}
