//! Flattening of nested document trees into retrievable units.
//!
//! Every node at every depth contributes exactly one [`RetrievableUnit`],
//! so the corpus holds both whole-document entries and their narrower
//! sub-section entries. Traversal is depth-first with children in source
//! order, and the input tree is never modified.

use crate::document::{NodeId, RawNode, RetrievableUnit};

/// Flatten an ordered sequence of document trees into retrievable units.
///
/// Top-level nodes take their own `doc_id` if present, otherwise their
/// 1-based position. Each child's key is `{parent_key}_{own}` where `own`
/// is the child's `doc_id` if present, otherwise its 0-based position
/// among siblings. Nesting depth is unbounded.
///
/// Units with empty `content` are still emitted; they anchor lineage keys
/// for their descendants and are excluded later at ingestion time.
pub fn flatten(roots: &[RawNode]) -> Vec<RetrievableUnit> {
    let mut units = Vec::new();
    for (position, node) in roots.iter().enumerate() {
        let key = own_key(node.doc_id.as_ref(), position + 1);
        flatten_into(node, key, &mut units);
    }
    units
}

fn flatten_into(node: &RawNode, key: String, out: &mut Vec<RetrievableUnit>) {
    out.push(RetrievableUnit {
        doc_id: key.clone(),
        section: node.section.clone(),
        content: node.content.clone(),
    });
    for (position, child) in node.subsections.iter().enumerate() {
        let child_key = format!("{key}_{}", own_key(child.doc_id.as_ref(), position));
        flatten_into(child, child_key, out);
    }
}

fn own_key(id: Option<&NodeId>, position: usize) -> String {
    id.map(NodeId::as_key).unwrap_or_else(|| position.to_string())
}
