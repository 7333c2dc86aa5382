//! Property tests for flattening, key allocation, and score normalization.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use corpus_rag::allocator::KeyAllocator;
use corpus_rag::document::{EntryMetadata, NodeId, RawNode, RetrievableUnit};
use corpus_rag::error::Result;
use corpus_rag::filter::Filter;
use corpus_rag::flatten::flatten;
use corpus_rag::index::{QueryResponse, SimilarityIndex};
use corpus_rag::retriever::Retriever;
use corpus_rag::{CollectionInfo, RetrieverConfig};
use proptest::prelude::*;

fn arb_node_id() -> impl Strategy<Value = NodeId> {
    prop_oneof![
        "[a-z0-9]{1,4}".prop_map(NodeId::Text),
        (0i64..100).prop_map(NodeId::Number),
    ]
}

/// Generate a document tree up to four tiers deep with small fan-out.
fn arb_tree() -> impl Strategy<Value = RawNode> {
    let leaf = (proptest::option::of(arb_node_id()), "[a-z]{0,5}", "[a-z]{0,5}").prop_map(
        |(doc_id, section, content)| RawNode {
            doc_id,
            section,
            content,
            subsections: Vec::new(),
        },
    );
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            proptest::option::of(arb_node_id()),
            "[a-z]{0,5}",
            "[a-z]{0,5}",
            proptest::collection::vec(inner, 0..4),
        )
            .prop_map(|(doc_id, section, content, subsections)| RawNode {
                doc_id,
                section,
                content,
                subsections,
            })
    })
}

fn node_count(nodes: &[RawNode]) -> usize {
    nodes.iter().map(|n| 1 + node_count(&n.subsections)).sum()
}

/// **Flattening: every node at every depth yields exactly one unit**
/// *For any* forest of raw nodes, `flatten` SHALL produce one unit per
/// node, and running it twice SHALL produce identical output in identical
/// order.
mod prop_flatten_is_total_and_stable {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn unit_count_equals_node_count(roots in proptest::collection::vec(arb_tree(), 0..5)) {
            let units = flatten(&roots);
            prop_assert_eq!(units.len(), node_count(&roots));
        }

        #[test]
        fn flatten_is_idempotent(roots in proptest::collection::vec(arb_tree(), 0..5)) {
            prop_assert_eq!(flatten(&roots), flatten(&roots));
        }

        #[test]
        fn input_tree_is_untouched(roots in proptest::collection::vec(arb_tree(), 0..5)) {
            let before = roots.clone();
            let _ = flatten(&roots);
            prop_assert_eq!(roots, before);
        }
    }
}

/// **Allocation: duplicate-heavy inputs still get distinct keys**
/// *For any* sequence of base keys, the allocator SHALL hand out as many
/// distinct keys as there are inputs, deterministically across reruns.
mod prop_allocator_uniqueness {
    use super::*;

    fn units(bases: &[String]) -> Vec<RetrievableUnit> {
        bases
            .iter()
            .map(|b| RetrievableUnit {
                doc_id: b.clone(),
                section: String::new(),
                content: "x".to_string(),
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn keys_are_distinct_and_deterministic(
            // A tiny alphabet forces heavy base-key collisions.
            bases in proptest::collection::vec("[ab](_[12])?", 1..30),
        ) {
            let first: Vec<String> = KeyAllocator::new()
                .allocate_all(units(&bases))
                .into_iter()
                .map(|(k, _)| k)
                .collect();

            let distinct: HashSet<&String> = first.iter().collect();
            prop_assert_eq!(distinct.len(), bases.len());

            let second: Vec<String> = KeyAllocator::new()
                .allocate_all(units(&bases))
                .into_iter()
                .map(|(k, _)| k)
                .collect();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn repeated_base_suffixes_count_up(base in "[a-z]{1,4}", n in 1usize..8) {
            let mut allocator = KeyAllocator::new();
            let mut keys = Vec::new();
            for _ in 0..n {
                keys.push(allocator.allocate(&base));
            }
            prop_assert_eq!(&keys[0], &base);
            for (i, key) in keys.iter().enumerate().skip(1) {
                prop_assert_eq!(key, &format!("{base}_{i}"));
            }
        }
    }
}

/// An index returning a canned response, for exercising score mapping.
struct StubIndex {
    response: QueryResponse,
}

#[async_trait]
impl SimilarityIndex for StubIndex {
    async fn create_collection(
        &self,
        _name: &str,
        _metadata: HashMap<String, String>,
    ) -> Result<()> {
        Ok(())
    }

    async fn get_collection(&self, _name: &str) -> Result<Option<CollectionInfo>> {
        Ok(None)
    }

    async fn add(
        &self,
        _collection: &str,
        _keys: &[String],
        _texts: &[String],
        _metadatas: &[EntryMetadata],
    ) -> Result<()> {
        Ok(())
    }

    async fn query(
        &self,
        _collection: &str,
        _query_text: &str,
        _top_k: usize,
        _filter: Option<&Filter>,
    ) -> Result<QueryResponse> {
        Ok(self.response.clone())
    }

    async fn delete_all(&self, _collection: &str) -> Result<()> {
        Ok(())
    }

    async fn delete_collection(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn count(&self, _collection: &str) -> Result<usize> {
        Ok(0)
    }
}

/// **Score normalization: `similarity_score + distance == 1`, exactly**
/// *For any* response whose distances are multiples of 1/256 in `[0, 2]`
/// (exactly representable, so the transform incurs no rounding), every
/// mapped result SHALL satisfy the identity exactly, in index order.
mod prop_score_transform_exact {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn similarity_plus_distance_is_one(
            raw in proptest::collection::vec(0u32..=512, 1..12),
        ) {
            let distances: Vec<f32> = raw.iter().map(|n| *n as f32 / 256.0).collect();
            let n = distances.len();
            let response = QueryResponse {
                ids: (0..n).map(|i| i.to_string()).collect(),
                documents: vec!["t".to_string(); n],
                metadatas: vec![EntryMetadata { section: "s".to_string() }; n],
                distances: distances.clone(),
            };

            let rt = tokio::runtime::Runtime::new().unwrap();
            let results = rt.block_on(async {
                let retriever = Retriever::builder()
                    .config(
                        RetrieverConfig::builder()
                            .top_k(n)
                            .lenient_failures(false)
                            .build()
                            .unwrap(),
                    )
                    .index(Arc::new(StubIndex { response }))
                    .build()
                    .unwrap();
                retriever.search("c", "q", None).await.unwrap()
            });

            prop_assert_eq!(results.len(), n);
            for (result, distance) in results.iter().zip(&distances) {
                prop_assert_eq!(result.distance, *distance);
                prop_assert_eq!(result.similarity_score + result.distance, 1.0f32);
            }
        }
    }
}
