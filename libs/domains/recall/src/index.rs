use std::sync::RwLock;

use crate::error::{RecallError, RecallResult};
use crate::models::SearchHit;

/// A stored (identifier, vector) pair. Entries are append-only and never
/// mutated after insertion.
#[derive(Debug, Clone)]
struct IndexEntry {
    identifier: String,
    vector: Vec<f32>,
}

/// In-memory nearest-neighbor index over fixed-dimension vectors.
///
/// Searches compute the exact L2 distance against every stored entry:
/// a brute-force scan, not an approximate structure. That is the contract:
/// results are sorted ascending by distance with ties broken by insertion
/// order, and two searches over the same entries return identical results.
///
/// The index is the only cross-request shared state in the system. A search
/// holds the read lock for the full scan, so it observes exactly the
/// entries whose insert completed before the search acquired the lock;
/// inserts queue behind in-flight searches.
///
/// Construct one instance at process start and pass it to whoever needs it.
/// There is no persistence: entries are lost on restart.
pub struct VectorIndex {
    dimension: usize,
    entries: RwLock<Vec<IndexEntry>>,
}

impl VectorIndex {
    /// Create an empty index accepting vectors of exactly `dimension`
    /// components.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("vector index lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an entry. Re-inserting an identifier does not overwrite the
    /// earlier entry; both remain live and searchable.
    pub fn insert(&self, identifier: impl Into<String>, vector: Vec<f32>) -> RecallResult<()> {
        if vector.len() != self.dimension {
            return Err(RecallError::InvalidArgument(format!(
                "vector has {} components, index expects {}",
                vector.len(),
                self.dimension
            )));
        }

        let mut entries = self.entries.write().expect("vector index lock poisoned");
        entries.push(IndexEntry {
            identifier: identifier.into(),
            vector,
        });
        Ok(())
    }

    /// Return the `top_k` entries closest to `query`, ascending by exact L2
    /// distance, ties broken by insertion order.
    ///
    /// An empty index yields an empty result; `top_k` larger than the index
    /// yields every entry; `top_k == 0` is an error.
    pub fn nearest(&self, query: &[f32], top_k: usize) -> RecallResult<Vec<SearchHit>> {
        if top_k == 0 {
            return Err(RecallError::InvalidArgument(
                "top_k must be positive".to_string(),
            ));
        }
        if query.len() != self.dimension {
            return Err(RecallError::InvalidArgument(format!(
                "query has {} components, index expects {}",
                query.len(),
                self.dimension
            )));
        }

        let entries = self.entries.read().expect("vector index lock poisoned");

        let mut hits: Vec<SearchHit> = entries
            .iter()
            .map(|entry| SearchHit {
                identifier: entry.identifier.clone(),
                distance: l2_distance(query, &entry.vector),
            })
            .collect();

        // Stable sort preserves insertion order between equal distances
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(top_k);

        Ok(hits)
    }
}

/// Euclidean distance between two equal-length vectors
fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(entries: &[(&str, Vec<f32>)]) -> VectorIndex {
        let dimension = entries.first().map(|(_, v)| v.len()).unwrap_or(2);
        let index = VectorIndex::new(dimension);
        for (id, vector) in entries {
            index.insert(*id, vector.clone()).unwrap();
        }
        index
    }

    #[test]
    fn test_l2_distance_exact() {
        assert_eq!(l2_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(l2_distance(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
        assert_eq!(l2_distance(&[-1.0, 0.0], &[1.0, 0.0]), 2.0);
    }

    #[test]
    fn test_nearest_returns_exact_distances_sorted_ascending() {
        let index = index_with(&[
            ("far", vec![3.0, 4.0]),
            ("near", vec![0.0, 1.0]),
            ("origin", vec![0.0, 0.0]),
        ]);

        let hits = index.nearest(&[0.0, 0.0], 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].identifier, "origin");
        assert_eq!(hits[0].distance, 0.0);
        assert_eq!(hits[1].identifier, "near");
        assert_eq!(hits[1].distance, 1.0);
        assert_eq!(hits[2].identifier, "far");
        assert_eq!(hits[2].distance, 5.0);
    }

    #[test]
    fn test_nearest_breaks_ties_by_insertion_order() {
        // "first" and "second" are equidistant from the query
        let index = index_with(&[
            ("first", vec![1.0, 0.0]),
            ("nearest", vec![0.1, 0.0]),
            ("second", vec![0.0, 1.0]),
        ]);

        let hits = index.nearest(&[0.0, 0.0], 3).unwrap();
        assert_eq!(hits[0].identifier, "nearest");
        assert_eq!(hits[1].identifier, "first");
        assert_eq!(hits[2].identifier, "second");
        assert_eq!(hits[1].distance, hits[2].distance);
    }

    #[test]
    fn test_nearest_on_empty_index_returns_empty() {
        let index = VectorIndex::new(2);
        assert!(index.nearest(&[0.0, 0.0], 1).unwrap().is_empty());
        assert!(index.nearest(&[0.0, 0.0], 100).unwrap().is_empty());
    }

    #[test]
    fn test_nearest_with_zero_top_k_is_invalid() {
        let index = index_with(&[("doc", vec![0.0, 0.0])]);
        let err = index.nearest(&[0.0, 0.0], 0).unwrap_err();
        assert!(matches!(err, RecallError::InvalidArgument(_)));
    }

    #[test]
    fn test_nearest_with_oversized_top_k_returns_all() {
        let index = index_with(&[("a", vec![0.0, 0.0]), ("b", vec![1.0, 0.0])]);
        let hits = index.nearest(&[0.0, 0.0], 10).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_nearest_truncates_to_top_k() {
        let index = index_with(&[
            ("a", vec![0.0, 0.0]),
            ("b", vec![1.0, 0.0]),
            ("c", vec![2.0, 0.0]),
        ]);
        let hits = index.nearest(&[0.0, 0.0], 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].identifier, "a");
    }

    #[test]
    fn test_nearest_is_idempotent_without_inserts() {
        let index = index_with(&[
            ("a", vec![0.5, 0.5]),
            ("b", vec![0.5, 0.5]),
            ("c", vec![2.0, 0.0]),
        ]);
        let first = index.nearest(&[0.0, 0.0], 3).unwrap();
        let second = index.nearest(&[0.0, 0.0], 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_insert_rejects_wrong_dimension() {
        let index = VectorIndex::new(3);
        let err = index.insert("doc", vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, RecallError::InvalidArgument(_)));
        assert!(index.is_empty());
    }

    #[test]
    fn test_nearest_rejects_wrong_query_dimension() {
        let index = index_with(&[("doc", vec![0.0, 0.0])]);
        let err = index.nearest(&[0.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, RecallError::InvalidArgument(_)));
    }

    #[test]
    fn test_insert_is_append_only_for_duplicate_identifiers() {
        let index = VectorIndex::new(2);
        index.insert("doc", vec![0.0, 0.0]).unwrap();
        index.insert("doc", vec![1.0, 0.0]).unwrap();
        assert_eq!(index.len(), 2);

        let hits = index.nearest(&[0.0, 0.0], 10).unwrap();
        assert_eq!(hits[0].distance, 0.0);
        assert_eq!(hits[1].distance, 1.0);
        assert!(hits.iter().all(|h| h.identifier == "doc"));
    }

    #[test]
    fn test_search_observes_prior_inserts() {
        let index = VectorIndex::new(2);
        index.insert("a", vec![0.0, 0.0]).unwrap();
        assert_eq!(index.nearest(&[0.0, 0.0], 10).unwrap().len(), 1);

        index.insert("b", vec![1.0, 0.0]).unwrap();
        assert_eq!(index.nearest(&[0.0, 0.0], 10).unwrap().len(), 2);
    }
}
