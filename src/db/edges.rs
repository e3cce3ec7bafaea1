//! Collaboration edge derivation.
//!
//! Edges are a materialized view over `Paper::author_ids`. `derive_from` adds
//! the pairs implied by one author set; `rebuild` recomputes the whole set from
//! the papers currently in the registry.
//!
//! Derivation is quadratic in the paper's author count and re-runs in full on
//! every merge touching that paper. Tracked author counts per paper are small,
//! and the operation is idempotent.

use crate::db::schema::CollaborationEdge;
use crate::db::store::GraphStore;
use std::collections::{BTreeSet, HashSet};

/// Every unordered pair `{x, y}` with `x != y` drawn from `author_ids`.
pub fn collaboration_pairs(author_ids: &BTreeSet<u64>) -> Vec<CollaborationEdge> {
    let ids: Vec<u64> = author_ids.iter().copied().collect();
    let mut pairs = Vec::with_capacity(ids.len() * ids.len().saturating_sub(1) / 2);
    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            if let Some(edge) = CollaborationEdge::new(ids[i], ids[j]) {
                pairs.push(edge);
            }
        }
    }
    pairs
}

/// Ensures an edge exists for every pair in `author_ids`.
///
/// Returns how many edges were newly inserted.
pub fn derive_from(store: &mut GraphStore, author_ids: &BTreeSet<u64>) -> usize {
    collaboration_pairs(author_ids)
        .into_iter()
        .filter(|edge| store.edges.insert(*edge))
        .count()
}

/// Replaces the edge set with exactly the pairs implied by the current papers.
pub fn rebuild(store: &mut GraphStore) {
    let derived: HashSet<CollaborationEdge> = store
        .papers
        .values()
        .flat_map(|paper| collaboration_pairs(&paper.author_ids))
        .collect();
    store.edges = derived.into_iter().collect();
}
