//! Cascading author removal.

use crate::db::edges;
use crate::db::store::GraphStore;
use crate::error::{GraphError, GraphResult};
use crate::logger;

/// What a removal took with it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub author_id: u64,
    /// Papers deleted because the author was their last member
    pub papers_deleted: Vec<String>,
    /// Papers that survived with the author stripped from them
    pub papers_updated: usize,
    pub edges_removed: usize,
}

/// Removes an author, its paper memberships, orphaned papers and every edge
/// that is no longer backed by a remaining paper.
///
/// The whole cascade is applied under one `&mut` borrow of the store. After
/// the memberships are stripped the edge set is re-derived from the surviving
/// papers, which also clears edges between other authors whose only shared
/// paper was deleted here.
pub fn remove(store: &mut GraphStore, author_id: u64) -> GraphResult<CascadeReport> {
    let author = store
        .authors
        .remove(&author_id)
        .ok_or(GraphError::AuthorNotFound(author_id))?;

    let mut report = CascadeReport {
        author_id,
        ..Default::default()
    };

    for paper in store.papers.values_mut() {
        if paper.author_ids.remove(&author_id) {
            report.papers_updated += 1;
        }
    }
    store.papers.retain(|id, paper| {
        if paper.author_ids.is_empty() {
            report.papers_deleted.push(id.clone());
            false
        } else {
            true
        }
    });
    report.papers_updated = report.papers_updated.saturating_sub(report.papers_deleted.len());

    let edges_before = store.edges.len();
    store.edges.retain(|edge| !edge.touches(author_id));
    edges::rebuild(store);
    report.edges_removed = edges_before.saturating_sub(store.edges.len());

    logger::info(&format!(
        "Removed author {} '{}': {} paper(s) deleted, {} paper(s) updated, {} edge(s) removed",
        author_id,
        author.name,
        report.papers_deleted.len(),
        report.papers_updated,
        report.edges_removed
    ));
    Ok(report)
}
