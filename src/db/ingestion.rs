//! Paper merging and deduplication.
//!
//! Incoming feed entries are folded into the paper registry keyed by their
//! canonical (version-independent) id. Re-fetching a newer version of a paper
//! updates the existing record in place.

use crate::db::edges;
use crate::db::schema::{Author, Paper};
use crate::db::store::GraphStore;
use crate::error::{GraphError, GraphResult};

/// A paper entry as scraped from the external source.
///
/// This is the intermediate data structure between the feed parser and the
/// merger.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PaperRecord {
    /// Source identifier, URL-shaped and version-suffixed
    /// (e.g. `http://arxiv.org/abs/2401.01234v2`)
    pub id: String,
    pub title: String,
    /// Href of the link whose title is `pdf`, if the entry carried one
    pub pdf_link: Option<String>,
}

/// Result of merging one record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    Updated,
}

/// Strips the path prefix and the trailing `v<digits>` version marker.
///
/// `http://arxiv.org/abs/2401.01234v2` becomes `2401.01234`. An identifier
/// without a version marker is kept whole (after its last path segment).
pub fn canonical_paper_id(external_id: &str) -> String {
    let trimmed = external_id.trim().trim_end_matches('/');
    let segment = match trimmed.rfind('/') {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    };

    if let Some(pos) = segment.rfind('v') {
        let version = &segment[pos + 1..];
        if pos > 0 && !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()) {
            return segment[..pos].to_string();
        }
    }
    segment.to_string()
}

/// Merges one fetched paper into the registry on behalf of `requesting_author_id`.
///
/// - existing paper: the link is overwritten (latest fetch wins, including a
///   `None` link) and the requester joins `author_ids` if absent
/// - new paper: inserted with the requester as sole author, online
///
/// Edges are then derived over the paper's current author set. Merging the
/// same input twice changes nothing the second time.
///
/// Fails with `AuthorNotFound` without touching the store when the requester
/// no longer exists, so a merge racing a removal cannot resurrect the removed
/// author's papers.
pub fn merge_paper(
    store: &mut GraphStore,
    external_id: &str,
    title: &str,
    link: Option<&str>,
    requesting_author_id: u64,
) -> GraphResult<MergeOutcome> {
    if !store.authors.contains_key(&requesting_author_id) {
        return Err(GraphError::AuthorNotFound(requesting_author_id));
    }

    let paper_id = canonical_paper_id(external_id);
    if paper_id.is_empty() {
        return Err(GraphError::InvalidPaper(
            external_id.to_string(),
            "identifier has no usable path segment".to_string(),
        ));
    }

    let (outcome, author_ids) = match store.papers.get_mut(&paper_id) {
        Some(paper) => {
            paper.url = link.map(str::to_string);
            paper.author_ids.insert(requesting_author_id);
            (MergeOutcome::Updated, paper.author_ids.clone())
        }
        None => {
            let paper = Paper::new(
                paper_id.clone(),
                title,
                link.map(str::to_string),
                requesting_author_id,
            );
            let author_ids = paper.author_ids.clone();
            store.papers.insert(paper_id, paper);
            (MergeOutcome::Inserted, author_ids)
        }
    };

    edges::derive_from(store, &author_ids);
    Ok(outcome)
}

/// Convenience wrapper over [`merge_paper`] for a scraped record.
pub fn merge_record(
    store: &mut GraphStore,
    record: &PaperRecord,
    requesting_author_id: u64,
) -> GraphResult<MergeOutcome> {
    merge_paper(
        store,
        &record.id,
        &record.title,
        record.pdf_link.as_deref(),
        requesting_author_id,
    )
}

/// Merges a whole fetched page on behalf of `author`, all or nothing.
///
/// `author` is the record the ingestion run started with. Ids are reused
/// after the highest-id author is removed, so the stored author must still be
/// equal to it, not merely share its id; otherwise the page is rejected with
/// `AuthorNotFound`. Every record id is validated before the first merge, so a
/// rejected page leaves the store untouched.
pub fn merge_page(
    store: &mut GraphStore,
    records: &[PaperRecord],
    author: &Author,
) -> GraphResult<usize> {
    if store.authors.get(&author.id) != Some(author) {
        return Err(GraphError::AuthorNotFound(author.id));
    }
    if let Some(bad) = records
        .iter()
        .find(|record| canonical_paper_id(&record.id).is_empty())
    {
        return Err(GraphError::InvalidPaper(
            bad.id.clone(),
            "identifier has no usable path segment".to_string(),
        ));
    }

    for record in records {
        merge_record(store, record, author.id)?;
    }
    Ok(records.len())
}
