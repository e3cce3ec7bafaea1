//! In-memory authoritative graph state.
//!
//! `GraphStore` owns the three collections (authors, papers, collaboration
//! edges). Every public mutation leaves these invariants intact before it
//! returns:
//! - every author id listed on a paper names an existing author
//! - an edge exists for a pair exactly when the pair co-occurs on some paper
//! - paper ids are unique
//!
//! Multi-step operations (merge, derive, cascade) live in sibling modules and
//! take `&mut GraphStore`, so holding the [`SharedStore`] lock for the duration
//! of one call makes it atomic relative to every other mutator.

use crate::db::cascade::{self, CascadeReport};
use crate::db::edges;
use crate::db::schema::{
    Author, AuthorNode, AuthorPapers, CollaborationEdge, GraphSnapshot, GraphView, Paper,
};
use crate::error::{GraphError, GraphResult};
use crate::logger;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::Mutex;

/// The single store handle shared by every component; the mutex is the
/// mutual-exclusion gate around all store-mutating calls.
pub type SharedStore = Arc<Mutex<GraphStore>>;

#[derive(Debug, Default, Clone)]
pub struct GraphStore {
    pub(crate) authors: BTreeMap<u64, Author>,
    pub(crate) papers: BTreeMap<String, Paper>,
    pub(crate) edges: BTreeSet<CollaborationEdge>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps the store in the shared mutex handle.
    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    /// Rebuilds a store from a snapshot document.
    ///
    /// Author ids on papers that do not name a loaded author are dropped (and
    /// papers left without authors discarded), then the edge set is re-derived
    /// from the papers. Edges stored in the snapshot are never trusted.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut store = Self::new();
        for author in snapshot.authors {
            store.authors.insert(author.id, author);
        }

        let mut dropped = 0usize;
        for mut paper in snapshot.papers {
            let before = paper.author_ids.len();
            paper.author_ids.retain(|id| store.authors.contains_key(id));
            dropped += before - paper.author_ids.len();
            if !paper.author_ids.is_empty() {
                store.papers.insert(paper.id.clone(), paper);
            }
        }
        if dropped > 0 {
            logger::warn(&format!(
                "Dropped {} dangling author reference(s) while loading snapshot",
                dropped
            ));
        }

        let stored_edges = snapshot.edges.len();
        edges::rebuild(&mut store);
        if stored_edges != store.edges.len() {
            logger::debug(&format!(
                "Snapshot listed {} edge(s); re-derived {}",
                stored_edges,
                store.edges.len()
            ));
        }
        store
    }

    /// Adds an author, or returns the existing one when the name is taken.
    pub fn add_author(&mut self, name: &str, categories: &str) -> Author {
        if let Some(existing) = self.author_by_name(name) {
            logger::debug(&format!(
                "Author '{}' already tracked as {}",
                name, existing.id
            ));
            return existing.clone();
        }

        let id = self.authors.keys().next_back().map_or(1, |max| max + 1);
        let author = Author {
            id,
            name: name.to_string(),
            categories: categories.to_string(),
        };
        self.authors.insert(id, author.clone());
        logger::info(&format!("Added author {} '{}'", id, name));
        author
    }

    /// Removes an author and everything that depended solely on it.
    pub fn remove_author(&mut self, author_id: u64) -> GraphResult<CascadeReport> {
        cascade::remove(self, author_id)
    }

    /// Inserts or replaces a paper by id.
    ///
    /// The paper must list at least one author and every listed author must
    /// exist. Edges for the paper's author set are derived; if the replacement
    /// dropped authors from an existing record, the whole edge set is rebuilt
    /// so no stale pair survives.
    pub fn upsert_paper(&mut self, paper: Paper) -> GraphResult<()> {
        if paper.author_ids.is_empty() {
            return Err(GraphError::InvalidPaper(
                paper.id,
                "paper must list at least one author".to_string(),
            ));
        }
        if let Some(missing) = paper
            .author_ids
            .iter()
            .find(|id| !self.authors.contains_key(id))
        {
            return Err(GraphError::AuthorNotFound(*missing));
        }

        let author_ids = paper.author_ids.clone();
        let previous = self.papers.insert(paper.id.clone(), paper);
        let shrank = previous
            .map(|old| !old.author_ids.is_subset(&author_ids))
            .unwrap_or(false);

        if shrank {
            edges::rebuild(self);
        } else {
            edges::derive_from(self, &author_ids);
        }
        Ok(())
    }

    /// Author ids recorded on a paper.
    pub fn authors_of(&self, paper_id: &str) -> GraphResult<BTreeSet<u64>> {
        self.papers
            .get(paper_id)
            .map(|paper| paper.author_ids.clone())
            .ok_or_else(|| GraphError::PaperNotFound(paper_id.to_string()))
    }

    /// Papers listing the given author, ordered by paper id.
    pub fn papers_of(&self, author_id: u64) -> GraphResult<Vec<Paper>> {
        if !self.authors.contains_key(&author_id) {
            return Err(GraphError::AuthorNotFound(author_id));
        }
        Ok(self
            .papers
            .values()
            .filter(|paper| paper.author_ids.contains(&author_id))
            .cloned()
            .collect())
    }

    /// Author header plus their papers.
    pub fn author_papers(&self, author_id: u64) -> GraphResult<AuthorPapers> {
        let author = self
            .authors
            .get(&author_id)
            .ok_or(GraphError::AuthorNotFound(author_id))?;
        Ok(AuthorPapers {
            author: AuthorNode::from(author),
            papers: self.papers_of(author_id)?,
        })
    }

    /// Records a completed download on a paper.
    pub fn mark_offline(&mut self, paper_id: &str, local_path: &str) -> GraphResult<()> {
        let paper = self
            .papers
            .get_mut(paper_id)
            .ok_or_else(|| GraphError::PaperNotFound(paper_id.to_string()))?;
        paper.offline = true;
        paper.local_path = local_path.to_string();
        Ok(())
    }

    pub fn author(&self, author_id: u64) -> Option<&Author> {
        self.authors.get(&author_id)
    }

    pub fn author_by_name(&self, name: &str) -> Option<&Author> {
        self.authors.values().find(|author| author.name == name)
    }

    pub fn paper(&self, paper_id: &str) -> Option<&Paper> {
        self.papers.get(paper_id)
    }

    pub fn authors(&self) -> impl Iterator<Item = &Author> {
        self.authors.values()
    }

    pub fn papers(&self) -> impl Iterator<Item = &Paper> {
        self.papers.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &CollaborationEdge> {
        self.edges.iter()
    }

    pub fn contains_edge(&self, a: u64, b: u64) -> bool {
        CollaborationEdge::new(a, b).is_some_and(|edge| self.edges.contains(&edge))
    }

    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    pub fn paper_count(&self) -> usize {
        self.papers.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Full-state document for export.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            authors: self.authors.values().cloned().collect(),
            papers: self.papers.values().cloned().collect(),
            edges: self.edges.iter().copied().collect(),
        }
    }

    /// Node/edge view.
    pub fn graph_view(&self) -> GraphView {
        GraphView {
            nodes: self.authors.values().map(AuthorNode::from).collect(),
            links: self.edges.iter().copied().collect(),
        }
    }
}
