//! Graph schema definition.
//!
//! This module defines the node and edge types held by the collaboration graph
//! and the document shapes used for export.
//!
//! # Graph Structure
//! - **Author nodes**: tracked researchers, keyed by a numeric id
//! - **Paper records**: canonical arXiv papers, each listing the tracked authors
//!   that fetched it
//! - **Collaboration edges**: undirected author pairs sharing at least one paper
//!
//! The serialized field names (`cats`, `URL`, `path`, `aIDs`, `collabs`, ...)
//! are the on-disk snapshot format and must not change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A tracked author.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Assigned as `max(existing) + 1`, never reused while the author exists
    pub id: u64,
    /// Display name, also the dedup key when adding authors
    pub name: String,
    /// arXiv category clause used to narrow the author query (e.g. `cat:cs.LG`)
    #[serde(rename = "cats", default)]
    pub categories: String,
}

/// A paper in the registry, keyed by its version-independent arXiv id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub id: String,
    pub name: String,
    /// Latest fetched PDF link; `None` when the feed carried no pdf link
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
    #[serde(default)]
    pub offline: bool,
    #[serde(rename = "path", default)]
    pub local_path: String,
    #[serde(rename = "aIDs")]
    pub author_ids: BTreeSet<u64>,
}

impl Paper {
    /// New online paper attributed to a single author.
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: Option<String>, author_id: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url,
            offline: false,
            local_path: String::new(),
            author_ids: BTreeSet::from([author_id]),
        }
    }
}

/// Undirected collaboration edge, stored with `source < target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollaborationEdge {
    pub source: u64,
    pub target: u64,
}

impl CollaborationEdge {
    /// Normalizes the pair; returns `None` for a self-loop.
    pub fn new(a: u64, b: u64) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { source: a, target: b }),
            std::cmp::Ordering::Greater => Some(Self { source: b, target: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn touches(&self, author_id: u64) -> bool {
        self.source == author_id || self.target == author_id
    }
}

/// Whole-graph document used by the snapshot layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub papers: Vec<Paper>,
    #[serde(rename = "collabs", default)]
    pub edges: Vec<CollaborationEdge>,
}

/// Node as exposed in the node/edge view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorNode {
    pub id: u64,
    pub name: String,
}

impl From<&Author> for AuthorNode {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            name: author.name.clone(),
        }
    }
}

/// Full node/edge view of the graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<AuthorNode>,
    pub links: Vec<CollaborationEdge>,
}

/// Per-author paper view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthorPapers {
    pub author: AuthorNode,
    pub papers: Vec<Paper>,
}
