//! Graph state layer.
//!
//! This module owns the collaboration graph and everything that mutates it:
//! - Schema types (authors, papers, collaboration edges, export documents)
//! - The in-memory store and its shared, mutex-gated handle
//! - Paper merging with version-independent deduplication
//! - Edge derivation from paper author sets
//! - Cascading author removal
//! - Snapshot load/save

pub mod cascade;
pub mod client;
pub mod edges;
pub mod ingestion;
pub mod schema;
pub mod store;
