//! Snapshot persistence for the graph store.
//!
//! The whole graph is stored as one JSON document and overwritten in full after
//! each mutation. Writes go to a sibling temp file first and are renamed into
//! place, so a crash mid-write leaves the previous snapshot intact.

use crate::db::schema::GraphSnapshot;
use crate::db::store::GraphStore;
use crate::error::GraphResult;
use crate::logger;
use std::fs;
use std::path::{Path, PathBuf};

/// Load the graph store from the snapshot at `path`.
///
/// A missing file yields an empty store.
pub fn init_datastore(path: &Path) -> GraphResult<GraphStore> {
    if !path.exists() {
        logger::info(&format!(
            "No snapshot at {}; starting with an empty graph",
            path.display()
        ));
        return Ok(GraphStore::new());
    }

    let content = fs::read_to_string(path)?;
    let snapshot: GraphSnapshot = if content.trim().is_empty() {
        GraphSnapshot::default()
    } else {
        serde_json::from_str(&content)?
    };
    let store = GraphStore::from_snapshot(snapshot);
    logger::info(&format!(
        "Loaded snapshot {}: {} author(s), {} paper(s), {} edge(s)",
        path.display(),
        store.author_count(),
        store.paper_count(),
        store.edge_count()
    ));
    Ok(store)
}

/// Overwrite the snapshot at `path` with `snapshot`.
pub fn save_snapshot(path: &Path, snapshot: &GraphSnapshot) -> GraphResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_path(path);
    let data = serde_json::to_vec(snapshot)?;
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    logger::debug(&format!("Saved snapshot to {}", path.display()));
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
