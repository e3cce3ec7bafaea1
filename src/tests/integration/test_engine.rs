//! Integration tests for the engine facade.
//!
//! These exercise the full path from an API call through the pager, merger,
//! cascade and snapshot layer, using a scripted source and a temp directory.

use crate::config::Config;
use crate::db::client::init_datastore;
use crate::db::store::GraphStore;
use crate::engine::Engine;
use crate::error::GraphError;
use crate::test_utilities::{numbered_records, record, ScriptedSource};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(temp_dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.snapshot_path = temp_dir.path().join("data.json");
        config.papers_dir = temp_dir.path().join("papers");
        config.arxiv.delay_ms = 0;
        config
    }

    fn engine_with(temp_dir: &TempDir, source: ScriptedSource) -> Engine {
        Engine::new(test_config(temp_dir), GraphStore::new(), Arc::new(source))
    }

    #[tokio::test]
    async fn test_add_author_persists_and_dedups() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let engine = engine_with(&temp_dir, ScriptedSource::new(Vec::new()));

        let first = engine.add_author("Paul Erdos", "cat:math.CO").await?;
        let again = engine.add_author("Paul Erdos", "cat:math.NT").await?;

        assert_eq!(first, again);
        let on_disk = init_datastore(&temp_dir.path().join("data.json"))?;
        assert_eq!(on_disk.author_count(), 1);
        assert_eq!(on_disk.author(1).unwrap().categories, "cat:math.CO");
        Ok(())
    }

    #[tokio::test]
    async fn test_ingest_then_remove_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let engine = engine_with(&temp_dir, ScriptedSource::new(numbered_records(12)));
        let erdos = engine.add_author("Paul Erdos", "").await?;
        let renyi = engine.add_author("Alfred Renyi", "").await?;

        let report = engine.ingest(erdos.id).await?;
        assert_eq!(report.entries_merged, 12);
        engine.ingest(renyi.id).await?;

        let view = engine.graph_view().await;
        assert_eq!(view.nodes.len(), 2);
        assert_eq!(view.links.len(), 1);
        assert_eq!(engine.papers_of(renyi.id).await?.papers.len(), 12);

        let cascade = engine.remove_author(erdos.id).await?;
        assert!(cascade.papers_deleted.is_empty());
        assert_eq!(cascade.edges_removed, 1);

        let on_disk = init_datastore(&temp_dir.path().join("data.json"))?;
        assert_eq!(on_disk.author_count(), 1);
        assert_eq!(on_disk.paper_count(), 12);
        assert_eq!(on_disk.edge_count(), 0);
        Ok(())
    }

    /// Pages merged before a source failure are persisted.
    #[tokio::test]
    async fn test_failed_ingest_persists_committed_pages() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let engine = engine_with(
            &temp_dir,
            ScriptedSource::new(numbered_records(30)).failing_at(20),
        );
        let author = engine.add_author("Paul Erdos", "").await?;

        let err = engine.ingest(author.id).await.unwrap_err();

        assert!(matches!(err, GraphError::SourceParseError(_)));
        let on_disk = init_datastore(&temp_dir.path().join("data.json"))?;
        assert_eq!(on_disk.paper_count(), 20);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let source = ScriptedSource::new(Vec::new());
        let engine = engine_with(&temp_dir, source);

        assert!(engine.ingest(7).await.unwrap_err().is_not_found());
        assert!(engine.remove_author(7).await.unwrap_err().is_not_found());
        assert!(engine.papers_of(7).await.unwrap_err().is_not_found());
        assert!(engine.download_paper("nope").await.unwrap_err().is_not_found());
        // nothing was mutated, so nothing was written
        assert!(!temp_dir.path().join("data.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_download_through_engine_persists_offline_flag() -> Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
            .mount(&mock_server)
            .await;

        let temp_dir = TempDir::new()?;
        let mut rec = record("2401.00001v1", "Downloadable");
        rec.pdf_link = Some(format!("{}/pdf/2401.00001v1", mock_server.uri()));
        let engine = engine_with(&temp_dir, ScriptedSource::new(vec![rec]));
        let author = engine.add_author("Paul Erdos", "").await?;
        engine.ingest(author.id).await?;

        let paper = engine.download_paper("2401.00001").await?;

        assert!(paper.offline);
        let on_disk = init_datastore(&temp_dir.path().join("data.json"))?;
        assert!(on_disk.paper("2401.00001").unwrap().offline);
        Ok(())
    }

    #[tokio::test]
    async fn test_open_loads_existing_snapshot() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        {
            let engine = engine_with(&temp_dir, ScriptedSource::new(numbered_records(2)));
            let author = engine.add_author("Paul Erdos", "").await?;
            engine.ingest(author.id).await?;
        }

        let reopened = Engine::open(test_config(&temp_dir))?;

        assert_eq!(reopened.papers_of(1).await?.papers.len(), 2);
        Ok(())
    }
}
