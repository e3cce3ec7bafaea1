//! Operations exposed to the CLI (or any other front end).
//!
//! `Engine` owns the shared store handle, the paper source and the snapshot
//! location. Every mutating call persists the full snapshot before returning.
//! An ingestion run persists once at the end, including when it fails, so
//! pages merged before the failure are kept on disk too.

use crate::config::Config;
use crate::db::cascade::CascadeReport;
use crate::db::client::{init_datastore, save_snapshot};
use crate::db::schema::{Author, AuthorPapers, GraphView, Paper};
use crate::db::store::{GraphStore, SharedStore};
use crate::error::{GraphError, GraphResult};
use crate::logger;
use crate::scrapers::arxiv::ArxivScraper;
use crate::scrapers::cancel::CancellationToken;
use crate::scrapers::download;
use crate::scrapers::scraper::PaperSource;
use crate::scrapers::scraping_orchestrator::{ingest_author, IngestionReport, PagerOptions};
use reqwest::Client;
use std::sync::Arc;

pub struct Engine {
    store: SharedStore,
    source: Arc<dyn PaperSource>,
    client: Client,
    config: Config,
}

impl Engine {
    /// Build an engine around an already-loaded store and a custom source.
    pub fn new(config: Config, store: GraphStore, source: Arc<dyn PaperSource>) -> Self {
        Self {
            store: store.into_shared(),
            source,
            client: Client::new(),
            config,
        }
    }

    /// Load the snapshot named by `config` and use the arXiv source.
    pub fn open(config: Config) -> GraphResult<Self> {
        let store = init_datastore(&config.snapshot_path)?;
        let client = Client::new();
        let source = Arc::new(ArxivScraper::with_client(
            client.clone(),
            config.arxiv.clone(),
        ));
        Ok(Self {
            store: store.into_shared(),
            source,
            client,
            config,
        })
    }

    /// Shared store handle, for callers that run their own reads.
    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Add an author; an existing name returns the existing author unchanged.
    pub async fn add_author(&self, name: &str, categories: &str) -> GraphResult<Author> {
        let mut guard = self.store.lock().await;
        let before = guard.author_count();
        let author = guard.add_author(name, categories);
        if guard.author_count() != before {
            self.persist(&guard)?;
        }
        Ok(author)
    }

    pub async fn remove_author(&self, author_id: u64) -> GraphResult<CascadeReport> {
        let mut guard = self.store.lock().await;
        let report = guard.remove_author(author_id)?;
        self.persist(&guard)?;
        Ok(report)
    }

    pub async fn ingest(&self, author_id: u64) -> GraphResult<IngestionReport> {
        self.ingest_with_cancel(author_id, &CancellationToken::new())
            .await
    }

    /// Run one ingestion for `author_id`, stoppable through `cancel`.
    pub async fn ingest_with_cancel(
        &self,
        author_id: u64,
        cancel: &CancellationToken,
    ) -> GraphResult<IngestionReport> {
        let author = {
            let guard = self.store.lock().await;
            guard
                .author(author_id)
                .cloned()
                .ok_or(GraphError::AuthorNotFound(author_id))?
        };

        let options = PagerOptions::from(&self.config.arxiv);
        let result = ingest_author(
            self.source.as_ref(),
            &self.store,
            &author,
            &options,
            cancel,
        )
        .await;

        let guard = self.store.lock().await;
        if let Err(save_err) = self.persist(&guard) {
            // The ingestion error, if any, is the one the caller needs.
            if result.is_ok() {
                return Err(save_err);
            }
            logger::error(&format!(
                "Snapshot save after failed ingestion also failed: {}",
                save_err
            ));
        }
        result
    }

    pub async fn download_paper(&self, paper_id: &str) -> GraphResult<Paper> {
        let paper = download::download_paper(
            &self.client,
            &self.store,
            paper_id,
            &self.config.papers_dir,
            &self.config.download.user_agent,
        )
        .await?;
        let guard = self.store.lock().await;
        self.persist(&guard)?;
        Ok(paper)
    }

    pub async fn graph_view(&self) -> GraphView {
        self.store.lock().await.graph_view()
    }

    pub async fn papers_of(&self, author_id: u64) -> GraphResult<AuthorPapers> {
        self.store.lock().await.author_papers(author_id)
    }

    // Called with the store lock held so snapshots hit the disk in mutation order.
    fn persist(&self, store: &GraphStore) -> GraphResult<()> {
        save_snapshot(&self.config.snapshot_path, &store.snapshot())
    }
}
