//! Runtime configuration.
//!
//! Loaded from a JSON file (`config.json` by default). Every section has
//! defaults, so a missing file or a partial document is valid. The arXiv
//! endpoint and the polite delay can also be overridden from the environment
//! (`ARXIV_API_BASE`, `ARXIV_DELAY_MS`), which is how tests and local runs
//! point the scraper elsewhere without editing the file.

use crate::error::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whole-graph JSON snapshot
    pub snapshot_path: PathBuf,
    /// Directory downloaded PDFs are written to
    pub papers_dir: PathBuf,
    pub arxiv: ArxivSourceConfig,
    pub download: DownloadConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("data.json"),
            papers_dir: PathBuf::from("papers"),
            arxiv: ArxivSourceConfig::default(),
            download: DownloadConfig::default(),
        }
    }
}

/// Settings for the arXiv query endpoint and the ingestion pager.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ArxivSourceConfig {
    pub base_url: String,
    /// Entries requested per page
    pub page_size: usize,
    /// Pause between successive page fetches
    pub delay_ms: u64,
    /// Hard stop for one ingestion run, in pages
    pub max_pages: usize,
}

impl Default for ArxivSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://export.arxiv.org/api/query".to_string(),
            page_size: 10,
            delay_ms: 3000,
            max_pages: 1000,
        }
    }
}

impl ArxivSourceConfig {
    /// Applies `ARXIV_API_BASE` and `ARXIV_DELAY_MS` when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base) = lookup("ARXIV_API_BASE") {
            if !base.trim().is_empty() {
                self.base_url = base;
            }
        }
        if let Some(delay) = lookup("ARXIV_DELAY_MS") {
            if let Ok(ms) = delay.trim().parse() {
                self.delay_ms = ms;
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub user_agent: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("collab-graph/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    fn validate(&self) -> GraphResult<()> {
        if self.arxiv.page_size == 0 {
            return Err(GraphError::Config("arxiv.page_size must be positive".into()));
        }
        if self.arxiv.max_pages == 0 {
            return Err(GraphError::Config("arxiv.max_pages must be positive".into()));
        }
        Ok(())
    }
}

/// Load configuration from `path`, falling back to defaults when the file does
/// not exist. Environment overrides win over the file.
pub fn load_config(path: &Path) -> GraphResult<Config> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path)?;
        serde_json::from_str::<Config>(&content)
            .map_err(|e| GraphError::Config(format!("{}: {}", path.display(), e)))?
    } else {
        Config::default()
    };
    config.arxiv.apply_env_overrides();
    config.validate()?;
    Ok(config)
}
