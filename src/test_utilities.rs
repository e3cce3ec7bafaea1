//! Shared fixtures for unit and integration tests.

use crate::db::ingestion::PaperRecord;
use crate::db::schema::Author;
use crate::db::store::{GraphStore, SharedStore};
use crate::error::{GraphError, GraphResult};
use crate::scrapers::scraper::PaperSource;
use async_trait::async_trait;
use std::sync::Mutex;

/// Store with authors `1..=count` named "Author <id>".
pub(crate) fn store_with_authors(count: u64) -> GraphStore {
    let mut store = GraphStore::new();
    for i in 1..=count {
        store.add_author(&format!("Author {}", i), "cat:math.CO");
    }
    store
}

/// Record as the arXiv parser would produce it.
pub(crate) fn record(arxiv_id: &str, title: &str) -> PaperRecord {
    PaperRecord {
        id: format!("http://arxiv.org/abs/{}", arxiv_id),
        title: title.to_string(),
        pdf_link: Some(format!("http://arxiv.org/pdf/{}", arxiv_id)),
    }
}

/// `count` distinct records `2401.00000v1`, `2401.00001v1`, ...
pub(crate) fn numbered_records(count: usize) -> Vec<PaperRecord> {
    (0..count)
        .map(|i| record(&format!("2401.{:05}v1", i), &format!("Paper {}", i)))
        .collect()
}

/// Atom entry in the arXiv response shape.
pub(crate) fn atom_entry(arxiv_id: &str, title: &str, with_pdf: bool) -> String {
    let pdf = if with_pdf {
        format!(
            r#"<link title="pdf" href="http://arxiv.org/pdf/{}" rel="related" type="application/pdf"/>"#,
            arxiv_id
        )
    } else {
        String::new()
    };
    format!(
        r#"<entry>
    <id>http://arxiv.org/abs/{id}</id>
    <updated>2025-10-01T12:00:00Z</updated>
    <published>2025-09-01T12:00:00Z</published>
    <title>{title}</title>
    <summary>Abstract of {title}</summary>
    <author><name>Alice Example</name></author>
    <link href="http://arxiv.org/abs/{id}" rel="alternate" type="text/html"/>
    {pdf}
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="math.CO" scheme="http://arxiv.org/schemas/atom"/>
  </entry>"#,
        id = arxiv_id,
        title = title,
        pdf = pdf
    )
}

/// Wrap entries in an Atom feed document.
pub(crate) fn atom_feed(entries: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <link href="http://arxiv.org/api/query" rel="self" type="application/atom+xml"/>
  <title type="html">ArXiv Query: search_query=au:"Alice Example"</title>
  <id>http://arxiv.org/api/cHxbiOdZaP56ODnBPIenZhzg5f8</id>
  <updated>2025-10-02T00:00:00-04:00</updated>
  {}
</feed>"#,
        entries.join("\n  ")
    )
}

/// In-memory source serving a fixed record list page by page.
#[derive(Default)]
pub(crate) struct ScriptedSource {
    records: Vec<PaperRecord>,
    /// Offsets requested, in order
    pub(crate) calls: Mutex<Vec<usize>>,
    /// Fail with a parse error when this offset is requested
    fail_at: Option<usize>,
    /// Remove this author from the store when this offset is requested
    remove_at: Option<(usize, SharedStore, u64)>,
    /// Name of an author added right after that removal
    replacement: Option<String>,
    /// Serve a non-empty page forever
    endless: bool,
}

impl ScriptedSource {
    pub(crate) fn new(records: Vec<PaperRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub(crate) fn failing_at(mut self, offset: usize) -> Self {
        self.fail_at = Some(offset);
        self
    }

    pub(crate) fn removing_author_at(mut self, offset: usize, store: SharedStore, author_id: u64) -> Self {
        self.remove_at = Some((offset, store, author_id));
        self
    }

    pub(crate) fn replaced_by(mut self, name: &str) -> Self {
        self.replacement = Some(name.to_string());
        self
    }

    pub(crate) fn endless(mut self) -> Self {
        self.endless = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaperSource for ScriptedSource {
    async fn fetch_page(
        &self,
        _author: &Author,
        offset: usize,
        page_size: usize,
    ) -> GraphResult<Vec<PaperRecord>> {
        self.calls.lock().unwrap().push(offset);

        if let Some((at, store, author_id)) = &self.remove_at {
            if *at == offset {
                let mut guard = store.lock().await;
                guard.remove_author(*author_id)?;
                if let Some(name) = &self.replacement {
                    guard.add_author(name, "");
                }
            }
        }
        if self.fail_at == Some(offset) {
            return Err(GraphError::SourceParseError(format!(
                "scripted failure at offset {}",
                offset
            )));
        }
        if self.endless {
            return Ok(vec![record(&format!("9999.{:05}v1", offset), "Endless")]);
        }

        let start = offset.min(self.records.len());
        let end = (offset + page_size).min(self.records.len());
        Ok(self.records[start..end].to_vec())
    }
}
