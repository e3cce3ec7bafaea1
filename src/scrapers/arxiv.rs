use crate::config::ArxivSourceConfig;
use crate::db::ingestion::PaperRecord;
use crate::db::schema::Author;
use crate::error::{GraphError, GraphResult};
use crate::logger;
use crate::scrapers::scraper::PaperSource;
use async_trait::async_trait;
use quick_xml::escape::unescape as quick_unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use reqwest::Client;

/// arXiv Atom API source implementing the PaperSource trait.
#[derive(Clone, Debug)]
pub struct ArxivScraper {
    client: Client,
    config: ArxivSourceConfig,
}

impl ArxivScraper {
    /// Create a new ArxivScraper with default configuration.
    pub fn new() -> Self {
        Self::with_config(ArxivSourceConfig::default())
    }

    /// Create a new ArxivScraper with custom configuration.
    pub fn with_config(config: ArxivSourceConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Share an existing HTTP client (connection pool) with the scraper.
    pub fn with_client(client: Client, config: ArxivSourceConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ArxivSourceConfig {
        &self.config
    }
}

impl Default for ArxivScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaperSource for ArxivScraper {
    async fn fetch_page(
        &self,
        author: &Author,
        offset: usize,
        page_size: usize,
    ) -> GraphResult<Vec<PaperRecord>> {
        let params = [
            ("search_query", search_query(author)),
            ("sortBy", "lastUpdatedDate".to_string()),
            ("sortOrder", "descending".to_string()),
            ("start", offset.to_string()),
            ("max_results", page_size.to_string()),
        ];

        logger::debug(&format!(
            "Fetching arXiv page for author {} at offset {}",
            author.id, offset
        ));

        let body = self
            .client
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(GraphError::SourceUnavailable)?
            .text()
            .await
            .map_err(GraphError::SourceUnavailable)?;

        let records = parse_feed(&body)?;
        logger::debug(&format!("Parsed {} records from this page", records.len()));
        Ok(records)
    }
}

/// arXiv `search_query` for an author: `au:"<name>"`, narrowed by the
/// author's category clause when one is set.
pub fn search_query(author: &Author) -> String {
    let name = author.name.trim();
    let categories = author.categories.trim();
    if categories.is_empty() {
        format!("au:\"{}\"", name)
    } else {
        format!("au:\"{}\" AND ({})", name, categories)
    }
}

// Normalize text nodes: strip CDATA markers, unescape XML entities and
// collapse the line-wrapping arXiv puts inside titles.
fn normalize_text(txt: &str) -> String {
    let s = txt.trim();
    if s.is_empty() {
        return String::new();
    }
    let unescaped = if s.starts_with("<![CDATA[") && s.ends_with("]]>") {
        s[9..s.len() - 3].to_string()
    } else {
        match quick_unescape(s) {
            Ok(cow) => cow.into_owned(),
            Err(_) => s.to_string(),
        }
    };
    unescaped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn attribute(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .with_checks(false)
        .flatten()
        .find(|att| att.key.local_name().as_ref() == name)
        .map(|att| normalize_text(&String::from_utf8_lossy(att.value.as_ref())))
}

#[derive(Default)]
struct EntryBuilder {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    pdf_link: Option<String>,
}

impl EntryBuilder {
    // Only the link whose title is "pdf" is kept.
    fn observe_link(&mut self, e: &BytesStart) {
        if attribute(e, b"title").as_deref() == Some("pdf") {
            if let Some(href) = attribute(e, b"href") {
                self.pdf_link = Some(href);
            }
        }
    }

    fn finish(self) -> GraphResult<PaperRecord> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GraphError::SourceParseError("entry without <id>".to_string()))?;

        // The API reports query errors as a single entry under /api/errors.
        if id.contains("/api/errors") {
            return Err(GraphError::SourceParseError(format!(
                "source reported an error: {}",
                self.summary.unwrap_or_else(|| id.clone())
            )));
        }

        Ok(PaperRecord {
            id,
            title: self.title.unwrap_or_default(),
            pdf_link: self.pdf_link,
        })
    }
}

/// Parse an Atom feed page into paper records, in feed order.
///
/// Fails with `SourceParseError` on malformed XML, a document that is not an
/// Atom feed, an entry without an identifier, or an API error entry. A feed
/// with no entries parses to an empty page.
pub fn parse_feed(xml: &str) -> GraphResult<Vec<PaperRecord>> {
    let mut reader = Reader::from_str(xml);
    let mut records = Vec::new();
    let mut saw_feed = false;
    let mut entry: Option<EntryBuilder> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"feed" => saw_feed = true,
                b"entry" => entry = Some(EntryBuilder::default()),
                b"id" | b"title" | b"summary" if entry.is_some() => {
                    let txt = reader
                        .read_text(e.name())
                        .map_err(|err| parse_error(&reader, err))?;
                    let value = normalize_text(&txt);
                    if let Some(builder) = entry.as_mut() {
                        match e.local_name().as_ref() {
                            b"id" => builder.id = Some(value),
                            b"title" => builder.title = Some(value),
                            _ => builder.summary = Some(value),
                        }
                    }
                }
                b"link" => {
                    if let Some(builder) = entry.as_mut() {
                        builder.observe_link(&e);
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"feed" => saw_feed = true,
                b"link" => {
                    if let Some(builder) = entry.as_mut() {
                        builder.observe_link(&e);
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"entry" {
                    if let Some(builder) = entry.take() {
                        records.push(builder.finish()?);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(parse_error(&reader, err)),
            _ => {}
        }
    }

    if !saw_feed {
        return Err(GraphError::SourceParseError(
            "response is not an Atom feed".to_string(),
        ));
    }
    if entry.is_some() {
        return Err(GraphError::SourceParseError(
            "feed ended inside an <entry>".to_string(),
        ));
    }
    Ok(records)
}

fn parse_error(reader: &Reader<&[u8]>, err: quick_xml::Error) -> GraphError {
    GraphError::SourceParseError(format!(
        "XML error at byte {}: {}",
        reader.buffer_position(),
        err
    ))
}
