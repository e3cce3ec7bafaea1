//! Drives paginated ingestion of one author's papers.
//!
//! The pager walks the source in fixed-size pages (newest first), merging each
//! page into the shared store before requesting the next. The store lock is
//! only held while a page is merged, never across a fetch or the polite delay,
//! so other runs and removals interleave at page boundaries.

use crate::config::ArxivSourceConfig;
use crate::db::ingestion::merge_page;
use crate::db::schema::Author;
use crate::db::store::SharedStore;
use crate::error::{GraphError, GraphResult};
use crate::logger;
use crate::scrapers::cancel::CancellationToken;
use crate::scrapers::scraper::PaperSource;
use tokio::time::{sleep, Duration};

/// Paging parameters for one ingestion run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagerOptions {
    pub page_size: usize,
    /// Pause enforced between successive page fetches
    pub delay: Duration,
    /// Stop after this many fetches even if the source keeps returning pages
    pub max_pages: usize,
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self {
            page_size: 10,
            delay: Duration::from_secs(3),
            max_pages: 1000,
        }
    }
}

impl From<&ArxivSourceConfig> for PagerOptions {
    fn from(cfg: &ArxivSourceConfig) -> Self {
        Self {
            page_size: cfg.page_size,
            delay: Duration::from_millis(cfg.delay_ms),
            max_pages: cfg.max_pages,
        }
    }
}

/// Why an ingestion run ended without error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The source returned an empty page
    Exhausted,
    /// `max_pages` fetches were made without reaching an empty page
    PageCap,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestionReport {
    pub author_id: u64,
    /// Fetches made, including the final empty page
    pub pages_fetched: usize,
    pub entries_merged: usize,
    pub stopped: StopReason,
}

/// Ingest every paper the source lists for `author`.
///
/// Pages are requested at offsets `0, page_size, 2 * page_size, ...`. Each
/// non-empty page is merged as one unit under the store lock; an empty page
/// ends the run. A fetch or parse failure aborts immediately and is returned,
/// leaving pages merged so far in place. Cancellation is checked before every
/// fetch and after every delay.
///
/// The merge rejects an author that was removed mid-run, including one whose
/// id has since been handed to a newly added author. That ends the run with
/// `AuthorNotFound` instead of attaching the removed author's papers to
/// whoever holds the id now.
pub async fn ingest_author<S>(
    source: &S,
    store: &SharedStore,
    author: &Author,
    options: &PagerOptions,
    cancel: &CancellationToken,
) -> GraphResult<IngestionReport>
where
    S: PaperSource + ?Sized,
{
    let page_size = options.page_size.max(1);
    let mut offset = 0usize;
    let mut report = IngestionReport {
        author_id: author.id,
        pages_fetched: 0,
        entries_merged: 0,
        stopped: StopReason::Exhausted,
    };

    logger::info(&format!(
        "Starting ingestion for author {} '{}'",
        author.id, author.name
    ));

    loop {
        if report.pages_fetched >= options.max_pages {
            logger::warn(&format!(
                "Ingestion for author {} hit the {}-page cap; stopping",
                author.id, options.max_pages
            ));
            report.stopped = StopReason::PageCap;
            break;
        }

        if report.pages_fetched > 0 && !options.delay.is_zero() {
            check_cancelled(cancel, &report)?;
            sleep(options.delay).await;
        }
        check_cancelled(cancel, &report)?;

        let page = match source.fetch_page(author, offset, page_size).await {
            Ok(page) => page,
            Err(e) => {
                logger::error(&format!(
                    "Ingestion for author {} failed at offset {}: {}",
                    author.id, offset, e
                ));
                return Err(e);
            }
        };
        report.pages_fetched += 1;

        if page.is_empty() {
            report.stopped = StopReason::Exhausted;
            break;
        }

        report.entries_merged += merge_page(&mut *store.lock().await, &page, author)?;

        logger::debug(&format!(
            "Merged page {} ({} entries) for author {}",
            report.pages_fetched,
            page.len(),
            author.id
        ));
        offset += page_size;
    }

    logger::info(&format!(
        "Finished ingestion for author {}: {} page(s), {} entries merged ({:?})",
        author.id, report.pages_fetched, report.entries_merged, report.stopped
    ));
    Ok(report)
}

fn check_cancelled(cancel: &CancellationToken, report: &IngestionReport) -> GraphResult<()> {
    if cancel.is_cancelled() {
        logger::warn(&format!(
            "Ingestion for author {} cancelled after {} page(s)",
            report.author_id, report.pages_fetched
        ));
        return Err(GraphError::Cancelled {
            pages_fetched: report.pages_fetched,
        });
    }
    Ok(())
}
