//! External bibliographic source access.
//!
//! - `scraper`: the `PaperSource` trait (one page of an author's papers)
//! - `arxiv`: the arXiv Atom API implementation and feed parser
//! - `scraping_orchestrator`: the paginated ingestion loop feeding the merger
//! - `download`: PDF download for papers already in the registry
//! - `cancel`: cooperative cancellation for ingestion runs

pub mod arxiv;
pub mod cancel;
pub mod download;
pub mod scraper;
pub mod scraping_orchestrator;

#[cfg(test)]
mod tests;
