use crate::db::ingestion::PaperRecord;
use crate::db::schema::Author;
use crate::error::GraphResult;
use async_trait::async_trait;

#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Fetch one page of the author's papers, most recently updated first.
    ///
    /// An empty page means the source is exhausted.
    async fn fetch_page(
        &self,
        author: &Author,
        offset: usize,
        page_size: usize,
    ) -> GraphResult<Vec<PaperRecord>>;
}
