use crate::error::SourceError;
use async_trait::async_trait;
use model::{cursor::RowCursor, page::Page};

/// Rows per page the provider's keyed retrieve returns before it
/// truncates larger result sets.
pub const DEFAULT_PAGE_SIZE: usize = 2_500;

/// Cursor-paged reader over the source collection.
///
/// Implementations hold no server-side cursor state between calls:
/// fetching the same cursor twice yields the same unconsumed records.
/// That statelessness is what makes re-processing after a failed run
/// safe.
#[async_trait]
pub trait SubscriberSource: Send + Sync {
    /// Records with `row_key > cursor`, ascending, bounded by the
    /// source's page size. An empty page means the source is drained.
    async fn fetch_page(&self, cursor: RowCursor) -> Result<Page, SourceError>;
}
