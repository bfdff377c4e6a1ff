use crate::{error::SourceError, source::SubscriberSource};
use async_trait::async_trait;
use model::{cursor::RowCursor, page::Page, record::SourceRecord};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Expected header row: `RowKey,SubscriberKey,EmailAddress`.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "RowKey")]
    row_key: u64,
    #[serde(rename = "SubscriberKey")]
    subscriber_key: String,
    #[serde(rename = "EmailAddress")]
    email_address: Option<String>,
}

/// File-backed subscriber source for local runs.
///
/// Each fetch re-reads the file and returns the page of rows strictly
/// beyond the cursor, so the source stays stateless between calls and a
/// failed run can safely re-fetch the same page. Rows are sorted by
/// `RowKey` before paging; the file itself need not be ordered.
pub struct CsvSource {
    path: PathBuf,
    page_size: usize,
}

impl CsvSource {
    pub fn new(path: impl AsRef<Path>, page_size: usize) -> Self {
        CsvSource {
            path: path.as_ref().to_path_buf(),
            page_size: page_size.max(1),
        }
    }
}

#[async_trait]
impl SubscriberSource for CsvSource {
    async fn fetch_page(&self, cursor: RowCursor) -> Result<Page, SourceError> {
        let mut reader = csv::Reader::from_path(&self.path)?;

        let mut beyond = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            if !cursor.is_beyond(row.row_key) {
                continue;
            }
            // Treat blank cells the way the platform treats missing
            // optional fields.
            let email = row.email_address.filter(|e| !e.is_empty());
            let record = SourceRecord::new(row.row_key, row.subscriber_key, email);
            record.validate()?;
            beyond.push(record);
        }

        beyond.sort_by_key(|r| r.row_key);
        beyond.truncate(self.page_size);

        debug!(
            path = %self.path.display(),
            cursor = %cursor,
            rows = beyond.len(),
            "fetched CSV page"
        );
        Ok(Page::new(beyond))
    }
}
