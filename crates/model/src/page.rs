use crate::record::SourceRecord;

/// One bounded fetch from the source collection, ascending by row key.
///
/// An empty page signals that the source holds nothing beyond the
/// requested cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub records: Vec<SourceRecord>,
}

impl Page {
    pub fn new(records: Vec<SourceRecord>) -> Self {
        debug_assert!(
            records.windows(2).all(|w| w[0].row_key < w[1].row_key),
            "page records must be strictly ascending by row key"
        );
        Page { records }
    }

    pub fn empty() -> Self {
        Page::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Highest row key in the page. Computed as a maximum rather than
    /// taken from the last record, so a misordered source cannot move
    /// the committed cursor backwards.
    pub fn max_row_key(&self) -> Option<u64> {
        self.records.iter().map(|r| r.row_key).max()
    }
}
