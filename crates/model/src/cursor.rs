use serde::{Deserialize, Serialize};
use std::fmt;

/// Resume position within the source collection.
///
/// `Start` is the explicit "no prior runs" state; `At(key)` means every
/// row with `row_key <= key` has been consumed and committed. The cursor
/// only ever moves forward.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowCursor {
    Start,
    At(u64),
}

impl RowCursor {
    /// Advances to `key` if it lies ahead of the current position.
    /// Never moves backwards.
    pub fn advance(self, key: u64) -> RowCursor {
        match self {
            RowCursor::Start => RowCursor::At(key),
            RowCursor::At(current) => RowCursor::At(current.max(key)),
        }
    }

    /// Whether a row at `key` is still unconsumed at this position.
    pub fn is_beyond(&self, key: u64) -> bool {
        match self {
            RowCursor::Start => true,
            RowCursor::At(current) => key > *current,
        }
    }

    /// The last consumed row key, if any row was consumed at all.
    pub fn position(&self) -> Option<u64> {
        match self {
            RowCursor::Start => None,
            RowCursor::At(current) => Some(*current),
        }
    }
}

impl fmt::Display for RowCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowCursor::Start => f.write_str("start"),
            RowCursor::At(key) => write!(f, "{key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_monotonic() {
        let cursor = RowCursor::Start.advance(7);
        assert_eq!(cursor, RowCursor::At(7));

        // A smaller key must not move the cursor backwards.
        assert_eq!(cursor.advance(3), RowCursor::At(7));
        assert_eq!(cursor.advance(9), RowCursor::At(9));
    }

    #[test]
    fn start_precedes_every_position() {
        assert!(RowCursor::Start < RowCursor::At(0));
        assert!(RowCursor::At(0) < RowCursor::At(1));
    }

    #[test]
    fn is_beyond_honors_strict_inequality() {
        assert!(RowCursor::Start.is_beyond(0));
        assert!(!RowCursor::At(5).is_beyond(5));
        assert!(RowCursor::At(5).is_beyond(6));
    }
}
