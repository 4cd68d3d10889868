use serde::{Deserialize, Serialize};

/// Offset cursor for bounded range queries.
///
/// The cursor is local to one stream and is advanced only by the streaming
/// loop, by the batch size, after each non-empty fetch. Offset paging is only
/// correct under a stable ORDER BY; if the underlying table is mutated while
/// a stream is open, rows can be skipped or repeated. That limitation is
/// accepted here rather than papered over with keyset pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    offset: usize,
}

impl Cursor {
    pub fn start() -> Self {
        Cursor { offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn advance(&mut self, batch_size: usize) {
        self.offset += batch_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_by_batch_size() {
        let mut cursor = Cursor::start();
        assert_eq!(cursor.offset(), 0);
        cursor.advance(50);
        cursor.advance(50);
        assert_eq!(cursor.offset(), 100);
    }
}
