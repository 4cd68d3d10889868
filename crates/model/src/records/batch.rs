use crate::records::row::Record;

/// One bounded page of rows. A batch handed to a consumer is never empty;
/// an empty fetch terminates the stream instead of being yielded.
#[derive(Debug, Clone)]
pub struct Batch {
    pub rows: Vec<Record>,

    /// Offset of the first row of this batch within the source order.
    pub offset: usize,
}

impl Batch {
    pub fn new(rows: Vec<Record>, offset: usize) -> Self {
        Batch { rows, offset }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::{FieldValue, Value};

    #[test]
    fn batch_reports_its_shape() {
        let rows = vec![Record::new(vec![FieldValue::new("id", Value::Uint(3))])];
        let batch = Batch::new(rows, 10);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.offset, 10);
        assert!(!batch.is_empty());
    }
}
