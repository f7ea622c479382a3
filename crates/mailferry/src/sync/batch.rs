//! Batch pagination over a mailbox's sequence numbers.
//!
//! Ranges partition `[1, total]` exhaustively and disjointly in ascending
//! order; this is the only pagination mechanism, with no cursor state kept
//! across runs.

/// A contiguous, inclusive sequence-number interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRange {
    pub from: u32,
    pub to: u32,
}

impl BatchRange {
    /// Number of sequence numbers covered by the range.
    pub fn len(&self) -> u32 {
        self.to - self.from + 1
    }

    /// The IMAP sequence-set form, e.g. `201:400`.
    pub fn sequence_set(&self) -> String {
        format!("{}:{}", self.from, self.to)
    }
}

/// Iterator over the batch ranges covering `[1, total]`.
#[derive(Debug, Clone)]
pub struct BatchRanges {
    next_from: u32,
    total: u32,
    capacity: u32,
}

/// Splits `[1, total]` into ranges of at most `capacity` messages.
pub fn batch_ranges(total: u32, capacity: u32) -> BatchRanges {
    assert!(capacity > 0, "batch capacity must be greater than 0");
    BatchRanges {
        next_from: 1,
        total,
        capacity,
    }
}

impl Iterator for BatchRanges {
    type Item = BatchRange;

    fn next(&mut self) -> Option<BatchRange> {
        if self.next_from > self.total {
            return None;
        }
        let from = self.next_from;
        let to = from.saturating_add(self.capacity - 1).min(self.total);
        self.next_from = to + 1;
        Some(BatchRange { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mailbox_yields_no_ranges() {
        assert_eq!(batch_ranges(0, 200).count(), 0);
    }

    #[test]
    fn test_exact_multiple() {
        let ranges: Vec<BatchRange> = batch_ranges(400, 200).collect();
        assert_eq!(
            ranges,
            vec![
                BatchRange { from: 1, to: 200 },
                BatchRange { from: 201, to: 400 },
            ]
        );
    }

    #[test]
    fn test_last_range_may_be_short() {
        let ranges: Vec<BatchRange> = batch_ranges(450, 200).collect();
        assert_eq!(
            ranges,
            vec![
                BatchRange { from: 1, to: 200 },
                BatchRange { from: 201, to: 400 },
                BatchRange { from: 401, to: 450 },
            ]
        );
        assert_eq!(ranges.last().unwrap().len(), 50);
    }

    #[test]
    fn test_single_partial_batch() {
        let ranges: Vec<BatchRange> = batch_ranges(5, 200).collect();
        assert_eq!(ranges, vec![BatchRange { from: 1, to: 5 }]);
    }

    #[test]
    fn test_sequence_set_form() {
        assert_eq!(BatchRange { from: 201, to: 400 }.sequence_set(), "201:400");
        assert_eq!(BatchRange { from: 7, to: 7 }.sequence_set(), "7:7");
    }

    #[test]
    fn test_ranges_partition_exhaustively() {
        for (total, capacity) in [(1u32, 1u32), (1, 200), (199, 200), (200, 200), (201, 200), (1000, 7)] {
            let ranges: Vec<BatchRange> = batch_ranges(total, capacity).collect();
            let mut expected_from = 1;
            for range in &ranges {
                assert_eq!(range.from, expected_from, "total={total} capacity={capacity}");
                assert!(range.to >= range.from);
                assert!(range.len() <= capacity);
                expected_from = range.to + 1;
            }
            assert_eq!(expected_from, total + 1, "ranges must cover [1, {total}]");
        }
    }
}
