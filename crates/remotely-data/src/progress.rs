use serde::{Deserialize, Serialize};

/// Snapshot of a transfer in flight.
///
/// `total` is `None` when the transport cannot compute the length up front
/// (for example a chunked response without `Content-Length`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Progress {
    /// Bytes transferred so far.
    pub loaded: u64,

    /// Total expected bytes, if known.
    pub total: Option<u64>,
}

impl Progress {
    pub fn new(loaded: u64, total: Option<u64>) -> Self {
        Self { loaded, total }
    }

    /// Fraction of the transfer done, in `0.0..=1.0` for sane inputs.
    ///
    /// Returns `None` while the total is unknown or zero.
    #[must_use]
    pub fn ratio(&self) -> Option<f64> {
        self.total
            .filter(|total| *total > 0)
            .map(|total| self.loaded as f64 / total as f64)
    }

    /// Calculate the percentage of completion.
    ///
    /// Returns `None` if `total` is unknown.
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        self.total.map(|total| {
            if total == 0 {
                100.0
            } else {
                (self.loaded as f64 / total as f64) * 100.0
            }
        })
    }

    /// Sum two snapshots of transfers running side by side.
    ///
    /// The combined total is only known when both totals are known.
    #[must_use]
    pub fn combine(self, other: Progress) -> Progress {
        Progress {
            loaded: self.loaded.saturating_add(other.loaded),
            total: self
                .total
                .zip(other.total)
                .map(|(a, b)| a.saturating_add(b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_known_total() {
        let progress = Progress::new(25, Some(100));
        assert_eq!(progress.percentage(), Some(25.0));
    }

    #[test]
    fn test_ratio() {
        assert_eq!(Progress::new(25, Some(100)).ratio(), Some(0.25));
        assert_eq!(Progress::new(25, None).ratio(), None);
        assert_eq!(Progress::new(0, Some(0)).ratio(), None);
    }

    #[test]
    fn test_percentage_unknown_total() {
        assert_eq!(Progress::new(25, None).percentage(), None);
    }

    #[test]
    fn test_percentage_empty_body() {
        assert_eq!(Progress::new(0, Some(0)).percentage(), Some(100.0));
    }

    #[test]
    fn test_combine_sums_both_sides() {
        let combined = Progress::new(10, Some(40)).combine(Progress::new(5, Some(60)));
        assert_eq!(combined, Progress::new(15, Some(100)));
    }

    #[test]
    fn test_combine_loses_total_when_one_side_is_indeterminate() {
        let combined = Progress::new(10, Some(40)).combine(Progress::new(5, None));
        assert_eq!(combined, Progress::new(15, None));
    }
}
