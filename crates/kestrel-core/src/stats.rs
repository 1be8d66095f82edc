//! Run statistics, finalised once when the pipeline completes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::Rating;

/// Counts and timing for one culling run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Photos that were rated
    pub total: usize,

    /// 3-star photos
    pub excellent: usize,

    /// 2-star photos
    pub good: usize,

    /// Photos that failed the floor or earned no upgrade
    pub ordinary: usize,

    /// Photos with no subject
    pub rejected: usize,

    /// 3-star photos that received the picked flag
    pub picked: usize,

    /// Photos the detector could not process
    pub detection_failed: usize,

    /// RAW files converted to previews this run
    pub converted: usize,

    /// RAW files whose conversion failed
    pub conversion_failed: usize,

    /// Files moved into rating folders
    pub moved: usize,

    /// Temporary previews deleted
    pub cleaned: usize,

    /// Wall-clock time for the whole run in seconds
    pub total_seconds: f64,

    /// Average seconds per rated photo
    pub avg_seconds: f64,
}

impl RunStats {
    /// Count one rated photo.
    pub fn record(&mut self, rating: Rating) {
        self.total += 1;
        match rating {
            Rating::Excellent => self.excellent += 1,
            Rating::Good => self.good += 1,
            Rating::Ordinary => self.ordinary += 1,
            Rating::Rejected => self.rejected += 1,
        }
    }

    /// Number of photos rated `rating`.
    pub fn count_for(&self, rating: Rating) -> usize {
        match rating {
            Rating::Excellent => self.excellent,
            Rating::Good => self.good,
            Rating::Ordinary => self.ordinary,
            Rating::Rejected => self.rejected,
        }
    }

    /// Stamp the elapsed time and derive the per-photo average.
    pub(crate) fn finish(mut self, elapsed: Duration) -> Self {
        self.total_seconds = elapsed.as_secs_f64();
        self.avg_seconds = if self.total > 0 {
            self.total_seconds / self.total as f64
        } else {
            0.0
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_buckets() {
        let mut stats = RunStats::default();
        stats.record(Rating::Excellent);
        stats.record(Rating::Good);
        stats.record(Rating::Good);
        stats.record(Rating::Ordinary);
        stats.record(Rating::Rejected);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.count_for(Rating::Excellent), 1);
        assert_eq!(stats.count_for(Rating::Good), 2);
        assert_eq!(stats.count_for(Rating::Ordinary), 1);
        assert_eq!(stats.count_for(Rating::Rejected), 1);
        let sum: usize = Rating::ALL.iter().map(|r| stats.count_for(*r)).sum();
        assert_eq!(sum, stats.total);
    }

    #[test]
    fn test_finish_computes_average() {
        let mut stats = RunStats::default();
        stats.record(Rating::Good);
        stats.record(Rating::Ordinary);
        let stats = stats.finish(Duration::from_secs(4));
        assert_eq!(stats.total_seconds, 4.0);
        assert_eq!(stats.avg_seconds, 2.0);
    }

    #[test]
    fn test_finish_with_no_photos() {
        let stats = RunStats::default().finish(Duration::from_millis(250));
        assert_eq!(stats.avg_seconds, 0.0);
    }
}
