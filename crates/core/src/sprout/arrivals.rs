//! Buffer of acknowledgment receive times awaiting attribution to a tick.

/// Receiver timestamps (ms) not yet counted in a tick.
///
/// Timestamps may arrive out of order, so classification scans the whole log
/// rather than a prefix.
#[derive(Debug, Clone, Default)]
pub struct ArrivalAccumulator {
    log: Vec<u64>,
}

impl ArrivalAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one acknowledgment's receiver timestamp.
    pub fn record(&mut self, receiver_timestamp_ms: u64) {
        self.log.push(receiver_timestamp_ms);
    }

    /// Removes and counts every entry at or before `threshold_ms`.
    ///
    /// Later entries stay in the log for a subsequent tick.
    pub fn take_confirmed(&mut self, threshold_ms: u64) -> u64 {
        let before = self.log.len();
        self.log.retain(|ts| *ts > threshold_ms);
        (before - self.log.len()) as u64
    }

    /// Number of timestamps still pending.
    pub fn pending(&self) -> usize {
        self.log.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_by_threshold() {
        let mut arrivals = ArrivalAccumulator::new();
        for ts in [10, 20, 30, 40] {
            arrivals.record(ts);
        }

        assert_eq!(arrivals.take_confirmed(20), 2);
        assert_eq!(arrivals.pending(), 2);
        // Already counted entries are gone
        assert_eq!(arrivals.take_confirmed(20), 0);
        assert_eq!(arrivals.take_confirmed(100), 2);
        assert_eq!(arrivals.pending(), 0);
    }

    #[test]
    fn test_out_of_order_timestamps() {
        let mut arrivals = ArrivalAccumulator::new();
        for ts in [50, 5, 45, 6] {
            arrivals.record(ts);
        }
        assert_eq!(arrivals.take_confirmed(10), 2);
        assert_eq!(arrivals.pending(), 2);
    }
}
