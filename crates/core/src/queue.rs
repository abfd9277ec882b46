//! Outstanding datagram count shared by every controller.

/// Datagrams sent but not yet acknowledged.
///
/// The estimate never goes below zero: an acknowledgment with nothing
/// outstanding (duplicate acks, acks for retransmitted copies) is reported
/// back to the caller and otherwise ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueEstimator {
    outstanding: u64,
}

impl QueueEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_send(&mut self) {
        self.outstanding = self.outstanding.saturating_add(1);
    }

    /// Records one acknowledgment. Returns `false` if nothing was outstanding.
    pub fn on_ack(&mut self) -> bool {
        match self.outstanding.checked_sub(1) {
            Some(outstanding) => {
                self.outstanding = outstanding;
                true
            }
            None => false,
        }
    }

    pub fn outstanding(&self) -> u64 {
        self.outstanding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_ack_tracking() {
        let mut queue = QueueEstimator::new();
        queue.on_send();
        queue.on_send();
        assert_eq!(queue.outstanding(), 2);
        assert!(queue.on_ack());
        assert_eq!(queue.outstanding(), 1);
    }

    #[test]
    fn test_ack_underflow_clamps_at_zero() {
        let mut queue = QueueEstimator::new();
        queue.on_send();
        assert!(queue.on_ack());
        assert!(!queue.on_ack());
        assert_eq!(queue.outstanding(), 0);
    }
}
