//! Lazy tick catch-up driven by window queries.

/// One tick due for processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTick {
    /// Receiver timestamps at or before this instant count for the tick.
    pub arrival_threshold_ms: u64,
    /// Whether this is the last tick due before "now".
    pub is_latest: bool,
}

/// Tracks the last processed tick boundary.
///
/// The cursor only moves forward, one tick at a time, so the number of ticks
/// replayed by a query is `floor((now - cursor) / tick)` and always finite.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    cursor_ms: u64,
    tick_ms: u64,
    feedback_delay_ms: u64,
}

impl TickScheduler {
    /// Places the first boundary one feedback delay after `now_ms`.
    pub fn new(now_ms: u64, tick_ms: u64, feedback_delay_ms: u64) -> Self {
        Self {
            cursor_ms: now_ms.saturating_add(feedback_delay_ms),
            tick_ms: tick_ms.max(1),
            feedback_delay_ms,
        }
    }

    pub fn cursor_ms(&self) -> u64 {
        self.cursor_ms
    }

    /// Ticks that a query at `now_ms` would process.
    pub fn ticks_due(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.cursor_ms) / self.tick_ms
    }

    /// Advances the cursor by one tick if a tick is due at `now_ms`.
    pub fn next_due(&mut self, now_ms: u64) -> Option<DueTick> {
        if now_ms < self.cursor_ms.saturating_add(self.tick_ms) {
            return None;
        }
        let arrival_threshold_ms = self.cursor_ms.saturating_sub(self.feedback_delay_ms);
        self.cursor_ms += self.tick_ms;
        Some(DueTick {
            arrival_threshold_ms,
            is_latest: now_ms < self.cursor_ms.saturating_add(self.tick_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tick_before_first_boundary() {
        let mut scheduler = TickScheduler::new(0, 20, 150);
        assert_eq!(scheduler.cursor_ms(), 150);
        assert_eq!(scheduler.ticks_due(169), 0);
        assert_eq!(scheduler.next_due(169), None);
    }

    #[test]
    fn test_single_tick() {
        let mut scheduler = TickScheduler::new(0, 20, 150);
        let tick = scheduler.next_due(170).unwrap();
        assert_eq!(tick.arrival_threshold_ms, 0);
        assert!(tick.is_latest);
        assert_eq!(scheduler.cursor_ms(), 170);
        assert_eq!(scheduler.next_due(170), None);
    }

    #[test]
    fn test_catch_up_marks_only_last_tick() {
        let mut scheduler = TickScheduler::new(1_000, 20, 150);
        let now = 1_150 + 5 * 20 + 7;
        assert_eq!(scheduler.ticks_due(now), 5);

        let mut ticks = Vec::new();
        while let Some(tick) = scheduler.next_due(now) {
            ticks.push(tick);
        }
        assert_eq!(ticks.len(), 5);
        assert_eq!(
            ticks.iter().map(|t| t.arrival_threshold_ms).collect::<Vec<_>>(),
            vec![1_000, 1_020, 1_040, 1_060, 1_080]
        );
        assert!(ticks[..4].iter().all(|t| !t.is_latest));
        assert!(ticks[4].is_latest);
        assert_eq!(scheduler.cursor_ms(), 1_250);
    }

    #[test]
    fn test_backwards_clock_processes_nothing() {
        let mut scheduler = TickScheduler::new(500, 20, 150);
        assert_eq!(scheduler.ticks_due(100), 0);
        assert_eq!(scheduler.next_due(100), None);
    }
}
