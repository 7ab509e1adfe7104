//! Frame pacing
//!
//! The host calls [`FrameScheduler::advance`] once per display refresh with
//! the refresh timestamp. Only an armed scheduler produces ticks; disarming
//! drops any pending frame so nothing fires after a session leaves play.

use crate::sim::FrameClock;

/// What the host should do after a frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Request another frame
    Continue,
    /// The loop has been cancelled; do not reschedule
    Stop,
}

/// Computes frame deltas while armed
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    armed: bool,
    last_frame: Option<f64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh scheduling cycle. The next frame has a zero delta.
    pub fn arm(&mut self) {
        self.armed = true;
        self.last_frame = None;
    }

    /// Cancel the loop
    pub fn cancel(&mut self) {
        self.armed = false;
        self.last_frame = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Clock for the frame at `now`, or `None` when not armed.
    ///
    /// Timestamps that run backwards yield a zero delta.
    pub fn advance(&mut self, now: f64) -> Option<FrameClock> {
        if !self.armed {
            return None;
        }
        let delta = self.last_frame.map(|last| now - last).unwrap_or(0.0);
        self.last_frame = Some(now);
        Some(FrameClock::new(now, delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_has_zero_delta() {
        let mut scheduler = FrameScheduler::new();
        scheduler.arm();
        let clock = scheduler.advance(500.0).unwrap();
        assert_eq!(clock.delta, 0.0);
        let clock = scheduler.advance(516.0).unwrap();
        assert_eq!(clock.delta, 16.0);
        assert_eq!(clock.now, 516.0);
    }

    #[test]
    fn test_disarmed_scheduler_never_ticks() {
        let mut scheduler = FrameScheduler::new();
        assert!(scheduler.advance(100.0).is_none());

        scheduler.arm();
        scheduler.advance(100.0);
        scheduler.cancel();
        assert!(!scheduler.is_armed());
        assert!(scheduler.advance(116.0).is_none());
    }

    #[test]
    fn test_rearm_starts_fresh_cycle() {
        let mut scheduler = FrameScheduler::new();
        scheduler.arm();
        scheduler.advance(100.0);
        scheduler.cancel();
        scheduler.arm();
        let clock = scheduler.advance(9000.0).unwrap();
        assert_eq!(clock.delta, 0.0);
    }

    #[test]
    fn test_backwards_time_clamps_to_zero() {
        let mut scheduler = FrameScheduler::new();
        scheduler.arm();
        scheduler.advance(100.0);
        let clock = scheduler.advance(90.0).unwrap();
        assert_eq!(clock.delta, 0.0);
    }
}
