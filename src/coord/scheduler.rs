//! Render scheduler
//!
//! One paint per frame interval while a session is attached.

use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::core::engine::Engine;

/// Roughly one display refresh at 60 Hz
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct RenderScheduler {
    interval: Duration,
    next_frame: Option<Instant>,
    cancelled: bool,
    frames: u64,
    faults: u64,
}

impl RenderScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_frame: None,
            cancelled: false,
            frames: 0,
            faults: 0,
        }
    }

    /// Schedule the first frame. Has no effect once cancelled.
    pub fn start(&mut self, now: Instant) {
        if self.cancelled {
            return;
        }
        self.next_frame = Some(now + self.interval);
    }

    /// Stop painting for good
    pub fn cancel(&mut self) {
        if !self.cancelled {
            debug!("Render schedule cancelled after {} frames ({} faults)", self.frames, self.faults);
        }
        self.cancelled = true;
        self.next_frame = None;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next_frame
    }

    /// Paint if a frame is due. A failed paint is logged and the next frame
    /// is scheduled regardless.
    pub fn poll(&mut self, now: Instant, engine: &mut dyn Engine) -> bool {
        let due = match self.next_frame {
            Some(due) if !self.cancelled && now >= due => due,
            _ => return false,
        };

        self.frames += 1;
        if let Err(e) = engine.render() {
            self.faults += 1;
            error!("render error: {}", e);
        }

        // Skip frames we fell behind on rather than bursting to catch up
        let next = due + self.interval;
        self.next_frame = Some(if next <= now { now + self.interval } else { next });
        true
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn faults(&self) -> u64 {
        self.faults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeEngine;

    #[test]
    fn test_paints_once_per_interval() {
        let mut engine = FakeEngine::new();
        let mut scheduler = RenderScheduler::new(FRAME_INTERVAL);
        let t0 = Instant::now();
        scheduler.start(t0);

        assert!(!scheduler.poll(t0, &mut engine));
        assert!(scheduler.poll(t0 + FRAME_INTERVAL, &mut engine));
        assert!(!scheduler.poll(t0 + FRAME_INTERVAL, &mut engine));
        assert!(scheduler.poll(t0 + FRAME_INTERVAL * 2, &mut engine));
        assert_eq!(engine.state().renders, 2);
    }

    #[test]
    fn test_fault_does_not_stop_schedule() {
        let mut engine = FakeEngine::new();
        engine.state().render_errors = 1;
        let mut scheduler = RenderScheduler::new(FRAME_INTERVAL);
        let t0 = Instant::now();
        scheduler.start(t0);

        assert!(scheduler.poll(t0 + FRAME_INTERVAL, &mut engine));
        assert_eq!(scheduler.faults(), 1);
        assert!(scheduler.deadline().is_some());

        assert!(scheduler.poll(t0 + FRAME_INTERVAL * 2, &mut engine));
        assert_eq!(scheduler.frames(), 2);
        assert_eq!(scheduler.faults(), 1);
        assert_eq!(engine.state().renders, 2);
    }

    #[test]
    fn test_falls_behind_without_bursting() {
        let mut engine = FakeEngine::new();
        let mut scheduler = RenderScheduler::new(FRAME_INTERVAL);
        let t0 = Instant::now();
        scheduler.start(t0);

        let late = t0 + FRAME_INTERVAL * 10;
        assert!(scheduler.poll(late, &mut engine));
        assert_eq!(scheduler.deadline(), Some(late + FRAME_INTERVAL));
    }

    #[test]
    fn test_cancel_is_irrevocable() {
        let mut engine = FakeEngine::new();
        let mut scheduler = RenderScheduler::new(FRAME_INTERVAL);
        let t0 = Instant::now();
        scheduler.start(t0);
        scheduler.cancel();

        assert!(!scheduler.poll(t0 + FRAME_INTERVAL, &mut engine));
        scheduler.start(t0);
        assert_eq!(scheduler.deadline(), None);
        assert!(scheduler.is_cancelled());
        assert_eq!(engine.state().renders, 0);
    }
}
