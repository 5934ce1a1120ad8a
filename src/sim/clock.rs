//! Time sources
//!
//! The round samples its clock once per frame and feeds the result through a
//! [`Timeline`], which turns raw readings into simulation time that never runs
//! backward and never jumps further than one clamped delta per frame.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic millisecond time source
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for tests and headless replays.
///
/// Clones share the same reading, so a test can keep a handle while the
/// round owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Converts raw clock readings into clamped simulation time
#[derive(Debug, Clone)]
pub struct Timeline {
    last_raw: Option<u64>,
    now: u64,
    max_delta: u64,
}

impl Timeline {
    pub fn new(max_delta: u64) -> Self {
        Self {
            last_raw: None,
            now: 0,
            max_delta,
        }
    }

    /// Fold one raw reading into simulation time and return the new "now"
    pub fn advance(&mut self, raw: u64) -> u64 {
        if let Some(last) = self.last_raw {
            let delta = raw.saturating_sub(last);
            if delta > self.max_delta {
                log::debug!("Clamped frame delta {delta}ms to {}ms", self.max_delta);
            }
            self.now += delta.min(self.max_delta);
        }
        self.last_raw = Some(raw);
        self.now
    }

    /// Current simulation time
    pub fn now(&self) -> u64 {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(100);
        let handle = clock.clone();
        handle.advance(50);
        assert_eq!(clock.now_ms(), 150);
        handle.set(10);
        assert_eq!(clock.now_ms(), 10);
    }

    #[test]
    fn test_timeline_starts_at_zero() {
        let mut timeline = Timeline::new(250);
        assert_eq!(timeline.advance(123_456), 0);
        assert_eq!(timeline.advance(123_472), 16);
    }

    #[test]
    fn test_timeline_clamps_stalls() {
        let mut timeline = Timeline::new(250);
        timeline.advance(0);
        assert_eq!(timeline.advance(10_000), 250);
        assert_eq!(timeline.advance(10_016), 266);
    }

    #[test]
    fn test_timeline_ignores_backward_steps() {
        let mut timeline = Timeline::new(250);
        timeline.advance(1000);
        timeline.advance(1100);
        assert_eq!(timeline.advance(900), 100);
        // Resumes from the new reading
        assert_eq!(timeline.advance(916), 116);
        assert_eq!(timeline.now(), 116);
    }
}
