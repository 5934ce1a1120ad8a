//! Interval gates for repeatable actions
//!
//! A cooldown never reads a clock itself: callers pass the frame's sampled
//! time, so every cooldown in a frame agrees on "now".

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A reusable interval gate.
///
/// Fixed cooldowns always wait `base_ms`. Variable cooldowns redraw their
/// duration uniformly from `[base - variance, base + variance]` on every
/// [`Cooldown::reset`]; polling never resamples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    base_ms: u64,
    variance_ms: u64,
    /// Duration of the current interval
    duration_ms: u64,
    /// Time of the last reset; `None` means the gate has never been armed
    last_reset: Option<u64>,
}

impl Cooldown {
    /// Fixed-length cooldown
    pub fn fixed(duration_ms: u64) -> Self {
        Self {
            base_ms: duration_ms,
            variance_ms: 0,
            duration_ms,
            last_reset: None,
        }
    }

    /// Randomized cooldown; variance is capped at the base so durations stay non-negative
    pub fn variable(base_ms: u64, variance_ms: u64) -> Self {
        Self {
            base_ms,
            variance_ms: variance_ms.min(base_ms),
            duration_ms: base_ms,
            last_reset: None,
        }
    }

    /// Arm the gate at `now`, resampling the duration for variable cooldowns
    pub fn reset<R: Rng + ?Sized>(&mut self, now: u64, rng: &mut R) {
        self.last_reset = Some(now);
        if self.variance_ms > 0 {
            let low = self.base_ms - self.variance_ms;
            let high = self.base_ms + self.variance_ms;
            self.duration_ms = rng.random_range(low..=high);
        }
    }

    /// Whether the active interval has elapsed. An unarmed gate is finished.
    pub fn is_finished(&self, now: u64) -> bool {
        match self.last_reset {
            // saturating_sub: a clock that steps backward reads as "no time passed"
            Some(at) => now.saturating_sub(at) >= self.duration_ms,
            None => true,
        }
    }

    /// Milliseconds left in the current interval (0 once finished)
    pub fn remaining(&self, now: u64) -> u64 {
        match self.last_reset {
            Some(at) => self.duration_ms.saturating_sub(now.saturating_sub(at)),
            None => 0,
        }
    }

    /// Duration of the current interval
    pub fn duration(&self) -> u64 {
        self.duration_ms
    }

    /// Whether the gate has been reset at least once
    pub fn is_armed(&self) -> bool {
        self.last_reset.is_some()
    }
}
