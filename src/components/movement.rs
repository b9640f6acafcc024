//! Linear movement between two points over a fixed number of ticks.
//!
//! Unlike a stepped tween, the position is never stored: it is recomputed
//! from the clock on every read. One manager covers exactly one run from
//! `start` to `end`; there is no looping or rewinding. Repeating motion is
//! done by spawning a new generator.

use crate::components::coordinates::{Coordinates, lerp};
use crate::resources::clock::Tick;

/// Interpolated position of one generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementManager {
    start_tick: Tick,
    duration: u64,
    start: Coordinates,
    end: Coordinates,
}

impl MovementManager {
    /// Travel from `start` to `end` over `duration` ticks, starting at `start_tick`.
    pub fn new(start_tick: Tick, duration: u64, start: Coordinates, end: Coordinates) -> Self {
        MovementManager {
            start_tick,
            duration,
            start,
            end,
        }
    }

    /// A manager that stays at `at` forever.
    pub fn fixed(start_tick: Tick, at: Coordinates) -> Self {
        Self::new(start_tick, 0, at, at)
    }

    /// Position at and before `start_tick`.
    pub fn start(&self) -> Coordinates {
        self.start
    }

    /// Position once `duration` ticks have passed.
    pub fn end(&self) -> Coordinates {
        self.end
    }

    /// Tick the run begins.
    pub fn start_tick(&self) -> Tick {
        self.start_tick
    }

    /// Length of the run in ticks.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// True when `start` and `end` coincide.
    pub fn is_static(&self) -> bool {
        self.start == self.end
    }

    /// Normalized progress in `[0, 1]`.
    ///
    /// A zero duration counts as already arrived.
    pub fn progress(&self, now: Tick) -> f32 {
        if self.duration == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start_tick);
        (elapsed as f64 / self.duration as f64).clamp(0.0, 1.0) as f32
    }

    /// Position at `now`. Never overshoots `end`.
    pub fn current_position(&self, now: Tick) -> Coordinates {
        if self.is_static() {
            return self.start;
        }
        let t = self.progress(now);
        if t >= 1.0 {
            return self.end;
        }
        lerp(self.start, self.end, t)
    }
}
