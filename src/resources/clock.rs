//! Shared logical clock.
//!
//! The clock is a frame counter, advanced once per real-time timer firing
//! by [`advance_clock`](crate::systems::time::advance_clock). Everything
//! else in the simulation is a function of its value.

use std::time::Duration;

use bevy_ecs::prelude::Resource;

use crate::error::SimError;

/// One discrete simulation step.
pub type Tick = u64;

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Clock {
    tick: Tick,
}

impl Clock {
    pub fn new() -> Self {
        Clock { tick: 0 }
    }

    pub fn now(&self) -> Tick {
        self.tick
    }

    /// Move forward by exactly one tick.
    pub fn advance(&mut self) -> Tick {
        self.tick += 1;
        self.tick
    }
}

/// Convert seconds to a whole number of ticks at `fps`.
pub fn seconds_to_ticks(seconds: f32, fps: u32) -> u64 {
    (fps as f32 * seconds).round().max(0.0) as u64
}

/// Real-time interval between two ticks.
pub fn frame_interval(fps: u32) -> Result<Duration, SimError> {
    if fps == 0 {
        return Err(SimError::config("fps must be greater than zero"));
    }
    Ok(Duration::from_secs_f64(1.0 / fps as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_strictly_one() {
        let mut clock = Clock::new();
        assert_eq!(clock.now(), 0);
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.now(), 2);
    }

    #[test]
    fn seconds_round_to_ticks() {
        assert_eq!(seconds_to_ticks(0.5, 60), 30);
        assert_eq!(seconds_to_ticks(0.14, 60), 8);
        assert_eq!(seconds_to_ticks(5.0, 144), 720);
        assert_eq!(seconds_to_ticks(-1.0, 60), 0);
    }

    #[test]
    fn zero_fps_has_no_interval() {
        assert!(frame_interval(0).is_err());
        assert_eq!(frame_interval(50).unwrap(), Duration::from_millis(20));
    }
}
