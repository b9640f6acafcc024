//! Clock system.
//!
//! First phase of every tick: moves the shared
//! [`Clock`](crate::resources::clock::Clock) forward by one.
use bevy_ecs::prelude::*;

use crate::resources::clock::Clock;

/// Tick the clock.
pub fn advance_clock(mut clock: ResMut<Clock>) {
    clock.advance();
}
