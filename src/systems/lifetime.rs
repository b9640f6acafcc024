//! Lifetime systems.
//!
//! Run after the frame has been composed:
//!
//! 1. [`lifetime_system`] re-checks every lifetime against the clock; a
//!    generator whose life ran out fires its death callbacks, which post a
//!    notice on the registry's death channel
//! 2. [`removal_system`] drains the channel and drops the dead generators
//!
//! A generator that dies at tick `t` is drawn for the last time at `t - 1`
//! and is gone before the snapshot of `t + 1` is taken.

use bevy_ecs::prelude::*;

use crate::resources::clock::Clock;
use crate::resources::registry::Registry;

/// Evaluate every lifetime at the current tick.
pub fn lifetime_system(clock: Res<Clock>, mut registry: ResMut<Registry>) {
    registry.evaluate_lifetimes(clock.now());
}

/// Drop every generator whose death was posted since the last drain.
pub fn removal_system(mut registry: ResMut<Registry>) {
    registry.apply_removals();
}
