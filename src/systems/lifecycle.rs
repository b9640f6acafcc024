//! Lifecycle run condition.
//!
//! Gates every per-tick phase so nothing runs after teardown.

use bevy_ecs::prelude::*;

use crate::resources::lifecycle::Lifecycle;

/// Run condition shared by every per-tick phase.
pub fn simulation_running(lifecycle: Res<Lifecycle>) -> bool {
    lifecycle.is_running()
}
