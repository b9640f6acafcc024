//! Running / torn-down state of the simulation.
//!
//! Every per-tick phase is gated on
//! [`simulation_running`](crate::systems::lifecycle::simulation_running), so
//! once the state is [`Lifecycle::TornDown`] a schedule run is a no-op.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Running,
    TornDown,
}

impl Lifecycle {
    pub fn is_running(&self) -> bool {
        matches!(self, Lifecycle::Running)
    }

    /// Stop for good. There is no way back to [`Lifecycle::Running`].
    pub fn tear_down(&mut self) {
        *self = Lifecycle::TornDown;
    }
}
