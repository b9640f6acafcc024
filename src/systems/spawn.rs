//! Spawn system.
//!
//! Asks the [`SpawnScheduler`] which recipes are due at the current tick,
//! builds them on free grid cells and inserts the batch into the
//! [`Registry`].
//!
//! # Cell occupancy
//!
//! A cell is taken when a live item uses it as its origin. Cells picked by
//! earlier spawns of the same tick count as taken too, so one batch never
//! stacks two items on a cell.

use bevy_ecs::prelude::*;
use log::debug;

use crate::builders::item::{SpawnContext, build_item};
use crate::components::generator::GeneratorKind;
use crate::resources::clock::Clock;
use crate::resources::coordinategrid::CoordinateGrid;
use crate::resources::registry::Registry;
use crate::resources::scheduler::SpawnScheduler;

/// Build and insert every item due at the current tick.
///
/// Recipes that find no free cell are skipped for this tick.
pub fn spawn_system(
    clock: Res<Clock>,
    grid: Res<CoordinateGrid>,
    mut scheduler: ResMut<SpawnScheduler>,
    mut registry: ResMut<Registry>,
) {
    let now = clock.now();
    let due = scheduler.due(now);
    if due.is_empty() {
        return;
    }

    let mut occupied = registry.occupied_cells(GeneratorKind::Item);
    let unit = scheduler.unit();
    let mut batch = Vec::with_capacity(due.len());
    {
        let mut ctx = SpawnContext {
            now,
            grid: &grid,
            occupied: &mut occupied,
            unit,
            rng: scheduler.rng_mut(),
            deaths: registry.deaths(),
        };
        for recipe in &due {
            match build_item(recipe, &mut ctx) {
                Some(generator) => batch.push(generator),
                None => debug!("No free grid cell for {} at tick {}", recipe.name, now),
            }
        }
    }
    registry.insert(batch);
}
