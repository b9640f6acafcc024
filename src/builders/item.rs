//! Item generators: short-lived shapes placed on the coordinate grid.
//!
//! An [`ItemRecipe`] says what to build; [`build_item`] turns it into a
//! [`Generator`] at the current tick. Three recipes exist:
//!
//! - **fast stander** – stays on its cell, shows a destination marker,
//!   the shape and its position
//! - **slow mover** – same layers, travels to another random cell over
//!   its whole life
//! - **flicker** – a small cross that only draws its shape
//!
//! # Cell selection
//!
//! The starting cell is picked among grid points that no live item uses as
//! its origin. If every point is taken, nothing is built and the caller
//! just skips this spawn.

use fastrand::Rng;
use rustc_hash::FxHashSet;

use crate::components::coordinates::Coordinates;
use crate::components::generator::{Generator, GeneratorId, GeneratorKind};
use crate::components::lifetime::{Lifespan, LifetimeManager};
use crate::components::movement::MovementManager;
use crate::events::death::DeathChannel;
use crate::painters::{self, ShapePainter};
use crate::resources::clock::Tick;
use crate::resources::coordinategrid::{CoordinateGrid, GridPoint};
use crate::resources::framebuffer::{Canvas, Rgba};

/// Size multipliers an item can be drawn at.
pub const SIZE_MULTIPLIERS: [f32; 5] = [1.0, 2.0, 4.0, 8.0, 16.0];

/// Shape variants and their relative weights.
const SHAPE_WEIGHTS: [(Shape, u32); 4] = [
    (Shape::Circle, 4),
    (Shape::Box, 2),
    (Shape::Triangle, 1),
    (Shape::Cross, 1),
];

const DESTINATION_MARKER_SIZE: f32 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Box,
    Triangle,
    Cross,
    SmallCross,
}

impl Shape {
    pub fn painter(self) -> ShapePainter {
        match self {
            Shape::Circle => painters::draw_circle,
            Shape::Box => painters::draw_box,
            Shape::Triangle => painters::draw_triangle,
            Shape::Cross => painters::draw_x,
            Shape::SmallCross => painters::draw_small_x,
        }
    }

    /// Weighted pick: circle 1/2, box 1/4, triangle 1/8, cross 1/8.
    pub fn pick(rng: &mut Rng) -> Shape {
        let total: u32 = SHAPE_WEIGHTS.iter().map(|(_, w)| w).sum();
        let mut roll = rng.u32(0..total);
        for (shape, weight) in SHAPE_WEIGHTS {
            if roll < weight {
                return shape;
            }
            roll -= weight;
        }
        Shape::Circle
    }
}

/// How an item moves over its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// Stays on its starting cell.
    Static,
    /// Travels to another random cell, arriving when it dies.
    Travel,
}

/// Which draw layers an item gets, bottom to top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemLayers {
    pub destination: bool,
    pub shape: bool,
    pub statistics: bool,
}

impl ItemLayers {
    pub const ALL: ItemLayers = ItemLayers {
        destination: true,
        shape: true,
        statistics: true,
    };
    pub const SHAPE_ONLY: ItemLayers = ItemLayers {
        destination: false,
        shape: true,
        statistics: false,
    };
}

/// Description of an item to spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemRecipe {
    pub name: &'static str,
    /// Life length in ticks.
    pub duration: u64,
    pub motion: Motion,
    pub layers: ItemLayers,
    /// Fixed shape, or `None` for a weighted random pick.
    pub shape: Option<Shape>,
    /// Whether the unit is scaled by a random [`SIZE_MULTIPLIERS`] entry.
    pub random_size: bool,
}

impl ItemRecipe {
    pub fn fast_stander(duration: u64) -> Self {
        ItemRecipe {
            name: "fast_stander",
            duration,
            motion: Motion::Static,
            layers: ItemLayers::ALL,
            shape: None,
            random_size: true,
        }
    }

    pub fn slow_mover(duration: u64) -> Self {
        ItemRecipe {
            name: "slow_mover",
            duration,
            motion: Motion::Travel,
            layers: ItemLayers::ALL,
            shape: None,
            random_size: true,
        }
    }

    pub fn flicker(duration: u64) -> Self {
        ItemRecipe {
            name: "flicker",
            duration,
            motion: Motion::Static,
            layers: ItemLayers::SHAPE_ONLY,
            shape: Some(Shape::SmallCross),
            random_size: false,
        }
    }
}

/// Everything a builder needs from the world at spawn time.
pub struct SpawnContext<'a> {
    pub now: Tick,
    pub grid: &'a CoordinateGrid,
    /// Cells already used as origin by live items. Updated as items are built.
    pub occupied: &'a mut FxHashSet<(u32, u32)>,
    pub unit: f32,
    pub rng: &'a mut Rng,
    pub deaths: &'a DeathChannel,
}

fn pick_free_point(ctx: &mut SpawnContext<'_>) -> Option<GridPoint> {
    let free: Vec<&GridPoint> = ctx
        .grid
        .points()
        .iter()
        .filter(|p| !ctx.occupied.contains(&p.cell()))
        .collect();
    if free.is_empty() {
        return None;
    }
    Some(*free[ctx.rng.usize(0..free.len())])
}

/// Build one item, or `None` when the grid has no free cell.
///
/// The item is subscribed to the registry's death channel before it is
/// returned.
pub fn build_item(recipe: &ItemRecipe, ctx: &mut SpawnContext<'_>) -> Option<Generator> {
    let start = pick_free_point(ctx)?;
    ctx.occupied.insert(start.cell());

    let destination = match recipe.motion {
        Motion::Static => start.coordinates(),
        Motion::Travel => {
            let points = ctx.grid.points();
            points[ctx.rng.usize(0..points.len())].coordinates()
        }
    };

    let unit = if recipe.random_size {
        ctx.unit * SIZE_MULTIPLIERS[ctx.rng.usize(0..SIZE_MULTIPLIERS.len())]
    } else {
        ctx.unit
    };
    let shape = recipe.shape.unwrap_or_else(|| Shape::pick(ctx.rng));

    let id = GeneratorId::salted(ctx.now, ctx.rng);
    let mut lifetime = LifetimeManager::with_lifespan(ctx.now, Lifespan::Ticks(recipe.duration));
    lifetime.on_death(ctx.now, ctx.deaths.notifier(id));

    let movement = MovementManager::new(
        ctx.now,
        recipe.duration,
        start.coordinates(),
        destination,
    );

    let mut generator = Generator::new(id, GeneratorKind::Item, lifetime)
        .with_movement(movement)
        .with_origin_cell(start.cell());

    if recipe.layers.destination {
        generator = generator.with_layer(draw_destination_layer);
    }
    if recipe.layers.shape {
        let painter = shape.painter();
        generator = generator.with_layer(move |g, canvas, now| {
            let Some(at) = g.position(now) else { return };
            canvas.fill(Rgba::new(0, 0, 0, 255));
            painters::lifelike_stroke(canvas, g.lifetime(), now, g.id().0);
            painter(canvas, at, unit);
        });
    }
    if recipe.layers.statistics {
        generator = generator.with_layer(|g, canvas, now| {
            if let Some(at) = g.position(now) {
                painters::draw_position_statistics(canvas, at);
            }
        });
    }
    Some(generator)
}

fn draw_destination_layer(g: &Generator, canvas: &mut dyn Canvas, now: Tick) {
    let Some(movement) = g.movement() else { return };
    let target: Coordinates = movement.end();
    painters::lifelike_stroke(canvas, g.lifetime(), now, g.id().0);
    painters::weak_fill(canvas);
    painters::draw_destination(canvas, DESTINATION_MARKER_SIZE, target);
    painters::draw_arrow(canvas, movement.current_position(now), target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::coordinategrid::GridParams;

    fn grid(columns: u32, rows: u32) -> CoordinateGrid {
        CoordinateGrid::new(GridParams {
            columns,
            rows,
            origin: Coordinates::new(0.0, 0.0),
            unit: 1.0,
        })
        .unwrap()
    }

    #[test]
    fn stander_stays_on_its_cell_with_three_layers() {
        let grid = grid(2, 2);
        let mut occupied = FxHashSet::default();
        let mut rng = Rng::with_seed(1);
        let deaths = DeathChannel::default();
        let mut ctx = SpawnContext {
            now: 10,
            grid: &grid,
            occupied: &mut occupied,
            unit: 8.0,
            rng: &mut rng,
            deaths: &deaths,
        };
        let item = build_item(&ItemRecipe::fast_stander(20), &mut ctx).unwrap();
        assert_eq!(item.kind(), GeneratorKind::Item);
        assert_eq!(item.layer_count(), 3);
        assert!(item.movement().unwrap().is_static());
        assert_eq!(item.lifetime().birth(), 10);
        assert_eq!(item.lifetime().remaining_ticks(10), Some(20));
        assert!(occupied.contains(&item.origin_cell().unwrap()));
    }

    #[test]
    fn flicker_has_a_single_layer() {
        let grid = grid(3, 3);
        let mut occupied = FxHashSet::default();
        let mut rng = Rng::with_seed(2);
        let deaths = DeathChannel::default();
        let mut ctx = SpawnContext {
            now: 0,
            grid: &grid,
            occupied: &mut occupied,
            unit: 8.0,
            rng: &mut rng,
            deaths: &deaths,
        };
        let item = build_item(&ItemRecipe::flicker(30), &mut ctx).unwrap();
        assert_eq!(item.layer_count(), 1);
    }

    #[test]
    fn full_grid_builds_nothing() {
        let grid = grid(2, 1);
        let mut occupied: FxHashSet<(u32, u32)> = [(0, 0), (1, 0)].into_iter().collect();
        let mut rng = Rng::with_seed(3);
        let deaths = DeathChannel::default();
        let mut ctx = SpawnContext {
            now: 0,
            grid: &grid,
            occupied: &mut occupied,
            unit: 8.0,
            rng: &mut rng,
            deaths: &deaths,
        };
        assert!(build_item(&ItemRecipe::slow_mover(30), &mut ctx).is_none());
    }

    #[test]
    fn consecutive_spawns_use_distinct_cells() {
        let grid = grid(2, 2);
        let mut occupied = FxHashSet::default();
        let mut rng = Rng::with_seed(4);
        let deaths = DeathChannel::default();
        let mut ctx = SpawnContext {
            now: 0,
            grid: &grid,
            occupied: &mut occupied,
            unit: 8.0,
            rng: &mut rng,
            deaths: &deaths,
        };
        let cells: FxHashSet<_> = (0..4)
            .map(|_| {
                build_item(&ItemRecipe::fast_stander(5), &mut ctx)
                    .unwrap()
                    .origin_cell()
                    .unwrap()
            })
            .collect();
        assert_eq!(cells.len(), 4);
        assert!(build_item(&ItemRecipe::fast_stander(5), &mut ctx).is_none());
    }

    #[test]
    fn shape_pick_follows_weights() {
        let mut rng = Rng::with_seed(5);
        let circles = (0..8000)
            .filter(|_| Shape::pick(&mut rng) == Shape::Circle)
            .count();
        assert!((3500..4500).contains(&circles), "got {circles} circles");
    }

    #[test]
    fn death_is_reported_on_the_channel() {
        let grid = grid(2, 2);
        let mut occupied = FxHashSet::default();
        let mut rng = Rng::with_seed(6);
        let deaths = DeathChannel::default();
        let mut ctx = SpawnContext {
            now: 0,
            grid: &grid,
            occupied: &mut occupied,
            unit: 8.0,
            rng: &mut rng,
            deaths: &deaths,
        };
        let mut item = build_item(&ItemRecipe::flicker(3), &mut ctx).unwrap();
        item.lifetime_mut().evaluate(3);
        let notices = deaths.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].id, item.id());
    }
}
