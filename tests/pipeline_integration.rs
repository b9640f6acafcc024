//! Per-tick pipeline tests on a hand-built world.
//!
//! These drive the real phase schedule against a world holding a custom
//! spawn plan, so the timing of spawns, frames and removals can be checked
//! tick by tick.

use bevy_ecs::prelude::*;
use fastrand::Rng;

use polyterative::builders::item::ItemRecipe;
use polyterative::components::coordinates::Coordinates;
use polyterative::components::generator::{GeneratorId, GeneratorKind};
use polyterative::resources::clock::Clock;
use polyterative::resources::coordinategrid::{CoordinateGrid, GridParams};
use polyterative::resources::framebuffer::{DrawCommand, FrameBuffer};
use polyterative::resources::lifecycle::Lifecycle;
use polyterative::resources::registry::Registry;
use polyterative::resources::scheduler::{Cadence, SpawnPlan, SpawnScheduler};
use polyterative::simulation::tick_schedule;

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world(columns: u32, rows: u32, plan: SpawnPlan) -> World {
    let mut world = World::new();
    world.insert_resource(Clock::new());
    world.insert_resource(FrameBuffer::new());
    world.insert_resource(Lifecycle::Running);
    world.insert_resource(Registry::new());
    world.insert_resource(
        CoordinateGrid::new(GridParams {
            columns,
            rows,
            origin: Coordinates::new(100.0, 100.0),
            unit: 2.0,
        })
        .unwrap(),
    );
    world.insert_resource(SpawnScheduler::new(plan, 0, 2.0, Rng::with_seed(42)).unwrap());
    world
}

fn periodic(every: u64, recipe: ItemRecipe) -> SpawnPlan {
    SpawnPlan::Single {
        cadence: Cadence::Periodic { every },
        recipe,
    }
}

fn run_until(world: &mut World, schedule: &mut Schedule, tick: u64) {
    while world.resource::<Clock>().now() < tick {
        schedule.run(world);
    }
}

fn births(world: &World) -> Vec<u64> {
    world
        .resource::<Registry>()
        .iter()
        .map(|g| g.lifetime().birth())
        .collect()
}

#[test]
fn periodic_spawns_retire_on_schedule() {
    let mut world = make_world(4, 4, periodic(10, ItemRecipe::fast_stander(20)));
    let mut schedule = tick_schedule();

    for tick in 1..=100u64 {
        run_until(&mut world, &mut schedule, tick);
        let registry = world.resource::<Registry>();
        assert!(
            registry.iter().all(|g| !g.lifetime().is_expired(tick)),
            "expired generator still live after tick {tick}"
        );
        assert!(registry.len() <= 2, "too many live items at tick {tick}");
    }

    assert_eq!(world.resource::<Clock>().now(), 100);
    assert_eq!(births(&world), vec![90, 100]);
    assert!(births(&world).iter().all(|birth| birth + 20 > 100));
}

#[test]
fn spawn_is_drawn_on_its_own_tick_and_not_after_death() {
    let mut world = make_world(3, 3, periodic(10, ItemRecipe::flicker(1)));
    let mut schedule = tick_schedule();

    run_until(&mut world, &mut schedule, 9);
    assert_eq!(world.resource::<FrameBuffer>().primitive_count(), 0);

    run_until(&mut world, &mut schedule, 10);
    let frame = world.resource::<FrameBuffer>();
    assert_eq!(frame.tick, 10);
    // small cross: two lines
    assert_eq!(frame.primitive_count(), 2);
    assert_eq!(world.resource::<Registry>().len(), 1);

    run_until(&mut world, &mut schedule, 11);
    assert_eq!(world.resource::<FrameBuffer>().primitive_count(), 0);
    assert!(world.resource::<Registry>().is_empty());
}

#[test]
fn full_grid_spawns_nothing_more() {
    let mut world = make_world(1, 1, periodic(1, ItemRecipe::fast_stander(100)));
    let mut schedule = tick_schedule();

    run_until(&mut world, &mut schedule, 50);
    let registry = world.resource::<Registry>();
    assert_eq!(registry.len(), 1);
    assert_eq!(births(&world), vec![1]);
}

#[test]
fn cell_frees_up_when_its_item_dies() {
    let mut world = make_world(1, 1, periodic(1, ItemRecipe::fast_stander(5)));
    let mut schedule = tick_schedule();

    run_until(&mut world, &mut schedule, 6);
    // born at 1, dead and removed at 6
    assert!(world.resource::<Registry>().is_empty());
    run_until(&mut world, &mut schedule, 7);
    assert_eq!(births(&world), vec![7]);
}

#[test]
fn slow_mover_travels_between_grid_points() {
    let mut world = make_world(2, 1, periodic(1000, ItemRecipe::slow_mover(40)));
    let mut schedule = tick_schedule();
    run_until(&mut world, &mut schedule, 1000);

    let registry = world.resource::<Registry>();
    let mover = registry.iter().next().unwrap();
    let movement = *mover.movement().unwrap();
    let grid = world.resource::<CoordinateGrid>();
    let on_grid = |p: Coordinates| {
        grid.points()
            .iter()
            .any(|g| approx_eq(g.x, p.x) && approx_eq(g.y, p.y))
    };
    assert!(on_grid(movement.start()));
    assert!(on_grid(movement.end()));

    let halfway = mover.position(1020).unwrap();
    let expected = movement.start().midpoint(movement.end());
    assert!(approx_eq(halfway.x, expected.x));
    assert!(approx_eq(halfway.y, expected.y));
}

#[test]
fn torn_down_world_does_not_tick() {
    let mut world = make_world(3, 3, periodic(2, ItemRecipe::flicker(10)));
    let mut schedule = tick_schedule();
    run_until(&mut world, &mut schedule, 5);
    world.resource_mut::<Lifecycle>().tear_down();

    let live = world.resource::<Registry>().len();
    for _ in 0..10 {
        schedule.run(&mut world);
    }
    assert_eq!(world.resource::<Clock>().now(), 5);
    assert_eq!(world.resource::<Registry>().len(), live);
}

#[test]
fn stale_death_notices_are_harmless() {
    let mut world = make_world(3, 3, periodic(1000, ItemRecipe::flicker(10)));
    let mut schedule = tick_schedule();
    {
        let registry = world.resource::<Registry>();
        (registry.deaths().notifier(GeneratorId(12345)))();
    }
    run_until(&mut world, &mut schedule, 3);
    assert!(world.resource::<Registry>().is_empty());
}

#[test]
fn frame_layers_are_announced_in_order() {
    let mut world = make_world(3, 3, periodic(1, ItemRecipe::fast_stander(50)));
    let mut schedule = tick_schedule();
    run_until(&mut world, &mut schedule, 3);

    let frame = world.resource::<FrameBuffer>();
    let layers: Vec<usize> = frame
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::BeginLayer { layer } => Some(*layer),
            _ => None,
        })
        .collect();
    assert_eq!(layers, vec![0, 1, 2]);
    assert!(
        world
            .resource::<Registry>()
            .iter()
            .all(|g| g.kind() == GeneratorKind::Item)
    );
}
