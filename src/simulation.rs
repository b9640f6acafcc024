//! Simulation driver.
//!
//! [`Simulation`] owns the ECS [`World`] holding every resource and the
//! per-tick [`Schedule`]. One call to [`Simulation::tick`] runs the phases
//! in this fixed order:
//!
//! 1. [`advance_clock`] – clock moves forward by one
//! 2. [`spawn_system`] – recipes due this tick are built and inserted
//! 3. [`render_system`] – the live set is composed into the frame buffer
//! 4. [`lifetime_system`] – lifetimes are re-evaluated, deaths are posted
//! 5. [`removal_system`] – dead generators leave the registry
//!
//! Every phase is gated on [`simulation_running`], so after
//! [`Simulation::teardown`] the schedule does nothing.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use fastrand::Rng;
use log::{debug, info};

use crate::builders::dotgrid::backdrop;
use crate::components::coordinates::Coordinates;
use crate::effects::ProximityLines;
use crate::error::SimError;
use crate::resources::clock::{Clock, Tick};
use crate::resources::coordinategrid::{CoordinateGrid, GridParams};
use crate::resources::framebuffer::FrameBuffer;
use crate::resources::lifecycle::Lifecycle;
use crate::resources::registry::Registry;
use crate::resources::scheduler::SpawnScheduler;
use crate::resources::simconfig::SimConfig;
use crate::systems::lifecycle::simulation_running;
use crate::systems::lifetime::{lifetime_system, removal_system};
use crate::systems::render::render_system;
use crate::systems::spawn::spawn_system;
use crate::systems::time::advance_clock;

/// Summary of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    /// Generators still live after removals.
    pub live: usize,
    /// Shapes drawn in the frame of this tick.
    pub primitives: usize,
}

pub struct Simulation {
    world: World,
    schedule: Schedule,
}

fn grid_params(config: &SimConfig) -> GridParams {
    GridParams {
        columns: config.grid_columns,
        rows: config.grid_rows,
        origin: Coordinates::new(
            config.canvas_width as f32 / 2.0,
            config.canvas_height as f32 / 2.0,
        ),
        unit: config.grid_unit,
    }
}

fn install_effects(registry: &mut Registry, config: &SimConfig) {
    registry.clear_effects();
    if config.proximity_lines {
        registry.add_effect(ProximityLines::new(config.canvas_width as f32));
    }
}

/// The per-tick schedule, phases chained in order.
pub fn tick_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(
        (
            advance_clock,
            spawn_system,
            render_system,
            lifetime_system,
            removal_system,
        )
            .chain()
            .run_if(simulation_running),
    );
    schedule
}

impl Simulation {
    /// Build a simulation at tick 0 with the backdrop already in place.
    ///
    /// `seed` makes every random choice reproducible.
    pub fn new(config: SimConfig, seed: Option<u64>) -> Result<Self, SimError> {
        config.validate()?;
        let rng = seed.map(Rng::with_seed).unwrap_or_default();

        let grid = CoordinateGrid::new(grid_params(&config))?;
        let mut scheduler = SpawnScheduler::from_config(&config, 0, rng)?;

        let mut registry = Registry::new().with_layer_depth(config.layer_depth);
        install_effects(&mut registry, &config);
        let seeded = backdrop(&grid, 0, scheduler.rng_mut(), registry.deaths());
        registry.insert(seeded);

        info!(
            "Simulation ready: {}x{} canvas, {} grid points, {} fps",
            config.canvas_width,
            config.canvas_height,
            grid.points().len(),
            config.fps
        );

        let mut world = World::new();
        world.insert_resource(Clock::new());
        world.insert_resource(FrameBuffer::new());
        world.insert_resource(Lifecycle::Running);
        world.insert_resource(grid);
        world.insert_resource(scheduler);
        world.insert_resource(registry);
        world.insert_resource(config);

        Ok(Simulation {
            world,
            schedule: tick_schedule(),
        })
    }

    /// Run one tick. Returns `None` once the simulation is torn down.
    pub fn tick(&mut self) -> Option<TickReport> {
        if !self.is_running() {
            return None;
        }
        self.schedule.run(&mut self.world);
        Some(TickReport {
            tick: self.now(),
            live: self.registry().len(),
            primitives: self.frame().primitive_count(),
        })
    }

    /// Restart on a new canvas size.
    ///
    /// Every generator is killed, the grid is rebuilt around the new canvas
    /// centre and the backdrop is seeded again. The spawn plan starts over
    /// from the current tick. Returns how many generators were killed.
    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<usize, SimError> {
        if !self.is_running() {
            debug!("Ignoring resize to {}x{} after teardown", width, height);
            return Ok(0);
        }

        let mut config = self.config().clone();
        config.set_canvas_size(width, height);
        config.validate()?;
        let grid = CoordinateGrid::new(grid_params(&config))?;
        let now = self.now();

        let mut rng = {
            let mut scheduler = self.world.resource_mut::<SpawnScheduler>();
            scheduler.restart(now);
            scheduler.rng_mut().fork()
        };

        let killed = {
            let mut registry = self.world.resource_mut::<Registry>();
            let killed = registry.kill_all();
            install_effects(&mut registry, &config);
            let seeded = backdrop(&grid, now, &mut rng, registry.deaths());
            registry.insert(seeded);
            killed
        };

        info!(
            "Resized to {}x{} at tick {}: {} generators killed",
            width, height, now, killed
        );

        self.world.insert_resource(grid);
        self.world.insert_resource(config);
        Ok(killed)
    }

    /// Kill every generator and stop all phases for good.
    ///
    /// Returns how many generators were killed. A second call does nothing.
    pub fn teardown(&mut self) -> usize {
        if !self.is_running() {
            return 0;
        }
        let killed = self.world.resource_mut::<Registry>().kill_all();
        self.world.resource_mut::<Lifecycle>().tear_down();
        info!("Simulation torn down at tick {}: {} generators killed", self.now(), killed);
        killed
    }

    pub fn is_running(&self) -> bool {
        self.world.resource::<Lifecycle>().is_running()
    }

    pub fn now(&self) -> Tick {
        self.world.resource::<Clock>().now()
    }

    pub fn registry(&self) -> &Registry {
        self.world.resource::<Registry>()
    }

    /// Frame composed by the last tick.
    pub fn frame(&self) -> &FrameBuffer {
        self.world.resource::<FrameBuffer>()
    }

    pub fn config(&self) -> &SimConfig {
        self.world.resource::<SimConfig>()
    }

    pub fn grid(&self) -> &CoordinateGrid {
        self.world.resource::<CoordinateGrid>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
