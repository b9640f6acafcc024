//! Permanent backdrop generators drawn from the coordinate grid.

use fastrand::Rng;

use crate::components::generator::{Generator, GeneratorId, GeneratorKind};
use crate::components::lifetime::LifetimeManager;
use crate::events::death::DeathChannel;
use crate::painters::flicker_alpha;
use crate::resources::clock::Tick;
use crate::resources::coordinategrid::CoordinateGrid;
use crate::resources::framebuffer::Rgba;

const DOT_ALPHA: f32 = 244.0 / 20.0;

const DELIMITER_PHASE: u64 = 25;
const DELIMITER_AMPLITUDE: f32 = 255.0 / 5.0;
const DELIMITER_PERIOD: u64 = 50;

fn permanent(now: Tick, rng: &mut Rng, deaths: &DeathChannel) -> (GeneratorId, LifetimeManager) {
    let id = GeneratorId::salted(now, rng);
    let mut lifetime = LifetimeManager::permanent(now);
    lifetime.on_death(now, deaths.notifier(id));
    (id, lifetime)
}

/// One faint dot per grid point.
pub fn dot_grid(grid: &CoordinateGrid, now: Tick, rng: &mut Rng, deaths: &DeathChannel) -> Generator {
    let (id, lifetime) = permanent(now, rng, deaths);
    let points: Vec<_> = grid.points().iter().map(|p| p.coordinates()).collect();
    Generator::new(id, GeneratorKind::DotGrid, lifetime).with_layer(move |_, canvas, _| {
        canvas.stroke(Rgba::white(DOT_ALPHA));
        canvas.no_fill();
        for point in &points {
            canvas.point(*point);
        }
    })
}

/// Rectangle around the outermost grid points, pulsing slowly.
pub fn grid_delimiter(
    grid: &CoordinateGrid,
    now: Tick,
    rng: &mut Rng,
    deaths: &DeathChannel,
) -> Generator {
    let (id, lifetime) = permanent(now, rng, deaths);
    let first = grid.first().coordinates();
    let last = grid.last().coordinates();
    Generator::new(id, GeneratorKind::DotGrid, lifetime).with_layer(move |_, canvas, now| {
        let alpha = flicker_alpha(now, DELIMITER_PHASE, DELIMITER_AMPLITUDE, DELIMITER_PERIOD);
        canvas.stroke(Rgba::white(alpha));
        canvas.no_fill();
        canvas.rect(first, last.x - first.x, last.y - first.y);
    })
}

/// The permanent generators laid under every item: dots, then delimiter.
pub fn backdrop(
    grid: &CoordinateGrid,
    now: Tick,
    rng: &mut Rng,
    deaths: &DeathChannel,
) -> Vec<Generator> {
    vec![
        dot_grid(grid, now, rng, deaths),
        grid_delimiter(grid, now, rng, deaths),
    ]
}
