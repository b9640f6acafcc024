//! The generator entity: an id, a lifetime, optional movement and an
//! ordered list of draw layers.
//!
//! Generators are built once and then only change through their own
//! lifetime manager. Draw callbacks receive the generator that owns them,
//! so painters pull the current position and remaining life through the
//! accessors below instead of having them passed in.
//!
//! # Example
//!
//! ```ignore
//! let generator = Generator::new(id, GeneratorKind::Item, LifetimeManager::new(now, 120)?)
//!     .with_movement(MovementManager::new(now, 120, from, to))
//!     .with_layer(|g, canvas, now| {
//!         canvas.point(g.position(now).unwrap_or_default());
//!     });
//! ```

use std::fmt;

use fastrand::Rng;
use smallvec::SmallVec;

use crate::components::coordinates::Coordinates;
use crate::components::lifetime::LifetimeManager;
use crate::components::movement::MovementManager;
use crate::resources::clock::Tick;
use crate::resources::framebuffer::Canvas;

/// Draw callback for one layer of a generator.
pub type DrawFn = Box<dyn Fn(&Generator, &mut dyn Canvas, Tick) + Send + Sync>;

/// Identity of a live generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratorId(pub u64);

impl GeneratorId {
    /// Derive an id from the current tick and a random salt.
    ///
    /// Collisions are astronomically unlikely but possible; the registry
    /// drops a colliding insert instead of trusting this.
    pub fn salted(now: Tick, rng: &mut Rng) -> Self {
        GeneratorId(now.wrapping_add(rng.u64(..)))
    }
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:016x}", self.0)
    }
}

/// Read-only classification used by external filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    /// Short-lived shapes placed on the grid.
    Item,
    /// Permanent grid backdrop.
    DotGrid,
}

impl GeneratorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorKind::Item => "item",
            GeneratorKind::DotGrid => "dotgrid",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Generator {
    id: GeneratorId,
    kind: GeneratorKind,
    lifetime: LifetimeManager,
    movement: Option<MovementManager>,
    origin_cell: Option<(u32, u32)>,
    layers: SmallVec<[DrawFn; 3]>,
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("lifetime", &self.lifetime)
            .field("movement", &self.movement)
            .field("origin_cell", &self.origin_cell)
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl Generator {
    /// A generator with no movement and no draw layers yet.
    pub fn new(id: GeneratorId, kind: GeneratorKind, lifetime: LifetimeManager) -> Self {
        Generator {
            id,
            kind,
            lifetime,
            movement: None,
            origin_cell: None,
            layers: SmallVec::new(),
        }
    }

    /// Give the generator a position that follows `movement`.
    pub fn with_movement(mut self, movement: MovementManager) -> Self {
        self.movement = Some(movement);
        self
    }

    /// Remember the grid cell this generator was spawned on.
    pub fn with_origin_cell(mut self, cell: (u32, u32)) -> Self {
        self.origin_cell = Some(cell);
        self
    }

    /// Append a draw layer. Layer index is the position in call order.
    pub fn with_layer<F>(mut self, draw: F) -> Self
    where
        F: Fn(&Generator, &mut dyn Canvas, Tick) + Send + Sync + 'static,
    {
        self.layers.push(Box::new(draw));
        self
    }

    /// Registry key, unique among live generators.
    pub fn id(&self) -> GeneratorId {
        self.id
    }

    /// Item or backdrop.
    pub fn kind(&self) -> GeneratorKind {
        self.kind
    }

    /// Lifetime state, read by every draw layer for fading.
    pub fn lifetime(&self) -> &LifetimeManager {
        &self.lifetime
    }

    /// Used to subscribe to, evaluate or force the death of this generator.
    pub fn lifetime_mut(&mut self) -> &mut LifetimeManager {
        &mut self.lifetime
    }

    /// `None` for generators without a position, like the backdrop.
    pub fn movement(&self) -> Option<&MovementManager> {
        self.movement.as_ref()
    }

    /// True when the generator has a movement manager, moving or not.
    pub fn is_movable(&self) -> bool {
        self.movement.is_some()
    }

    /// Grid cell `(column, row)` the generator occupies for spawn purposes.
    pub fn origin_cell(&self) -> Option<(u32, u32)> {
        self.origin_cell
    }

    /// Current position, if the generator has one.
    pub fn position(&self, now: Tick) -> Option<Coordinates> {
        self.movement.as_ref().map(|m| m.current_position(now))
    }

    /// Remaining life in `[0, 100]`, see [`LifetimeManager::remaining_percent`].
    pub fn remaining_percent(&self, now: Tick) -> f32 {
        self.lifetime.remaining_percent(now)
    }

    /// Number of draw layers, which is one past the highest layer index.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Run the callback at `layer`, if this generator has one.
    ///
    /// Returns whether a callback ran.
    pub fn draw_layer(&self, layer: usize, canvas: &mut dyn Canvas, now: Tick) -> bool {
        match self.layers.get(layer) {
            Some(draw) => {
                draw(self, canvas, now);
                true
            }
            None => false,
        }
    }
}
