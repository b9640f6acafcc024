//! Live generator set and frame compositor.
//!
//! The registry is the only mutable shared state of the simulation. It is
//! changed through [`Registry::insert`] and [`Registry::remove_by_id`]
//! between render passes; [`Registry::render_frame`] only needs `&self`, so
//! the borrow checker (and bevy's `Res`/`ResMut` access rules) keep the
//! live set frozen while a frame is composed.
//!
//! # Compositing order
//!
//! 1. Frame effects run once, over the snapshot (e.g. proximity lines)
//! 2. For each layer `0..max_layers`, every generator that has that layer
//!    draws it, in insertion order
//!
//! So all layer-0 callbacks run before any layer-1 callback, and so on.

use bevy_ecs::prelude::Resource;
use log::{debug, warn};
use rustc_hash::FxHashSet;

use crate::components::generator::{Generator, GeneratorId, GeneratorKind};
use crate::events::death::DeathChannel;
use crate::resources::clock::Tick;
use crate::resources::framebuffer::Canvas;

/// Whole-frame effect computed from every live generator at once.
pub trait FrameEffect: Send + Sync {
    fn apply(&self, snapshot: &[&Generator], now: Tick, canvas: &mut dyn Canvas);
}

#[derive(Resource, Default)]
pub struct Registry {
    generators: Vec<Generator>,
    ids: FxHashSet<GeneratorId>,
    effects: Vec<Box<dyn FrameEffect>>,
    deaths: DeathChannel,
    layer_depth: Option<usize>,
}

impl Registry {
    /// An empty registry with no effects and no layer cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Registry::add_effect`].
    pub fn with_effect(mut self, effect: impl FrameEffect + 'static) -> Self {
        self.add_effect(effect);
        self
    }

    /// Effects run in the order they were added, before any layer.
    pub fn add_effect(&mut self, effect: impl FrameEffect + 'static) {
        self.effects.push(Box::new(effect));
    }

    /// Drop every frame effect. Used when the config is reapplied.
    pub fn clear_effects(&mut self) {
        self.effects.clear();
    }

    /// Never composite more than `depth` layers per frame.
    pub fn with_layer_depth(mut self, depth: usize) -> Self {
        self.layer_depth = Some(depth);
        self
    }

    /// Channel that generators report their death on.
    pub fn deaths(&self) -> &DeathChannel {
        &self.deaths
    }

    /// Append a batch of generators.
    ///
    /// A generator whose id is already live (or repeated inside the batch)
    /// is dropped with a warning. Every accepted generator is subscribed to
    /// the death channel, so it leaves the registry when its life runs out
    /// whether or not its builder subscribed it. Returns how many were
    /// inserted.
    pub fn insert(&mut self, batch: impl IntoIterator<Item = Generator>) -> usize {
        let mut inserted = 0;
        for mut generator in batch {
            let id = generator.id();
            if !self.ids.insert(id) {
                warn!(
                    "Dropping {} generator {}: id already live",
                    generator.kind(),
                    id
                );
                continue;
            }
            let birth = generator.lifetime().birth();
            generator
                .lifetime_mut()
                .on_death(birth, self.deaths.notifier(id));
            self.generators.push(generator);
            inserted += 1;
        }
        inserted
    }

    /// Remove a generator. Unknown ids are ignored.
    pub fn remove_by_id(&mut self, id: GeneratorId) -> Option<Generator> {
        if !self.ids.remove(&id) {
            return None;
        }
        let index = self.generators.iter().position(|g| g.id() == id)?;
        Some(self.generators.remove(index))
    }

    /// Look up a live generator.
    pub fn get(&self, id: GeneratorId) -> Option<&Generator> {
        if !self.ids.contains(&id) {
            return None;
        }
        self.generators.iter().find(|g| g.id() == id)
    }

    /// True while `id` is live.
    pub fn contains(&self, id: GeneratorId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of live generators.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> Vec<GeneratorId> {
        self.generators.iter().map(|g| g.id()).collect()
    }

    /// Every live generator in insertion order, dead-but-unremoved included.
    pub fn iter(&self) -> impl Iterator<Item = &Generator> {
        self.generators.iter()
    }

    /// Generators that are still alive at `now`, in insertion order.
    pub fn snapshot(&self, now: Tick) -> Vec<&Generator> {
        self.generators
            .iter()
            .filter(|g| !g.lifetime().is_expired(now))
            .collect()
    }

    /// Live generators of `kind` that carry a movement manager.
    pub fn movable(&self, kind: GeneratorKind, now: Tick) -> Vec<&Generator> {
        self.snapshot(now)
            .into_iter()
            .filter(|g| g.kind() == kind && g.is_movable())
            .collect()
    }

    /// Live items that carry a movement manager.
    pub fn movable_items(&self, now: Tick) -> Vec<&Generator> {
        self.movable(GeneratorKind::Item, now)
    }

    /// Grid cells used as spawn origin by live generators of `kind`.
    pub fn occupied_cells(&self, kind: GeneratorKind) -> FxHashSet<(u32, u32)> {
        self.generators
            .iter()
            .filter(|g| g.kind() == kind && !g.lifetime().is_dead())
            .filter_map(|g| g.origin_cell())
            .collect()
    }

    /// Compose one frame onto `canvas`.
    ///
    /// Returns the number of draw callbacks that ran.
    pub fn render_frame(&self, now: Tick, canvas: &mut dyn Canvas) -> usize {
        let snapshot = self.snapshot(now);

        for effect in &self.effects {
            effect.apply(&snapshot, now, canvas);
        }

        let max_layers = snapshot
            .iter()
            .map(|g| g.layer_count())
            .max()
            .unwrap_or(0)
            .min(self.layer_depth.unwrap_or(usize::MAX));
        let mut calls = 0;
        for layer in 0..max_layers {
            canvas.begin_layer(layer);
            for generator in &snapshot {
                if generator.draw_layer(layer, canvas, now) {
                    calls += 1;
                }
            }
        }
        calls
    }

    /// Re-check every lifetime against the clock. Deaths post notices.
    ///
    /// Returns how many generators died on this call.
    pub fn evaluate_lifetimes(&mut self, now: Tick) -> usize {
        let mut died = 0;
        for generator in self.generators.iter_mut() {
            if generator.lifetime_mut().evaluate(now) {
                died += 1;
            }
        }
        died
    }

    /// Remove every generator whose death notice is pending.
    ///
    /// A generator may post more than one notice for the same death (its
    /// builder and the registry both subscribe); repeats are ignored.
    pub fn apply_removals(&mut self) -> usize {
        let mut removed = 0;
        let mut seen = FxHashSet::default();
        for notice in self.deaths.drain() {
            if !seen.insert(notice.id) {
                continue;
            }
            if self.remove_by_id(notice.id).is_some() {
                removed += 1;
            } else {
                debug!("Death notice for {} which is no longer live", notice.id);
            }
        }
        removed
    }

    /// Kill every live generator and remove them. Returns how many were live.
    pub fn kill_all(&mut self) -> usize {
        let live = self.generators.len();
        for generator in self.generators.iter_mut() {
            generator.lifetime_mut().force_kill();
        }
        self.apply_removals();
        live
    }
}
