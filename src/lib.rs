//! Polyterative library.
//!
//! A generative-canvas simulation core: short-lived generators are spawned
//! on a coordinate grid by a set of cadences, animated purely from a shared
//! tick clock, retired exactly once when their life runs out, and
//! composited layer by layer into a recording frame buffer every tick.
//!
//! The per-tick phases are `bevy_ecs` systems; [`simulation::Simulation`]
//! owns the world and runs them in order.

pub mod builders;
pub mod components;
pub mod effects;
pub mod error;
pub mod events;
pub mod painters;
pub mod resources;
pub mod simulation;
pub mod systems;
