//! Per-generator state.
//!
//! Everything a single generator owns: where it is, how long it lives and
//! how it draws itself. None of these types know about the registry or the
//! clock resource; they are handed the current tick by whoever asks.
//!
//! Submodules overview:
//! - [`coordinates`] – 2D canvas position and interpolation helpers
//! - [`generator`] – the generator itself: id, kind, managers and draw layers
//! - [`lifetime`] – birth, lifespan and the exactly-once death notification
//! - [`movement`] – straight-line travel between two points over a tick span

pub mod coordinates;
pub mod generator;
pub mod lifetime;
pub mod movement;
