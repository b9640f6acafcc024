//! Per-tick systems.
//!
//! Each submodule holds one phase of the tick. The phases are chained in
//! [`crate::simulation::tick_schedule`]; their order matters and is part of
//! the contract (spawn before render, render before deaths).
//!
//! Submodules overview
//! - [`time`] – advance the clock
//! - [`spawn`] – build and insert the items due this tick
//! - [`render`] – compose the frame from the registry
//! - [`lifetime`] – evaluate lifetimes, then drop dead generators
//! - [`lifecycle`] – run condition that stops every phase after teardown

pub mod lifecycle;
pub mod lifetime;
pub mod render;
pub mod spawn;
pub mod time;
