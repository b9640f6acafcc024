//! Generator builders.
//!
//! Builders turn a description of what to draw into a ready-to-insert
//! [`Generator`](crate::components::generator::Generator), with its
//! lifetime subscribed to the registry's death channel.
//!
//! - [`item`] – short-lived shapes spawned by the scheduler
//! - [`dotgrid`] – permanent backdrop drawn from the coordinate grid

pub mod dotgrid;
pub mod item;
