//! Resources held by the simulation world.
//!
//! This module groups the long-lived data inserted into the ECS world and
//! read or written by the per-tick systems.
//!
//! Overview
//! - `clock` – the shared tick counter and frame timing helpers
//! - `coordinategrid` – grid of spawn points centred on the canvas
//! - `framebuffer` – drawing surface trait and the recording frame buffer
//! - `lifecycle` – whether the simulation is still running
//! - `registry` – the live generator set and frame compositor
//! - `scheduler` – spawn cadences and the plan that combines them
//! - `simconfig` – INI-backed configuration
pub mod clock;
pub mod coordinategrid;
pub mod framebuffer;
pub mod lifecycle;
pub mod registry;
pub mod scheduler;
pub mod simconfig;
