//! Notifications exchanged between generators and the registry.
//!
//! Submodules:
//! - [`death`] – death notices posted by lifetimes and drained by the registry
pub mod death;
