//! Render system.
//!
//! Composes the frame for the current tick into the
//! [`FrameBuffer`](crate::resources::framebuffer::FrameBuffer). The registry
//! is only borrowed immutably here.
use bevy_ecs::prelude::*;

use crate::resources::clock::Clock;
use crate::resources::framebuffer::FrameBuffer;
use crate::resources::registry::Registry;

/// Clear the frame buffer and composite the registry into it.
pub fn render_system(clock: Res<Clock>, registry: Res<Registry>, mut frame: ResMut<FrameBuffer>) {
    let now = clock.now();
    frame.clear(now);
    registry.render_frame(now, &mut *frame);
}
