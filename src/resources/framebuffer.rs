//! Draw context handed to painters, and a recording implementation of it.
//!
//! The simulation never talks to a real graphics API. Painters draw through
//! the [`Canvas`] trait; [`FrameBuffer`] records every call as a
//! [`DrawCommand`] so a backend (or a test) can replay or inspect the frame.
//! The recorded frame serializes to JSON with `serde_json`.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::components::coordinates::Coordinates;

/// 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    /// White with the given alpha, clamped to `[0, 255]`.
    pub fn white(alpha: f32) -> Self {
        Self::gray(255, alpha)
    }

    pub fn gray(level: u8, alpha: f32) -> Self {
        let a = alpha.round().clamp(0.0, 255.0) as u8;
        Rgba::new(level, level, level, a)
    }
}

/// Drawing surface used by generator draw callbacks.
///
/// Stroke and fill are sticky state, like most immediate-mode 2D APIs.
pub trait Canvas {
    /// Called by the compositor before the callbacks of each layer run.
    fn begin_layer(&mut self, layer: usize);
    fn stroke(&mut self, color: Rgba);
    fn no_stroke(&mut self);
    fn fill(&mut self, color: Rgba);
    fn no_fill(&mut self);
    fn point(&mut self, at: Coordinates);
    fn line(&mut self, from: Coordinates, to: Coordinates);
    fn circle(&mut self, center: Coordinates, diameter: f32);
    fn rect(&mut self, top_left: Coordinates, width: f32, height: f32);
    fn triangle(&mut self, a: Coordinates, b: Coordinates, c: Coordinates);
    fn text(&mut self, text: &str, at: Coordinates, size: f32);
}

/// One recorded canvas call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    BeginLayer { layer: usize },
    Stroke { color: Rgba },
    NoStroke,
    Fill { color: Rgba },
    NoFill,
    Point { at: Coordinates },
    Line { from: Coordinates, to: Coordinates },
    Circle { center: Coordinates, diameter: f32 },
    Rect { top_left: Coordinates, width: f32, height: f32 },
    Triangle { a: Coordinates, b: Coordinates, c: Coordinates },
    Text { text: String, at: Coordinates, size: f32 },
}

impl DrawCommand {
    /// True for commands that put pixels on screen (not state changes).
    pub fn is_primitive(&self) -> bool {
        !matches!(
            self,
            DrawCommand::BeginLayer { .. }
                | DrawCommand::Stroke { .. }
                | DrawCommand::NoStroke
                | DrawCommand::Fill { .. }
                | DrawCommand::NoFill
        )
    }
}

/// Headless canvas that records the current frame.
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct FrameBuffer {
    /// Tick the recorded frame belongs to.
    pub tick: u64,
    commands: Vec<DrawCommand>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous frame and start recording for `tick`.
    pub fn clear(&mut self, tick: u64) {
        self.tick = tick;
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn primitive_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_primitive()).count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Canvas for FrameBuffer {
    fn begin_layer(&mut self, layer: usize) {
        self.commands.push(DrawCommand::BeginLayer { layer });
    }

    fn stroke(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Stroke { color });
    }

    fn no_stroke(&mut self) {
        self.commands.push(DrawCommand::NoStroke);
    }

    fn fill(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Fill { color });
    }

    fn no_fill(&mut self) {
        self.commands.push(DrawCommand::NoFill);
    }

    fn point(&mut self, at: Coordinates) {
        self.commands.push(DrawCommand::Point { at });
    }

    fn line(&mut self, from: Coordinates, to: Coordinates) {
        self.commands.push(DrawCommand::Line { from, to });
    }

    fn circle(&mut self, center: Coordinates, diameter: f32) {
        self.commands.push(DrawCommand::Circle { center, diameter });
    }

    fn rect(&mut self, top_left: Coordinates, width: f32, height: f32) {
        self.commands.push(DrawCommand::Rect {
            top_left,
            width,
            height,
        });
    }

    fn triangle(&mut self, a: Coordinates, b: Coordinates, c: Coordinates) {
        self.commands.push(DrawCommand::Triangle { a, b, c });
    }

    fn text(&mut self, text: &str, at: Coordinates, size: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            size,
        });
    }
}
