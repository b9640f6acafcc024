//! Shape painters used by generator draw callbacks.
//!
//! Painters are plain functions over a [`Canvas`]. Timing and lifetime
//! logic lives in the generators that call them. Per-frame noise comes from
//! [`jitter`], a hash of the tick and a salt, so a frame is a pure function
//! of the clock.

use crate::components::coordinates::Coordinates;
use crate::components::lifetime::LifetimeManager;
use crate::resources::clock::Tick;
use crate::resources::framebuffer::{Canvas, Rgba};

/// Below this remaining-life percentage strokes start to flicker.
pub const FLICKER_THRESHOLD_PERCENT: f32 = 5.0;

/// Signature shared by the item shape painters.
pub type ShapePainter = fn(&mut dyn Canvas, Coordinates, f32);

/// Pseudo-random value in `[0, 1)` derived from `tick` and `salt`.
pub fn jitter(tick: Tick, salt: u64) -> f32 {
    // splitmix64 finalizer
    let mut z = tick
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(salt.rotate_left(17));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 40) as f32 / (1u64 << 24) as f32
}

/// Slow periodic alpha pulse in `[0, amplitude]`.
pub fn flicker_alpha(tick: Tick, phase: u64, amplitude: f32, period: u64) -> f32 {
    if period == 0 {
        return amplitude;
    }
    let t = (tick.wrapping_add(phase) % period) as f32 / period as f32;
    amplitude * 0.5 * (1.0 - (t * std::f32::consts::TAU).cos())
}

pub fn draw_x(canvas: &mut dyn Canvas, at: Coordinates, unit: f32) {
    canvas.line(
        Coordinates::new(at.x - unit, at.y - unit),
        Coordinates::new(at.x + unit, at.y + unit),
    );
    canvas.line(
        Coordinates::new(at.x + unit, at.y - unit),
        Coordinates::new(at.x - unit, at.y + unit),
    );
}

pub fn draw_small_x(canvas: &mut dyn Canvas, at: Coordinates, unit: f32) {
    draw_x(canvas, at, unit / 4.0);
}

/// Triangle with its apex up.
pub fn draw_triangle(canvas: &mut dyn Canvas, at: Coordinates, unit: f32) {
    canvas.triangle(
        Coordinates::new(at.x - unit, at.y + unit),
        Coordinates::new(at.x, at.y - unit),
        Coordinates::new(at.x + unit, at.y + unit),
    );
}

pub fn draw_circle(canvas: &mut dyn Canvas, at: Coordinates, unit: f32) {
    canvas.circle(at, unit * 2.0);
}

pub fn draw_box(canvas: &mut dyn Canvas, at: Coordinates, unit: f32) {
    canvas.rect(
        Coordinates::new(at.x - unit, at.y - unit),
        unit * 2.0,
        unit * 2.0,
    );
}

/// Cross marking where an item is heading.
pub fn draw_destination(canvas: &mut dyn Canvas, size: f32, target: Coordinates) {
    canvas.line(
        Coordinates::new(target.x - size, target.y),
        Coordinates::new(target.x + size, target.y),
    );
    canvas.line(
        Coordinates::new(target.x, target.y - size),
        Coordinates::new(target.x, target.y + size),
    );
}

/// Faint line from the current position to the target.
pub fn draw_arrow(canvas: &mut dyn Canvas, current: Coordinates, target: Coordinates) {
    canvas.stroke(Rgba::white(255.0 / 25.0));
    canvas.line(current, target);
}

pub fn weak_fill(canvas: &mut dyn Canvas) {
    canvas.fill(Rgba::white(255.0 / 10.0));
}

/// Rounded position printed next to the item.
pub fn draw_position_statistics(canvas: &mut dyn Canvas, current: Coordinates) {
    canvas.no_stroke();
    weak_fill(canvas);
    canvas.text(
        &format!("{},{}", current.x.round(), current.y.round()),
        current,
        12.0,
    );
}

/// Stroke whose alpha follows the remaining life.
///
/// Fades in while the life is fresh, then flickers as it runs out.
pub fn lifelike_stroke(canvas: &mut dyn Canvas, lifetime: &LifetimeManager, now: Tick, salt: u64) {
    let percent = lifetime.remaining_percent(now);
    let alpha = if percent < FLICKER_THRESHOLD_PERCENT {
        (jitter(now, salt) * (percent / FLICKER_THRESHOLD_PERCENT) * 255.0).floor()
    } else {
        255.0 - percent * 2.55
    };
    canvas.stroke(Rgba::white(alpha));
}
