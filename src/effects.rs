//! Cross-generator frame effects.
//!
//! These run once per frame, before any generator layer, and read the
//! positions of everything in the render snapshot.

use crate::components::generator::{Generator, GeneratorKind};
use crate::painters::jitter;
use crate::resources::clock::Tick;
use crate::resources::framebuffer::{Canvas, Rgba};
use crate::resources::registry::FrameEffect;

/// Lines between every pair of movable items, labelled with their distance.
///
/// Closer pairs get fainter lines: alpha is `distance / canvas_width` mapped
/// to `[0, 100]` and halved. While either end of a pair is very young or
/// about to die, the alpha jitters.
#[derive(Clone, Copy, Debug)]
pub struct ProximityLines {
    pub canvas_width: f32,
}

impl ProximityLines {
    pub fn new(canvas_width: f32) -> Self {
        ProximityLines { canvas_width }
    }

    fn base_alpha(&self, distance: f32) -> f32 {
        if self.canvas_width <= 0.0 {
            return 0.0;
        }
        (distance / self.canvas_width * 100.0).round() / 2.0
    }
}

fn is_unsettled(generator: &Generator, now: Tick) -> bool {
    let life = generator.remaining_percent(now);
    !(10.0..=90.0).contains(&life)
}

impl FrameEffect for ProximityLines {
    fn apply(&self, snapshot: &[&Generator], now: Tick, canvas: &mut dyn Canvas) {
        let items: Vec<_> = snapshot
            .iter()
            .filter(|g| g.kind() == GeneratorKind::Item)
            .filter_map(|g| g.position(now).map(|p| (*g, p)))
            .collect();

        for (i, (a, pa)) in items.iter().enumerate() {
            for (b, pb) in items.iter().skip(i + 1) {
                let distance = pa.distance(*pb);
                let mut alpha = self.base_alpha(distance);
                if is_unsettled(a, now) || is_unsettled(b, now) {
                    alpha *= jitter(now, a.id().0 ^ b.id().0);
                }

                canvas.stroke(Rgba::white(alpha));
                canvas.line(*pa, *pb);

                canvas.no_stroke();
                canvas.fill(Rgba::white(alpha));
                canvas.text(&format!("{}", distance.round()), pa.midpoint(*pb), 8.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::coordinates::Coordinates;
    use crate::components::generator::GeneratorId;
    use crate::components::lifetime::LifetimeManager;
    use crate::components::movement::MovementManager;
    use crate::resources::framebuffer::{DrawCommand, FrameBuffer};

    fn item(id: u64, x: f32) -> Generator {
        Generator::new(
            GeneratorId(id),
            GeneratorKind::Item,
            LifetimeManager::new(0, 100).unwrap(),
        )
        .with_movement(MovementManager::fixed(0, Coordinates::new(x, 0.0)))
    }

    fn lines(fb: &FrameBuffer) -> usize {
        fb.commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    #[test]
    fn one_line_per_pair_of_movable_items() {
        let a = item(1, 0.0);
        let b = item(2, 100.0);
        let c = item(3, 200.0);
        let backdrop = Generator::new(
            GeneratorId(4),
            GeneratorKind::DotGrid,
            LifetimeManager::permanent(0),
        );
        let snapshot = vec![&a, &b, &c, &backdrop];

        let mut fb = FrameBuffer::new();
        ProximityLines::new(1000.0).apply(&snapshot, 50, &mut fb);
        assert_eq!(lines(&fb), 3);
    }

    #[test]
    fn alpha_grows_with_distance() {
        let effect = ProximityLines::new(1000.0);
        assert_eq!(effect.base_alpha(0.0), 0.0);
        assert_eq!(effect.base_alpha(500.0), 25.0);
        assert_eq!(effect.base_alpha(1000.0), 50.0);
        assert_eq!(ProximityLines::new(0.0).base_alpha(10.0), 0.0);
    }

    #[test]
    fn label_shows_rounded_distance_at_midpoint() {
        let a = item(1, 0.0);
        let b = item(2, 30.0);
        let mut fb = FrameBuffer::new();
        ProximityLines::new(1000.0).apply(&[&a, &b], 50, &mut fb);
        assert!(fb.commands().contains(&DrawCommand::Text {
            text: "30".to_string(),
            at: Coordinates::new(15.0, 0.0),
            size: 8.0,
        }));
    }
}
