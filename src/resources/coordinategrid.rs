//! Lattice of spawn positions.
//!
//! The grid is a pure function of its [`GridParams`]: `columns × rows`
//! points spaced `unit × GRID_SPACING_MULTIPLIER` apart and centered on the
//! origin (normally the canvas centre). It is rebuilt from scratch on
//! resize; nothing ever mutates a point.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::components::coordinates::Coordinates;
use crate::error::SimError;

/// Distance between neighbouring points, in units.
pub const GRID_SPACING_MULTIPLIER: f32 = 8.0;

/// One lattice position. `column_id` / `row_id` identify it within the grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: f32,
    pub y: f32,
    pub column_id: u32,
    pub row_id: u32,
}

impl GridPoint {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.x, self.y)
    }

    pub fn cell(&self) -> (u32, u32) {
        (self.column_id, self.row_id)
    }
}

/// Inputs of [`build`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    pub columns: u32,
    pub rows: u32,
    pub origin: Coordinates,
    pub unit: f32,
}

/// Build the lattice described by the arguments.
///
/// Points are emitted column by column. Fails on an empty grid or a unit
/// that is not a positive finite number.
pub fn build(
    columns: u32,
    rows: u32,
    origin: Coordinates,
    unit: f32,
) -> Result<Vec<GridPoint>, SimError> {
    if columns == 0 || rows == 0 {
        return Err(SimError::config(format!(
            "grid needs at least one column and one row (got {columns}x{rows})"
        )));
    }
    if !unit.is_finite() || unit <= 0.0 {
        return Err(SimError::config(format!(
            "grid unit must be a positive number (got {unit})"
        )));
    }

    let spacing = unit * GRID_SPACING_MULTIPLIER;
    let width = columns as f32 * spacing;
    let height = rows as f32 * spacing;
    let left = origin.x - width / 2.0 + spacing / 2.0;
    let top = origin.y - height / 2.0 + spacing / 2.0;

    let mut points = Vec::with_capacity((columns * rows) as usize);
    for column_id in 0..columns {
        for row_id in 0..rows {
            points.push(GridPoint {
                x: left + column_id as f32 * spacing,
                y: top + row_id as f32 * spacing,
                column_id,
                row_id,
            });
        }
    }
    Ok(points)
}

/// Current grid snapshot, shared with the spawner and backdrop painters.
#[derive(Resource, Clone, Debug)]
pub struct CoordinateGrid {
    params: GridParams,
    points: Vec<GridPoint>,
}

impl CoordinateGrid {
    pub fn new(params: GridParams) -> Result<Self, SimError> {
        let points = build(params.columns, params.rows, params.origin, params.unit)?;
        Ok(CoordinateGrid { params, points })
    }

    pub fn params(&self) -> GridParams {
        self.params
    }

    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// Top-left-most point.
    pub fn first(&self) -> GridPoint {
        self.points[0]
    }

    /// Bottom-right-most point.
    pub fn last(&self) -> GridPoint {
        self.points[self.points.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn three_by_two_is_symmetric_about_origin() {
        let points = build(3, 2, Coordinates::new(0.0, 0.0), 1.0).unwrap();
        assert_eq!(points.len(), 6);

        let cells: FxHashSet<(u32, u32)> = points.iter().map(|p| p.cell()).collect();
        assert_eq!(cells.len(), 6);

        let sum_x: f32 = points.iter().map(|p| p.x).sum();
        let sum_y: f32 = points.iter().map(|p| p.y).sum();
        assert!(sum_x.abs() < EPSILON);
        assert!(sum_y.abs() < EPSILON);

        // every point has a mirror image through the origin
        for p in &points {
            assert!(
                points
                    .iter()
                    .any(|q| (q.x + p.x).abs() < EPSILON && (q.y + p.y).abs() < EPSILON)
            );
        }
    }

    #[test]
    fn spacing_is_unit_times_multiplier() {
        let points = build(2, 1, Coordinates::new(100.0, 50.0), 8.0).unwrap();
        assert!((points[1].x - points[0].x - 64.0).abs() < EPSILON);
        assert!((points[0].x - 68.0).abs() < EPSILON);
        assert!((points[0].y - 50.0).abs() < EPSILON);
    }

    #[test]
    fn empty_grid_is_a_configuration_error() {
        assert!(build(0, 4, Coordinates::default(), 1.0).is_err());
        assert!(build(4, 0, Coordinates::default(), 1.0).is_err());
        assert!(build(4, 4, Coordinates::default(), 0.0).is_err());
        assert!(build(4, 4, Coordinates::default(), f32::NAN).is_err());
    }

    #[test]
    fn build_is_deterministic() {
        let a = build(8, 8, Coordinates::new(640.0, 360.0), 8.0).unwrap();
        let b = build(8, 8, Coordinates::new(640.0, 360.0), 8.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bounds_are_first_and_last_points() {
        let grid = CoordinateGrid::new(GridParams {
            columns: 4,
            rows: 3,
            origin: Coordinates::default(),
            unit: 1.0,
        })
        .unwrap();
        assert_eq!(grid.first().cell(), (0, 0));
        assert_eq!(grid.last().cell(), (3, 2));
        assert!(grid.first().x < grid.last().x);
        assert!(grid.first().y < grid.last().y);
    }
}
