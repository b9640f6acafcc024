//! Simulation configuration resource.
//!
//! Settings are loaded from an INI file. Every value has a safe default so
//! the simulation can start without a file, and missing keys keep their
//! current value.
//!
//! # Configuration File Format
//!
//! ```ini
//! [clock]
//! fps = 60
//!
//! [canvas]
//! width = 1280
//! height = 720
//!
//! [grid]
//! columns = 8
//! rows = 8
//! unit = 8
//!
//! [spawn]
//! cycle_seconds = 5
//! mover_interval_seconds = 0.5
//! mover_count = 3
//! mover_life_seconds = 2
//! slow_mover_interval_seconds = 1
//! slow_mover_count = 2
//! slow_mover_life_seconds = 4
//! flicker_interval_seconds = 0.14
//! flicker_life_seconds = 0.5
//!
//! [render]
//! layer_depth = 32
//! proximity_lines = true
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::error::SimError;

const DEFAULT_FPS: u32 = 60;
const DEFAULT_CANVAS_WIDTH: u32 = 1280;
const DEFAULT_CANVAS_HEIGHT: u32 = 720;
const DEFAULT_GRID_COLUMNS: u32 = 8;
const DEFAULT_GRID_ROWS: u32 = 8;
const DEFAULT_GRID_UNIT: f32 = 8.0;
const DEFAULT_CYCLE_SECONDS: f32 = 5.0;
const DEFAULT_MOVER_INTERVAL_SECONDS: f32 = 0.5;
const DEFAULT_MOVER_COUNT: u32 = 3;
const DEFAULT_MOVER_LIFE_SECONDS: f32 = 2.0;
const DEFAULT_SLOW_MOVER_INTERVAL_SECONDS: f32 = 1.0;
const DEFAULT_SLOW_MOVER_COUNT: u32 = 2;
const DEFAULT_SLOW_MOVER_LIFE_SECONDS: f32 = 4.0;
const DEFAULT_FLICKER_INTERVAL_SECONDS: f32 = 0.14;
const DEFAULT_FLICKER_LIFE_SECONDS: f32 = 0.5;
const DEFAULT_LAYER_DEPTH: usize = 32;
const DEFAULT_PROXIMITY_LINES: bool = true;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Simulation configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Ticks per real-time second.
    pub fps: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub grid_columns: u32,
    pub grid_rows: u32,
    /// Base drawing unit. Grid spacing is a multiple of it.
    pub grid_unit: f32,
    /// Length of one spawn cycle; the spawn plan restarts at each cycle.
    pub cycle_seconds: f32,
    pub mover_interval_seconds: f32,
    pub mover_count: u32,
    pub mover_life_seconds: f32,
    pub slow_mover_interval_seconds: f32,
    pub slow_mover_count: u32,
    pub slow_mover_life_seconds: f32,
    pub flicker_interval_seconds: f32,
    pub flicker_life_seconds: f32,
    /// Highest number of draw layers composited per frame.
    pub layer_depth: usize,
    /// Draw distance lines between items.
    pub proximity_lines: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    /// Create a configuration with safe default values.
    pub fn new() -> Self {
        Self {
            fps: DEFAULT_FPS,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            grid_columns: DEFAULT_GRID_COLUMNS,
            grid_rows: DEFAULT_GRID_ROWS,
            grid_unit: DEFAULT_GRID_UNIT,
            cycle_seconds: DEFAULT_CYCLE_SECONDS,
            mover_interval_seconds: DEFAULT_MOVER_INTERVAL_SECONDS,
            mover_count: DEFAULT_MOVER_COUNT,
            mover_life_seconds: DEFAULT_MOVER_LIFE_SECONDS,
            slow_mover_interval_seconds: DEFAULT_SLOW_MOVER_INTERVAL_SECONDS,
            slow_mover_count: DEFAULT_SLOW_MOVER_COUNT,
            slow_mover_life_seconds: DEFAULT_SLOW_MOVER_LIFE_SECONDS,
            flicker_interval_seconds: DEFAULT_FLICKER_INTERVAL_SECONDS,
            flicker_life_seconds: DEFAULT_FLICKER_LIFE_SECONDS,
            layer_depth: DEFAULT_LAYER_DEPTH,
            proximity_lines: DEFAULT_PROXIMITY_LINES,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    fn file_error(&self, reason: impl Into<String>) -> SimError {
        SimError::ConfigFile {
            path: self.config_path.clone(),
            reason: reason.into(),
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values keep their current value. Values that fail to parse
    /// are skipped with a warning.
    pub fn load_from_file(&mut self) -> Result<(), SimError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| self.file_error(e))?;

        // [clock] section
        if let Some(fps) = read_count(&config, "clock", "fps") {
            self.fps = fps;
        }

        // [canvas] section
        if let Some(width) = read_count(&config, "canvas", "width") {
            self.canvas_width = width;
        }
        if let Some(height) = read_count(&config, "canvas", "height") {
            self.canvas_height = height;
        }

        // [grid] section
        if let Some(columns) = read_count(&config, "grid", "columns") {
            self.grid_columns = columns;
        }
        if let Some(rows) = read_count(&config, "grid", "rows") {
            self.grid_rows = rows;
        }
        if let Some(unit) = read_float(&config, "grid", "unit") {
            self.grid_unit = unit as f32;
        }

        // [spawn] section
        let seconds = [
            ("cycle_seconds", &mut self.cycle_seconds),
            ("mover_interval_seconds", &mut self.mover_interval_seconds),
            ("mover_life_seconds", &mut self.mover_life_seconds),
            (
                "slow_mover_interval_seconds",
                &mut self.slow_mover_interval_seconds,
            ),
            ("slow_mover_life_seconds", &mut self.slow_mover_life_seconds),
            ("flicker_interval_seconds", &mut self.flicker_interval_seconds),
            ("flicker_life_seconds", &mut self.flicker_life_seconds),
        ];
        for (key, slot) in seconds {
            if let Some(value) = read_float(&config, "spawn", key) {
                *slot = value as f32;
            }
        }
        if let Some(count) = read_count(&config, "spawn", "mover_count") {
            self.mover_count = count;
        }
        if let Some(count) = read_count(&config, "spawn", "slow_mover_count") {
            self.slow_mover_count = count;
        }

        // [render] section
        if let Some(depth) = read_count(&config, "render", "layer_depth") {
            self.layer_depth = depth;
        }
        if let Some(lines) = read_bool(&config, "render", "proximity_lines") {
            self.proximity_lines = lines;
        }

        info!(
            "Loaded config: {}x{} canvas, fps={}, grid={}x{} unit={}, cycle={}s",
            self.canvas_width,
            self.canvas_height,
            self.fps,
            self.grid_columns,
            self.grid_rows,
            self.grid_unit,
            self.cycle_seconds
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), SimError> {
        let mut config = Ini::new();

        config.set("clock", "fps", Some(self.fps.to_string()));

        config.set("canvas", "width", Some(self.canvas_width.to_string()));
        config.set("canvas", "height", Some(self.canvas_height.to_string()));

        config.set("grid", "columns", Some(self.grid_columns.to_string()));
        config.set("grid", "rows", Some(self.grid_rows.to_string()));
        config.set("grid", "unit", Some(self.grid_unit.to_string()));

        let spawn = [
            ("cycle_seconds", self.cycle_seconds.to_string()),
            (
                "mover_interval_seconds",
                self.mover_interval_seconds.to_string(),
            ),
            ("mover_count", self.mover_count.to_string()),
            ("mover_life_seconds", self.mover_life_seconds.to_string()),
            (
                "slow_mover_interval_seconds",
                self.slow_mover_interval_seconds.to_string(),
            ),
            ("slow_mover_count", self.slow_mover_count.to_string()),
            (
                "slow_mover_life_seconds",
                self.slow_mover_life_seconds.to_string(),
            ),
            (
                "flicker_interval_seconds",
                self.flicker_interval_seconds.to_string(),
            ),
            ("flicker_life_seconds", self.flicker_life_seconds.to_string()),
        ];
        for (key, value) in spawn {
            config.set("spawn", key, Some(value));
        }

        config.set("render", "layer_depth", Some(self.layer_depth.to_string()));
        config.set(
            "render",
            "proximity_lines",
            Some(self.proximity_lines.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| self.file_error(e.to_string()))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Check that the values describe a runnable simulation.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.fps == 0 {
            return Err(SimError::config("fps must be greater than zero"));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(SimError::config(format!(
                "canvas must not be empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.grid_columns == 0 || self.grid_rows == 0 {
            return Err(SimError::config(format!(
                "grid needs at least one column and one row, got {}x{}",
                self.grid_columns, self.grid_rows
            )));
        }
        if !self.grid_unit.is_finite() || self.grid_unit <= 0.0 {
            return Err(SimError::config(format!(
                "grid unit must be positive, got {}",
                self.grid_unit
            )));
        }
        let seconds = [
            ("cycle_seconds", self.cycle_seconds),
            ("mover_interval_seconds", self.mover_interval_seconds),
            ("mover_life_seconds", self.mover_life_seconds),
            (
                "slow_mover_interval_seconds",
                self.slow_mover_interval_seconds,
            ),
            ("slow_mover_life_seconds", self.slow_mover_life_seconds),
            ("flicker_interval_seconds", self.flicker_interval_seconds),
            ("flicker_life_seconds", self.flicker_life_seconds),
        ];
        for (key, value) in seconds {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::config(format!(
                    "{key} must be a non-negative number of seconds, got {value}"
                )));
            }
        }
        if self.layer_depth == 0 {
            return Err(SimError::config("layer_depth must be greater than zero"));
        }
        Ok(())
    }

    /// Set canvas size.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }
}

/// Read an unsigned integer that must fit in `T`. Out of range values are
/// skipped like malformed ones, never truncated.
fn read_count<T: TryFrom<u64>>(config: &Ini, section: &str, key: &str) -> Option<T> {
    let value = config.getuint(section, key).unwrap_or_else(|e| {
        warn!("Ignoring [{}] {}: {}", section, key, e);
        None
    })?;
    T::try_from(value)
        .inspect_err(|_| warn!("Ignoring [{}] {}: {} is out of range", section, key, value))
        .ok()
}

fn read_float(config: &Ini, section: &str, key: &str) -> Option<f64> {
    config.getfloat(section, key).unwrap_or_else(|e| {
        warn!("Ignoring [{}] {}: {}", section, key, e);
        None
    })
}

fn read_bool(config: &Ini, section: &str, key: &str) -> Option<bool> {
    config.getbool(section, key).unwrap_or_else(|e| {
        warn!("Ignoring [{}] {}: {}", section, key, e);
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("polyterative_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(format!("{}-{}.ini", name, std::process::id()))
    }

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.canvas_size(), (1280, 720));
        assert_eq!(config.config_path, PathBuf::from("./config.ini"));
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let path = temp_path("partial");
        std::fs::write(
            &path,
            "[clock]\nfps = 30\n\n[spawn]\nmover_life_seconds = 1.5\n\n[render]\nproximity_lines = false\n",
        )
        .unwrap();

        let mut config = SimConfig::with_path(&path);
        config.load_from_file().unwrap();
        assert_eq!(config.fps, 30);
        assert!(approx_eq(config.mover_life_seconds, 1.5));
        assert!(!config.proximity_lines);
        assert_eq!(config.grid_columns, 8);
        assert!(approx_eq(config.cycle_seconds, 5.0));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn malformed_values_are_skipped() {
        let path = temp_path("malformed");
        std::fs::write(&path, "[grid]\ncolumns = many\nrows = 3\n").unwrap();

        let mut config = SimConfig::with_path(&path);
        config.load_from_file().unwrap();
        assert_eq!(config.grid_columns, 8);
        assert_eq!(config.grid_rows, 3);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn out_of_range_counts_are_skipped() {
        let path = temp_path("overflow");
        std::fs::write(
            &path,
            "[grid]\ncolumns = 4294967297\nrows = 5\n\n[spawn]\nmover_count = 4294967296\n",
        )
        .unwrap();

        let mut config = SimConfig::with_path(&path);
        config.load_from_file().unwrap();
        assert_eq!(config.grid_columns, 8);
        assert_eq!(config.grid_rows, 5);
        assert_eq!(config.mover_count, SimConfig::new().mover_count);
        assert!(config.validate().is_ok());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn save_then_load_keeps_values() {
        let path = temp_path("saved");
        let mut config = SimConfig::with_path(&path);
        config.set_canvas_size(640, 360);
        config.flicker_interval_seconds = 0.25;
        config.layer_depth = 4;
        config.save_to_file().unwrap();

        let mut loaded = SimConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_reports_path() {
        let path = temp_path("does-not-exist");
        std::fs::remove_file(&path).ok();
        let mut config = SimConfig::with_path(&path);
        match config.load_from_file() {
            Err(SimError::ConfigFile { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_degenerate_values() {
        let mut config = SimConfig::new();
        config.fps = 0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::new();
        config.grid_rows = 0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::new();
        config.grid_unit = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = SimConfig::new();
        config.flicker_life_seconds = -1.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::new();
        config.set_canvas_size(0, 10);
        assert!(config.validate().is_err());
    }
}
