//! Game configuration
//!
//! A single RON file, every field optional:
//!
//! ```ron
//! (
//!     settle_delay_ms: 500,
//!     initial_unlocked: 3,
//!     catalog_path: Some("my_levels.ron"),
//!     log_filter: "debug",
//! )
//! ```
//!
//! Lookup order: `$DOT_CONNECT_CONFIG`, `./dot-connect.ron`, then the
//! platform config dir (`<config_dir>/dot-connect-3d/config.ron`).

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::game::{CameraTransform, DEFAULT_INITIAL_UNLOCKED, LevelSession};
use crate::math::Vec3;

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV_VAR: &str = "DOT_CONNECT_CONFIG";
/// Config file name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "dot-connect.ron";

/// Accepted ranges for numeric settings; values outside are replaced on load
pub mod limits {
    /// Field of view range (degrees), keeps `tan(fov / 2)` finite and positive
    pub const MIN_FOV_DEGREES: f32 = 10.0;
    pub const MAX_FOV_DEGREES: f32 = 170.0;
    /// Largest dot radius (world units)
    pub const MAX_DOT_RADIUS: f32 = 1.0;
    /// At least one level must be playable
    pub const MIN_INITIAL_UNLOCKED: usize = 1;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Pause between the completing connection and the level-complete event
    pub settle_delay_ms: u64,
    /// Levels unlocked at startup (first N in catalog order)
    pub initial_unlocked: usize,
    /// Custom catalog file replacing the built-in levels
    pub catalog_path: Option<PathBuf>,
    /// Dot sphere radius (world units); clicks pick within a slightly larger sphere
    pub dot_radius: f32,
    /// Vertical field of view
    pub fov_degrees: f32,
    /// Camera position before any level framing (looks at the origin)
    pub default_camera: Vec3,
    /// tracing filter directive, overridden by RUST_LOG
    pub log_filter: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: (LevelSession::DEFAULT_SETTLE_DELAY * 1000.0) as u64,
            initial_unlocked: DEFAULT_INITIAL_UNLOCKED,
            catalog_path: None,
            dot_radius: 0.04,
            fov_degrees: 75.0,
            default_camera: CameraTransform::default().position,
            log_filter: "info".to_string(),
        }
    }
}

impl GameConfig {
    /// Load a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse config text. Out-of-range values are corrected, see [`GameConfig::sanitized`].
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        Ok(config.sanitized())
    }

    /// Replace settings the game cannot run with, logging each fix
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.initial_unlocked < limits::MIN_INITIAL_UNLOCKED {
            tracing::warn!(
                "initial_unlocked {} leaves no playable level, using {}",
                self.initial_unlocked, limits::MIN_INITIAL_UNLOCKED
            );
            self.initial_unlocked = limits::MIN_INITIAL_UNLOCKED;
        }

        if !self.fov_degrees.is_finite() {
            tracing::warn!("fov_degrees {} is not a number, using {}", self.fov_degrees, defaults.fov_degrees);
            self.fov_degrees = defaults.fov_degrees;
        } else if !(limits::MIN_FOV_DEGREES..=limits::MAX_FOV_DEGREES).contains(&self.fov_degrees) {
            let clamped = self.fov_degrees.clamp(limits::MIN_FOV_DEGREES, limits::MAX_FOV_DEGREES);
            tracing::warn!("fov_degrees {} out of range, using {}", self.fov_degrees, clamped);
            self.fov_degrees = clamped;
        }

        if !self.dot_radius.is_finite() || self.dot_radius <= 0.0 {
            tracing::warn!("dot_radius {} must be positive, using {}", self.dot_radius, defaults.dot_radius);
            self.dot_radius = defaults.dot_radius;
        } else if self.dot_radius > limits::MAX_DOT_RADIUS {
            tracing::warn!("dot_radius {} too large, using {}", self.dot_radius, limits::MAX_DOT_RADIUS);
            self.dot_radius = limits::MAX_DOT_RADIUS;
        }

        if !self.default_camera.is_finite() || self.default_camera.len() <= f32::EPSILON {
            tracing::warn!("default_camera cannot look at the origin, using the default position");
            self.default_camera = defaults.default_camera;
        }

        self
    }

    /// Candidate config paths, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
            paths.push(PathBuf::from(explicit));
        }
        paths.push(PathBuf::from(LOCAL_CONFIG_FILE));
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(dir) = dirs::config_dir() {
                paths.push(dir.join("dot-connect-3d").join("config.ron"));
            }
        }
        paths
    }

    /// Load the first config file that exists in `paths`.
    /// Missing files fall back to defaults; a broken file is reported and skipped.
    pub fn discover_in(paths: &[PathBuf]) -> Self {
        for path in paths {
            if !path.is_file() {
                continue;
            }
            match Self::load(path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Ignoring config {}: {}", path.display(), e);
                }
            }
        }
        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    pub fn discover() -> Self {
        Self::discover_in(&Self::search_paths())
    }

    pub fn settle_delay_secs(&self) -> f64 {
        self.settle_delay_ms as f64 / 1000.0
    }

    pub fn initial_camera(&self) -> CameraTransform {
        CameraTransform::looking_at_origin(self.default_camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.settle_delay_ms, 500);
        assert_eq!(config.initial_unlocked, 3);
        assert!((config.settle_delay_secs() - 0.5).abs() < 1e-9);
        assert_eq!(config.initial_camera().target, Vec3::ZERO);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = GameConfig::parse("(settle_delay_ms: 250, catalog_path: Some(\"levels.ron\"))").unwrap();
        assert_eq!(config.settle_delay_ms, 250);
        assert_eq!(config.catalog_path, Some(PathBuf::from("levels.ron")));
        assert_eq!(config.initial_unlocked, 3);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_unusable_values_are_corrected() {
        let config = GameConfig::parse(
            "(initial_unlocked: 0, fov_degrees: 180.0, dot_radius: -0.5, default_camera: (x: 0.0, y: 0.0, z: 0.0))"
        ).unwrap();
        assert_eq!(config.initial_unlocked, 1);
        assert_eq!(config.fov_degrees, limits::MAX_FOV_DEGREES);
        assert_eq!(config.dot_radius, GameConfig::default().dot_radius);
        assert_eq!(config.default_camera, GameConfig::default().default_camera);

        let config = GameConfig::parse("(fov_degrees: 0.0, dot_radius: 0.0)").unwrap();
        assert_eq!(config.fov_degrees, limits::MIN_FOV_DEGREES);
        assert_eq!(config.dot_radius, GameConfig::default().dot_radius);
        assert!((config.fov_degrees.to_radians() * 0.5).tan() > 0.0);
    }

    #[test]
    fn test_valid_values_pass_through() {
        let config = GameConfig::parse("(initial_unlocked: 1, fov_degrees: 60.0, dot_radius: 0.1)").unwrap();
        assert_eq!(config.initial_unlocked, 1);
        assert_eq!(config.fov_degrees, 60.0);
        assert_eq!(config.dot_radius, 0.1);
        assert_eq!(GameConfig::default().sanitized(), GameConfig::default());
    }

    #[test]
    fn test_discover_sanitizes_loaded_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        fs::write(&path, "(initial_unlocked: 0)").unwrap();

        let config = GameConfig::discover_in(&[path]);
        assert_eq!(config.initial_unlocked, 1);
    }

    #[test]
    fn test_discover_picks_first_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.ron");
        let broken = dir.path().join("broken.ron");
        let good = dir.path().join("good.ron");
        fs::write(&broken, "(settle_delay_ms: ").unwrap();
        fs::write(&good, "(initial_unlocked: 9)").unwrap();

        let config = GameConfig::discover_in(&[missing, broken, good]);
        assert_eq!(config.initial_unlocked, 9);
    }

    #[test]
    fn test_discover_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::discover_in(&[dir.path().join("none.ron")]);
        assert_eq!(config, GameConfig::default());
    }
}
