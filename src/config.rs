//! Configuration loading for the navigation engine.

use crate::error::{NavError, Result};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub pathfinding: AStarSettings,
    #[serde(default)]
    pub parser: ParserSettings,
}

/// A* search settings
#[derive(Clone, Debug, Deserialize)]
pub struct AStarSettings {
    /// Grid step in plan units (default: 10.0, tuned to
    /// thousands-of-units plans)
    #[serde(default = "default_grid_step")]
    pub grid_step: f64,

    /// Cost multiplier for diagonal moves (default: sqrt(2))
    #[serde(default = "default_diagonal_cost")]
    pub diagonal_cost: f64,

    /// Maximum nodes to expand before giving up (default: 200000).
    /// Keeps a pathological obstacle layout from expanding the open
    /// set without bound.
    #[serde(default = "default_max_expansions")]
    pub max_expansions: usize,
}

/// Floor plan parser settings
#[derive(Clone, Debug, Deserialize)]
pub struct ParserSettings {
    /// Fraction of the plan's width/height treated as the edge band by
    /// the coordinate floor estimator (default: 0.15)
    #[serde(default = "default_edge_margin_ratio")]
    pub edge_margin_ratio: f64,
}

impl Default for AStarSettings {
    fn default() -> Self {
        Self {
            grid_step: default_grid_step(),
            diagonal_cost: default_diagonal_cost(),
            max_expansions: default_max_expansions(),
        }
    }
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            edge_margin_ratio: default_edge_margin_ratio(),
        }
    }
}

fn default_grid_step() -> f64 {
    10.0
}

fn default_diagonal_cost() -> f64 {
    std::f64::consts::SQRT_2
}

fn default_max_expansions() -> usize {
    200_000
}

fn default_edge_margin_ratio() -> f64 {
    0.15
}

impl NavConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NavError::Config(format!("Failed to read config file: {}", e)))?;
        let config: NavConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: NavConfig = toml::from_str("").unwrap();
        assert_eq!(config.pathfinding.grid_step, 10.0);
        assert_eq!(config.pathfinding.max_expansions, 200_000);
        assert_eq!(config.parser.edge_margin_ratio, 0.15);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: NavConfig = toml::from_str(
            r#"
            [pathfinding]
            grid_step = 5.0
            "#,
        )
        .unwrap();
        assert_eq!(config.pathfinding.grid_step, 5.0);
        assert_eq!(config.pathfinding.max_expansions, 200_000);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pathfinding]\nmax_expansions = 5000").unwrap();
        let config = NavConfig::load(file.path()).unwrap();
        assert_eq!(config.pathfinding.max_expansions, 5000);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pathfinding").unwrap();
        assert!(NavConfig::load(file.path()).is_err());
    }
}
