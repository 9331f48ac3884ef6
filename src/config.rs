//! Outline extraction settings.
//!
//! Settings are plain serde structs so presets can be stored next to the
//! sprite sheets they apply to.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::OutlineError;

/// Which boundary cycles of a region are reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContourMode {
    /// Only the outer boundary of each region. Enclosed holes are ignored.
    #[default]
    Outer,
    /// The outer boundary followed by one outline per enclosed hole.
    All,
}

/// Options controlling how opaque regions are found and traced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// A pixel is opaque when its alpha is strictly greater than this value.
    pub alpha_threshold: u8,
    pub contours: ContourMode,
    /// Process sprites of a batch on the rayon thread pool.
    pub parallel: bool,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: 0,
            contours: ContourMode::Outer,
            parallel: true,
        }
    }
}

impl OutlineConfig {
    pub fn with_contours(mut self, contours: ContourMode) -> Self {
        self.contours = contours;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Parse settings from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, OutlineError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Load settings from a JSON file.
pub fn load_config(path: &Path) -> Result<OutlineConfig, OutlineError> {
    let data = fs::read_to_string(path).map_err(|source| OutlineError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    OutlineConfig::from_json(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = OutlineConfig::from_json("{}").unwrap();
        assert_eq!(config, OutlineConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config = OutlineConfig::from_json(r#"{"contours": "all", "alpha_threshold": 8}"#).unwrap();
        assert_eq!(config.contours, ContourMode::All);
        assert_eq!(config.alpha_threshold, 8);
        assert!(config.parallel);
    }

    #[test]
    fn test_invalid_json() {
        let err = OutlineConfig::from_json(r#"{"contours": "inner"}"#).unwrap_err();
        assert!(matches!(err, OutlineError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/pixel_outline.json")).unwrap_err();
        assert!(matches!(err, OutlineError::ConfigRead { .. }));
    }

    #[test]
    fn test_round_trip() {
        let config = OutlineConfig::default()
            .with_contours(ContourMode::All)
            .with_parallel(false);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(OutlineConfig::from_json(&json).unwrap(), config);
    }
}
