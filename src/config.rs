//! Render defaults loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::colors::{self, Color};
use crate::error::Result;

/// Tunables shared by a whole frame.
///
/// ```ignore
/// let config = RenderConfig::from_json(r#"{ "flatness_threshold": 4.0 }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Largest screen-space bounding box, in pixels along both axes, that a
    /// Bezier leaf may cover before it is drawn flat.
    pub flatness_threshold: f32,
    /// Division budget for Bezier curves.
    pub curve_divisions: u32,
    /// Division budget for Bezier surfaces.
    pub surface_divisions: u32,
    pub background: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            flatness_threshold: 10.0,
            curve_divisions: 16,
            surface_divisions: 16,
            background: colors::BLACK,
        }
    }
}

impl RenderConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
