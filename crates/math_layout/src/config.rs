//! Layout configuration
//!
//! Session-wide layout policy. The configuration travels inside the rendering
//! context (`Env`); nothing here is process-global.

use crate::error::{LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Layout settings for one rendering session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Size of one em in points at text style
    pub font_size: f32,
    /// Allow breaks at every glue point, even in rows marked unbreakable
    pub break_everywhere: bool,
    /// Scale factor applied in script style
    pub script_scale: f32,
    /// Scale factor applied in script-script style
    pub script_script_scale: f32,
    /// Smallest kern (in em) that still produces a kern box
    pub kern_threshold: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            break_everywhere: false,
            script_scale: 0.7,
            script_script_scale: 0.5,
            kern_threshold: 1e-4,
        }
    }
}

impl LayoutConfig {
    /// Create a config for the given font size
    pub fn for_size(font_size: f32) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }

    pub fn with_break_everywhere(mut self, break_everywhere: bool) -> Self {
        self.break_everywhere = break_everywhere;
        self
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> LayoutResult<Self> {
        let config: LayoutConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, or return defaults if it doesn't exist or can't be parsed
    pub fn load(path: impl AsRef<Path>) -> LayoutResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match Self::from_json_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "Failed to parse layout config, using defaults: {}",
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save the config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> LayoutResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check sizes and scales are usable
    pub fn validate(&self) -> LayoutResult<()> {
        let positive = [
            ("font_size", self.font_size),
            ("script_scale", self.script_scale),
            ("script_script_scale", self.script_script_scale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(self.kern_threshold.is_finite() && self.kern_threshold >= 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "kern_threshold must not be negative, got {}",
                self.kern_threshold
            )));
        }
        Ok(())
    }
}
