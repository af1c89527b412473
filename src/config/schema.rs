//! Configuration schema types for `tilecomp.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::assets::AssetLayout;

/// Largest accepted output scale factor
pub const MAX_SCALE: u32 = 16;

/// Asset location section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Root directory of the asset tree
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Directory, manifest and extension names below the root
    #[serde(flatten)]
    pub layout: AssetLayout,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self { root: default_root(), layout: AssetLayout::default() }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("assets")
}

/// Output rendering section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Integer upscale factor applied to written images
    #[serde(default = "default_scale")]
    pub scale: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { scale: default_scale() }
    }
}

fn default_scale() -> u32 {
    1
}

/// Complete `tilecomp.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilecompConfig {
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// A single configuration problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "render.scale")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tilecomp.toml: '{}' {}", self.field, self.message)
    }
}

impl TilecompConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.render.scale == 0 || self.render.scale > MAX_SCALE {
            errors.push(ConfigValidationError {
                field: "render.scale".to_string(),
                message: format!("must be between 1 and {}", MAX_SCALE),
            });
        }

        let layout = &self.assets.layout;
        for (field, value) in [
            ("assets.tileset_manifest", &layout.tileset_manifest),
            ("assets.tileset_extension", &layout.tileset_extension),
            ("assets.blockset_manifest", &layout.blockset_manifest),
            ("assets.blockset_extension", &layout.blockset_extension),
        ] {
            if value.is_empty() {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be a non-empty string".to_string(),
                });
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
