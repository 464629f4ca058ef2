//! Configuration for loading PLY files and driving the viewer camera.
//!
//! All structs deserialize with `serde`, and every field falls back to its
//! default when absent, so a config file only needs the keys it changes.
//!
//! ```
//! use plyview_core::config::{ParseOptions, UnknownPolicy};
//!
//! let options = ParseOptions::default().with_unknown_properties(UnknownPolicy::Skip);
//! assert_eq!(options.unknown_elements, UnknownPolicy::Reject);
//! ```

use serde::Deserialize;

/// What to do with an element or property that has no registered setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPolicy {
    /// Fail the load.
    #[default]
    Reject,
    /// Decode and discard the tokens, keeping the rest of the record aligned.
    Skip,
}

/// Options for the PLY loader.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub unknown_elements: UnknownPolicy,
    pub unknown_properties: UnknownPolicy,
}

impl ParseOptions {
    /// Skip everything the mesh model has no place for.
    pub fn lenient() -> Self {
        Self {
            unknown_elements: UnknownPolicy::Skip,
            unknown_properties: UnknownPolicy::Skip,
        }
    }

    #[must_use]
    pub fn with_unknown_elements(mut self, policy: UnknownPolicy) -> Self {
        self.unknown_elements = policy;
        self
    }

    #[must_use]
    pub fn with_unknown_properties(mut self, policy: UnknownPolicy) -> Self {
        self.unknown_properties = policy;
        self
    }
}

/// Camera step sizes and the perspective frustum.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Multiplicative zoom step; zooming in scales the camera by its inverse.
    pub zoom_factor: f64,
    /// Rotation step in radians.
    pub rotation_step: f64,
    pub translation_step: f64,
    /// Eye position before any camera transform is applied.
    pub eye: [f64; 3],
    pub fov_y_degrees: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom_factor: 1.05,
            rotation_step: 0.05,
            translation_step: 0.05,
            eye: [0.0, 3.0, 10.0],
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 200.0,
        }
    }
}

impl CameraConfig {
    #[must_use]
    pub fn with_zoom_factor(mut self, factor: f64) -> Self {
        self.zoom_factor = factor;
        self
    }

    #[must_use]
    pub fn with_rotation_step(mut self, radians: f64) -> Self {
        self.rotation_step = radians;
        self
    }

    #[must_use]
    pub fn with_translation_step(mut self, step: f64) -> Self {
        self.translation_step = step;
        self
    }

    #[must_use]
    pub fn with_eye(mut self, eye: [f64; 3]) -> Self {
        self.eye = eye;
        self
    }
}

/// Top-level viewer configuration, as read from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub parse: ParseOptions,
    pub camera: CameraConfig,
}
