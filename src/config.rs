//! Widget configuration.
//!
//! The host passes configuration as a JSON object:
//!
//! ```json
//! { "ratio": [16, 9], "image": "/img/photo.jpg", "nodeSize": 10 }
//! ```
//!
//! Only `ratio` is required. It is validated when the engine is configured,
//! not when the JSON is parsed, so a `0` component surfaces as
//! [`CropError::InvalidRatio`] rather than a parse error.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{NODE_INCREASE, NODE_SIZE, PREVIEW_WIDTH};
use crate::error::CropError;
use crate::geometry::AspectRatio;

/// Configuration accepted at construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropConfig {
    /// Crop aspect ratio as `[width, height]`.
    pub ratio: [i64; 2],
    /// URL of the image the host should load.
    #[serde(default)]
    pub image: Option<String>,
    /// Side of the square handle hit regions, in pixels.
    #[serde(default = "default_node_size")]
    pub node_size: i32,
    /// Extra handle size while hovered, in pixels.
    #[serde(default = "default_node_increase")]
    pub node_increase: i32,
    /// Keep the crop rectangle inside the viewport while dragging.
    #[serde(default = "default_clamp")]
    pub clamp_to_viewport: bool,
    /// Width of the preview canvas; the height follows the ratio.
    #[serde(default = "default_preview_width")]
    pub preview_width: i32,
}

fn default_node_size() -> i32 {
    NODE_SIZE
}

fn default_node_increase() -> i32 {
    NODE_INCREASE
}

fn default_clamp() -> bool {
    true
}

fn default_preview_width() -> i32 {
    PREVIEW_WIDTH
}

impl CropConfig {
    /// A configuration with the given ratio and every other field defaulted.
    #[must_use]
    pub fn new(ratio_width: i64, ratio_height: i64) -> Self {
        Self {
            ratio: [ratio_width, ratio_height],
            image: None,
            node_size: NODE_SIZE,
            node_increase: NODE_INCREASE,
            clamp_to_viewport: true,
            preview_width: PREVIEW_WIDTH,
        }
    }

    /// Parse a JSON configuration object.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::Config`] if the JSON is malformed or has no `ratio`.
    pub fn from_json(json: &str) -> Result<Self, CropError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The validated aspect ratio.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::InvalidRatio`] if either component is not positive.
    pub fn aspect_ratio(&self) -> Result<AspectRatio, CropError> {
        AspectRatio::new(self.ratio[0], self.ratio[1])
    }

    /// Copy with sizes forced into usable ranges: handles at least one pixel,
    /// a non-negative hover increase, and a preview at least one pixel wide.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.node_size = self.node_size.max(1);
        self.node_increase = self.node_increase.max(0);
        self.preview_width = self.preview_width.max(1);
        self
    }
}
