#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use wasm_bindgen::JsValue;

/// Errors raised while configuring or driving the crop widget.
#[derive(Debug, thiserror::Error)]
pub enum CropError {
    /// One of the aspect ratio components is zero or negative.
    #[error("invalid aspect ratio {width}:{height}, both components must be positive")]
    InvalidRatio { width: i64, height: i64 },
    /// The viewport has no area yet, typically because its container is hidden.
    #[error("viewport {width}x{height} has no area")]
    DegenerateViewport { width: i32, height: i32 },
    /// The source image could not be decoded or has no intrinsic size.
    #[error("image failed to load: {0}")]
    ImageLoadFailure(String),
    /// The configuration JSON is malformed or missing the ratio.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// A browser API call failed.
    #[error("browser call failed: {0}")]
    Dom(String),
}

impl CropError {
    /// Whether the widget can keep running and retry after this error.
    ///
    /// Ratio and configuration errors prevent the widget from becoming
    /// interactive; the others degrade to a plain image view until the next
    /// layout or image arrives.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DegenerateViewport { .. } | Self::ImageLoadFailure(_) | Self::Dom(_))
    }
}

impl From<JsValue> for CropError {
    fn from(value: JsValue) -> Self {
        Self::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<CropError> for JsValue {
    fn from(err: CropError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
