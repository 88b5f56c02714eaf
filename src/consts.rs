//! Shared numeric defaults for the widget.

// ── Handles ─────────────────────────────────────────────────────

/// Side length in pixels of the square hit region drawn on each corner.
pub const NODE_SIZE: i32 = 10;

/// Extra side length added to a handle while the pointer hovers it.
pub const NODE_INCREASE: i32 = 4;

// ── Preview ─────────────────────────────────────────────────────

/// Output width of the preview canvas; its height follows the crop ratio.
pub const PREVIEW_WIDTH: i32 = 200;

// ── DOM ─────────────────────────────────────────────────────────

/// Class name of the canvas that shows the source image and the crop rectangle.
pub const ORIGINAL_CLASS: &str = "shaver-original";

/// Class name of the canvas that mirrors the cropped region.
pub const PREVIEW_CLASS: &str = "shaver-preview";
