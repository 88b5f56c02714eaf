//! Rectangle math for the crop widget.
//!
//! Everything here is a pure function over integer viewport pixels. The
//! engine validates its inputs once (ratio at configuration time, viewport at
//! layout time) and then calls into this module for every pointer step.
//!
//! [`resize_from_corner`] and [`translate`] never clamp. Bounds are a caller
//! policy applied through [`constrain_resize`] and [`constrain_translation`].

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::error::CropError;

/// A pointer position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero or negative.
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// An axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    #[must_use]
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self { left, top, width, height }
    }

    #[must_use]
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// Position of the given corner.
    #[must_use]
    pub fn corner(&self, handle: Handle) -> Point {
        match handle {
            Handle::TopLeft => Point::new(self.left, self.top),
            Handle::TopRight => Point::new(self.right(), self.top),
            Handle::BottomRight => Point::new(self.right(), self.bottom()),
            Handle::BottomLeft => Point::new(self.left, self.bottom()),
        }
    }

    /// `[left, top, width, height]`, the order canvas calls take.
    #[must_use]
    pub fn to_array(&self) -> [i32; 4] {
        [self.left, self.top, self.width, self.height]
    }

    /// Overlapping area of two rectangles, if any.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self::new(left, top, right - left, bottom - top))
    }
}

/// One of the four corner handles, in canonical hit-test order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Handle {
    /// All handles in canonical order. Ties in hit-testing resolve to the
    /// earliest entry.
    pub const ALL: [Self; 4] = [Self::TopLeft, Self::TopRight, Self::BottomRight, Self::BottomLeft];

    /// Whether dragging this handle moves the left edge.
    #[must_use]
    pub fn is_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    /// Whether dragging this handle moves the top edge.
    #[must_use]
    pub fn is_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }
}

/// A validated `width:height` ratio with both components positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    width: i32,
    height: i32,
}

impl AspectRatio {
    /// Validate a ratio.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::InvalidRatio`] when either component is not a
    /// positive 32-bit integer.
    pub fn new(width: i64, height: i64) -> Result<Self, CropError> {
        let invalid = || CropError::InvalidRatio { width, height };
        if width <= 0 || height <= 0 {
            return Err(invalid());
        }
        let w = i32::try_from(width).map_err(|_| invalid())?;
        let h = i32::try_from(height).map_err(|_| invalid())?;
        Ok(Self { width: w, height: h })
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// `floor(width * h / w)`.
    #[must_use]
    pub fn height_for(&self, width: i32) -> i32 {
        saturate(floor_div(i64::from(width) * i64::from(self.height), i64::from(self.width)))
    }

    /// `floor(height * w / h)`.
    #[must_use]
    pub fn width_for(&self, height: i32) -> i32 {
        saturate(floor_div(i64::from(height) * i64::from(self.width), i64::from(self.height)))
    }

    /// Smallest width whose derived height is at least one pixel.
    #[must_use]
    pub fn min_width(&self) -> i32 {
        saturate(ceil_div(i64::from(self.width), i64::from(self.height))).max(1)
    }

    /// Largest width whose derived height does not exceed `height`.
    #[must_use]
    pub fn max_width_within(&self, height: i32) -> i32 {
        let numerator = (i64::from(height) + 1) * i64::from(self.width) - 1;
        saturate(floor_div(numerator, i64::from(self.height)))
    }
}

/// A rectangle in natural image pixels. Fractional because the displayed image
/// is usually scaled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SourceRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Source and destination of one preview copy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PreviewCopy {
    /// Region of the natural image to read.
    pub source: SourceRegion,
    /// Region of the preview canvas to fill, in preview pixels.
    pub dest: SourceRegion,
}

/// Where the crop rectangle may go while it is moved or resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    /// Keep the rectangle inside `[0, width] x [0, height]`.
    Viewport(Size),
    /// Allow the rectangle to leave the viewport.
    Unbounded,
}

fn floor_div(numerator: i64, denominator: i64) -> i64 {
    numerator.div_euclid(denominator)
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    -(-numerator).div_euclid(denominator)
}

fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

fn check_viewport(viewport: Size) -> Result<(), CropError> {
    if viewport.is_degenerate() {
        return Err(CropError::DegenerateViewport { width: viewport.width, height: viewport.height });
    }
    Ok(())
}

/// The largest rectangle of `ratio` that fits in `viewport`, centered.
///
/// When the ratio is wider than the viewport the rectangle spans the full
/// width and is centered vertically; otherwise it spans the full height and
/// is centered horizontally. Centering offsets are floored.
///
/// # Errors
///
/// Returns [`CropError::DegenerateViewport`] if the viewport has no area or is
/// too thin to hold a rectangle of this ratio.
pub fn largest_inscribed_rectangle(viewport: Size, ratio: AspectRatio) -> Result<Rectangle, CropError> {
    check_viewport(viewport)?;
    let (vw, vh) = (i64::from(viewport.width), i64::from(viewport.height));
    let (rw, rh) = (i64::from(ratio.width), i64::from(ratio.height));

    let ratio_side = rw * vh;
    let viewport_side = vw * rh;
    if ratio_side == viewport_side {
        return Ok(Rectangle::new(0, 0, viewport.width, viewport.height));
    }

    let rect = if ratio_side > viewport_side {
        let height = ratio.height_for(viewport.width);
        Rectangle::new(0, (viewport.height - height) / 2, viewport.width, height)
    } else {
        let width = ratio.width_for(viewport.height);
        Rectangle::new((viewport.width - width) / 2, 0, width, viewport.height)
    };

    // A viewport thinner than one ratio step cannot hold a single pixel row.
    if rect.width <= 0 || rect.height <= 0 {
        return Err(CropError::DegenerateViewport { width: viewport.width, height: viewport.height });
    }
    Ok(rect)
}

/// A square of side `side` centered on `corner`, offset by `-floor(side / 2)`.
#[must_use]
pub fn handle_square(corner: Point, side: i32) -> Rectangle {
    let half = side / 2;
    Rectangle::new(corner.x - half, corner.y - half, side, side)
}

/// Hit regions of the four handles in canonical order.
#[must_use]
pub fn handle_layout(rect: &Rectangle, node_size: i32) -> [Rectangle; 4] {
    Handle::ALL.map(|handle| handle_square(rect.corner(handle), node_size))
}

/// Move `corner` to `pos.x`, keeping the ratio by deriving height from width.
///
/// Left-hand corners keep the right edge; right-hand corners keep the left
/// edge. Top corners keep the bottom edge; bottom corners keep the top edge.
/// The pointer's `y` does not take part. A step that keeps the width returns
/// `current` unchanged, even when its height is not exactly ratio-derived.
#[must_use]
pub fn resize_from_corner(current: &Rectangle, ratio: AspectRatio, corner: Handle, pos: Point) -> Rectangle {
    let (left, width) = match corner {
        Handle::TopLeft | Handle::BottomLeft => {
            let width_delta = current.left - pos.x;
            (pos.x, current.width + width_delta)
        }
        Handle::TopRight | Handle::BottomRight => {
            let width_delta = current.right() - pos.x;
            (current.left, current.width - width_delta)
        }
    };
    if width == current.width {
        return *current;
    }
    let height = ratio.height_for(width);
    let top = if corner.is_top() { current.top + (current.height - height) } else { current.top };
    Rectangle::new(left, top, width, height)
}

/// Shift a rectangle by `(dx, dy)`.
#[must_use]
pub fn translate(rect: &Rectangle, dx: i32, dy: i32) -> Rectangle {
    Rectangle::new(rect.left + dx, rect.top + dy, rect.width, rect.height)
}

/// [`resize_from_corner`] with the width limited so the result stays at least
/// one pixel tall and, for [`Bounds::Viewport`], inside the viewport.
#[must_use]
pub fn constrain_resize(current: &Rectangle, ratio: AspectRatio, corner: Handle, pos: Point, bounds: Bounds) -> Rectangle {
    let min_width = ratio.min_width();
    let max_width = match bounds {
        Bounds::Unbounded => i32::MAX,
        Bounds::Viewport(viewport) => {
            let horizontal = if corner.is_left() { current.right() } else { viewport.width - current.left };
            let vertical = if corner.is_top() { current.bottom() } else { viewport.height - current.top };
            horizontal.min(ratio.max_width_within(vertical))
        }
    };

    let requested = if corner.is_left() { current.right() - pos.x } else { pos.x - current.left };
    let width = requested.clamp(min_width, max_width.max(min_width));
    let x = if corner.is_left() { current.right() - width } else { current.left + width };
    resize_from_corner(current, ratio, corner, Point::new(x, pos.y))
}

/// [`translate`] with the offset limited so the rectangle stays inside the
/// viewport for [`Bounds::Viewport`].
#[must_use]
pub fn constrain_translation(rect: &Rectangle, dx: i32, dy: i32, bounds: Bounds) -> Rectangle {
    match bounds {
        Bounds::Unbounded => translate(rect, dx, dy),
        Bounds::Viewport(viewport) => {
            let left = (rect.left + dx).clamp(0, (viewport.width - rect.width).max(0));
            let top = (rect.top + dy).clamp(0, (viewport.height - rect.height).max(0));
            Rectangle::new(left, top, rect.width, rect.height)
        }
    }
}

/// Scale-to-fit placement of an image inside the viewport.
///
/// The image keeps its aspect ratio, is never enlarged, and is centered with
/// floored offsets.
///
/// # Errors
///
/// Returns [`CropError::DegenerateViewport`] for a viewport without area and
/// [`CropError::ImageLoadFailure`] for an image without intrinsic size.
pub fn fit_image(natural: Size, viewport: Size) -> Result<Rectangle, CropError> {
    check_viewport(viewport)?;
    if natural.is_degenerate() {
        return Err(CropError::ImageLoadFailure(format!(
            "image has no intrinsic size ({}x{})",
            natural.width, natural.height
        )));
    }

    let (nw, nh) = (i64::from(natural.width), i64::from(natural.height));
    let (vw, vh) = (i64::from(viewport.width), i64::from(viewport.height));

    // Image relatively taller than the viewport: height is the limiting side.
    let (width, height) = if nw * vh <= vw * nh {
        let height = nh.min(vh);
        (nw * height / nh, height)
    } else {
        let width = nw.min(vw);
        (width, nh * width / nw)
    };
    let (width, height) = (saturate(width), saturate(height));
    Ok(Rectangle::new((viewport.width - width) / 2, (viewport.height - height) / 2, width, height))
}

/// The part of `crop` that covers the image, in natural image pixels.
///
/// `placement` is where the image is drawn in the viewport and `natural` its
/// intrinsic size. Returns `None` when the crop does not overlap the image.
#[must_use]
pub fn source_region(crop: &Rectangle, placement: &Rectangle, natural: Size) -> Option<SourceRegion> {
    let visible = crop.intersection(placement)?;
    let scale_x = f64::from(natural.width) / f64::from(placement.width);
    let scale_y = f64::from(natural.height) / f64::from(placement.height);
    Some(SourceRegion {
        x: f64::from(visible.left - placement.left) * scale_x,
        y: f64::from(visible.top - placement.top) * scale_y,
        width: f64::from(visible.width) * scale_x,
        height: f64::from(visible.height) * scale_y,
    })
}

/// Source and destination for copying `crop` into a preview of `preview` size.
///
/// When the crop only partly covers the image, the destination is the
/// matching part of the preview so the copy is not stretched.
#[must_use]
pub fn preview_copy(crop: &Rectangle, placement: &Rectangle, natural: Size, preview: Size) -> Option<PreviewCopy> {
    let source = source_region(crop, placement, natural)?;
    let visible = crop.intersection(placement)?;
    let scale_x = f64::from(preview.width) / f64::from(crop.width);
    let scale_y = f64::from(preview.height) / f64::from(crop.height);
    let dest = SourceRegion {
        x: f64::from(visible.left - crop.left) * scale_x,
        y: f64::from(visible.top - crop.top) * scale_y,
        width: f64::from(visible.width) * scale_x,
        height: f64::from(visible.height) * scale_y,
    };
    Some(PreviewCopy { source, dest })
}

/// Preview output size: `width` wide, height following the ratio.
#[must_use]
pub fn preview_size(ratio: AspectRatio, width: i32) -> Size {
    Size::new(width, ratio.height_for(width).max(1))
}
