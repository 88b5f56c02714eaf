//! Seams between the engine and the page: where pixels go and where the
//! image comes from.
//!
//! [`Surface`] and [`ImageSource`] are what [`crate::render`] and
//! [`crate::engine::EngineCore`] program against. [`CanvasSurface`] is the
//! browser implementation and the only type here that touches
//! [`web_sys::CanvasRenderingContext2d`].

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, HtmlImageElement};

use crate::consts::{ORIGINAL_CLASS, PREVIEW_CLASS};
use crate::error::CropError;
use crate::geometry::{PreviewCopy, Rectangle, Size};
use crate::input::HoverClass;

/// Crop border and handle outline color.
const STROKE_STYLE: &str = "#ffffff";

/// Handle fill color.
const FILL_STYLE: &str = "rgba(255, 255, 255, 0.6)";

/// Draw target for the crop widget.
pub trait Surface {
    /// Erase the whole viewport.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying draw call fails.
    fn clear(&mut self) -> Result<(), CropError>;

    /// Draw the source image scaled into `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying draw call fails.
    fn draw_image(&mut self, dest: &Rectangle) -> Result<(), CropError>;

    /// Outline a rectangle.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying draw call fails.
    fn stroke_rect(&mut self, rect: &Rectangle) -> Result<(), CropError>;

    /// Fill a rectangle.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying draw call fails.
    fn fill_rect(&mut self, rect: &Rectangle) -> Result<(), CropError>;

    /// Turn a feedback class on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if the class list cannot be updated.
    fn set_hover_class(&mut self, class: HoverClass, active: bool) -> Result<(), CropError>;

    /// Copy part of the source image into the preview, or blank the preview
    /// when `copy` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying draw call fails.
    fn copy_to_preview(&mut self, copy: Option<&PreviewCopy>) -> Result<(), CropError>;
}

/// Dimensions of a loaded image.
pub trait ImageSource {
    /// Intrinsic pixel size.
    fn natural_size(&self) -> Size;

    /// Size as laid out on the page.
    fn displayed_size(&self) -> Size;
}

impl ImageSource for Size {
    fn natural_size(&self) -> Size {
        *self
    }

    fn displayed_size(&self) -> Size {
        *self
    }
}

impl ImageSource for HtmlImageElement {
    fn natural_size(&self) -> Size {
        Size::new(to_i32(self.natural_width()), to_i32(self.natural_height()))
    }

    fn displayed_size(&self) -> Size {
        Size::new(to_i32(self.width()), to_i32(self.height()))
    }
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn to_u32(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// The original and preview canvases inside the widget container.
pub struct CanvasSurface {
    original: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    preview: HtmlCanvasElement,
    preview_ctx: CanvasRenderingContext2d,
    image: Option<HtmlImageElement>,
}

impl CanvasSurface {
    /// Empty `container` and append the original and preview canvases.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::Dom`] if the container is detached or a canvas or
    /// its 2D context cannot be created.
    pub fn mount(container: &HtmlElement, preview_size: Size) -> Result<Self, CropError> {
        let document = container
            .owner_document()
            .ok_or_else(|| CropError::Dom("container is not attached to a document".into()))?;
        container.set_inner_html("");

        let original = create_canvas(&document, ORIGINAL_CLASS)?;
        let preview = create_canvas(&document, PREVIEW_CLASS)?;
        container.append_child(&original)?;
        container.append_child(&preview)?;
        preview.set_width(to_u32(preview_size.width));
        preview.set_height(to_u32(preview_size.height));

        let ctx = context_2d(&original)?;
        let preview_ctx = context_2d(&preview)?;
        Ok(Self { original, ctx, preview, preview_ctx, image: None })
    }

    /// Match the original canvas' drawing buffer to its laid-out size and
    /// return that size as the viewport.
    pub fn sync_viewport(&self) -> Size {
        let size = Size::new(self.original.client_width(), self.original.client_height());
        self.original.set_width(to_u32(size.width));
        self.original.set_height(to_u32(size.height));
        size
    }

    pub fn set_image(&mut self, image: HtmlImageElement) {
        self.image = Some(image);
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }
}

fn create_canvas(document: &Document, class_name: &str) -> Result<HtmlCanvasElement, CropError> {
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| CropError::Dom("created element is not a canvas".into()))?;
    canvas.set_class_name(class_name);
    Ok(canvas)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, CropError> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| CropError::Dom("2d context unavailable".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| CropError::Dom("context is not a CanvasRenderingContext2d".into()))
}

impl Surface for CanvasSurface {
    fn clear(&mut self) -> Result<(), CropError> {
        let width = f64::from(self.original.width());
        let height = f64::from(self.original.height());
        self.ctx.clear_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn draw_image(&mut self, dest: &Rectangle) -> Result<(), CropError> {
        let Some(image) = &self.image else {
            return Ok(());
        };
        self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            f64::from(dest.left),
            f64::from(dest.top),
            f64::from(dest.width),
            f64::from(dest.height),
        )?;
        Ok(())
    }

    fn stroke_rect(&mut self, rect: &Rectangle) -> Result<(), CropError> {
        self.ctx.set_stroke_style_str(STROKE_STYLE);
        self.ctx.stroke_rect(
            f64::from(rect.left),
            f64::from(rect.top),
            f64::from(rect.width),
            f64::from(rect.height),
        );
        Ok(())
    }

    fn fill_rect(&mut self, rect: &Rectangle) -> Result<(), CropError> {
        self.ctx.set_fill_style_str(FILL_STYLE);
        self.ctx.fill_rect(
            f64::from(rect.left),
            f64::from(rect.top),
            f64::from(rect.width),
            f64::from(rect.height),
        );
        Ok(())
    }

    fn set_hover_class(&mut self, class: HoverClass, active: bool) -> Result<(), CropError> {
        self.original.class_list().toggle_with_force(class.class_name(), active)?;
        Ok(())
    }

    fn copy_to_preview(&mut self, copy: Option<&PreviewCopy>) -> Result<(), CropError> {
        let width = f64::from(self.preview.width());
        let height = f64::from(self.preview.height());
        self.preview_ctx.clear_rect(0.0, 0.0, width, height);

        let (Some(copy), Some(image)) = (copy, &self.image) else {
            return Ok(());
        };
        let (source, dest) = (copy.source, copy.dest);
        self.preview_ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                source.x,
                source.y,
                source.width,
                source.height,
                dest.x,
                dest.y,
                dest.width,
                dest.height,
            )?;
        Ok(())
    }
}
