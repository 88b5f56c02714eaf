use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{HtmlElement, HtmlImageElement};

use crate::config::CropConfig;
use crate::error::CropError;
use crate::geometry::{
    self, AspectRatio, Bounds, Point, PreviewCopy, Rectangle, Size, SourceRegion, constrain_resize,
    constrain_translation, handle_layout, handle_square,
};
use crate::hit::{self, HitPart};
use crate::input::{HoverClass, InputState, PointerEvent, Session, SessionKind};
use crate::render;
use crate::surface::{CanvasSurface, ImageSource};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from event handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Repaint everything: image, crop rectangle and handles.
    RenderNeeded,
    /// The crop rectangle was seeded or changed.
    RectangleChanged(Rectangle),
    /// Copy this region of the source image into the preview.
    PreviewRequested(PreviewCopy),
    /// The crop does not cover the image; blank the preview.
    PreviewCleared,
    /// Draw the enlarged overlay of a hovered handle.
    HoverOverlay(Rectangle),
    /// Toggle a feedback class on the original canvas.
    SetHoverClass { class: HoverClass, active: bool },
    /// A drag began; the host should route move/up/leave to the engine.
    SessionStarted(SessionKind),
    /// The drag ended on release, leave or cancel.
    SessionEnded,
}

/// Core engine state: everything that does not touch the DOM.
///
/// Separated from [`Engine`] so it can be tested without WASM/browser
/// dependencies. Construction is two-step: [`EngineCore::configure`] validates
/// the ratio, then [`EngineCore::set_viewport`] and [`EngineCore::set_image`]
/// seed the rectangle once both a layout and an image exist.
#[derive(Debug, Clone)]
pub struct EngineCore {
    config: CropConfig,
    ratio: AspectRatio,
    viewport: Option<Size>,
    image: Option<Size>,
    placement: Option<Rectangle>,
    rect: Option<Rectangle>,
    input: InputState,
}

impl EngineCore {
    /// Validate `config` and build an unseeded engine.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::InvalidRatio`] if the ratio has a non-positive
    /// component.
    pub fn configure(config: CropConfig) -> Result<Self, CropError> {
        let config = config.normalized();
        let ratio = config.aspect_ratio()?;
        log::debug!("crop engine configured with ratio {}:{}", ratio.width(), ratio.height());
        Ok(Self {
            config,
            ratio,
            viewport: None,
            image: None,
            placement: None,
            rect: None,
            input: InputState::Idle,
        })
    }

    // --- Lifecycle ---

    /// Record the laid-out viewport size and re-seed if an image is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::DegenerateViewport`] when the viewport has no area.
    /// The rectangle is discarded and seeding waits for the next layout.
    pub fn set_viewport(&mut self, viewport: Size) -> Result<Vec<Action>, CropError> {
        if viewport.is_degenerate() {
            self.viewport = None;
            self.discard();
            log::warn!("viewport {}x{} has no area, deferring crop", viewport.width, viewport.height);
            return Err(CropError::DegenerateViewport { width: viewport.width, height: viewport.height });
        }
        if self.viewport == Some(viewport) && self.rect.is_some() {
            return Ok(Vec::new());
        }
        self.viewport = Some(viewport);
        self.seed()
    }

    /// Record a loaded image and seed the rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::ImageLoadFailure`] for an image without intrinsic
    /// size and [`CropError::DegenerateViewport`] when no usable layout exists
    /// yet; in the latter case seeding happens on the next
    /// [`EngineCore::set_viewport`].
    pub fn set_image(&mut self, image: &impl ImageSource) -> Result<Vec<Action>, CropError> {
        let natural = image.natural_size();
        if natural.is_degenerate() {
            return Err(self.image_failed(format!("image has no intrinsic size ({}x{})", natural.width, natural.height)));
        }
        log::debug!("image loaded: natural {natural:?}, displayed {:?}", image.displayed_size());
        self.image = Some(natural);
        self.seed()
    }

    /// Forget the current image after it failed to load.
    ///
    /// The rectangle stays unseeded until a valid image arrives. Returns the
    /// error for the host to surface.
    pub fn image_failed(&mut self, reason: impl Into<String>) -> CropError {
        let reason = reason.into();
        log::warn!("image failed to load: {reason}");
        self.image = None;
        self.discard();
        CropError::ImageLoadFailure(reason)
    }

    /// Compute the image placement and the largest inscribed crop rectangle.
    ///
    /// A no-op until an image is loaded. Any session in progress ends.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::DegenerateViewport`] if no usable viewport is known.
    pub fn seed(&mut self) -> Result<Vec<Action>, CropError> {
        let Some(natural) = self.image else {
            return Ok(Vec::new());
        };
        let viewport = self.viewport.unwrap_or_default();
        let ratio = self.ratio;
        let seeded = geometry::fit_image(natural, viewport).and_then(|placement| {
            geometry::largest_inscribed_rectangle(viewport, ratio).map(|rect| (placement, rect))
        });
        let (placement, rect) = match seeded {
            Ok(seeded) => seeded,
            Err(err) => {
                self.discard();
                return Err(err);
            }
        };

        let mut actions = self.enter_idle();
        self.placement = Some(placement);
        self.rect = Some(rect);
        log::debug!("crop seeded at {:?} in viewport {}x{}", rect.to_array(), viewport.width, viewport.height);

        actions.push(Action::RenderNeeded);
        actions.extend(self.rectangle_changed(rect));
        Ok(actions)
    }

    fn discard(&mut self) {
        self.placement = None;
        self.rect = None;
        self.input = InputState::Idle;
    }

    // --- Input events ---

    /// Dispatch a pointer event to its handler.
    pub fn handle(&mut self, event: PointerEvent) -> Vec<Action> {
        match event {
            PointerEvent::Move(point) => self.on_pointer_move(point),
            PointerEvent::Down(point) => self.on_pointer_down(point),
            PointerEvent::Up => self.on_pointer_up(),
            PointerEvent::Leave => self.on_pointer_leave(),
        }
    }

    /// Hover feedback while idle; move or resize while dragging.
    pub fn on_pointer_move(&mut self, point: Point) -> Vec<Action> {
        let Some(rect) = self.rect else {
            return Vec::new();
        };
        match self.input {
            InputState::Dragging(session) => self.drag_to(session, rect, point),
            InputState::Idle | InputState::HoveringHandle(_) | InputState::HoveringBody => self.hover(rect, point),
        }
    }

    /// Start a resize on a handle or a move on the body. Presses elsewhere
    /// are ignored.
    pub fn on_pointer_down(&mut self, point: Point) -> Vec<Action> {
        let Some(rect) = self.rect else {
            return Vec::new();
        };
        if self.input.is_dragging() {
            return Vec::new();
        }
        let kind = match hit::classify(point, &rect, self.config.node_size) {
            Some(HitPart::Handle(handle)) => SessionKind::Resize(handle),
            Some(HitPart::Body) => SessionKind::Move,
            None => return Vec::new(),
        };
        log::debug!("session started: {kind:?} at ({}, {})", point.x, point.y);
        let mut actions = Vec::new();
        // The hover overlay does not survive into the drag.
        if matches!(self.input, InputState::HoveringHandle(_)) {
            actions.push(Action::RenderNeeded);
        }
        self.input = InputState::Dragging(Session { kind, anchor: point });
        actions.push(Action::SessionStarted(kind));
        actions
    }

    /// End the drag. The next move reclassifies the pointer.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        if !self.input.is_dragging() {
            return Vec::new();
        }
        self.enter_idle()
    }

    /// End any drag and clear hover feedback. The rectangle keeps whatever
    /// position the last step computed.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.enter_idle()
    }

    /// Abort a drag in progress without rolling the rectangle back.
    pub fn cancel(&mut self) -> Vec<Action> {
        if !self.input.is_dragging() {
            return Vec::new();
        }
        log::debug!("session cancelled");
        self.enter_idle()
    }

    fn hover(&mut self, rect: Rectangle, point: Point) -> Vec<Action> {
        let next = match hit::classify(point, &rect, self.config.node_size) {
            Some(HitPart::Handle(handle)) => InputState::HoveringHandle(handle),
            Some(HitPart::Body) => InputState::HoveringBody,
            None => InputState::Idle,
        };
        if next == self.input {
            return Vec::new();
        }

        let mut actions = Vec::new();
        // The enlarged overlay is only erased by a full repaint.
        if matches!(self.input, InputState::HoveringHandle(_)) {
            actions.push(Action::RenderNeeded);
        }
        if let InputState::HoveringHandle(handle) = next {
            let side = self.config.node_size + self.config.node_increase;
            actions.push(Action::HoverOverlay(handle_square(rect.corner(handle), side)));
        }
        actions.extend(class_actions(next.hover_class()));
        self.input = next;
        actions
    }

    fn drag_to(&mut self, session: Session, rect: Rectangle, point: Point) -> Vec<Action> {
        let bounds = self.bounds();
        let next = match session.kind {
            SessionKind::Move => {
                let (dx, dy) = (point.x - session.anchor.x, point.y - session.anchor.y);
                self.input = InputState::Dragging(Session { anchor: point, ..session });
                constrain_translation(&rect, dx, dy, bounds)
            }
            SessionKind::Resize(handle) => constrain_resize(&rect, self.ratio, handle, point, bounds),
        };
        if next == rect {
            return Vec::new();
        }

        self.rect = Some(next);
        let mut actions = vec![Action::RenderNeeded];
        actions.extend(self.rectangle_changed(next));
        actions
    }

    fn enter_idle(&mut self) -> Vec<Action> {
        let previous = std::mem::take(&mut self.input);
        let mut actions = Vec::new();
        match previous {
            InputState::Idle => return actions,
            InputState::Dragging(session) => {
                log::debug!("session ended: {:?}", session.kind);
                actions.push(Action::SessionEnded);
            }
            InputState::HoveringHandle(_) => actions.push(Action::RenderNeeded),
            InputState::HoveringBody => {}
        }
        actions.extend(class_actions(None));
        actions
    }

    fn rectangle_changed(&self, rect: Rectangle) -> Vec<Action> {
        let preview = match self.preview_copy(&rect) {
            Some(copy) => Action::PreviewRequested(copy),
            None => Action::PreviewCleared,
        };
        vec![Action::RectangleChanged(rect), preview]
    }

    fn preview_copy(&self, rect: &Rectangle) -> Option<PreviewCopy> {
        let (placement, natural) = (self.placement?, self.image?);
        geometry::preview_copy(rect, &placement, natural, self.preview_size())
    }

    fn bounds(&self) -> Bounds {
        match self.viewport {
            Some(viewport) if self.config.clamp_to_viewport => Bounds::Viewport(viewport),
            _ => Bounds::Unbounded,
        }
    }

    // --- Queries ---

    /// The current crop rectangle, once seeded.
    #[must_use]
    pub fn rectangle(&self) -> Option<Rectangle> {
        self.rect
    }

    /// The current interaction state.
    #[must_use]
    pub fn state(&self) -> InputState {
        self.input
    }

    /// Handle hit regions of the current rectangle.
    #[must_use]
    pub fn handles(&self) -> Option<[Rectangle; 4]> {
        self.rect.map(|rect| handle_layout(&rect, self.config.node_size))
    }

    /// Where the image is drawn inside the viewport.
    #[must_use]
    pub fn placement(&self) -> Option<Rectangle> {
        self.placement
    }

    /// The crop in natural image pixels, for submission.
    #[must_use]
    pub fn crop_region(&self) -> Option<SourceRegion> {
        let (rect, placement, natural) = (self.rect?, self.placement?, self.image?);
        geometry::source_region(&rect, &placement, natural)
    }

    #[must_use]
    pub fn viewport(&self) -> Option<Size> {
        self.viewport
    }

    #[must_use]
    pub fn ratio(&self) -> AspectRatio {
        self.ratio
    }

    #[must_use]
    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Output size of the preview canvas.
    #[must_use]
    pub fn preview_size(&self) -> Size {
        geometry::preview_size(self.ratio, self.config.preview_width)
    }
}

fn class_actions(active: Option<HoverClass>) -> [Action; 2] {
    [HoverClass::Hover, HoverClass::CropHover]
        .map(|class| Action::SetHoverClass { class, active: active == Some(class) })
}

/// The browser widget. Wraps [`EngineCore`] and owns the DOM canvases.
///
/// The host wires DOM pointer events to the `pointer_*` methods, calls
/// [`Engine::set_image`] once the configured image has loaded, and calls
/// [`Engine::layout`] whenever the container is resized.
#[wasm_bindgen]
pub struct Engine {
    surface: CanvasSurface,
    on_rectangle_changed: Option<js_sys::Function>,
    core: EngineCore,
}

#[wasm_bindgen]
impl Engine {
    /// Validate the JSON configuration and replace the container's contents
    /// with the original and preview canvases.
    ///
    /// # Errors
    ///
    /// Throws if the configuration is malformed, the ratio is invalid, or the
    /// canvases cannot be created.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, config: &str) -> Result<Engine, JsValue> {
        let config = CropConfig::from_json(config)?;
        let core = EngineCore::configure(config)?;
        let surface = CanvasSurface::mount(&container, core.preview_size())?;
        Ok(Self { surface, on_rectangle_changed: None, core })
    }

    /// URL of the image the host should load, if configured.
    #[wasm_bindgen(getter)]
    pub fn image(&self) -> Option<String> {
        self.core.config().image.clone()
    }

    /// Register `callback(left, top, width, height)`, fired after seeding and
    /// after every accepted move or resize step.
    pub fn set_on_rectangle_changed(&mut self, callback: js_sys::Function) {
        self.on_rectangle_changed = Some(callback);
    }

    /// Re-read the original canvas' laid-out size.
    ///
    /// # Errors
    ///
    /// Throws only if drawing fails; an empty layout is logged and deferred.
    pub fn layout(&mut self) -> Result<(), JsValue> {
        let viewport = self.surface.sync_viewport();
        let result = self.core.set_viewport(viewport);
        self.settle(result)
    }

    /// Hand over the loaded image and seed the crop rectangle.
    ///
    /// # Errors
    ///
    /// Throws if the image has no intrinsic size or drawing fails.
    pub fn set_image(&mut self, image: HtmlImageElement) -> Result<(), JsValue> {
        match self.core.set_image(&image) {
            Err(err @ CropError::ImageLoadFailure(_)) => {
                self.surface.clear_image();
                render::draw_scene(&mut self.surface, &self.core)?;
                Err(err.into())
            }
            other => {
                self.surface.set_image(image);
                self.settle(other)
            }
        }
    }

    /// Report that the image failed to load; the view falls back to empty.
    ///
    /// # Errors
    ///
    /// Always throws the resulting image-load error so the host can surface it.
    pub fn image_failed(&mut self, reason: String) -> Result<(), JsValue> {
        let err = self.core.image_failed(reason);
        self.surface.clear_image();
        render::draw_scene(&mut self.surface, &self.core)?;
        Err(err.into())
    }

    /// # Errors
    ///
    /// Throws if drawing fails.
    pub fn pointer_move(&mut self, x: i32, y: i32) -> Result<(), JsValue> {
        self.dispatch(PointerEvent::Move(Point::new(x, y)))
    }

    /// # Errors
    ///
    /// Throws if drawing fails.
    pub fn pointer_down(&mut self, x: i32, y: i32) -> Result<(), JsValue> {
        self.dispatch(PointerEvent::Down(Point::new(x, y)))
    }

    /// # Errors
    ///
    /// Throws if drawing fails.
    pub fn pointer_up(&mut self) -> Result<(), JsValue> {
        self.dispatch(PointerEvent::Up)
    }

    /// # Errors
    ///
    /// Throws if drawing fails.
    pub fn pointer_leave(&mut self) -> Result<(), JsValue> {
        self.dispatch(PointerEvent::Leave)
    }

    /// Abort a drag in progress.
    ///
    /// # Errors
    ///
    /// Throws if drawing fails.
    pub fn cancel(&mut self) -> Result<(), JsValue> {
        let actions = self.core.cancel();
        self.apply(&actions)
    }

    /// Repaint the original canvas.
    ///
    /// # Errors
    ///
    /// Throws if drawing fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        render::draw_scene(&mut self.surface, &self.core)?;
        Ok(())
    }

    /// Current crop rectangle as `[left, top, width, height]` in viewport pixels.
    pub fn rectangle(&self) -> Option<Vec<i32>> {
        self.core.rectangle().map(|rect| rect.to_array().to_vec())
    }

    /// Current crop as `[x, y, width, height]` in natural image pixels.
    pub fn crop_region(&self) -> Option<Vec<f64>> {
        self.core
            .crop_region()
            .map(|region| vec![region.x, region.y, region.width, region.height])
    }
}

impl Engine {
    /// Read-only access to the core, for hosts embedding the engine from Rust.
    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    fn dispatch(&mut self, event: PointerEvent) -> Result<(), JsValue> {
        let actions = self.core.handle(event);
        self.apply(&actions)
    }

    fn apply(&mut self, actions: &[Action]) -> Result<(), JsValue> {
        let callback = self.on_rectangle_changed.as_ref();
        render::apply(&mut self.surface, &self.core, actions, &mut |rect: &Rectangle| notify(callback, rect))?;
        Ok(())
    }

    fn settle(&mut self, result: Result<Vec<Action>, CropError>) -> Result<(), JsValue> {
        match result {
            Ok(actions) => self.apply(&actions),
            Err(err) if err.is_recoverable() => {
                log::warn!("crop deferred: {err}");
                render::draw_scene(&mut self.surface, &self.core)?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn notify(callback: Option<&js_sys::Function>, rect: &Rectangle) -> Result<(), CropError> {
    let Some(callback) = callback else {
        return Ok(());
    };
    let args = js_sys::Array::of4(
        &JsValue::from(rect.left),
        &JsValue::from(rect.top),
        &JsValue::from(rect.width),
        &JsValue::from(rect.height),
    );
    callback.apply(&JsValue::NULL, &args)?;
    Ok(())
}
