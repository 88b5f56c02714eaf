//! Rendering: turns engine state and actions into [`Surface`] calls.
//!
//! This module never mutates engine state. Repaints are always full (clear,
//! image, crop border, handles); whether that is cheap is the surface's
//! concern.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::engine::{Action, EngineCore};
use crate::error::CropError;
use crate::geometry::{Rectangle, handle_layout};
use crate::surface::Surface;

/// Draw the full scene for the current engine state.
///
/// # Errors
///
/// Returns the first error raised by the surface.
pub fn draw_scene(surface: &mut impl Surface, core: &EngineCore) -> Result<(), CropError> {
    surface.clear()?;
    if let Some(placement) = core.placement() {
        surface.draw_image(&placement)?;
    }
    if let Some(rect) = core.rectangle() {
        surface.stroke_rect(&rect)?;
        for square in handle_layout(&rect, core.config().node_size) {
            surface.stroke_rect(&square)?;
            surface.fill_rect(&square)?;
        }
    }
    Ok(())
}

/// Apply a batch of actions in order.
///
/// `on_rectangle_changed` is the host notification for
/// [`Action::RectangleChanged`]. Repeated [`Action::RenderNeeded`] entries in
/// one batch repaint once.
///
/// # Errors
///
/// Returns the first error raised by the surface or the listener.
pub fn apply(
    surface: &mut impl Surface,
    core: &EngineCore,
    actions: &[Action],
    on_rectangle_changed: &mut impl FnMut(&Rectangle) -> Result<(), CropError>,
) -> Result<(), CropError> {
    let mut painted = false;
    for action in actions {
        match action {
            Action::RenderNeeded => {
                if !painted {
                    draw_scene(surface, core)?;
                    painted = true;
                }
            }
            Action::HoverOverlay(square) => {
                surface.stroke_rect(square)?;
                surface.fill_rect(square)?;
            }
            Action::SetHoverClass { class, active } => surface.set_hover_class(*class, *active)?,
            Action::RectangleChanged(rect) => on_rectangle_changed(rect)?,
            Action::PreviewRequested(copy) => surface.copy_to_preview(Some(copy))?,
            Action::PreviewCleared => surface.copy_to_preview(None)?,
            Action::SessionStarted(kind) => log::debug!("pointer captured for {kind:?}"),
            Action::SessionEnded => log::debug!("pointer released"),
        }
    }
    Ok(())
}
