//! Interaction model: the pointer-driven state machine of the crop widget.
//!
//! `InputState` is a tagged union, so hover flags and drag fields can never be
//! set in a combination the engine does not expect. A [`Session`] only exists
//! inside [`InputState::Dragging`], between a successful press and the
//! matching release, leave or cancel.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::{Handle, Point};

/// What a drag session does to the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// Translate the whole rectangle.
    Move,
    /// Resize from the given corner, keeping the ratio.
    Resize(Handle),
}

/// A drag in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub kind: SessionKind,
    /// Pointer position at press time. Move sessions advance it to the latest
    /// pointer position on every step.
    pub anchor: Point,
}

/// Visual classes the host toggles on the original canvas for feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverClass {
    /// Pointer is over a resize handle.
    Hover,
    /// Pointer is over the crop body.
    CropHover,
}

impl HoverClass {
    /// CSS class name applied to the original canvas.
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Hover => "hover",
            Self::CropHover => "crop-hover",
        }
    }
}

/// Pointer event kinds the engine consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Move(Point),
    Down(Point),
    Up,
    Leave,
}

/// The interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputState {
    /// Pointer is outside the crop rectangle and its handles.
    #[default]
    Idle,
    /// Pointer hovers a handle; an enlarged handle overlay is shown.
    HoveringHandle(Handle),
    /// Pointer hovers the crop body.
    HoveringBody,
    /// A move or resize is in progress.
    Dragging(Session),
}

impl InputState {
    /// The active session, if dragging.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Dragging(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    /// The hover class that should be active in this state, if any.
    #[must_use]
    pub fn hover_class(&self) -> Option<HoverClass> {
        match self {
            Self::HoveringHandle(_) => Some(HoverClass::Hover),
            Self::HoveringBody => Some(HoverClass::CropHover),
            Self::Idle | Self::Dragging(_) => None,
        }
    }
}
