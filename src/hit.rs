//! Hit-testing: which part of the crop rectangle is under the pointer.
//!
//! All edges are inclusive, so a point exactly on a boundary counts as inside.
//! Handles are tested before the body, and overlapping handles resolve to the
//! earliest corner in [`Handle::ALL`] order.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geometry::{Handle, Point, Rectangle, handle_layout};

/// Which part of the crop rectangle was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// One of the corner resize handles.
    Handle(Handle),
    /// The rectangle interior (or edge), used to move it.
    Body,
}

/// True iff `point` lies inside `rect`, edges included.
#[must_use]
pub fn point_in_rectangle(point: Point, rect: &Rectangle) -> bool {
    rect.left <= point.x && point.x <= rect.right() && rect.top <= point.y && point.y <= rect.bottom()
}

/// The first handle in canonical order whose square contains `point`.
#[must_use]
pub fn handle_at(point: Point, handles: &[Rectangle; 4]) -> Option<Handle> {
    Handle::ALL
        .into_iter()
        .zip(handles)
        .find_map(|(handle, square)| point_in_rectangle(point, square).then_some(handle))
}

/// Classify `point` against the crop rectangle and its handles of `node_size`.
#[must_use]
pub fn classify(point: Point, rect: &Rectangle, node_size: i32) -> Option<HitPart> {
    if let Some(handle) = handle_at(point, &handle_layout(rect, node_size)) {
        return Some(HitPart::Handle(handle));
    }
    point_in_rectangle(point, rect).then_some(HitPart::Body)
}
