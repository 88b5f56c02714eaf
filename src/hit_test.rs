use super::*;

// =============================================================
// Helpers
// =============================================================

fn corner_handles() -> [Rectangle; 4] {
    [
        Rectangle::new(25, 35, 10, 10),
        Rectangle::new(125, 35, 10, 10),
        Rectangle::new(125, 145, 10, 10),
        Rectangle::new(25, 145, 10, 10),
    ]
}

fn pt(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

// =============================================================
// point_in_rectangle
// =============================================================

#[test]
fn point_inside_rectangle() {
    assert!(point_in_rectangle(pt(15, 15), &Rectangle::new(10, 10, 20, 20)));
}

#[test]
fn point_on_every_edge_counts_as_inside() {
    let r = Rectangle::new(10, 10, 20, 20);
    assert!(point_in_rectangle(pt(10, 20), &r));
    assert!(point_in_rectangle(pt(30, 20), &r));
    assert!(point_in_rectangle(pt(20, 10), &r));
    assert!(point_in_rectangle(pt(20, 30), &r));
    assert!(point_in_rectangle(pt(30, 30), &r));
}

#[test]
fn point_just_outside_rectangle() {
    let r = Rectangle::new(10, 10, 20, 20);
    assert!(!point_in_rectangle(pt(9, 20), &r));
    assert!(!point_in_rectangle(pt(31, 20), &r));
    assert!(!point_in_rectangle(pt(20, 9), &r));
    assert!(!point_in_rectangle(pt(20, 31), &r));
}

// =============================================================
// handle_at
// =============================================================

#[test]
fn handle_at_finds_top_right() {
    assert_eq!(handle_at(pt(125, 36), &corner_handles()), Some(Handle::TopRight));
}

#[test]
fn handle_at_each_corner_center() {
    let handles = corner_handles();
    assert_eq!(handle_at(pt(30, 40), &handles), Some(Handle::TopLeft));
    assert_eq!(handle_at(pt(130, 40), &handles), Some(Handle::TopRight));
    assert_eq!(handle_at(pt(130, 150), &handles), Some(Handle::BottomRight));
    assert_eq!(handle_at(pt(30, 150), &handles), Some(Handle::BottomLeft));
}

#[test]
fn handle_at_boundary_is_inclusive() {
    let handles = corner_handles();
    assert_eq!(handle_at(pt(35, 45), &handles), Some(Handle::TopLeft));
    assert_eq!(handle_at(pt(25, 155), &handles), Some(Handle::BottomLeft));
}

#[test]
fn handle_at_none_outside_all_squares() {
    let handles = corner_handles();
    assert_eq!(handle_at(pt(80, 90), &handles), None);
    assert_eq!(handle_at(pt(36, 40), &handles), None);
    assert_eq!(handle_at(pt(0, 0), &handles), None);
}

#[test]
fn handle_at_overlap_prefers_canonical_order() {
    // Huge squares on a tiny rectangle overlap everywhere in the middle.
    let handles = handle_layout(&Rectangle::new(0, 0, 4, 4), 40);
    assert_eq!(handle_at(pt(2, 2), &handles), Some(Handle::TopLeft));
}

// =============================================================
// classify
// =============================================================

#[test]
fn classify_prefers_handle_over_body() {
    let rect = Rectangle::new(30, 40, 100, 110);
    assert_eq!(classify(pt(31, 41), &rect, 10), Some(HitPart::Handle(Handle::TopLeft)));
}

#[test]
fn classify_body() {
    let rect = Rectangle::new(30, 40, 100, 110);
    assert_eq!(classify(pt(80, 90), &rect, 10), Some(HitPart::Body));
}

#[test]
fn classify_handle_outside_body() {
    let rect = Rectangle::new(30, 40, 100, 110);
    assert_eq!(classify(pt(26, 36), &rect, 10), Some(HitPart::Handle(Handle::TopLeft)));
}

#[test]
fn classify_outside() {
    let rect = Rectangle::new(30, 40, 100, 110);
    assert_eq!(classify(pt(200, 200), &rect, 10), None);
}
