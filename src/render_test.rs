use super::*;
use crate::config::CropConfig;
use crate::geometry::{PreviewCopy, Point, Size, SourceRegion};
use crate::input::HoverClass;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Clear,
    Image(Rectangle),
    Stroke(Rectangle),
    Fill(Rectangle),
    Class(HoverClass, bool),
    Preview(Option<PreviewCopy>),
}

/// Records every draw call instead of painting.
#[derive(Default)]
struct RecordingSurface {
    calls: Vec<Call>,
    fail_on_clear: bool,
}

impl RecordingSurface {
    fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| matches(call)).count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) -> Result<(), CropError> {
        if self.fail_on_clear {
            return Err(CropError::Dom("canvas lost".into()));
        }
        self.calls.push(Call::Clear);
        Ok(())
    }

    fn draw_image(&mut self, dest: &Rectangle) -> Result<(), CropError> {
        self.calls.push(Call::Image(*dest));
        Ok(())
    }

    fn stroke_rect(&mut self, rect: &Rectangle) -> Result<(), CropError> {
        self.calls.push(Call::Stroke(*rect));
        Ok(())
    }

    fn fill_rect(&mut self, rect: &Rectangle) -> Result<(), CropError> {
        self.calls.push(Call::Fill(*rect));
        Ok(())
    }

    fn set_hover_class(&mut self, class: HoverClass, active: bool) -> Result<(), CropError> {
        self.calls.push(Call::Class(class, active));
        Ok(())
    }

    fn copy_to_preview(&mut self, copy: Option<&PreviewCopy>) -> Result<(), CropError> {
        self.calls.push(Call::Preview(copy.copied()));
        Ok(())
    }
}

fn seeded_core() -> EngineCore {
    let mut core = match EngineCore::configure(CropConfig::new(1, 1)) {
        Ok(core) => core,
        Err(err) => panic!("valid config: {err}"),
    };
    assert!(core.set_viewport(Size::new(400, 100)).is_ok());
    assert!(core.set_image(&Size::new(400, 100)).is_ok());
    core
}

fn apply_all(surface: &mut RecordingSurface, core: &EngineCore, actions: &[Action]) -> Vec<Rectangle> {
    let mut notified = Vec::new();
    let result = apply(surface, core, actions, &mut |rect: &Rectangle| {
        notified.push(*rect);
        Ok(())
    });
    assert!(result.is_ok(), "{result:?}");
    notified
}

// =============================================================
// draw_scene
// =============================================================

#[test]
fn scene_draws_image_then_crop_then_handles() {
    let core = seeded_core();
    let mut surface = RecordingSurface::default();
    assert!(draw_scene(&mut surface, &core).is_ok());

    let crop = Rectangle::new(150, 0, 100, 100);
    assert_eq!(surface.calls[0], Call::Clear);
    assert_eq!(surface.calls[1], Call::Image(Rectangle::new(0, 0, 400, 100)));
    assert_eq!(surface.calls[2], Call::Stroke(crop));
    assert_eq!(surface.calls[3], Call::Stroke(Rectangle::new(145, -5, 10, 10)));
    assert_eq!(surface.calls[4], Call::Fill(Rectangle::new(145, -5, 10, 10)));
    assert_eq!(surface.calls.len(), 3 + 4 * 2);
}

#[test]
fn unseeded_scene_only_clears() {
    let core = match EngineCore::configure(CropConfig::new(4, 3)) {
        Ok(core) => core,
        Err(err) => panic!("valid config: {err}"),
    };
    let mut surface = RecordingSurface::default();
    assert!(draw_scene(&mut surface, &core).is_ok());
    assert_eq!(surface.calls, vec![Call::Clear]);
}

#[test]
fn surface_errors_propagate() {
    let core = seeded_core();
    let mut surface = RecordingSurface { fail_on_clear: true, ..RecordingSurface::default() };
    assert!(matches!(draw_scene(&mut surface, &core), Err(CropError::Dom(_))));
    assert!(surface.calls.is_empty());
}

// =============================================================
// apply
// =============================================================

#[test]
fn repeated_render_requests_paint_once() {
    let core = seeded_core();
    let mut surface = RecordingSurface::default();
    apply_all(&mut surface, &core, &[Action::RenderNeeded, Action::RenderNeeded]);
    assert_eq!(surface.count(|c| *c == Call::Clear), 1);
}

#[test]
fn hover_overlay_is_drawn_after_repaint() {
    let mut core = seeded_core();
    core.on_pointer_move(Point::new(150, 0));
    let actions = core.on_pointer_move(Point::new(250, 0));
    let mut surface = RecordingSurface::default();
    apply_all(&mut surface, &core, &actions);

    let overlay = Rectangle::new(243, -7, 14, 14);
    let clear_at = surface.calls.iter().position(|c| *c == Call::Clear);
    let overlay_at = surface.calls.iter().position(|c| *c == Call::Stroke(overlay));
    assert!(clear_at < overlay_at, "{:?}", surface.calls);
    assert!(surface.calls.contains(&Call::Fill(overlay)));
    assert!(surface.calls.contains(&Call::Class(HoverClass::Hover, true)));
    assert!(surface.calls.contains(&Call::Class(HoverClass::CropHover, false)));
}

#[test]
fn rectangle_changes_notify_listener_and_preview() {
    let mut core = seeded_core();
    core.on_pointer_down(Point::new(200, 50));
    let actions = core.on_pointer_move(Point::new(180, 50));
    let mut surface = RecordingSurface::default();
    let notified = apply_all(&mut surface, &core, &actions);

    assert_eq!(notified, vec![Rectangle::new(130, 0, 100, 100)]);
    let Some(Call::Preview(Some(copy))) = surface.calls.last() else {
        panic!("expected a preview copy last, got {:?}", surface.calls);
    };
    assert_eq!(copy.source, SourceRegion { x: 130.0, y: 0.0, width: 100.0, height: 100.0 });
}

#[test]
fn preview_cleared_blanks_preview() {
    let core = seeded_core();
    let mut surface = RecordingSurface::default();
    apply_all(&mut surface, &core, &[Action::PreviewCleared]);
    assert_eq!(surface.calls, vec![Call::Preview(None)]);
}

#[test]
fn session_actions_draw_nothing() {
    let core = seeded_core();
    let mut surface = RecordingSurface::default();
    let actions = [Action::SessionStarted(crate::input::SessionKind::Move), Action::SessionEnded];
    apply_all(&mut surface, &core, &actions);
    assert!(surface.calls.is_empty());
}

#[test]
fn listener_error_stops_the_batch() {
    let core = seeded_core();
    let mut surface = RecordingSurface::default();
    let rect = Rectangle::new(150, 0, 100, 100);
    let actions = [Action::RectangleChanged(rect), Action::PreviewCleared];
    let result = apply(&mut surface, &core, &actions, &mut |_: &Rectangle| {
        Err(CropError::Dom("listener threw".into()))
    });
    assert!(matches!(result, Err(CropError::Dom(ref msg)) if msg == "listener threw"));
    assert!(surface.calls.is_empty());
}
