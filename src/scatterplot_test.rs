#![allow(clippy::float_cmp)]

use std::collections::BTreeMap;

use super::*;
use crate::input::DeltaMode;
use crate::popover::{PopoverState, RecordingPopover};
use crate::selection::Snapshot;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn doc(id: DocId, words: &[(&str, u32)], x: f64, y: f64) -> Rc<DatasetDocument> {
    let word_counts: BTreeMap<String, u32> = words.iter().map(|(w, c)| ((*w).to_owned(), *c)).collect();
    Rc::new(DatasetDocument { id, word_counts, position: Point::new(x, y) })
}

/// Core with a recording popover, sized to a 400 × 200 plot area.
fn sized_core() -> (ScatterplotCore, Rc<RefCell<PopoverState>>) {
    let popover = RecordingPopover::new();
    let state = popover.state();
    let mut core = ScatterplotCore::new(ScatterplotConfig::default(), Box::new(popover));
    assert!(core.resize(464.0, 248.0).is_ok());
    (core, state)
}

fn two_docs() -> Vec<Rc<DatasetDocument>> {
    vec![doc(1, &[("a", 3), ("b", 1)], 0.0, 0.0), doc(2, &[("a", 1), ("b", 5)], 10.0, 10.0)]
}

fn seven_and_eight() -> Vec<Rc<DatasetDocument>> {
    vec![doc(7, &[("the", 2)], 0.0, 0.0), doc(8, &[("of", 1)], 10.0, 10.0)]
}

fn capture(core: &mut ScatterplotCore) -> Rc<RefCell<Vec<SelectedPoints>>> {
    let seen: Rc<RefCell<Vec<SelectedPoints>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let handler: ChangeHandler<DocId> = Box::new(move |snapshot| sink.borrow_mut().push(snapshot));
    assert!(core.set_selected_points_change_handler(Some(handler)).is_ok());
    seen
}

fn surface_pos(core: &ScatterplotCore, id: DocId) -> Point {
    let center = core.scene().get(&id).map(|e| e.shape.center()).unwrap_or_default();
    core.scene().local_to_surface(center)
}

fn click(core: &mut ScatterplotCore, pt: Point) -> Vec<Action> {
    assert!(core.on_pointer_down(pt, Button::Primary).is_ok());
    core.on_pointer_up(pt, Button::Primary).unwrap_or_default()
}

fn ids(snapshot: &SelectedPoints) -> Vec<DocId> {
    snapshot.iter().copied().collect()
}

fn words(list: &[&str]) -> SelectedWords {
    Snapshot::new(list.iter().map(|w| (*w).to_owned()))
}

// =============================================================
// End-to-end
// =============================================================

#[test]
fn end_to_end_bounds_zoom_and_word_filter() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(two_docs()).is_ok());
    assert_eq!(core.bounds(), Bounds { min_x: 0.0, min_y: 0.0, max_x: 10.0, max_y: 10.0 });

    assert!(core.zoom_to_point(2, false).is_ok());
    let center = core.surface().inner_center();
    let (zx, zy) = core.zoomed_scales();
    assert!(approx_eq(zx.invert(center.x), 10.0));
    assert!(approx_eq(zy.invert(center.y), 10.0));
    assert!(approx_eq(core.transform().k, 1.0));

    assert!(core.set_selected_words(&words(&["a"])).is_ok());
    assert!(core.is_filtered(1) && core.is_filtered(2));
    assert!(core.set_selected_words(&words(&["b"])).is_ok());
    assert!(core.is_filtered(1) && core.is_filtered(2));
    assert!(core.set_selected_words(&words(&["a", "b"])).is_ok());
    assert!(core.is_filtered(1) && core.is_filtered(2));
    assert!(core.set_selected_words(&words(&["c"])).is_ok());
    assert!(!core.is_filtered(1) && !core.is_filtered(2));
}

// =============================================================
// Data
// =============================================================

#[test]
fn empty_data_uses_unit_bounds() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(Vec::new()).is_ok());
    assert_eq!(core.bounds(), Bounds::default());
    assert!(core.scene().is_empty());
}

#[test]
fn set_data_before_sizing_defers_rendering() {
    let mut core = ScatterplotCore::new(ScatterplotConfig::default(), Box::new(NoopPopover));
    assert_eq!(core.set_data(two_docs()).unwrap_or_default(), Vec::new());
    assert!(core.scene().is_empty());
    assert_eq!(core.bounds().max_x, 10.0);

    assert!(core.resize(464.0, 248.0).is_ok());
    assert_eq!(core.scene().len(), 2);
    assert!(core.scene().x_axis.is_some());
}

#[test]
fn points_sit_at_scaled_positions() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(two_docs()).is_ok());
    let first = core.scene().get(&1).map(|e| e.shape.center());
    let second = core.scene().get(&2).map(|e| e.shape.center());
    assert_eq!(first, Some(Point::new(0.0, 200.0)));
    assert_eq!(second, Some(Point::new(400.0, 0.0)));
}

#[test]
fn set_data_joins_by_id() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(two_docs()).is_ok());
    let next = vec![doc(2, &[], 0.0, 0.0), doc(3, &[], 5.0, 5.0)];
    assert!(core.set_data(next).is_ok());
    let keys: Vec<DocId> = core.scene().iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![2, 3]);
}

#[test]
fn set_data_resets_zoom_but_keeps_selection() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    assert!(core.set_selected_points(&Snapshot::new([8])).is_ok());
    let delta = WheelDelta { dx: 0.0, dy: -500.0, mode: DeltaMode::Pixel };
    assert!(core.on_wheel(Point::new(100.0, 100.0), delta, Modifiers::default()).is_ok());
    assert!(core.transform().k > 1.0);

    let next = vec![doc(8, &[], 3.0, 3.0), doc(9, &[], 4.0, 4.0)];
    assert!(core.set_data(next).is_ok());
    assert_eq!(core.transform(), ZoomTransform::IDENTITY);
    assert!(core.is_selected(8));
    assert!(!core.is_selected(9));
}

#[test]
fn entering_points_pick_up_current_selection() {
    let (mut core, _) = sized_core();
    assert!(core.set_selected_points(&Snapshot::new([2])).is_ok());
    assert!(core.set_data(two_docs()).is_ok());
    assert!(core.is_selected(2));
    assert!(!core.is_selected(1));
}

#[test]
fn clear_data_removes_every_point() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(two_docs()).is_ok());
    assert!(core.clear_data().is_ok());
    assert!(core.scene().is_empty());
    assert!(core.documents().is_empty());
}

// =============================================================
// Selection sync
// =============================================================

#[test]
fn set_selected_points_marks_members() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    let actions = core.set_selected_points(&Snapshot::new([7])).unwrap_or_default();
    assert!(actions.contains(&Action::RenderNeeded));
    assert!(core.is_selected(7));
    assert!(!core.is_selected(8));
}

#[test]
fn same_version_is_a_no_op() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    let snapshot = Snapshot::new([7]);
    assert!(core.set_selected_points(&snapshot).is_ok());
    assert_eq!(core.set_selected_points(&snapshot.clone()).unwrap_or_default(), Vec::new());
}

#[test]
fn new_version_with_equal_items_is_applied() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    assert!(core.set_selected_points(&Snapshot::new([7])).is_ok());
    // Same members under a new version: applied, nothing visibly changes.
    let actions = core.set_selected_points(&Snapshot::new([7])).unwrap_or_default();
    assert!(!actions.contains(&Action::RenderNeeded));
    assert!(core.is_selected(7));
}

#[test]
fn host_snapshot_is_never_mutated() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    let host = Snapshot::new([7]);
    assert!(core.set_selected_points(&host).is_ok());
    let at = surface_pos(&core, 8);
    click(&mut core, at);
    assert_eq!(ids(&host), vec![7]);
    assert!(core.is_selected(7) && core.is_selected(8));
}

#[test]
fn click_echoes_fresh_snapshots() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    let seen = capture(&mut core);
    let at = surface_pos(&core, 7);
    assert_eq!(at, Point::new(32.0, 216.0));

    click(&mut core, at);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(ids(&seen.borrow()[0]), vec![7]);
    assert!(core.is_selected(7));

    click(&mut core, at);
    assert_eq!(seen.borrow().len(), 2);
    assert!(seen.borrow()[1].is_empty());
    assert!(!core.is_selected(7));
    assert_ne!(seen.borrow()[0].version(), seen.borrow()[1].version());
}

#[test]
fn echoed_snapshot_pushed_back_is_a_no_op() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    let seen = capture(&mut core);
    let at = surface_pos(&core, 7);
    click(&mut core, at);
    let echoed = seen.borrow()[0].clone();
    assert_eq!(core.set_selected_points(&echoed).unwrap_or_default(), Vec::new());
}

#[test]
fn background_click_clears_selection_once() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    assert!(core.set_selected_points(&Snapshot::new([7, 8])).is_ok());
    let seen = capture(&mut core);

    click(&mut core, Point::new(232.0, 116.0));
    assert_eq!(seen.borrow().len(), 1);
    assert!(seen.borrow()[0].is_empty());
    assert!(!core.is_selected(7) && !core.is_selected(8));

    click(&mut core, Point::new(232.0, 116.0));
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn drag_never_toggles_selection() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    let seen = capture(&mut core);
    let at = surface_pos(&core, 7);
    assert!(core.on_pointer_down(at, Button::Primary).is_ok());
    assert!(core.on_pointer_move(Point::new(at.x + 40.0, at.y - 20.0)).is_ok());
    assert!(core.on_pointer_up(Point::new(at.x + 40.0, at.y - 20.0), Button::Primary).is_ok());
    assert!(seen.borrow().is_empty());
    assert_eq!(core.transform(), ZoomTransform::new(1.0, 40.0, -20.0));
}

#[test]
fn points_panned_into_the_margin_are_not_clickable() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    let seen = capture(&mut core);
    // Pan 20 px left from the background so point 7 lands left of the plot area.
    assert!(core.on_pointer_down(Point::new(232.0, 116.0), Button::Primary).is_ok());
    assert!(core.on_pointer_move(Point::new(212.0, 116.0)).is_ok());
    assert!(core.on_pointer_up(Point::new(212.0, 116.0), Button::Primary).is_ok());
    let at = surface_pos(&core, 7);
    assert_eq!(at, Point::new(12.0, 216.0));

    assert!(core.on_pointer_move(at).is_ok());
    assert_eq!(core.hovered(), None);
    click(&mut core, at);
    assert!(seen.borrow().is_empty());
    assert!(!core.is_selected(7));
}

#[test]
fn replacing_handler_drops_the_old_one() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    let first = capture(&mut core);
    let second = capture(&mut core);
    let at = surface_pos(&core, 8);
    click(&mut core, at);
    assert!(first.borrow().is_empty());
    assert_eq!(second.borrow().len(), 1);
}

// =============================================================
// Word filter
// =============================================================

#[test]
fn empty_word_selection_flags_nothing() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    assert!(core.set_selected_words(&words(&["the"])).is_ok());
    assert!(core.set_selected_words(&Snapshot::empty()).is_ok());
    assert!(!core.is_filtered(7) && !core.is_filtered(8));
}

#[test]
fn word_selection_flags_exact_matches() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    assert!(core.set_selected_words(&words(&["the"])).is_ok());
    assert!(core.is_filtered(7));
    assert!(!core.is_filtered(8));
}

#[test]
fn word_filter_survives_new_data() {
    let (mut core, _) = sized_core();
    assert!(core.set_selected_words(&words(&["a"])).is_ok());
    assert!(core.set_data(two_docs()).is_ok());
    assert!(core.is_filtered(1) && core.is_filtered(2));
}

#[test]
fn disabled_word_filter_is_reported() {
    let config = ScatterplotConfig {
        capabilities: crate::config::Capabilities { word_filter: false, ..Default::default() },
        ..Default::default()
    };
    let mut core = ScatterplotCore::new(config, Box::new(NoopPopover));
    let err = core.set_selected_words(&words(&["a"])).err();
    assert!(matches!(err, Some(VizError::CapabilityDisabled("word_filter"))));
}

// =============================================================
// Fixed ratio
// =============================================================

#[test]
fn fixed_ratio_squares_bounds_and_ranges() {
    let (mut core, _) = sized_core();
    let docs = vec![doc(1, &[], 0.0, 2.0), doc(2, &[], 4.0, 10.0)];
    assert!(core.set_data(docs).is_ok());
    assert!(core.set_fixed_ratio(true).is_ok());
    assert!(core.fixed_ratio());

    let b = core.bounds();
    assert_eq!(b, Bounds { min_x: 0.0, min_y: 0.0, max_x: 10.0, max_y: 10.0 });
    let (x0, x1) = core.x_scale().range();
    let (y0, y1) = core.y_scale().range();
    assert_eq!(x1 - x0, y0 - y1);
    assert_eq!(x1 - x0, 200.0);
}

#[test]
fn fixed_ratio_resets_zoom_and_skips_when_unchanged() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(two_docs()).is_ok());
    assert!(core.zoom_to_point(2, false).is_ok());
    assert_ne!(core.transform(), ZoomTransform::IDENTITY);
    assert!(core.set_fixed_ratio(true).is_ok());
    assert_eq!(core.transform(), ZoomTransform::IDENTITY);
    assert_eq!(core.set_fixed_ratio(true).unwrap_or_default(), Vec::new());
}

#[test]
fn disabled_fixed_ratio_is_reported() {
    let config = ScatterplotConfig {
        fixed_ratio: true,
        capabilities: crate::config::Capabilities { fixed_ratio: false, ..Default::default() },
        ..Default::default()
    };
    let mut core = ScatterplotCore::new(config, Box::new(NoopPopover));
    assert!(!core.fixed_ratio());
    assert!(matches!(core.set_fixed_ratio(true), Err(VizError::CapabilityDisabled("fixed_ratio"))));
}

// =============================================================
// Zoom
// =============================================================

#[test]
fn zoom_moves_layer_not_points() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(two_docs()).is_ok());
    let before: Vec<Point> = core.scene().iter().map(|(_, e)| e.shape.center()).collect();
    let axis_before = core.scene().x_axis.clone();

    let delta = WheelDelta { dx: 0.0, dy: -500.0, mode: DeltaMode::Pixel };
    let actions = core.on_wheel(Point::new(232.0, 116.0), delta, Modifiers::default()).unwrap_or_default();
    assert!(actions.contains(&Action::RenderNeeded));

    let after: Vec<Point> = core.scene().iter().map(|(_, e)| e.shape.center()).collect();
    assert_eq!(before, after);
    assert!(approx_eq(core.scene().transform().k, 2.0));
    assert_ne!(core.scene().x_axis, axis_before);
}

#[test]
fn zoom_to_point_requires_size() {
    let mut core = ScatterplotCore::new(ScatterplotConfig::default(), Box::new(NoopPopover));
    assert!(core.set_data(two_docs()).is_ok());
    assert!(matches!(core.zoom_to_point(1, false), Err(VizError::NotSized)));
}

#[test]
fn zoom_to_unknown_point_is_reported() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(two_docs()).is_ok());
    assert!(matches!(core.zoom_to_point(99, false), Err(VizError::UnknownDocument(99))));
    assert_eq!(core.transform(), ZoomTransform::IDENTITY);
}

#[test]
fn zoom_to_point_keeps_scale() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(two_docs()).is_ok());
    let delta = WheelDelta { dx: 0.0, dy: -500.0, mode: DeltaMode::Pixel };
    assert!(core.on_wheel(Point::new(100.0, 100.0), delta, Modifiers::default()).is_ok());
    assert!(core.zoom_to_point(1, false).is_ok());
    assert!(approx_eq(core.transform().k, 2.0));
    let (zx, zy) = core.zoomed_scales();
    assert!(approx_eq(zx.invert(200.0), 0.0));
    assert!(approx_eq(zy.invert(100.0), 0.0));
}

#[test]
fn animated_reset_runs_through_ticks() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(two_docs()).is_ok());
    assert!(core.zoom_to_point(2, false).is_ok());
    let actions = core.reset_zoom(true).unwrap_or_default();
    assert!(actions.contains(&Action::AnimationRunning));
    assert!(core.tick(0.0).is_ok());
    assert!(core.tick(300.0).is_ok());
    let last = core.tick(750.0).unwrap_or_default();
    assert!(last.contains(&Action::RenderNeeded));
    assert!(!last.contains(&Action::AnimationRunning));
    assert_eq!(core.transform(), ZoomTransform::IDENTITY);
}

#[test]
fn immediate_reset_returns_to_identity() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(two_docs()).is_ok());
    assert!(core.zoom_to_point(2, false).is_ok());
    assert!(core.reset_zoom(false).is_ok());
    assert_eq!(core.transform(), ZoomTransform::IDENTITY);
}

// =============================================================
// Resize
// =============================================================

#[test]
fn resize_with_same_size_is_a_no_op() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(two_docs()).is_ok());
    let before: Vec<Point> = core.scene().iter().map(|(_, e)| e.shape.center()).collect();
    assert_eq!(core.resize(464.0, 248.0).unwrap_or_default(), Vec::new());
    assert_eq!(core.resize(464.0, 248.0).unwrap_or_default(), Vec::new());
    let after: Vec<Point> = core.scene().iter().map(|(_, e)| e.shape.center()).collect();
    assert_eq!(before, after);
}

#[test]
fn resize_keeps_zoom_and_selection() {
    let (mut core, _) = sized_core();
    assert!(core.set_data(two_docs()).is_ok());
    assert!(core.set_selected_points(&Snapshot::new([1])).is_ok());
    assert!(core.zoom_to_point(2, false).is_ok());
    let t = core.transform();

    assert!(core.resize(864.0, 448.0).is_ok());
    assert_eq!(core.transform(), t);
    assert!(core.is_selected(1));
    assert_eq!(core.scene().get(&2).map(|e| e.shape.center()), Some(Point::new(800.0, 0.0)));
}

// =============================================================
// Popover
// =============================================================

#[test]
fn hover_shows_and_leave_hides() {
    let (mut core, popover) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    let at = surface_pos(&core, 7);

    let actions = core.on_pointer_move(at).unwrap_or_default();
    assert!(actions.contains(&Action::SetCursor(Cursor::Pointer)));
    assert_eq!(core.hovered(), Some(7));
    assert_eq!(popover.borrow().visible, Some((7, at)));

    assert!(core.on_pointer_move(Point::new(232.0, 116.0)).is_ok());
    assert_eq!(core.hovered(), None);
    assert_eq!(popover.borrow().visible, None);
}

#[test]
fn selected_point_keeps_popover_pinned() {
    let (mut core, popover) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    let at = surface_pos(&core, 7);
    assert!(core.on_pointer_move(at).is_ok());
    click(&mut core, at);
    assert!(core.on_pointer_leave().is_ok());
    assert_eq!(popover.borrow().visible.map(|(id, _)| id), Some(7));

    // Host deselects it: the pin is released.
    assert!(core.set_selected_points(&Snapshot::empty()).is_ok());
    assert_eq!(popover.borrow().visible, None);
}

#[test]
fn pinned_popover_returns_after_hovering_another_point() {
    let (mut core, popover) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    let seven = surface_pos(&core, 7);
    let eight = surface_pos(&core, 8);
    click(&mut core, seven);

    assert!(core.on_pointer_move(eight).is_ok());
    assert_eq!(popover.borrow().visible.map(|(id, _)| id), Some(8));
    assert!(core.on_pointer_leave().is_ok());
    assert_eq!(popover.borrow().visible, Some((7, seven)));

    // Moving off onto the background restores it as well.
    assert!(core.on_pointer_move(eight).is_ok());
    assert!(core.on_pointer_move(Point::new(232.0, 116.0)).is_ok());
    assert_eq!(popover.borrow().visible, Some((7, seven)));

    // Deselecting by click releases the pin.
    click(&mut core, seven);
    assert_eq!(popover.borrow().visible, None);
    assert!(core.on_pointer_move(eight).is_ok());
    assert!(core.on_pointer_leave().is_ok());
    assert_eq!(popover.borrow().visible, None);
}

#[test]
fn background_click_hides_pinned_popover() {
    let (mut core, popover) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    let at = surface_pos(&core, 7);
    click(&mut core, at);
    assert!(popover.borrow().visible.is_some());
    click(&mut core, Point::new(232.0, 116.0));
    assert_eq!(popover.borrow().visible, None);
}

#[test]
fn pinned_popover_follows_zoom() {
    let (mut core, popover) = sized_core();
    assert!(core.set_data(seven_and_eight()).is_ok());
    let at = surface_pos(&core, 8);
    click(&mut core, at);
    assert!(core.reset_zoom(false).is_ok());
    assert!(core.zoom_to_point(8, false).is_ok());
    assert_eq!(popover.borrow().visible, Some((8, Point::new(232.0, 116.0))));
}

#[test]
fn disabled_popover_is_never_shown() {
    let popover = RecordingPopover::new();
    let state = popover.state();
    let config = ScatterplotConfig {
        capabilities: crate::config::Capabilities { popover: false, ..Default::default() },
        ..Default::default()
    };
    let mut core = ScatterplotCore::new(config, Box::new(popover));
    assert!(core.resize(464.0, 248.0).is_ok());
    assert!(core.set_data(seven_and_eight()).is_ok());
    let at = surface_pos(&core, 7);
    assert!(core.on_pointer_move(at).is_ok());
    click(&mut core, at);
    assert_eq!(state.borrow().shows, 0);
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn destroy_releases_everything() {
    let (mut core, popover) = sized_core();
    assert!(core.set_data(two_docs()).is_ok());
    assert!(core.destroy().is_ok());
    assert!(popover.borrow().destroyed);
    assert!(core.scene().is_empty());
    assert!(core.scene().x_axis.is_none());
}

#[test]
fn calls_after_destroy_are_rejected() {
    let (mut core, _) = sized_core();
    assert!(core.destroy().is_ok());
    assert!(matches!(core.set_data(two_docs()), Err(VizError::Destroyed)));
    assert!(matches!(core.resize(10.0, 10.0), Err(VizError::Destroyed)));
    assert!(matches!(core.tick(0.0), Err(VizError::Destroyed)));
    assert!(matches!(core.destroy(), Err(VizError::Destroyed)));
}

#[test]
fn configured_instance_id_is_used() {
    let id = Uuid::new_v4();
    let config = ScatterplotConfig { instance_id: Some(id), ..Default::default() };
    let core = ScatterplotCore::new(config, Box::new(NoopPopover));
    assert_eq!(core.id(), id);
}
