#![allow(clippy::float_cmp)]

use std::collections::BTreeMap;

use super::*;
use crate::input::DeltaMode;
use crate::selection::Snapshot;

fn doc(id: u32, words: &[(&str, u32)]) -> Rc<DatasetDocument> {
    let word_counts: BTreeMap<String, u32> = words.iter().map(|(w, c)| ((*w).to_owned(), *c)).collect();
    Rc::new(DatasetDocument { id, word_counts, position: Point::new(0.0, 0.0) })
}

/// Core sized to a 400 × 200 plot area at offset (32, 32).
fn sized_core() -> WordCloudCore {
    let mut core = WordCloudCore::new(WordCloudConfig::default());
    assert!(core.resize(464.0, 264.0).is_ok());
    core
}

fn three_words() -> Rc<DatasetDocument> {
    doc(1, &[("river", 9), ("stone", 4), ("moss", 1)])
}

fn word_pos(core: &WordCloudCore, word: &str) -> Point {
    let Some(placed) = core.layout().get(word) else {
        panic!("{word} missing from layout");
    };
    core.scene().local_to_surface(placed.rect.center())
}

fn click(core: &mut WordCloudCore, at: Point) -> Vec<Action> {
    core.on_pointer_down(at, Button::Primary).unwrap_or_default();
    core.on_pointer_up(at, Button::Primary).unwrap_or_default()
}

fn capture(core: &mut WordCloudCore) -> Rc<RefCell<Vec<SelectedWords>>> {
    let seen: Rc<RefCell<Vec<SelectedWords>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let handler: ChangeHandler<String> = Box::new(move |snapshot| sink.borrow_mut().push(snapshot));
    assert!(core.set_selected_words_change_handler(Some(handler)).is_ok());
    seen
}

fn words(items: &[&str]) -> SelectedWords {
    Snapshot::new(items.iter().map(|w| (*w).to_owned()))
}

fn background() -> Point {
    // Plot-area corner; the centered layout never reaches it for three words.
    Point::new(34.0, 34.0)
}

// =============================================================
// Data and layout
// =============================================================

#[test]
fn layout_waits_for_first_size() {
    let mut core = WordCloudCore::new(WordCloudConfig::default());
    assert_eq!(core.set_data(Some(three_words())).ok(), Some(Vec::new()));
    assert!(core.layout().is_empty());
    assert!(core.scene().is_empty());

    let actions = core.resize(464.0, 264.0).unwrap_or_default();
    assert!(actions.contains(&Action::RenderNeeded));
    assert_eq!(core.layout().len(), 3);
    assert_eq!(core.scene().len(), 3);
}

#[test]
fn words_become_text_elements() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    let Some(element) = core.scene().get(&"river".to_owned()) else {
        panic!("river missing from scene");
    };
    let Shape::Text { text, rect, .. } = &element.shape else {
        panic!("expected a text shape");
    };
    assert_eq!(text, "river");
    // Most frequent word sits in the middle of the plot area.
    assert!((rect.center().x - 200.0).abs() < 1e-9);
    assert!((rect.center().y - 100.0).abs() < 1e-9);
    assert_eq!(core.scene().offset(), Point::new(32.0, 32.0));
}

#[test]
fn same_document_is_not_laid_out_again() {
    let mut core = sized_core();
    let document = three_words();
    assert!(core.set_data(Some(Rc::clone(&document))).is_ok());
    assert_eq!(core.set_data(Some(document)).ok(), Some(Vec::new()));
}

#[test]
fn equal_but_distinct_document_is_laid_out() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    let actions = core.set_data(Some(three_words())).unwrap_or_default();
    assert!(actions.contains(&Action::RenderNeeded));
}

#[test]
fn new_document_replaces_words_and_resets_zoom() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    let delta = WheelDelta { dx: 0.0, dy: -500.0, mode: DeltaMode::Pixel };
    assert!(core.on_wheel(Point::new(232.0, 132.0), delta, Modifiers::default()).is_ok());
    assert_ne!(core.transform(), ZoomTransform::IDENTITY);

    assert!(core.set_data(Some(doc(2, &[("stone", 2), ("sky", 1)]))).is_ok());
    assert_eq!(core.transform(), ZoomTransform::IDENTITY);
    assert_eq!(core.scene().len(), 2);
    assert!(core.scene().contains(&"sky".to_owned()));
    assert!(!core.scene().contains(&"river".to_owned()));
}

#[test]
fn clearing_data_empties_scene() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    assert!(core.clear_data().is_ok());
    assert!(core.document().is_none());
    assert!(core.layout().is_empty());
    assert!(core.scene().is_empty());
    assert_eq!(core.clear_data().ok(), Some(Vec::new()));
}

#[test]
fn resize_relayouts_by_default() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    assert!(core.resize(864.0, 464.0).is_ok());
    let Some(river) = core.layout().get("river") else {
        panic!("river missing from layout");
    };
    assert!((river.rect.center().x - 400.0).abs() < 1e-9);
    assert!((river.rect.center().y - 200.0).abs() < 1e-9);
}

#[test]
fn resize_keeps_layout_when_relayout_is_off() {
    let config = WordCloudConfig { relayout_on_resize: false, ..WordCloudConfig::default() };
    let mut core = WordCloudCore::new(config);
    assert!(core.set_data(Some(three_words())).is_ok());
    // The first size always lays out.
    assert!(core.resize(464.0, 264.0).is_ok());
    let before = core.layout().clone();
    assert_eq!(before.len(), 3);

    assert!(core.resize(864.0, 464.0).is_ok());
    assert_eq!(core.layout(), &before);
}

// =============================================================
// Selection
// =============================================================

#[test]
fn clicking_word_selects_and_notifies() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    let seen = capture(&mut core);

    let at = word_pos(&core, "stone");
    let actions = click(&mut core, at);
    assert!(actions.contains(&Action::RenderNeeded));
    assert!(core.is_selected("stone"));
    assert_eq!(seen.borrow().len(), 1);
    assert!(seen.borrow()[0].contains(&"stone".to_owned()));
    assert_eq!(seen.borrow()[0].version().origin, core.id());

    click(&mut core, at);
    assert!(!core.is_selected("stone"));
    assert!(seen.borrow()[1].is_empty());
}

#[test]
fn echoed_snapshot_is_a_no_op() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    let seen = capture(&mut core);
    let at = word_pos(&core, "moss");
    click(&mut core, at);

    let echoed = seen.borrow()[0].clone();
    assert_eq!(core.set_selected_words(&echoed).ok(), Some(Vec::new()));
    assert!(core.is_selected("moss"));
}

#[test]
fn host_selection_marks_words() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    let actions = core.set_selected_words(&words(&["river", "absent"])).unwrap_or_default();
    assert!(actions.contains(&Action::RenderNeeded));
    assert!(core.is_selected("river"));
    assert!(!core.is_selected("stone"));
    assert!(!core.is_selected("absent"));
}

#[test]
fn selection_survives_new_document() {
    let mut core = sized_core();
    assert!(core.set_selected_words(&words(&["stone"])).is_ok());
    assert!(core.set_data(Some(three_words())).is_ok());
    assert!(core.is_selected("stone"));
    assert!(core.set_data(Some(doc(2, &[("stone", 1)]))).is_ok());
    assert!(core.is_selected("stone"));
}

#[test]
fn background_click_clears_selection_once() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    assert!(core.set_selected_words(&words(&["river", "moss"])).is_ok());
    let seen = capture(&mut core);

    click(&mut core, background());
    assert!(!core.is_selected("river"));
    assert_eq!(seen.borrow().len(), 1);
    assert!(seen.borrow()[0].is_empty());

    click(&mut core, background());
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn drag_does_not_select() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    let seen = capture(&mut core);
    let at = word_pos(&core, "river");
    assert!(core.on_pointer_down(at, Button::Primary).is_ok());
    assert!(core.on_pointer_move(Point::new(at.x + 40.0, at.y)).is_ok());
    assert!(core.on_pointer_up(Point::new(at.x + 40.0, at.y), Button::Primary).is_ok());
    assert!(!core.is_selected("river"));
    assert!(seen.borrow().is_empty());
    assert_eq!(core.transform(), ZoomTransform::new(1.0, 40.0, 0.0));
}

#[test]
fn common_words_compose_with_selection() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    assert!(core.set_selected_words(&words(&["river"])).is_ok());
    let common = words(&["river", "stone"]);
    let actions = core.set_common_words(&common).unwrap_or_default();
    assert!(actions.contains(&Action::RenderNeeded));

    assert!(core.is_common("river") && core.is_selected("river"));
    assert!(core.is_common("stone") && !core.is_selected("stone"));
    assert!(!core.is_common("moss"));
    assert_eq!(core.set_common_words(&common).ok(), Some(Vec::new()));
}

// =============================================================
// Zoom and pointer
// =============================================================

#[test]
fn zoom_keeps_hit_testing_aligned() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    // Zoom about the word itself so it stays inside the plot area.
    let before = word_pos(&core, "stone");
    let delta = WheelDelta { dx: 0.0, dy: -500.0, mode: DeltaMode::Pixel };
    assert!(core.on_wheel(before, delta, Modifiers::default()).is_ok());
    assert_eq!(core.scene().transform(), core.transform());
    assert!(core.transform().k > 1.0);

    let at = word_pos(&core, "stone");
    click(&mut core, at);
    assert!(core.is_selected("stone"));
}

#[test]
fn animated_reset_runs_through_ticks() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    assert!(core.on_pointer_down(Point::new(100.0, 100.0), Button::Primary).is_ok());
    assert!(core.on_pointer_move(Point::new(150.0, 100.0)).is_ok());
    assert!(core.on_pointer_up(Point::new(150.0, 100.0), Button::Primary).is_ok());

    let actions = core.reset_zoom(true).unwrap_or_default();
    assert!(actions.contains(&Action::AnimationRunning));
    assert!(core.tick(0.0).is_ok());
    assert!(core.tick(750.0).is_ok());
    assert_eq!(core.transform(), ZoomTransform::IDENTITY);
    assert!(!core.surface().is_animating());
}

#[test]
fn hovering_word_shows_pointer_cursor() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    let at = word_pos(&core, "river");
    let actions = core.on_pointer_move(at).unwrap_or_default();
    assert!(actions.contains(&Action::SetCursor(Cursor::Pointer)));

    let actions = core.on_pointer_leave().unwrap_or_default();
    assert!(actions.contains(&Action::SetCursor(Cursor::Default)));
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn destroy_releases_words_and_rejects_calls() {
    let mut core = sized_core();
    assert!(core.set_data(Some(three_words())).is_ok());
    assert!(core.destroy().is_ok());
    assert!(core.scene().is_empty());
    assert!(matches!(core.set_data(None), Err(VizError::Destroyed)));
    assert!(matches!(core.set_selected_words(&words(&["river"])), Err(VizError::Destroyed)));
    assert!(matches!(core.destroy(), Err(VizError::Destroyed)));
}
