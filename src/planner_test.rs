use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::model::{Shape, TableTag};

// =============================================================
// Helpers
// =============================================================

fn planner(guests: &str, count: usize, shape: Shape, size: usize, ends: usize) -> Planner {
    Planner::begin("Gala", guests, &TableSetup::Uniform { count, shape, size, ends }, 50).unwrap()
}

fn seats(p: &Planner, table: TableId) -> Vec<Option<String>> {
    p.store().table(table).unwrap().seats.clone()
}

fn s(name: &str) -> Option<String> {
    Some(name.to_owned())
}

/// Apply `op`, then check undo restores the prior state and redo re-applies it.
fn assert_undo_redo(p: &mut Planner, op: impl FnOnce(&mut Planner)) {
    let before = p.state().clone();
    op(p);
    let after = p.state().clone();
    assert_ne!(before, after, "operation should change state");
    assert!(p.undo());
    assert_eq!(p.state(), &before);
    assert!(p.redo());
    assert_eq!(p.state(), &after);
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn begin_starts_with_empty_history() {
    let p = planner("A\nB", 2, Shape::Circle, 4, 0);
    assert_eq!(p.event_name(), "Gala");
    assert!(!p.can_undo());
    assert!(!p.can_redo());
    assert_eq!(p.history().limit(), 50);
}

#[test]
fn begin_propagates_setup_errors() {
    let err = Planner::begin("X", "", &TableSetup::Uniform { count: 1, shape: Shape::Circle, size: 4, ends: 0 }, 50)
        .unwrap_err();
    assert_eq!(err, SeatingError::NoGuests);
}

#[test]
fn load_clears_history_and_selection() {
    let mut p = planner("A\nB", 1, Shape::Circle, 4, 0);
    p.place_guest("A", Location::Unseated, 1, 0).unwrap();
    p.click_unseated("B").unwrap();
    let other = planner("Z", 1, Shape::Circle, 2, 0).state().clone();
    p.load("Other", other.clone()).unwrap();
    assert_eq!(p.event_name(), "Other");
    assert_eq!(p.state(), &other);
    assert!(!p.can_undo());
    assert!(p.selection().is_none());
}

#[test]
fn load_invalid_state_keeps_current_event() {
    let mut p = planner("A", 1, Shape::Circle, 4, 0);
    p.place_guest("A", Location::Unseated, 1, 0).unwrap();
    let before = p.state().clone();
    let mut bad = before.clone();
    bad.unseated.push("A".into());
    assert!(p.load("Bad", bad).is_err());
    assert_eq!(p.state(), &before);
    assert_eq!(p.event_name(), "Gala");
    assert!(p.can_undo());
}

#[test]
fn restart_clears_history() {
    let mut p = planner("A", 1, Shape::Circle, 4, 0);
    p.add_table();
    p.restart("New", "X\nY", &TableSetup::Uniform { count: 2, shape: Shape::Rectangle, size: 8, ends: 1 })
        .unwrap();
    assert!(!p.can_undo());
    assert_eq!(p.store().unseated(), ["X", "Y"]);
    assert_eq!(p.event_name(), "New");
}

// =============================================================
// Undo / redo
// =============================================================

#[test]
fn undo_redo_on_empty_history_are_noops() {
    let mut p = planner("A", 1, Shape::Circle, 4, 0);
    let before = p.state().clone();
    assert!(!p.undo());
    assert!(!p.redo());
    assert_eq!(p.state(), &before);
}

#[test]
fn undo_redo_round_trip_for_every_mutation() {
    let mut p = planner("A\nB\nC\nD", 2, Shape::Circle, 3, 0);
    assert_undo_redo(&mut p, |p| {
        p.place_guest("A", Location::Unseated, 1, 0).unwrap();
    });
    assert_undo_redo(&mut p, |p| {
        p.place_guest("A", Location::Table { table: 1, seat: 0 }, 2, 2).unwrap();
    });
    assert_undo_redo(&mut p, |p| {
        p.unseat(2, 2).unwrap();
    });
    assert_undo_redo(&mut p, |p| {
        p.resize_table(1, ResizeStep::Grow).unwrap();
    });
    assert_undo_redo(&mut p, |p| {
        p.edit_table(2, TableEdit { name: "Kids".into(), shape: Shape::Circle, size: 5, ends: 0, tag: Some(TableTag::Kids) })
            .unwrap();
    });
    assert_undo_redo(&mut p, |p| {
        p.add_table();
    });
    assert_undo_redo(&mut p, |p| {
        assert!(p.swap_tables(1, 2));
    });
    assert_undo_redo(&mut p, |p| {
        p.add_guests("E\nF");
    });
    assert_undo_redo(&mut p, |p| {
        p.randomize(&mut StdRng::seed_from_u64(8));
    });
    assert_undo_redo(&mut p, |p| {
        p.clear_all();
    });
    assert_undo_redo(&mut p, |p| {
        p.delete_table(1).unwrap();
    });
}

#[test]
fn new_mutation_clears_redo() {
    let mut p = planner("A\nB", 1, Shape::Circle, 4, 0);
    p.place_guest("A", Location::Unseated, 1, 0).unwrap();
    p.undo();
    assert!(p.can_redo());
    p.place_guest("B", Location::Unseated, 1, 1).unwrap();
    assert!(!p.can_redo());
}

#[test]
fn failed_mutation_records_nothing() {
    let mut p = planner("A", 1, Shape::Circle, 4, 0);
    assert!(p.place_guest("A", Location::Unseated, 9, 0).is_err());
    assert!(p.edit_table(1, TableEdit { name: "T".into(), shape: Shape::Circle, size: 1, ends: 0, tag: None }).is_err());
    assert!(!p.can_undo());
}

#[test]
fn noop_mutation_records_nothing() {
    let mut p = planner("A", 1, Shape::Rectangle, 8, 1);
    assert!(!p.resize_table(1, ResizeStep::Grow).unwrap().applied);
    assert!(!p.swap_tables(1, 1));
    assert!(p.add_guests("A").is_empty());
    assert_eq!(p.clear_all(), 0);
    assert_eq!(p.unseat(1, 0), Ok(None));
    assert!(!p.can_undo());
}

#[test]
fn noop_after_undo_keeps_redo() {
    let mut p = planner("A", 1, Shape::Rectangle, 8, 1);
    p.place_guest("A", Location::Unseated, 1, 0).unwrap();
    p.undo();
    assert!(!p.resize_table(1, ResizeStep::Shrink).unwrap().applied);
    assert!(p.can_redo());
    assert_eq!(p.history().undo_depth(), 0);
    assert!(p.redo());
    assert_eq!(p.store().locate("A"), Some(Location::Table { table: 1, seat: 0 }));
}

#[test]
fn history_bounded_after_sixty_mutations() {
    let mut p = planner("A", 1, Shape::Circle, 4, 0);
    for _ in 0..60 {
        p.add_table();
    }
    assert_eq!(p.history().undo_depth(), 50);
    while p.undo() {}
    assert_eq!(p.state().tables.len(), 11);
}

#[test]
fn undo_after_add_table_does_not_reissue_id() {
    let mut p = planner("A", 1, Shape::Circle, 4, 0);
    assert_eq!(p.add_table(), 2);
    p.undo();
    assert_eq!(p.add_table(), 3);
}

#[test]
fn undo_clears_selection() {
    let mut p = planner("A\nB", 1, Shape::Circle, 4, 0);
    p.place_guest("A", Location::Unseated, 1, 0).unwrap();
    p.click_unseated("B").unwrap();
    assert!(p.selection().is_some());
    p.undo();
    assert!(p.selection().is_none());
}

// =============================================================
// Selection
// =============================================================

#[test]
fn click_empty_seat_without_selection_does_nothing() {
    let mut p = planner("A", 1, Shape::Circle, 4, 0);
    p.click_seat(1, 0).unwrap();
    assert!(p.selection().is_none());
}

#[test]
fn click_unseated_then_seat_places() {
    let mut p = planner("A\nB", 1, Shape::Circle, 4, 0);
    p.click_unseated("B").unwrap();
    assert_eq!(p.selection(), Some(&Selection::Unseated { name: "B".into() }));
    p.click_seat(1, 2).unwrap();
    assert_eq!(seats(&p, 1)[2], s("B"));
    assert!(p.selection().is_none());
    assert!(p.can_undo());
}

#[test]
fn click_unseated_toggles_and_switches() {
    let mut p = planner("A\nB", 1, Shape::Circle, 4, 0);
    p.click_unseated("A").unwrap();
    p.click_unseated("A").unwrap();
    assert!(p.selection().is_none());
    p.click_unseated("A").unwrap();
    p.click_unseated("B").unwrap();
    assert_eq!(p.selection().map(Selection::name), Some("B"));
}

#[test]
fn click_unknown_unseated_name_selects_nothing() {
    let mut p = planner("A", 1, Shape::Circle, 4, 0);
    p.click_unseated("Nobody").unwrap();
    assert!(p.selection().is_none());
}

#[test]
fn click_seat_to_seat_swaps() {
    let mut p = planner("A\nB", 1, Shape::Circle, 4, 0);
    p.place_guest("A", Location::Unseated, 1, 0).unwrap();
    p.place_guest("B", Location::Unseated, 1, 3).unwrap();
    p.click_seat(1, 0).unwrap();
    assert_eq!(p.selection(), Some(&Selection::Table { table: 1, seat: 0, name: "A".into() }));
    p.click_seat(1, 3).unwrap();
    assert_eq!(seats(&p, 1), vec![s("B"), None, None, s("A")]);
    assert!(p.selection().is_none());
}

#[test]
fn click_same_seat_deselects_without_history() {
    let mut p = planner("A", 1, Shape::Circle, 4, 0);
    p.place_guest("A", Location::Unseated, 1, 1).unwrap();
    let depth = p.history().undo_depth();
    p.click_seat(1, 1).unwrap();
    p.click_seat(1, 1).unwrap();
    assert!(p.selection().is_none());
    assert_eq!(p.history().undo_depth(), depth);
}

#[test]
fn click_unseated_with_seat_selected_unseats() {
    let mut p = planner("A\nB", 1, Shape::Circle, 4, 0);
    p.place_guest("A", Location::Unseated, 1, 1).unwrap();
    p.click_seat(1, 1).unwrap();
    p.click_unseated("B").unwrap();
    assert_eq!(seats(&p, 1)[1], None);
    assert_eq!(p.store().unseated(), ["B", "A"]);
    assert!(p.selection().is_none());
}

#[test]
fn click_missing_seat_errors() {
    let mut p = planner("A", 1, Shape::Circle, 4, 0);
    assert_eq!(p.click_seat(1, 9), Err(SeatingError::SeatOutOfRange { table: 1, seat: 9 }));
    assert_eq!(p.click_seat(4, 0), Err(SeatingError::TableNotFound(4)));
}

#[test]
fn deleting_selected_guests_table_drops_selection() {
    let mut p = planner("A", 2, Shape::Circle, 4, 0);
    p.place_guest("A", Location::Unseated, 1, 1).unwrap();
    p.click_seat(1, 1).unwrap();
    p.delete_table(1).unwrap();
    assert!(p.selection().is_none());
}

// =============================================================
// Drag and drop
// =============================================================

#[test]
fn drop_on_seat_and_back_to_unseated() {
    let mut p = planner("A\nB", 1, Shape::Circle, 4, 0);
    p.drop_on_seat("A", Location::Unseated, 1, 2).unwrap();
    assert_eq!(seats(&p, 1)[2], s("A"));
    p.drop_on_unseated(Location::Table { table: 1, seat: 2 }).unwrap();
    assert_eq!(seats(&p, 1)[2], None);
    assert_eq!(p.store().unseated(), ["B", "A"]);
    p.drop_on_unseated(Location::Unseated).unwrap();
    assert_eq!(p.history().undo_depth(), 2);
}

// =============================================================
// End to end
// =============================================================

#[test]
fn setup_place_resize_edit_undo_scenario() {
    let mut p = planner("A\nB\nC", 1, Shape::Circle, 4, 0);
    assert_eq!(seats(&p, 1), vec![None, None, None, None]);
    assert_eq!(p.store().unseated(), ["A", "B", "C"]);

    p.place_guest("A", Location::Unseated, 1, 0).unwrap();
    assert_eq!(seats(&p, 1), vec![s("A"), None, None, None]);
    assert_eq!(p.store().unseated(), ["B", "C"]);

    assert!(p.resize_table(1, ResizeStep::Shrink).unwrap().applied);
    assert_eq!(seats(&p, 1), vec![s("A"), None, None]);
    assert_eq!(p.store().table(1).unwrap().size, 3);

    let bumped = p
        .edit_table(1, TableEdit { name: "Table 1".into(), shape: Shape::Circle, size: 2, ends: 0, tag: None })
        .unwrap();
    assert!(bumped.is_empty());
    assert_eq!(seats(&p, 1), vec![s("A"), None]);
    assert_eq!(p.store().unseated(), ["B", "C"]);

    let too_small = p.edit_table(1, TableEdit { name: "Table 1".into(), shape: Shape::Circle, size: 1, ends: 0, tag: None });
    assert!(too_small.is_err());

    assert!(p.undo());
    assert_eq!(p.store().table(1).unwrap().size, 3);
    assert_eq!(seats(&p, 1), vec![s("A"), None, None]);
}

#[test]
fn rectangle_scenario_keeps_size_on_single_step_resize() {
    let mut p = planner("A\nB\nC", 1, Shape::Rectangle, 4, 0);
    p.place_guest("A", Location::Unseated, 1, 0).unwrap();
    assert!(!p.resize_table(1, ResizeStep::Shrink).unwrap().applied);
    assert_eq!(p.store().table(1).unwrap().size, 4);
    p.edit_table(1, TableEdit { name: "Table 1".into(), shape: Shape::Rectangle, size: 2, ends: 0, tag: None })
        .unwrap();
    assert_eq!(seats(&p, 1), vec![s("A"), None]);
    assert!(p.undo());
    assert_eq!(p.store().table(1).unwrap().size, 4);
}
