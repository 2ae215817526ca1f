use super::*;
use crate::model::TableSpec;

fn state() -> EventState {
    let mut head = Table::from_spec(1, &TableSpec { name: "Head".into(), shape: Shape::Rectangle, size: 4, ends: 1 });
    head.seats[0] = Some("Ann".into());
    head.seats[1] = Some("Bob".into());
    let mut round = Table::from_spec(2, &TableSpec { name: "Round".into(), shape: Shape::Circle, size: 4, ends: 0 });
    round.seats[2] = Some("Cat".into());
    EventState { tables: vec![head, round], unseated: vec!["Dee".into()] }
}

#[test]
fn list_header_matches_print_format() {
    let s = state();
    assert_eq!(list_header(&s.tables[0]), "Head (2/4 · Rect)");
    assert_eq!(list_header(&s.tables[1]), "Round (1/4 · Round)");
}

#[test]
fn list_mode_numbers_seats_and_lists_unseated() {
    let s = state();
    let text = Summary::new("Gala", &s, PrintMode::List).to_string();
    assert!(text.starts_with("Gala\n3 of 4 guests seated · 2 tables\n"));
    assert!(text.contains("Head (2/4 · Rect)\n  1. Ann\n  2. Bob\n  3. (empty)\n  4. (empty)\n"));
    assert!(text.contains("Unseated (1)\n  Dee\n"));
    assert!(!text.contains("o'clock"));
    assert!(!text.contains("== "));
}

#[test]
fn list_mode_omits_empty_unseated_section() {
    let mut s = state();
    s.unseated.clear();
    let text = Summary::new("Gala", &s, PrintMode::List).to_string();
    assert!(!text.contains("Unseated"));
}

#[test]
fn visual_mode_draws_sides_and_clock_positions() {
    let s = state();
    let text = Summary::new("Gala", &s, PrintMode::Visual).to_string();
    assert!(text.contains("Head (2/4, 4 top)"));
    assert!(text.contains("  top    [1 Ann]\n"));
    assert!(text.contains("  right  [2 Bob]\n"));
    assert!(text.contains("  bottom [3 (empty)]\n"));
    assert!(text.contains("  left   [4 (empty)]\n"));
    assert!(text.contains("  12 o'clock  (empty)\n"));
    assert!(text.contains("   6 o'clock  Cat\n"));
    assert!(!text.contains("Unseated"));
}

#[test]
fn combined_mode_has_both_sections() {
    let s = state();
    let text = Summary::new("", &s, PrintMode::Combined).to_string();
    assert!(text.starts_with("Seating Chart\n"));
    let table_view = text.find("== Table View ==").unwrap();
    let list_view = text.find("== List View ==").unwrap();
    assert!(table_view < list_view);
}

#[test]
fn print_mode_parses() {
    assert_eq!("List".parse::<PrintMode>(), Ok(PrintMode::List));
    assert_eq!(PrintMode::default(), PrintMode::Combined);
    assert!("poster".parse::<PrintMode>().is_err());
}
