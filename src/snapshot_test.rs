use super::*;
use crate::geometry::GeometryError;
use crate::model::{Shape, TableSpec};

fn sample_state() -> EventState {
    let spec = TableSpec { name: "Head".into(), shape: Shape::Rectangle, size: 4, ends: 1 };
    let mut table = Table::from_spec(1, &spec);
    table.seats[0] = Some("Ann".into());
    EventState { tables: vec![table], unseated: vec!["Bob".into()] }
}

// =============================================================
// Keys
// =============================================================

#[test]
fn sanitize_replaces_and_collapses() {
    assert_eq!(sanitize_key_segment("Smith & Jones Wedding!!"), "smith-jones-wedding-");
    assert_eq!(sanitize_key_segment("  Draft  2 "), "-draft-2-");
    assert_eq!(sanitize_key_segment("ABC123"), "abc123");
}

#[test]
fn sanitize_treats_non_ascii_as_separator() {
    assert_eq!(sanitize_key_segment("Café Noël"), "caf-no-l");
}

#[test]
fn sanitize_truncates_to_sixty() {
    let long = "a".repeat(100);
    assert_eq!(sanitize_key_segment(&long).len(), 60);
}

#[test]
fn version_key_joins_prefix_event_and_version() {
    assert_eq!(version_key("beps-", "Smith Wedding", "Draft 1"), "beps-smith-wedding--draft-1");
}

#[test]
fn version_key_uses_untitled_for_blank_event() {
    assert_eq!(version_key("beps-", "   ", "v1"), "beps-untitled--v1");
}

#[test]
fn colliding_names_share_a_key() {
    assert_eq!(version_key("p-", "A/B", "v"), version_key("p-", "A B", "v"));
}

#[test]
fn export_file_name_defaults_to_seating() {
    assert_eq!(export_file_name(""), "seating-export.json");
    assert_eq!(export_file_name("Gala 2026"), "gala-2026-export.json");
}

// =============================================================
// Saved versions
// =============================================================

#[test]
fn capture_defaults_event_name_and_stamps_time() {
    let v = SavedVersion::capture("", "Draft", &sample_state());
    assert_eq!(v.event_name, "Untitled");
    assert_eq!(v.version_name, "Draft");
    assert!(v.saved_at_time().is_ok(), "bad stamp {}", v.saved_at);
}

#[test]
fn encode_uses_camel_case_fields() {
    let v = SavedVersion::capture("Gala", "Draft", &sample_state());
    let json: serde_json::Value = serde_json::from_str(&v.encode().unwrap()).unwrap();
    for field in ["eventName", "versionName", "tables", "unseated", "savedAt"] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
    assert_eq!(json["tables"][0]["shape"], "rect");
    assert_eq!(json["tables"][0]["seats"][1], serde_json::Value::Null);
}

#[test]
fn decode_accepts_stored_format() {
    let raw = r#"{
        "eventName": "Gala",
        "versionName": "v1",
        "tables": [{"id": 3, "name": "Round", "shape": "circle", "size": 2, "ends": 0, "seats": ["Ann", null]}],
        "unseated": ["Bob"],
        "savedAt": "2026-05-01T10:00:00Z"
    }"#;
    let v = SavedVersion::decode(raw).unwrap();
    assert_eq!(v.tables[0].tag, None);
    assert_eq!(v.state().guest_count(), 2);
}

#[test]
fn decode_rejects_garbage() {
    let err = SavedVersion::decode("{not json").unwrap_err();
    assert_eq!(err.error_code(), "E_SNAPSHOT_JSON");
}

#[test]
fn decode_rejects_inconsistent_state() {
    let mut v = SavedVersion::capture("Gala", "v1", &sample_state());
    v.unseated.push("Ann".into());
    let err = SavedVersion::decode(&v.encode().unwrap()).unwrap_err();
    assert!(matches!(err, SnapshotError::Invalid(StateError::DuplicateGuest(ref n)) if n == "Ann"));
    assert_eq!(err.error_code(), "E_SNAPSHOT_INVALID");
}

#[test]
fn decode_rejects_rect_with_more_than_ten_ends() {
    let raw = r#"{"eventName":"Gala","versionName":"v1","tables":[{"id":1,"name":"Long","shape":"rect","size":24,"ends":11,"seats":[null,null,null,null,null,null,null,null,null,null,null,null,null,null,null,null,null,null,null,null,null,null,null,null]}],"unseated":[],"savedAt":"2026-05-01T10:00:00Z"}"#;
    let err = SavedVersion::decode(raw).unwrap_err();
    assert!(matches!(
        err,
        SnapshotError::Invalid(StateError::Geometry { source: GeometryError::EndsOutOfRange(11), .. })
    ));
}

#[test]
fn decode_rejects_seat_length_mismatch() {
    let mut v = SavedVersion::capture("Gala", "v1", &sample_state());
    v.tables[0].seats.pop();
    assert!(SavedVersion::decode(&v.encode().unwrap()).is_err());
}

// =============================================================
// Export
// =============================================================

#[test]
fn export_omits_version_metadata() {
    let record = ExportRecord::capture("Gala", &sample_state());
    let pretty = record.to_pretty_json().unwrap();
    assert!(pretty.contains("\n  \"eventName\": \"Gala\""));
    assert!(pretty.contains("exportedAt"));
    assert!(!pretty.contains("versionName"));
    assert!(!pretty.contains("savedAt"));
    assert_eq!(record.file_name(), "gala-export.json");
}
