//! Shared limits and defaults for the seatplan crate.

// ── Table geometry ──────────────────────────────────────────────

/// Smallest seat count any table may have.
pub const MIN_TABLE_SIZE: usize = 2;

/// Largest seat count any table may have.
pub const MAX_TABLE_SIZE: usize = 30;

/// Largest per-end seat count a rectangular table may have.
pub const MAX_TABLE_ENDS: usize = 10;

// ── New tables ──────────────────────────────────────────────────

/// Seat count for a table added during seating.
pub const DEFAULT_TABLE_SIZE: usize = 8;

/// Seats per short end for a table added during seating.
pub const DEFAULT_TABLE_ENDS: usize = 1;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of undo snapshots retained.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

// ── Persistence ─────────────────────────────────────────────────

/// Prefix shared by every saved-version key.
pub const DEFAULT_KEY_PREFIX: &str = "beps-";

/// Separator between the event and version segments of a key.
pub const KEY_SEPARATOR: &str = "--";

/// Maximum length of one sanitized key segment.
pub const KEY_SEGMENT_MAX_LEN: usize = 60;

/// Event name used when saving an event that has none.
pub const UNTITLED_EVENT: &str = "Untitled";

/// Suffix appended to a version name when it is duplicated.
pub const COPY_SUFFIX: &str = " (copy)";
