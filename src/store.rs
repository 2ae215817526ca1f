//! Seating store: the authoritative tables-and-unseated state.
//!
//! DESIGN
//! ======
//! Every mutator validates all of its inputs before touching state, so an
//! operation either applies completely or returns an error with the store
//! unchanged. Guests only ever move between seats and the unseated list; the
//! sole operation that changes the guest count is [`SeatingStore::add_guests`].
//!
//! Seat arrays are kept at exactly `size` entries by every mutator. Shrinking
//! goes through [`smart_shrink`], which gives up empty seats before occupied
//! ones and hands back any guests it had to displace.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::consts::{DEFAULT_TABLE_ENDS, DEFAULT_TABLE_SIZE, MAX_TABLE_SIZE, MIN_TABLE_SIZE};
use crate::error::ErrorCode;
use crate::geometry::{self, GeometryError};
use crate::guests::{dedupe_names, parse_guest_list, parse_guests};
use crate::model::{EventState, Location, Seat, Shape, StateError, Table, TableId, TableSpec, TableTag};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatingError {
    #[error("add at least one guest name")]
    NoGuests,
    #[error("{name}: {source}")]
    InvalidTable { name: String, source: GeometryError },
    #[error("table not found: {0}")]
    TableNotFound(TableId),
    #[error("seat {seat} is out of range for table {table}")]
    SeatOutOfRange { table: TableId, seat: usize },
    #[error("guest not found at the given location: {0}")]
    GuestNotFound(String),
    #[error("invalid event state: {0}")]
    InvalidState(#[from] StateError),
}

impl ErrorCode for SeatingError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoGuests => "E_NO_GUESTS",
            Self::InvalidTable { .. } => "E_INVALID_TABLE",
            Self::TableNotFound(_) => "E_TABLE_NOT_FOUND",
            Self::SeatOutOfRange { .. } => "E_SEAT_OUT_OF_RANGE",
            Self::GuestNotFound(_) => "E_GUEST_NOT_FOUND",
            Self::InvalidState(_) => "E_INVALID_STATE",
        }
    }
}

/// How the initial tables are described at setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSetup {
    /// `count` identical tables named `Table 1..=count`.
    Uniform { count: usize, shape: Shape, size: usize, ends: usize },
    /// One spec per table, in order.
    Custom(Vec<TableSpec>),
}

impl TableSetup {
    /// Expand into one spec per table.
    #[must_use]
    pub fn specs(&self) -> Vec<TableSpec> {
        match self {
            Self::Uniform { count, shape, size, ends } => (1..=*count)
                .map(|i| TableSpec { name: format!("Table {i}"), shape: *shape, size: *size, ends: *ends })
                .collect(),
            Self::Custom(specs) => specs.clone(),
        }
    }
}

/// One step of quick resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeStep {
    Grow,
    Shrink,
}

/// Result of [`SeatingStore::resize_table`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResizeOutcome {
    /// False when the resize was clamped or abandoned.
    pub applied: bool,
    /// Guests moved to the unseated list by the shrink.
    pub bumped: Vec<String>,
}

/// Full replacement settings from the table editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEdit {
    pub name: String,
    pub shape: Shape,
    pub size: usize,
    pub ends: usize,
    pub tag: Option<TableTag>,
}

/// Seats remaining after [`smart_shrink`], plus whoever lost a seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShrinkResult {
    pub seats: Vec<Seat>,
    pub bumped: Vec<String>,
}

/// Headline counts for the seating header and print view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeatingStats {
    pub seated: usize,
    pub guests: usize,
    pub seats: usize,
}

// =============================================================================
// SMART SHRINK
// =============================================================================

/// Resize a seat array to `new_size`, preferring to drop empty seats.
///
/// Growing pads with empty seats. Shrinking first removes empty seats scanning
/// from the back, then pops from the end regardless of occupancy until the
/// length is exact; popped guests are returned in pop order.
#[must_use]
pub fn smart_shrink(seats: &[Seat], new_size: usize) -> ShrinkResult {
    let mut result = seats.to_vec();
    if new_size >= result.len() {
        result.resize(new_size, None);
        return ShrinkResult { seats: result, bumped: Vec::new() };
    }

    let to_remove = result.len() - new_size;
    let mut removed = 0;
    for i in (0..result.len()).rev() {
        if removed == to_remove {
            break;
        }
        if result[i].is_none() {
            result.remove(i);
            removed += 1;
        }
    }

    let mut bumped = Vec::new();
    while result.len() > new_size {
        if let Some(Some(guest)) = result.pop() {
            bumped.push(guest);
        }
    }
    ShrinkResult { seats: result, bumped }
}

// =============================================================================
// STORE
// =============================================================================

/// Owner of the live [`EventState`].
#[derive(Debug, Clone, Default)]
pub struct SeatingStore {
    state: EventState,
    /// Highest table id handed out this session, so deleted ids stay retired.
    issued_max_id: TableId,
}

impl SeatingStore {
    /// Build the initial seating from pasted guest text and a table setup.
    ///
    /// # Errors
    ///
    /// Returns `NoGuests` when the text holds no names, or `InvalidTable`
    /// naming the first table whose geometry is invalid.
    pub fn setup(guest_text: &str, setup: &TableSetup) -> Result<Self, SeatingError> {
        let guests = parse_guest_list(guest_text);
        if guests.is_empty() {
            return Err(SeatingError::NoGuests);
        }
        let specs = setup.specs();
        for spec in &specs {
            spec.validate()
                .map_err(|source| SeatingError::InvalidTable { name: spec.name.clone(), source })?;
        }
        let tables: Vec<Table> = (1..)
            .zip(specs.iter())
            .map(|(id, spec)| Table::from_spec(id, spec))
            .collect();
        Ok(Self::from_valid_state(EventState { tables, unseated: guests }))
    }

    /// Adopt a state loaded from outside after checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` describing the first violated invariant.
    pub fn from_state(state: EventState) -> Result<Self, SeatingError> {
        state.validate()?;
        Ok(Self::from_valid_state(state))
    }

    fn from_valid_state(state: EventState) -> Self {
        let issued_max_id = state.max_table_id();
        Self { state, issued_max_id }
    }

    /// Swap in a previously captured snapshot (undo/redo).
    pub(crate) fn restore(&mut self, state: EventState) {
        self.issued_max_id = self.issued_max_id.max(state.max_table_id());
        self.state = state;
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &EventState {
        &self.state
    }

    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.state.tables
    }

    #[must_use]
    pub fn unseated(&self) -> &[String] {
        &self.state.unseated
    }

    #[must_use]
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.state.table(id)
    }

    #[must_use]
    pub fn locate(&self, name: &str) -> Option<Location> {
        self.state.locate(name)
    }

    #[must_use]
    pub fn stats(&self) -> SeatingStats {
        SeatingStats {
            seated: self.state.seated_count(),
            guests: self.state.guest_count(),
            seats: self.state.seat_count(),
        }
    }

    /// Unseated guests whose name contains `query`, ignoring case.
    #[must_use]
    pub fn search_unseated(&self, query: &str) -> Vec<&str> {
        let needle = query.to_lowercase();
        self.state
            .unseated
            .iter()
            .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    // --- Placement ---

    /// Move `name` from `from` into `(table, seat)`.
    ///
    /// An occupant of the destination swaps into the source seat, or joins the
    /// end of the unseated list when the guest came from there. Returns the
    /// displaced occupant, if any.
    ///
    /// # Errors
    ///
    /// Fails when either seat does not exist or `name` is not at `from`.
    pub fn place_guest(
        &mut self,
        name: &str,
        from: Location,
        table: TableId,
        seat: usize,
    ) -> Result<Option<String>, SeatingError> {
        let dst = self.seat_index(table, seat)?;
        match from {
            Location::Unseated => {
                let Some(pos) = self.state.unseated.iter().position(|n| n == name) else {
                    return Err(SeatingError::GuestNotFound(name.to_owned()));
                };
                let guest = self.state.unseated.remove(pos);
                let displaced = self.state.tables[dst].seats[seat].replace(guest);
                if let Some(ref occupant) = displaced {
                    self.state.unseated.push(occupant.clone());
                }
                Ok(displaced)
            }
            Location::Table { table: src_table, seat: src_seat } => {
                let src = self.seat_index(src_table, src_seat)?;
                if self.state.tables[src].seats[src_seat].as_deref() != Some(name) {
                    return Err(SeatingError::GuestNotFound(name.to_owned()));
                }
                if src == dst && src_seat == seat {
                    return Ok(None);
                }
                let guest = self.state.tables[src].seats[src_seat].take();
                let displaced = std::mem::replace(&mut self.state.tables[dst].seats[seat], guest);
                self.state.tables[src].seats[src_seat].clone_from(&displaced);
                Ok(displaced)
            }
        }
    }

    /// Empty a seat, sending its guest to the end of the unseated list.
    ///
    /// # Errors
    ///
    /// Fails when the seat does not exist.
    pub fn unseat(&mut self, table: TableId, seat: usize) -> Result<Option<String>, SeatingError> {
        let idx = self.seat_index(table, seat)?;
        let guest = self.state.tables[idx].seats[seat].take();
        if let Some(ref name) = guest {
            self.state.unseated.push(name.clone());
        }
        Ok(guest)
    }

    // --- Tables ---

    /// Grow or shrink a table by one seat.
    ///
    /// Sizes clamp to 2..=30. A rectangle that would become invalid on shrink
    /// gives up end seats until it is valid; if no end count works, or a grow
    /// would be invalid, nothing changes.
    ///
    /// # Errors
    ///
    /// Fails only when the table does not exist.
    pub fn resize_table(&mut self, id: TableId, step: ResizeStep) -> Result<ResizeOutcome, SeatingError> {
        let idx = self.table_index(id)?;
        let table = &self.state.tables[idx];
        let new_size = match step {
            ResizeStep::Grow => (table.size + 1).min(MAX_TABLE_SIZE),
            ResizeStep::Shrink => table.size.saturating_sub(1).max(MIN_TABLE_SIZE),
        };
        if new_size == table.size {
            return Ok(ResizeOutcome::default());
        }

        let mut ends = table.ends;
        if geometry::validate(table.shape, new_size, ends).is_err() {
            if table.shape != Shape::Rectangle || step == ResizeStep::Grow {
                return Ok(ResizeOutcome::default());
            }
            while ends > 0 && geometry::validate_rect(new_size, ends).is_err() {
                ends -= 1;
            }
            if geometry::validate_rect(new_size, ends).is_err() {
                return Ok(ResizeOutcome::default());
            }
        }

        let ShrinkResult { seats, bumped } = smart_shrink(&table.seats, new_size);
        let table = &mut self.state.tables[idx];
        table.size = new_size;
        table.ends = ends;
        table.seats = seats;
        self.state.unseated.extend(bumped.iter().cloned());
        Ok(ResizeOutcome { applied: true, bumped })
    }

    /// Replace a table's settings, reflowing seats to the new size.
    ///
    /// Returns guests displaced by a shrink.
    ///
    /// # Errors
    ///
    /// Fails when the table does not exist or the new geometry is invalid.
    pub fn edit_table(&mut self, id: TableId, edit: TableEdit) -> Result<Vec<String>, SeatingError> {
        let idx = self.table_index(id)?;
        let spec = TableSpec { name: edit.name, shape: edit.shape, size: edit.size, ends: edit.ends };
        spec.validate()
            .map_err(|source| SeatingError::InvalidTable { name: spec.name.clone(), source })?;

        let ends = spec.effective_ends();
        let table = &mut self.state.tables[idx];
        let ShrinkResult { seats, bumped } = smart_shrink(&table.seats, spec.size);
        table.name = spec.name;
        table.shape = spec.shape;
        table.size = spec.size;
        table.ends = ends;
        table.seats = seats;
        table.tag = edit.tag;
        self.state.unseated.extend(bumped.iter().cloned());
        Ok(bumped)
    }

    /// Remove a table; its guests join the end of the unseated list in seat order.
    ///
    /// # Errors
    ///
    /// Fails when the table does not exist.
    pub fn delete_table(&mut self, id: TableId) -> Result<Table, SeatingError> {
        let idx = self.table_index(id)?;
        let table = self.state.tables.remove(idx);
        self.state.unseated.extend(table.occupants().map(str::to_owned));
        Ok(table)
    }

    /// Append a default table and return its id.
    pub fn add_table(&mut self) -> TableId {
        let id = self.state.max_table_id().max(self.issued_max_id) + 1;
        self.issued_max_id = id;
        let spec = TableSpec {
            name: format!("Table {id}"),
            shape: Shape::Rectangle,
            size: DEFAULT_TABLE_SIZE,
            ends: DEFAULT_TABLE_ENDS,
        };
        self.state.tables.push(Table::from_spec(id, &spec));
        id
    }

    /// Swap two tables' positions in the list. Returns whether anything moved.
    pub fn swap_tables(&mut self, a: TableId, b: TableId) -> bool {
        if a == b {
            return false;
        }
        let (Ok(ia), Ok(ib)) = (self.table_index(a), self.table_index(b)) else {
            return false;
        };
        self.state.tables.swap(ia, ib);
        true
    }

    // --- Guests ---

    /// Parse `text` and append names not already in the event. Returns the names added.
    pub fn add_guests(&mut self, text: &str) -> Vec<String> {
        let raw = parse_guests(text);
        if raw.is_empty() {
            return Vec::new();
        }
        let existing: HashSet<&str> = self.state.all_guests().collect();
        let added: Vec<String> = dedupe_names(&raw)
            .into_iter()
            .filter(|name| !existing.contains(name.as_str()))
            .collect();
        self.state.unseated.extend(added.iter().cloned());
        added
    }

    /// Shuffle the unseated list and fill empty seats in table then seat order.
    ///
    /// Returns how many guests were seated; anyone left over stays unseated.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut pool = std::mem::take(&mut self.state.unseated);
        pool.shuffle(rng);
        let mut queue = pool.into_iter();
        let mut placed = 0;
        'tables: for table in &mut self.state.tables {
            for seat in &mut table.seats {
                if seat.is_some() {
                    continue;
                }
                let Some(guest) = queue.next() else {
                    break 'tables;
                };
                *seat = Some(guest);
                placed += 1;
            }
        }
        self.state.unseated = queue.collect();
        placed
    }

    /// Empty every seat. Returns how many guests were unseated.
    pub fn clear_all(&mut self) -> usize {
        let mut cleared = 0;
        for table in &mut self.state.tables {
            for seat in &mut table.seats {
                if let Some(guest) = seat.take() {
                    self.state.unseated.push(guest);
                    cleared += 1;
                }
            }
        }
        cleared
    }

    // --- Lookup helpers ---

    fn table_index(&self, id: TableId) -> Result<usize, SeatingError> {
        self.state
            .tables
            .iter()
            .position(|t| t.id == id)
            .ok_or(SeatingError::TableNotFound(id))
    }

    fn seat_index(&self, table: TableId, seat: usize) -> Result<usize, SeatingError> {
        let idx = self.table_index(table)?;
        if seat >= self.state.tables[idx].seats.len() {
            return Err(SeatingError::SeatOutOfRange { table, seat });
        }
        Ok(idx)
    }
}
