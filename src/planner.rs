//! Planner: the seating store wrapped with undo/redo and seat selection.
//!
//! This is the surface a host UI talks to. Gestures map onto methods here:
//! clicks go through [`Planner::click_seat`] / [`Planner::click_unseated`],
//! drops through [`Planner::drop_on_seat`] / [`Planner::drop_on_unseated`],
//! and toolbar actions onto the remaining mutators. Every mutation passes
//! through one `apply` helper that snapshots the state first and records the
//! snapshot only when the operation succeeded and actually changed something.
//! An abandoned resize or other no-op therefore leaves the redo stack intact.

#[cfg(test)]
#[path = "planner_test.rs"]
mod planner_test;

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::history::History;
use crate::model::{EventState, Location, TableId};
use crate::store::{ResizeOutcome, ResizeStep, SeatingError, SeatingStats, SeatingStore, TableEdit, TableSetup};

/// A guest picked up by a click, waiting for a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "from", rename_all = "lowercase")]
pub enum Selection {
    Unseated { name: String },
    Table { table: TableId, seat: usize, name: String },
}

impl Selection {
    /// Name of the selected guest.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Unseated { name } | Self::Table { name, .. } => name,
        }
    }

    /// Where the selected guest is.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::Unseated { .. } => Location::Unseated,
            Self::Table { table, seat, .. } => Location::Table { table: *table, seat: *seat },
        }
    }
}

/// Store + history + selection for one open event.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    event_name: String,
    store: SeatingStore,
    history: History,
    selection: Option<Selection>,
}

impl Planner {
    /// Start seating a new event. History starts empty.
    ///
    /// # Errors
    ///
    /// Propagates setup validation failures from [`SeatingStore::setup`].
    pub fn begin(
        event_name: &str,
        guest_text: &str,
        setup: &TableSetup,
        history_limit: usize,
    ) -> Result<Self, SeatingError> {
        let store = SeatingStore::setup(guest_text, setup)?;
        debug!(event = event_name, tables = store.tables().len(), guests = store.unseated().len(), "seating begun");
        Ok(Self {
            event_name: event_name.to_owned(),
            store,
            history: History::new(history_limit),
            selection: None,
        })
    }

    /// Open a saved event. History starts empty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the state breaks an invariant.
    pub fn open(event_name: &str, state: EventState, history_limit: usize) -> Result<Self, SeatingError> {
        let store = SeatingStore::from_state(state)?;
        Ok(Self {
            event_name: event_name.to_owned(),
            store,
            history: History::new(history_limit),
            selection: None,
        })
    }

    /// Replace the open event with a loaded one, clearing history and selection.
    /// On error the current event is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the state breaks an invariant.
    pub fn load(&mut self, event_name: &str, state: EventState) -> Result<(), SeatingError> {
        self.store = SeatingStore::from_state(state)?;
        event_name.clone_into(&mut self.event_name);
        self.history.clear();
        self.selection = None;
        Ok(())
    }

    /// Re-enter setup with new guests and tables, clearing history and selection.
    /// On error the current event is left untouched.
    ///
    /// # Errors
    ///
    /// Propagates setup validation failures.
    pub fn restart(&mut self, event_name: &str, guest_text: &str, setup: &TableSetup) -> Result<(), SeatingError> {
        self.store = SeatingStore::setup(guest_text, setup)?;
        event_name.clone_into(&mut self.event_name);
        self.history.clear();
        self.selection = None;
        Ok(())
    }

    // --- Queries ---

    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn set_event_name(&mut self, name: &str) {
        name.clone_into(&mut self.event_name);
    }

    #[must_use]
    pub fn store(&self) -> &SeatingStore {
        &self.store
    }

    #[must_use]
    pub fn state(&self) -> &EventState {
        self.store.state()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> SeatingStats {
        self.store.stats()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- History ---

    /// Restore the state before the last mutation. Returns false with nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(self.store.state()) else {
            return false;
        };
        self.store.restore(previous);
        self.selection = None;
        true
    }

    /// Re-apply the last undone mutation. Returns false with nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(self.store.state()) else {
            return false;
        };
        self.store.restore(next);
        self.selection = None;
        true
    }

    // --- Mutations ---

    /// See [`SeatingStore::place_guest`].
    ///
    /// # Errors
    ///
    /// Propagates placement errors; state and history are unchanged.
    pub fn place_guest(
        &mut self,
        name: &str,
        from: Location,
        table: TableId,
        seat: usize,
    ) -> Result<Option<String>, SeatingError> {
        self.apply("place_guest", |store| store.place_guest(name, from, table, seat))
    }

    /// See [`SeatingStore::unseat`].
    ///
    /// # Errors
    ///
    /// Fails when the seat does not exist.
    pub fn unseat(&mut self, table: TableId, seat: usize) -> Result<Option<String>, SeatingError> {
        self.apply("unseat", |store| store.unseat(table, seat))
    }

    /// See [`SeatingStore::resize_table`].
    ///
    /// # Errors
    ///
    /// Fails when the table does not exist.
    pub fn resize_table(&mut self, table: TableId, step: ResizeStep) -> Result<ResizeOutcome, SeatingError> {
        self.apply("resize_table", |store| store.resize_table(table, step))
    }

    /// See [`SeatingStore::edit_table`].
    ///
    /// # Errors
    ///
    /// Fails on unknown tables or invalid geometry.
    pub fn edit_table(&mut self, table: TableId, edit: TableEdit) -> Result<Vec<String>, SeatingError> {
        self.apply("edit_table", |store| store.edit_table(table, edit))
    }

    /// See [`SeatingStore::delete_table`].
    ///
    /// # Errors
    ///
    /// Fails when the table does not exist.
    pub fn delete_table(&mut self, table: TableId) -> Result<(), SeatingError> {
        self.apply("delete_table", |store| store.delete_table(table).map(|_| ()))
    }

    /// See [`SeatingStore::add_table`].
    pub fn add_table(&mut self) -> TableId {
        self.apply_infallible("add_table", SeatingStore::add_table)
    }

    /// See [`SeatingStore::swap_tables`].
    pub fn swap_tables(&mut self, a: TableId, b: TableId) -> bool {
        self.apply_infallible("swap_tables", |store| store.swap_tables(a, b))
    }

    /// See [`SeatingStore::add_guests`].
    pub fn add_guests(&mut self, text: &str) -> Vec<String> {
        self.apply_infallible("add_guests", |store| store.add_guests(text))
    }

    /// See [`SeatingStore::randomize`].
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let placed = self.apply_infallible("randomize", |store| store.randomize(rng));
        self.selection = None;
        placed
    }

    /// See [`SeatingStore::clear_all`].
    pub fn clear_all(&mut self) -> usize {
        let cleared = self.apply_infallible("clear_all", SeatingStore::clear_all);
        self.selection = None;
        cleared
    }

    // --- Click to select ---

    /// Handle a click on a seat.
    ///
    /// With nothing selected an occupied seat becomes the selection. With a
    /// guest selected the click places them here, unless it is their own seat,
    /// which just deselects.
    ///
    /// # Errors
    ///
    /// Fails when the seat does not exist; the selection is dropped.
    pub fn click_seat(&mut self, table: TableId, seat: usize) -> Result<(), SeatingError> {
        let Some(selected) = self.selection.take() else {
            let Some(t) = self.store.table(table) else {
                return Err(SeatingError::TableNotFound(table));
            };
            let occupant = t.seats.get(seat).ok_or(SeatingError::SeatOutOfRange { table, seat })?;
            if let Some(name) = occupant {
                self.selection = Some(Selection::Table { table, seat, name: name.clone() });
            }
            return Ok(());
        };
        if selected.location() == (Location::Table { table, seat }) {
            return Ok(());
        }
        self.place_guest(selected.name(), selected.location(), table, seat).map(|_| ())
    }

    /// Handle a click on a guest in the unseated list.
    ///
    /// Selects that guest, or toggles them off if already selected. With a
    /// seated guest selected, the click sends that guest back to the list.
    ///
    /// # Errors
    ///
    /// Fails when the selected seat no longer exists.
    pub fn click_unseated(&mut self, name: &str) -> Result<(), SeatingError> {
        match self.selection.take() {
            Some(Selection::Unseated { name: current }) if current == name => Ok(()),
            Some(Selection::Table { table, seat, .. }) => self.unseat(table, seat).map(|_| ()),
            None | Some(Selection::Unseated { .. }) => {
                if self.store.unseated().iter().any(|n| n == name) {
                    self.selection = Some(Selection::Unseated { name: name.to_owned() });
                }
                Ok(())
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // --- Drag and drop ---

    /// A dragged guest was dropped on a seat.
    ///
    /// # Errors
    ///
    /// Propagates placement errors.
    pub fn drop_on_seat(&mut self, name: &str, from: Location, table: TableId, seat: usize) -> Result<(), SeatingError> {
        self.selection = None;
        self.place_guest(name, from, table, seat).map(|_| ())
    }

    /// A dragged guest was dropped on the unseated list. Only seated guests move.
    ///
    /// # Errors
    ///
    /// Fails when the source seat does not exist.
    pub fn drop_on_unseated(&mut self, from: Location) -> Result<(), SeatingError> {
        match from {
            Location::Table { table, seat } => self.unseat(table, seat).map(|_| ()),
            Location::Unseated => Ok(()),
        }
    }

    // --- Internals ---

    fn apply<T>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut SeatingStore) -> Result<T, SeatingError>,
    ) -> Result<T, SeatingError> {
        let before = self.store.state().clone();
        let out = f(&mut self.store)?;
        if self.store.state() != &before {
            self.history.record(before);
            self.reconcile_selection();
            debug!(op, undo_depth = self.history.undo_depth(), "mutation recorded");
        }
        Ok(out)
    }

    fn apply_infallible<T>(&mut self, op: &'static str, f: impl FnOnce(&mut SeatingStore) -> T) -> T {
        let before = self.store.state().clone();
        let out = f(&mut self.store);
        if self.store.state() != &before {
            self.history.record(before);
            self.reconcile_selection();
            debug!(op, undo_depth = self.history.undo_depth(), "mutation recorded");
        }
        out
    }

    /// Drop a selection whose guest is no longer where it was picked up.
    fn reconcile_selection(&mut self) {
        let still_valid = self
            .selection
            .as_ref()
            .is_some_and(|sel| self.store.locate(sel.name()) == Some(sel.location()));
        if !still_valid {
            self.selection = None;
        }
    }
}
