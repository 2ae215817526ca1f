//! Data model: tables, seats, guest locations, and the event state.
//!
//! Guests are plain name strings; a seat slot is `Option<String>`. The
//! [`EventState`] pair of `tables` and `unseated` is the unit that the store
//! mutates, the history snapshots, and the persistence layer serializes.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{self, GeometryError};

/// Identifier for a table, unique within one event.
pub type TableId = u32;

/// A seat slot: the seated guest's name, or empty.
pub type Seat = Option<String>;

/// Table outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// Banquet table with two long sides and two short ends.
    #[serde(rename = "rect", alias = "rectangle")]
    Rectangle,
    /// Round table.
    #[serde(rename = "circle")]
    Circle,
}

impl Shape {
    /// Short label used in printed summaries.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Rectangle => "Rect",
            Self::Circle => "Round",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rectangle => f.write_str("rect"),
            Self::Circle => f.write_str("circle"),
        }
    }
}

impl std::str::FromStr for Shape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rect" | "rectangle" => Ok(Self::Rectangle),
            "circle" | "round" => Ok(Self::Circle),
            other => Err(format!("unknown table shape: {other}")),
        }
    }
}

/// Display-only category label for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableTag {
    #[serde(rename = "Head Table")]
    HeadTable,
    Family,
    Friends,
    Work,
    Kids,
    #[serde(rename = "VIP")]
    Vip,
    Custom,
}

impl TableTag {
    pub const ALL: [TableTag; 7] =
        [Self::HeadTable, Self::Family, Self::Friends, Self::Work, Self::Kids, Self::Vip, Self::Custom];

    /// Human-readable label, identical to the serialized form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::HeadTable => "Head Table",
            Self::Family => "Family",
            Self::Friends => "Friends",
            Self::Work => "Work",
            Self::Kids => "Kids",
            Self::Vip => "VIP",
            Self::Custom => "Custom",
        }
    }

    /// Accent colour as a CSS hex string.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::HeadTable => "#b45309",
            Self::Family => "#059669",
            Self::Friends => "#2563eb",
            Self::Work => "#7c3aed",
            Self::Kids => "#db2777",
            Self::Vip => "#c9a84c",
            Self::Custom => "#6b7280",
        }
    }
}

impl std::str::FromStr for TableTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|tag| tag.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown table tag: {wanted}"))
    }
}

/// Geometry for a table that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub name: String,
    pub shape: Shape,
    pub size: usize,
    pub ends: usize,
}

impl TableSpec {
    /// Ends actually stored for this spec: circles never have ends.
    #[must_use]
    pub fn effective_ends(&self) -> usize {
        match self.shape {
            Shape::Rectangle => self.ends,
            Shape::Circle => 0,
        }
    }

    /// Check these dimensions against the geometry rules for the shape.
    ///
    /// # Errors
    ///
    /// Returns the geometry violation for invalid size/ends combinations,
    /// including rectangles with more than ten seats per end.
    pub fn validate(&self) -> Result<(), GeometryError> {
        geometry::check_ends_limit(self.shape, self.ends)?;
        geometry::validate(self.shape, self.size, self.effective_ends())
    }
}

/// A table and its ordered seats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub shape: Shape,
    pub size: usize,
    pub ends: usize,
    pub seats: Vec<Seat>,
    #[serde(default)]
    pub tag: Option<TableTag>,
}

impl Table {
    /// Build an empty table from an already-validated spec.
    #[must_use]
    pub fn from_spec(id: TableId, spec: &TableSpec) -> Self {
        Self {
            id,
            name: spec.name.clone(),
            shape: spec.shape,
            size: spec.size,
            ends: spec.effective_ends(),
            seats: vec![None; spec.size],
            tag: None,
        }
    }

    /// Names of seated guests in seat order.
    pub fn occupants(&self) -> impl Iterator<Item = &str> {
        self.seats.iter().filter_map(|s| s.as_deref())
    }

    /// Number of occupied seats.
    #[must_use]
    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    /// Index of the first empty seat, if any.
    #[must_use]
    pub fn first_empty(&self) -> Option<usize> {
        self.seats.iter().position(Option::is_none)
    }
}

/// Where a guest currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "lowercase")]
pub enum Location {
    /// In the unseated list.
    Unseated,
    /// At a specific seat.
    Table { table: TableId, seat: usize },
}

/// Full seating state of one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventState {
    pub tables: Vec<Table>,
    pub unseated: Vec<String>,
}

/// A structural problem found in an [`EventState`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("{name}: {source}")]
    Geometry { name: String, source: GeometryError },
    #[error("{name}: has {seats} seats but size {size}")]
    SeatCount { name: String, seats: usize, size: usize },
    #[error("{name}: circle tables cannot have ends")]
    CircleEnds { name: String },
    #[error("duplicate table id: {0}")]
    DuplicateTableId(TableId),
    #[error("guest appears more than once: {0}")]
    DuplicateGuest(String),
    #[error("guest name is empty")]
    EmptyGuestName,
}

impl EventState {
    /// Find a table by id.
    #[must_use]
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    /// Find a table by id, mutably.
    pub fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id == id)
    }

    /// Every guest name in the event: seated (table/seat order), then unseated.
    pub fn all_guests(&self) -> impl Iterator<Item = &str> {
        self.tables
            .iter()
            .flat_map(Table::occupants)
            .chain(self.unseated.iter().map(String::as_str))
    }

    /// Total guest count, seated plus unseated.
    #[must_use]
    pub fn guest_count(&self) -> usize {
        self.seated_count() + self.unseated.len()
    }

    /// Number of occupied seats across all tables.
    #[must_use]
    pub fn seated_count(&self) -> usize {
        self.tables.iter().map(Table::seated_count).sum()
    }

    /// Total seat capacity across all tables.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.tables.iter().map(|t| t.size).sum()
    }

    /// Highest table id in use, or 0 with no tables.
    #[must_use]
    pub fn max_table_id(&self) -> TableId {
        self.tables.iter().map(|t| t.id).max().unwrap_or(0)
    }

    /// Where `name` currently sits, if anywhere.
    #[must_use]
    pub fn locate(&self, name: &str) -> Option<Location> {
        for table in &self.tables {
            if let Some(seat) = table.seats.iter().position(|s| s.as_deref() == Some(name)) {
                return Some(Location::Table { table: table.id, seat });
            }
        }
        self.unseated.iter().any(|n| n == name).then_some(Location::Unseated)
    }

    /// Check every structural invariant of a state received from outside.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), StateError> {
        let mut ids = HashSet::with_capacity(self.tables.len());
        for table in &self.tables {
            if !ids.insert(table.id) {
                return Err(StateError::DuplicateTableId(table.id));
            }
            if table.shape == Shape::Circle && table.ends != 0 {
                return Err(StateError::CircleEnds { name: table.name.clone() });
            }
            geometry::check_ends_limit(table.shape, table.ends)
                .and_then(|()| geometry::validate(table.shape, table.size, table.ends))
                .map_err(|source| StateError::Geometry { name: table.name.clone(), source })?;
            if table.seats.len() != table.size {
                return Err(StateError::SeatCount {
                    name: table.name.clone(),
                    seats: table.seats.len(),
                    size: table.size,
                });
            }
        }

        let mut seen = HashSet::new();
        for guest in self.all_guests() {
            if guest.is_empty() {
                return Err(StateError::EmptyGuestName);
            }
            if !seen.insert(guest) {
                return Err(StateError::DuplicateGuest(guest.to_owned()));
            }
        }
        Ok(())
    }
}
