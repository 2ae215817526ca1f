//! Printable text summary of an event.
//!
//! Three modes mirror a print view: `visual` draws each table by side (or by
//! clock position for round tables), `list` numbers every seat, and
//! `combined` prints both under section headings.

#[cfg(test)]
#[path = "summary_test.rs"]
mod summary_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{clock_hour, rect_layout};
use crate::model::{EventState, Shape, Table};

const EMPTY_SEAT: &str = "(empty)";
const UNTITLED_CHART: &str = "Seating Chart";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintMode {
    #[default]
    Combined,
    Visual,
    List,
}

impl PrintMode {
    fn shows_visual(self) -> bool {
        matches!(self, Self::Combined | Self::Visual)
    }

    fn shows_list(self) -> bool {
        matches!(self, Self::Combined | Self::List)
    }
}

impl std::str::FromStr for PrintMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combined" => Ok(Self::Combined),
            "visual" => Ok(Self::Visual),
            "list" => Ok(Self::List),
            other => Err(format!("unknown print mode: {other} (expected combined, visual or list)")),
        }
    }
}

/// Renders an event as plain text via [`fmt::Display`].
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a> {
    pub event_name: &'a str,
    pub state: &'a EventState,
    pub mode: PrintMode,
}

impl<'a> Summary<'a> {
    #[must_use]
    pub fn new(event_name: &'a str, state: &'a EventState, mode: PrintMode) -> Self {
        Self { event_name, state, mode }
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.event_name.trim();
        writeln!(f, "{}", if title.is_empty() { UNTITLED_CHART } else { title })?;
        writeln!(
            f,
            "{} of {} guests seated · {} tables",
            self.state.seated_count(),
            self.state.guest_count(),
            self.state.tables.len()
        )?;

        if self.mode.shows_visual() {
            writeln!(f)?;
            if self.mode == PrintMode::Combined {
                writeln!(f, "== Table View ==")?;
            }
            for table in &self.state.tables {
                write_visual(f, table)?;
            }
        }

        if self.mode.shows_list() {
            writeln!(f)?;
            if self.mode == PrintMode::Combined {
                writeln!(f, "== List View ==")?;
            }
            for table in &self.state.tables {
                write_list(f, table)?;
            }
            if !self.state.unseated.is_empty() {
                writeln!(f, "Unseated ({})", self.state.unseated.len())?;
                for name in &self.state.unseated {
                    writeln!(f, "  {name}")?;
                }
            }
        }
        Ok(())
    }
}

/// Header line used by the list view: `"<name> (<seated>/<size> · Rect|Round)"`.
#[must_use]
pub fn list_header(table: &Table) -> String {
    format!("{} ({}/{} · {})", table.name, table.seated_count(), table.size, table.shape.label())
}

fn seat_label(table: &Table, index: usize) -> &str {
    table.seats.get(index).and_then(Option::as_deref).unwrap_or(EMPTY_SEAT)
}

fn write_list(f: &mut fmt::Formatter<'_>, table: &Table) -> fmt::Result {
    writeln!(f, "{}", list_header(table))?;
    for index in 0..table.seats.len() {
        writeln!(f, "  {}. {}", index + 1, seat_label(table, index))?;
    }
    writeln!(f)
}

fn write_visual(f: &mut fmt::Formatter<'_>, table: &Table) -> fmt::Result {
    writeln!(f, "{} ({}/{}, {} top)", table.name, table.seated_count(), table.size, table.size)?;
    match table.shape {
        Shape::Circle => {
            for index in 0..table.size {
                writeln!(f, "  {:>2} o'clock  {}", clock_hour(index, table.size), seat_label(table, index))?;
            }
        }
        Shape::Rectangle => {
            let layout = rect_layout(table.size, table.ends);
            for (side, seats) in
                [("top", &layout.top), ("right", &layout.right), ("bottom", &layout.bottom), ("left", &layout.left)]
            {
                if seats.is_empty() {
                    continue;
                }
                let row: Vec<String> =
                    seats.iter().map(|&i| format!("[{} {}]", i + 1, seat_label(table, i))).collect();
                writeln!(f, "  {side:<6} {}", row.join(" "))?;
            }
        }
    }
    writeln!(f)
}
