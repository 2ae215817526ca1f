//! Table geometry: validity rules and seat layout.
//!
//! Seat indices are the addressable identity of a seat, so the order in which
//! layouts assign them is a fixed contract:
//!
//! - Rectangles: top side left-to-right, right end, bottom side, left end, one
//!   running counter across the four groups.
//! - Circles: seat 0 at twelve o'clock, then clockwise in screen coordinates
//!   (y grows downward).

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::consts::{MAX_TABLE_ENDS, MAX_TABLE_SIZE, MIN_TABLE_SIZE};
use crate::error::ErrorCode;
use crate::model::Shape;

/// Why a size/ends combination is not a valid table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("size must be between {MIN_TABLE_SIZE} and {MAX_TABLE_SIZE} (got {0})")]
    SizeOutOfRange(usize),
    #[error("too many ends for this size ({ends} ends, {size} seats)")]
    TooManyEnds { size: usize, ends: usize },
    #[error("won't divide evenly ({remainder} side seats); adjust ends or size")]
    UnevenSides { remainder: usize },
    #[error("ends must be at most {MAX_TABLE_ENDS} (got {0})")]
    EndsOutOfRange(usize),
}

impl ErrorCode for GeometryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SizeOutOfRange(_) => "E_TABLE_SIZE",
            Self::TooManyEnds { .. } => "E_TABLE_ENDS",
            Self::UnevenSides { .. } => "E_TABLE_UNEVEN",
            Self::EndsOutOfRange(_) => "E_TABLE_ENDS_RANGE",
        }
    }
}

/// Validate a round table.
///
/// # Errors
///
/// Returns [`GeometryError::SizeOutOfRange`] outside `2..=30`.
pub fn validate_circle(size: usize) -> Result<(), GeometryError> {
    if (MIN_TABLE_SIZE..=MAX_TABLE_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(GeometryError::SizeOutOfRange(size))
    }
}

/// Validate a rectangular table with `ends` seats on each short end.
///
/// The long sides must hold equal counts, so `size - 2 * ends` must be a
/// non-negative even number. Zero is allowed: an ends-only table.
///
/// # Errors
///
/// Returns the first rule the combination breaks.
pub fn validate_rect(size: usize, ends: usize) -> Result<(), GeometryError> {
    validate_circle(size)?;
    let Some(remainder) = size.checked_sub(ends.saturating_mul(2)) else {
        return Err(GeometryError::TooManyEnds { size, ends });
    };
    if remainder % 2 != 0 {
        return Err(GeometryError::UnevenSides { remainder });
    }
    Ok(())
}

/// Validate any table by shape. `ends` is ignored for circles.
///
/// # Errors
///
/// See [`validate_rect`] and [`validate_circle`].
pub fn validate(shape: Shape, size: usize, ends: usize) -> Result<(), GeometryError> {
    match shape {
        Shape::Rectangle => validate_rect(size, ends),
        Shape::Circle => validate_circle(size),
    }
}

/// Enforce the per-end seat cap on rectangles. The divisibility rules in
/// [`validate_rect`] do not bound `ends` on their own.
///
/// # Errors
///
/// Returns [`GeometryError::EndsOutOfRange`] above [`MAX_TABLE_ENDS`].
pub fn check_ends_limit(shape: Shape, ends: usize) -> Result<(), GeometryError> {
    if shape == Shape::Rectangle && ends > MAX_TABLE_ENDS {
        Err(GeometryError::EndsOutOfRange(ends))
    } else {
        Ok(())
    }
}

// =============================================================================
// RECTANGLE LAYOUT
// =============================================================================

/// One edge of a rectangular table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Seat indices grouped by the side they sit on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RectLayout {
    pub top: Vec<usize>,
    pub right: Vec<usize>,
    pub bottom: Vec<usize>,
    pub left: Vec<usize>,
    /// Seats per long side.
    pub side: usize,
}

impl RectLayout {
    /// Which side seat `index` belongs to.
    #[must_use]
    pub fn side_of(&self, index: usize) -> Option<Side> {
        [
            (Side::Top, &self.top),
            (Side::Right, &self.right),
            (Side::Bottom, &self.bottom),
            (Side::Left, &self.left),
        ]
        .into_iter()
        .find(|(_, seats)| seats.contains(&index))
        .map(|(side, _)| side)
    }
}

/// Assign seat indices for a rectangle in top, right, bottom, left order.
///
/// Inputs are expected to be valid; an over-subscribed `ends` yields zero
/// side seats rather than failing.
#[must_use]
pub fn rect_layout(size: usize, ends: usize) -> RectLayout {
    let side = size.saturating_sub(ends.saturating_mul(2)) / 2;
    let mut next = 0..;
    let mut take = |n: usize| -> Vec<usize> { next.by_ref().take(n).collect() };
    let top = take(side);
    let right = take(ends);
    let bottom = take(side);
    let left = take(ends);
    RectLayout { top, right, bottom, left, side }
}

// =============================================================================
// CIRCLE LAYOUT
// =============================================================================

/// Position of one seat around a round table, on the unit circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeatPosition {
    pub index: usize,
    /// Radians; seat 0 is at `-π/2`.
    pub angle: f64,
    pub x: f64,
    pub y: f64,
}

/// Angle in radians for seat `index` of a `size`-seat round table.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn circle_seat_angle(index: usize, size: usize) -> f64 {
    if size == 0 {
        return -FRAC_PI_2;
    }
    TAU * index as f64 / size as f64 - FRAC_PI_2
}

/// Evenly spaced seat positions, seat 0 at the top, clockwise on screen.
#[must_use]
pub fn circle_layout(size: usize) -> Vec<SeatPosition> {
    (0..size)
        .map(|index| {
            let angle = circle_seat_angle(index, size);
            SeatPosition { index, angle, x: angle.cos(), y: angle.sin() }
        })
        .collect()
}

/// Nearest clock-face hour (1–12) for a round-table seat, 12 being the top.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn clock_hour(index: usize, size: usize) -> u8 {
    if size == 0 {
        return 12;
    }
    let hour = (index as f64 * 12.0 / size as f64).round() as u32 % 12;
    if hour == 0 { 12 } else { hour as u8 }
}
