//! Seating-chart planning engine.
//!
//! The crate owns everything a seating planner needs below the presentation
//! layer: turning pasted guest lists into unique names, laying out seats around
//! rectangular and round tables, moving guests between seats and the unseated
//! list, undo/redo, and persisting named versions of an event through a
//! pluggable key/value gateway. A host UI (or the bundled CLI) wires user
//! gestures to [`planner::Planner`] and renders the plain data it exposes.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`planner`] | Top-level facade: store + history + selection |
//! | [`store`] | Authoritative `{tables, unseated}` state and its mutators |
//! | [`history`] | Bounded snapshot undo/redo stacks |
//! | [`model`] | Tables, shapes, tags, seat locations, event state |
//! | [`geometry`] | Table validity and seat layout for both shapes |
//! | [`guests`] | Guest-list parsing and name de-duplication |
//! | [`snapshot`] | Saved-version records, export format, key naming |
//! | [`storage`] | Persistence gateway trait and its adapters |
//! | [`versions`] | Save/load/list/duplicate service over a gateway |
//! | [`summary`] | Printable text summary of an event |
//! | [`config`] | Environment-driven configuration |
//! | [`error`] | Error codes and user-facing notices |
//! | [`consts`] | Shared limits and defaults |

pub mod config;
pub mod consts;
pub mod db;
pub mod error;
pub mod geometry;
pub mod guests;
pub mod history;
pub mod model;
pub mod planner;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod summary;
pub mod versions;
