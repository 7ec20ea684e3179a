//! Domain model for the quit-progress record and app preferences.
//!
//! # Responsibility
//! - Define the canonical data structures persisted by the slot store.
//! - Keep wire-format naming (camelCase JSON) in one place.
//!
//! # Invariants
//! - `ProgressData.notes` ordering is insertion order; derived views never
//!   mutate stored order.
//! - Note text is stored trimmed and is never empty.

pub mod prefs;
pub mod progress;
