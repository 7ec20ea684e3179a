//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the named-slot data access contracts used by services.
//! - Isolate SQLite and JSON codec details from business orchestration.
//!
//! # Invariants
//! - Slot writes always replace the whole JSON document; no merge
//!   semantics.
//! - Decode failures surface as `SlotState::Corrupt`, never as a masked
//!   "no data" result at this layer.

pub mod prefs_repo;
pub mod progress_repo;
pub mod slot;
