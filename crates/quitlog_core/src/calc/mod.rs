//! Pure derived calculations over the progress record.
//!
//! # Responsibility
//! - Compute elapsed days, countdowns, mood aggregation, weekly buckets
//!   and achievement milestones from stored data plus an explicit `now`.
//!
//! # Invariants
//! - Every function here is a pure function of its arguments; `now` is
//!   always passed in, never sampled internally.
//! - No function mutates the record it reads.

pub mod achievements;
pub mod moods;
pub mod timeline;
pub mod weeks;
