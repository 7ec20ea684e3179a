//! App-facing FFI boundary for the quitlog core.

pub mod api;
