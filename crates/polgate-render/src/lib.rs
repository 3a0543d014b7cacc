//! Deterministic renderers for the compliance report.
//!
//! Rendering is a handoff boundary: nothing here recomputes decisions or
//! tallies, it only lays out what the report model already states.

#![forbid(unsafe_code)]

mod markdown;

pub use markdown::render_markdown;
