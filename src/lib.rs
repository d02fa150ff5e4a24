//! Interactive force-directed viewer for causal variable networks.
//!
//! The [`graph`] module owns the canonical data model and its filtered
//! working projection; [`app`] holds the egui panel built on top of it:
//! layout simulation, viewport, selection, search and drag handling.

pub mod app;
pub mod graph;
pub mod util;
