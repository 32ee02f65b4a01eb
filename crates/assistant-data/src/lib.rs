//! Data layer for the BI assistant.
//!
//! Loads a sales spreadsheet into a typed [`Dataset`](assistant_core::models::Dataset),
//! computes aggregations over it and describes charts for the UI to draw.

pub mod aggregations;
pub mod charts;
pub mod loader;

pub use assistant_core as core;
