//! Shared foundation for the BI assistant.
//!
//! Holds the sales data model, the chat transcript types, the error type,
//! CLI settings, number formatting and calendar helpers used by every other
//! crate in the workspace.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{AssistantError, Result};
