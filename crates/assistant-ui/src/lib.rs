//! Terminal UI layer for the BI assistant.
//!
//! Provides themes, the header and bar components, the transcript, table and
//! chart views, and the chat event loop built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod chat_view;
pub mod components;
pub mod table_view;
pub mod themes;

pub use assistant_core as core;
