//! Runtime layer for the BI assistant.
//!
//! Owns the load-once dataset handle, routes questions to handlers, and keeps
//! the chat transcript.

pub mod data_manager;
pub mod dispatcher;
pub mod responder;
pub mod session;

#[cfg(test)]
mod test_support;

pub use assistant_core as core;
pub use assistant_data as data;
