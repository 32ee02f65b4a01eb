//! One chat: a transcript plus the pieces needed to answer the next question.

use std::sync::Arc;

use chrono::NaiveDate;

use assistant_core::models::{Dataset, Message, Transcript};
use assistant_core::time_utils::TimezoneHandler;

use crate::data_manager::DataManager;
use crate::dispatcher::route;
use crate::responder::Responder;

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of "today" for date-relative questions.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Today's date in a configured IANA timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: TimezoneHandler,
}

impl SystemClock {
    pub fn new(timezone: &str) -> Self {
        Self {
            tz: TimezoneHandler::new(timezone),
        }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        self.tz.today()
    }
}

/// A clock stuck on one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

// ── ChatSession ───────────────────────────────────────────────────────────────

/// Routes questions, records both sides of the conversation, and never
/// lets a failed answer escape as an error.
pub struct ChatSession {
    data: DataManager,
    responder: Responder,
    clock: Box<dyn Clock>,
    transcript: Transcript,
}

impl ChatSession {
    pub fn new(data: DataManager, responder: Responder, clock: Box<dyn Clock>) -> Self {
        Self {
            data,
            responder,
            clock,
            transcript: Transcript::new(),
        }
    }

    /// Ask a question and return the assistant's reply.
    ///
    /// Blank input is ignored and returns `None`.
    pub fn ask(&mut self, query: &str) -> Option<&Message> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.transcript.push(Message::user(query));

        let dataset = self.data.get();
        let route = route(query);
        let reply = match self.responder.respond(&route, &dataset, self.clock.today()) {
            Ok(reply) => reply.to_message(),
            Err(e) => {
                tracing::warn!(error = %e, query, "could not answer");
                Message::assistant(format!("Could not answer that: {e}"))
            }
        };
        self.transcript.push(reply);
        self.transcript.last()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn dataset(&self) -> Arc<Dataset> {
        self.data.get()
    }

    pub fn data(&self) -> &DataManager {
        &self.data
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
