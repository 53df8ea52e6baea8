//! Engine error types

use scen_event::{Event, EventError};
use thiserror::Error;

/// Errors raised while matching, binding or dispatching an event.
///
/// All of these surface synchronously to the caller of
/// [`process_command_event`](crate::process_command_event),
/// [`get_fetcher_value`](crate::get_fetcher_value) or
/// [`Expression::bind`](crate::Expression::bind) and leave the world untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Positional argument absent and no default declared
    #[error("missing argument {arg} when processing {expression}")]
    MissingArgument {
        /// Argument name
        arg: String,
        /// Owning expression
        expression: String,
    },

    /// Input had children left over after every argument was bound
    #[error("found extra args: {} when processing {expression}", render(.leftover))]
    ExtraArguments {
        /// Owning expression
        expression: String,
        /// Unconsumed children
        leftover: Vec<Event>,
    },

    /// No expression in the list matched the event
    #[error("found unknown {kind} event type {event}")]
    UnknownEventType {
        /// Label of the list that was searched, e.g. `Erc20`
        kind: String,
        /// Offending event
        event: Event,
    },

    /// Command needs a caller identity and none was supplied
    #[error("from required but not given for {0}. please set a default alias or open unlocked account")]
    MissingCaller(String),

    /// Expression declared an impossible argument schema
    #[error("invalid argument schema for {expression}: {reason}")]
    InvalidSchema {
        /// Owning expression
        expression: String,
        /// What is wrong
        reason: String,
    },

    /// Bound argument had a different shape than the typed record expects
    #[error("argument {arg}: expected {expected}")]
    ArgShape {
        /// Argument name
        arg: String,
        /// Expected shape
        expected: &'static str,
    },

    /// Typed record asked for an argument that was never bound
    #[error("argument {0} was not bound")]
    Unbound(String),

    /// Extractor rejected its input
    #[error("{0}")]
    Extraction(String),

    /// Processor or fetcher failed
    #[error("{0}")]
    Processor(String),

    /// Parser rejected a line
    #[error("parse error: {0}")]
    Parse(String),

    /// Event shape mismatch
    #[error(transparent)]
    Event(#[from] EventError),
}

impl EngineError {
    /// Extraction failure with a message
    pub fn extraction(message: impl Into<String>) -> Self {
        EngineError::Extraction(message.into())
    }

    /// Processor failure with a message
    pub fn processor(message: impl Into<String>) -> Self {
        EngineError::Processor(message.into())
    }
}

fn render(events: &[Event]) -> String {
    events
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
