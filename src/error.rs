//! Error taxonomy for the pattern engine.
//!
//! Every error here is raised at construction or compile time. Once a
//! `Pattern` value exists, querying it is total: it always returns a
//! (possibly empty) event list and never fails. Renderers and live-session
//! layers depend on that split.

use thiserror::Error;

/// Errors produced while building patterns or compiling mini-notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Malformed mini-notation. `position` is the byte offset of the
    /// offending character in the source string.
    #[error("parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Invalid Euclidean rhythm parameters.
    #[error("invalid euclidean rhythm: {pulses} pulses over {steps} steps")]
    Rhythm { pulses: usize, steps: usize },

    /// Division by zero or a non-positive scaling factor.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Empty combinator input, non-positive step count, or similar.
    #[error("invalid argument: {0}")]
    Argument(String),
}

impl PatternError {
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        PatternError::Parse {
            position,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PatternError>;
