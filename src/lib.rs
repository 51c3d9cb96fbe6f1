//! # Ostinato
//!
//! Ostinato is a cyclic pattern algebra for rhythm generation in the
//! TidalCycles tradition. A pattern is a pure function from a span of cycle
//! time to a list of timed events, built from exact rational arithmetic so
//! that nested tempo changes and polyrhythms never drift. Patterns are
//! composed with transformations (`fast`, `slow`, `rev`, `degrade`, ...),
//! combinators (`stack`, `cat`, `zip`, ...), and a mini-notation compiler,
//! then queried cycle by cycle by whatever renderer sits downstream.
//!
//! All randomness is derived from pure coordinate-keyed hashing, so every
//! query is deterministic and replayable. Errors only occur while building
//! patterns; querying one is total.
//!
//! ## Modules
//!
//! - `time`: exact rational `Time` and half-open `Span`s, the substrate for
//!   everything else.
//! - `pattern`: the query engine, Euclidean rhythm generator, transformations,
//!   combinators, and polymetric composition.
//! - `notation`: the mini-notation parser and compiler
//!   (`"bd sn [hh hh]*2, ~ cp"` and friends).
//! - `rand`: deterministic coordinate-keyed randomness.
//! - `session`: cycle counting, freeze/unfreeze, and cycle-addressed replay.
//!
//! ## Example
//!
//! ```
//! use ostinato::notation::compile;
//!
//! let pattern = compile("bd sn hh hh", 0).unwrap();
//! let events = pattern.query_cycle(0);
//! assert_eq!(events.len(), 4);
//! ```

pub mod error;
pub mod notation;
pub mod pattern;
pub mod rand;
pub mod session;
pub mod time;
pub mod value;

// Re-export the types most callers touch.
pub use crate::error::{PatternError, Result};
pub use crate::notation::compile;
pub use crate::pattern::{Event, Pattern};
pub use crate::session::{Session, SessionState, SharedSession};
pub use crate::time::{Span, Time};
pub use crate::value::Value;
