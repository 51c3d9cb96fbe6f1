//! Timed events produced by pattern queries.

use crate::time::{Span, Time};

/// A single value occurring over a span of cycle time.
///
/// `part` is the portion of the event overlapping the query span (always a
/// subset of it). `whole` is the event's full extent when it has one;
/// continuous signals have no defined onset or offset and carry `None`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event<T> {
    pub whole: Option<Span>,
    pub part: Span,
    pub value: T,
}

impl<T> Event<T> {
    pub fn new(whole: Option<Span>, part: Span, value: T) -> Self {
        Self { whole, part, value }
    }

    /// The event's full extent, falling back to the queried part.
    pub fn whole_or_part(&self) -> Span {
        self.whole.unwrap_or(self.part)
    }

    /// The event's onset, if this query window actually contains it.
    pub fn onset(&self) -> Option<Time> {
        match self.whole {
            Some(w) if w.start == self.part.start => Some(w.start),
            _ => None,
        }
    }

    /// Whether the queried part begins at the event's true start.
    pub fn has_onset(&self) -> bool {
        self.onset().is_some()
    }

    /// Replace the value, computed from the old one.
    pub fn with_value<U>(&self, f: impl FnOnce(&T) -> U) -> Event<U> {
        Event {
            whole: self.whole,
            part: self.part,
            value: f(&self.value),
        }
    }

    /// Apply a span mapping to both `part` and `whole`.
    pub fn map_spans(self, f: impl Fn(Span) -> Span) -> Self {
        Event {
            whole: self.whole.map(&f),
            part: f(self.part),
            value: self.value,
        }
    }

    /// Apply a monotonic point mapping to all span endpoints.
    pub fn map_points(self, f: impl Fn(Time) -> Time) -> Self {
        self.map_spans(|span| span.map(&f))
    }
}
