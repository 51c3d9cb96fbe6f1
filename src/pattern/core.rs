//! The `Pattern<T>` query engine.
//!
//! A pattern is nothing but a pure function from a queried time span to a
//! list of timed events. Patterns are immutable once constructed and cheap to
//! clone (the query closure lives behind an `Arc`), so the same value can be
//! queried from any number of threads. Referential transparency is the load-
//! bearing invariant: two queries with the same span always return the same
//! events, which is what makes hot-swap and cycle replay safe.

use super::event::Event;
use crate::error::{PatternError, Result};
use crate::time::{cycle_of, Span, Time};
use std::fmt;
use std::sync::Arc;

/// A cyclic pattern of values of type `T`.
pub struct Pattern<T> {
    query: Arc<dyn Fn(Span) -> Vec<Event<T>> + Send + Sync>,
}

impl<T> Clone for Pattern<T> {
    fn clone(&self) -> Self {
        Self {
            query: Arc::clone(&self.query),
        }
    }
}

impl<T> fmt::Debug for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern").finish_non_exhaustive()
    }
}

impl<T: Clone + Send + Sync + 'static> Pattern<T> {
    /// Build a pattern from a raw query function.
    pub fn new(query: impl Fn(Span) -> Vec<Event<T>> + Send + Sync + 'static) -> Self {
        Self {
            query: Arc::new(query),
        }
    }

    /// Query the pattern for all events overlapping `span`.
    ///
    /// Every returned `part` is non-empty and contained in `span`; spans
    /// straddling several cycles return the union of per-cycle results.
    pub fn query(&self, span: Span) -> Vec<Event<T>> {
        (self.query)(span)
    }

    /// Query a single whole cycle `[n, n+1)`.
    pub fn query_cycle(&self, n: i64) -> Vec<Event<T>> {
        self.query(Span::cycle(n))
    }

    /// One event per cycle, spanning the full cycle, carrying `value`.
    pub fn pure(value: T) -> Self {
        Self::new(move |span| {
            span.split_cycles()
                .map(|part| {
                    let whole = Span::cycle(cycle_of(part.start));
                    Event::new(Some(whole), part, value.clone())
                })
                .collect()
        })
    }

    /// A pattern producing no events for any query.
    pub fn silence() -> Self {
        Self::new(|_| Vec::new())
    }

    /// Divide each cycle into `values.len()` equal steps, one event per
    /// step, left to right.
    pub fn from_steps(values: Vec<T>) -> Result<Self> {
        if values.is_empty() {
            return Err(PatternError::Argument(
                "from_steps requires at least one value".to_string(),
            ));
        }
        let n = values.len() as i64;
        Ok(Self::new(move |span| {
            let mut events = Vec::new();
            for piece in span.split_cycles() {
                let base = Time::from_integer(cycle_of(piece.start));
                for (i, value) in values.iter().enumerate() {
                    let whole = Span::new(
                        base + Time::new(i as i64, n),
                        base + Time::new(i as i64 + 1, n),
                    );
                    if let Some(part) = whole.intersect(piece) {
                        events.push(Event::new(Some(whole), part, value.clone()));
                    }
                }
            }
            events
        }))
    }

    /// Map event values.
    pub fn map<U, F>(&self, f: F) -> Pattern<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let pat = self.clone();
        Pattern::new(move |span| {
            pat.query(span)
                .into_iter()
                .map(|ev| ev.with_value(&f))
                .collect()
        })
    }

    /// Keep only events the predicate accepts.
    pub(crate) fn filter_events<F>(&self, keep: F) -> Self
    where
        F: Fn(&Event<T>) -> bool + Send + Sync + 'static,
    {
        let pat = self.clone();
        Self::new(move |span| pat.query(span).into_iter().filter(|ev| keep(ev)).collect())
    }

    /// Map the query span's endpoints before delegating. The mapping must be
    /// monotonic; time-scaling transforms pair this with [`with_event_time`]
    /// to map result spans back.
    ///
    /// [`with_event_time`]: Pattern::with_event_time
    pub(crate) fn with_query_time<F>(&self, f: F) -> Self
    where
        F: Fn(Time) -> Time + Send + Sync + 'static,
    {
        let pat = self.clone();
        Self::new(move |span| pat.query(span.map(&f)))
    }

    /// Map the endpoints of all result event spans.
    pub(crate) fn with_event_time<F>(&self, f: F) -> Self
    where
        F: Fn(Time) -> Time + Send + Sync + 'static,
    {
        let pat = self.clone();
        Self::new(move |span| {
            pat.query(span)
                .into_iter()
                .map(|ev| ev.map_points(&f))
                .collect()
        })
    }
}
