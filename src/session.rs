//! Cycle state and history: the one stateful corner of the engine.
//!
//! A [`Session`] wraps the live pattern with a wall-clock cycle counter and an
//! append-only per-cycle materialization history. Everything under
//! [`crate::pattern`] is pure; this module is where freeze/unfreeze, replay
//! and mid-session pattern swaps live. Pattern replacements are staged and
//! applied at the next cycle boundary so an in-flight query never observes a
//! half-swapped pattern.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::pattern::{Event, Pattern};

/// Whether the session is evaluating live or replaying a pinned cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Normal evaluation: cycles materialize as the counter advances.
    Live,
    /// Every query at or past the pinned cycle replays that cycle's
    /// materialized events verbatim.
    Frozen(i64),
}

/// Where evaluation resumes after [`Session::unfreeze`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResumePolicy {
    /// Resume at the wall-clock cycle, which keeps advancing while frozen.
    #[default]
    WallClock,
    /// Rewind the counter to the frozen cycle and continue from there.
    FrozenCycle,
}

/// Owns the live pattern plus the cycle counter and materialization history.
///
/// All mutation goes through `advance`/`freeze`/`unfreeze`/`stage`; history
/// entries are append-only and never re-evaluated once written.
#[derive(Debug, Clone)]
pub struct Session<T> {
    pattern: Pattern<T>,
    staged: Option<Pattern<T>>,
    current_cycle: i64,
    state: SessionState,
    resume: ResumePolicy,
    history: BTreeMap<i64, Vec<Event<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Session<T> {
    pub fn new(pattern: Pattern<T>) -> Self {
        Session {
            pattern,
            staged: None,
            current_cycle: 0,
            state: SessionState::Live,
            resume: ResumePolicy::default(),
            history: BTreeMap::new(),
        }
    }

    pub fn with_resume_policy(mut self, resume: ResumePolicy) -> Self {
        self.resume = resume;
        self
    }

    pub fn current_cycle(&self) -> i64 {
        self.current_cycle
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Stages `pattern` as a replacement. The swap happens at the start of
    /// the next [`advance`](Self::advance), never mid-cycle.
    pub fn stage(&mut self, pattern: Pattern<T>) {
        self.staged = Some(pattern);
    }

    /// Moves the cycle counter forward by `n` cycles.
    ///
    /// A staged pattern is swapped in first (the counter position is a cycle
    /// boundary). While live, each newly entered cycle is materialized into
    /// history; while frozen, the counter advances but nothing new is
    /// evaluated.
    pub fn advance(&mut self, n: u32) {
        if let Some(next) = self.staged.take() {
            self.pattern = next;
        }
        for _ in 0..n {
            if self.state == SessionState::Live {
                self.materialize(self.current_cycle);
            }
            self.current_cycle += 1;
        }
    }

    /// Pins the session to `cycle`, materializing it if it has not been
    /// reached yet.
    pub fn freeze(&mut self, cycle: i64) {
        self.materialize(cycle);
        self.state = SessionState::Frozen(cycle);
    }

    /// Returns to live evaluation, repositioning the counter per the
    /// session's [`ResumePolicy`].
    pub fn unfreeze(&mut self) {
        if let SessionState::Frozen(at) = self.state {
            if self.resume == ResumePolicy::FrozenCycle {
                self.current_cycle = at;
            }
            self.state = SessionState::Live;
        }
    }

    /// Historical materialization for `cycle`, if one was ever recorded.
    pub fn get_state(&self, cycle: i64) -> Option<&[Event<T>]> {
        self.history.get(&cycle).map(Vec::as_slice)
    }

    /// Events for `cycle` as the session currently sees them.
    ///
    /// Frozen sessions replay the pinned cycle's recorded events verbatim for
    /// any `cycle` at or past the pin, spans included. Live sessions serve
    /// recorded history when present and evaluate the pattern otherwise.
    pub fn events_for_cycle(&self, cycle: i64) -> Vec<Event<T>> {
        if let SessionState::Frozen(at) = self.state {
            if cycle >= at {
                return self.history.get(&at).cloned().unwrap_or_default();
            }
        }
        match self.history.get(&cycle) {
            Some(events) => events.clone(),
            None => materialized(&self.pattern, cycle),
        }
    }

    fn materialize(&mut self, cycle: i64) {
        let pattern = &self.pattern;
        self.history
            .entry(cycle)
            .or_insert_with(|| materialized(pattern, cycle));
    }
}

fn materialized<T: Clone + Send + Sync + 'static>(
    pattern: &Pattern<T>,
    cycle: i64,
) -> Vec<Event<T>> {
    let mut events = pattern.query_cycle(cycle);
    events.sort_by(|a, b| (a.part.start, a.part.end).cmp(&(b.part.start, b.part.end)));
    events
}

/// Single-writer / multi-reader handle over a [`Session`].
///
/// Mutations (`advance`, `freeze`, `unfreeze`, `stage`) take the write lock
/// so they apply atomically in one total order; reads run concurrently.
#[derive(Debug, Clone)]
pub struct SharedSession<T> {
    inner: Arc<RwLock<Session<T>>>,
}

impl<T: Clone + Send + Sync + 'static> SharedSession<T> {
    pub fn new(pattern: Pattern<T>) -> Self {
        SharedSession {
            inner: Arc::new(RwLock::new(Session::new(pattern))),
        }
    }

    pub fn current_cycle(&self) -> i64 {
        self.inner.read().unwrap().current_cycle()
    }

    pub fn state(&self) -> SessionState {
        self.inner.read().unwrap().state()
    }

    pub fn stage(&self, pattern: Pattern<T>) {
        self.inner.write().unwrap().stage(pattern);
    }

    pub fn advance(&self, n: u32) {
        self.inner.write().unwrap().advance(n);
    }

    pub fn freeze(&self, cycle: i64) {
        self.inner.write().unwrap().freeze(cycle);
    }

    pub fn unfreeze(&self) {
        self.inner.write().unwrap().unfreeze();
    }

    pub fn get_state(&self, cycle: i64) -> Option<Vec<Event<T>>> {
        self.inner.read().unwrap().get_state(cycle).map(<[_]>::to_vec)
    }

    pub fn events_for_cycle(&self, cycle: i64) -> Vec<Event<T>> {
        self.inner.read().unwrap().events_for_cycle(cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::cat;
    use crate::time::cycles;

    fn counting() -> Pattern<i64> {
        // A pattern whose single event per cycle carries the cycle number.
        cat(&(0..4).map(Pattern::pure).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_advance_materializes_each_cycle() {
        let mut session = Session::new(counting());
        session.advance(3);
        assert_eq!(session.current_cycle(), 3);
        for cycle in 0..3 {
            let events = session.get_state(cycle).unwrap();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].value, cycle.rem_euclid(4));
        }
        assert!(session.get_state(3).is_none());
    }

    #[test]
    fn test_frozen_replays_pinned_cycle() {
        let mut session = Session::new(counting());
        session.advance(6);
        session.freeze(5);
        let frozen = session.events_for_cycle(7);
        assert_eq!(frozen, session.get_state(5).unwrap().to_vec());
        assert_eq!(frozen[0].value, 1);
        assert_eq!(frozen[0].part.start, cycles(5));

        session.unfreeze();
        let live = session.events_for_cycle(7);
        assert_eq!(live[0].value, 3);
        assert_eq!(live[0].part.start, cycles(7));
    }

    #[test]
    fn test_freeze_materializes_unreached_cycle() {
        let mut session = Session::new(counting());
        session.freeze(9);
        assert_eq!(session.get_state(9).unwrap()[0].value, 1);
        assert_eq!(session.events_for_cycle(20)[0].value, 1);
    }

    #[test]
    fn test_counter_keeps_running_while_frozen() {
        let mut session = Session::new(counting());
        session.advance(2);
        session.freeze(1);
        session.advance(3);
        assert_eq!(session.current_cycle(), 5);
        // Nothing past the pin materialized while frozen.
        assert!(session.get_state(2).is_none());
        session.unfreeze();
        assert_eq!(session.current_cycle(), 5);
    }

    #[test]
    fn test_frozen_cycle_resume_rewinds_counter() {
        let mut session =
            Session::new(counting()).with_resume_policy(ResumePolicy::FrozenCycle);
        session.advance(4);
        session.freeze(2);
        session.advance(2);
        session.unfreeze();
        assert_eq!(session.current_cycle(), 2);
    }

    #[test]
    fn test_staged_pattern_applies_at_next_advance() {
        let mut session = Session::new(Pattern::pure(0i64));
        session.advance(1);
        session.stage(Pattern::pure(7i64));
        // History already written is never touched by the swap.
        assert_eq!(session.get_state(0).unwrap()[0].value, 0);
        session.advance(1);
        assert_eq!(session.get_state(1).unwrap()[0].value, 7);
    }

    #[test]
    fn test_history_is_append_only() {
        let mut session = Session::new(Pattern::pure("a"));
        session.advance(1);
        session.stage(Pattern::pure("b"));
        session.advance(0);
        // Re-freezing an already materialized cycle re-uses the record.
        session.freeze(0);
        assert_eq!(session.get_state(0).unwrap()[0].value, "a");
    }

    #[test]
    fn test_shared_session_round_trip() {
        let shared = SharedSession::new(counting());
        shared.advance(2);
        let reader = shared.clone();
        assert_eq!(reader.current_cycle(), 2);
        shared.freeze(0);
        assert_eq!(reader.state(), SessionState::Frozen(0));
        assert_eq!(reader.events_for_cycle(10)[0].value, 0);
    }
}
