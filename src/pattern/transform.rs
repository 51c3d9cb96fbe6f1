//! Pattern-to-pattern transformations.
//!
//! All of these are stateless: time-warping transforms are pure span algebra,
//! and the stochastic ones draw from the coordinate-keyed hash in
//! [`crate::rand`] rather than any hidden counter. Parameter validation
//! happens here, at construction; querying a transformed pattern can never
//! fail.

use super::core::Pattern;
use crate::error::{PatternError, Result};
use crate::rand::{rand_at, SALT_DEGRADE, SALT_SOMETIMES};
use crate::time::{checked_div, cycle_of, cycles, Span, Time};

fn require_positive(factor: Time, what: &str) -> Result<()> {
    if factor <= cycles(0) {
        return Err(PatternError::Arithmetic(format!(
            "{} requires a positive factor, got {}",
            what, factor
        )));
    }
    Ok(())
}

fn require_probability(p: f64, what: &str) -> Result<()> {
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(PatternError::Arithmetic(format!(
            "{} requires a probability in [0, 1], got {}",
            what, p
        )));
    }
    Ok(())
}

impl<T: Clone + Send + Sync + 'static> Pattern<T> {
    /// Speed the pattern up: `factor` cycles of the source play per cycle.
    pub fn fast(&self, factor: Time) -> Result<Self> {
        require_positive(factor, "fast")?;
        Ok(self
            .with_query_time(move |t| t * factor)
            .with_event_time(move |t| t / factor))
    }

    /// Slow the pattern down: one source cycle stretches over `factor` cycles.
    pub fn slow(&self, factor: Time) -> Result<Self> {
        require_positive(factor, "slow")?;
        self.fast(checked_div(cycles(1), factor)?)
    }

    /// Mirror each cycle in place: an event at `[s, e)` within cycle
    /// `[c, c+1)` plays at `[c + (c+1-e), c + (c+1-s))`.
    pub fn rev(&self) -> Self {
        let pat = self.clone();
        Pattern::new(move |span| {
            let mut events = Vec::new();
            for piece in span.split_cycles() {
                let c = Time::from_integer(cycle_of(piece.start));
                // Reflection about the cycle midpoint: t -> 2c + 1 - t.
                let mirror = move |t: Time| c + c + cycles(1) - t;
                let q = Span::new(mirror(piece.end), mirror(piece.start));
                for ev in pat.query(q) {
                    events.push(ev.map_spans(|s| Span::new(mirror(s.end), mirror(s.start))));
                }
            }
            events
        })
    }

    /// Even cycles play forward, odd cycles play mirrored.
    pub fn palindrome(&self) -> Self {
        let forward = self.clone();
        let backward = self.rev();
        Pattern::new(move |span| {
            let mut events = Vec::new();
            for piece in span.split_cycles() {
                let side = if cycle_of(piece.start).rem_euclid(2) == 0 {
                    &forward
                } else {
                    &backward
                };
                events.extend(side.query(piece));
            }
            events
        })
    }

    /// Rotate the pattern earlier by `amount` cycles: the query span is
    /// shifted forward before delegating and result spans shifted back.
    pub fn rotate(&self, amount: Time) -> Self {
        self.with_query_time(move |t| t + amount)
            .with_event_time(move |t| t - amount)
    }

    /// Compress each cycle's content into `1/n` of the cycle and tile it `n`
    /// times, so every repetition replays the same source cycle.
    pub fn repeat_cycle(&self, n: usize) -> Result<Self> {
        require_positive(cycles(n as i64), "repeat_cycle")?;
        let n_i = n as i64;
        let n_t = Time::from_integer(n_i);
        let pat = self.clone();
        Ok(Pattern::new(move |span| {
            let mut events = Vec::new();
            for piece in span.split_cycles() {
                let c = Time::from_integer(cycle_of(piece.start));
                for k in 0..n_i {
                    let offset = Time::new(k, n_i);
                    let slot = Span::new(c + offset, c + Time::new(k + 1, n_i));
                    let Some(sect) = slot.intersect(piece) else {
                        continue;
                    };
                    // Map the slot into the source cycle and back.
                    let to_src = move |t: Time| c + (t - c - offset) * n_t;
                    let from_src = move |t: Time| c + offset + (t - c) / n_t;
                    let q = Span::new(to_src(sect.start), to_src(sect.end));
                    for ev in pat.query(q) {
                        events.push(ev.map_points(from_src));
                    }
                }
            }
            events
        }))
    }

    /// Drop each event with probability `probability`, keyed by the event's
    /// cycle and exact onset so any query sees the same decision.
    pub fn degrade_by(&self, probability: f64, seed: u64) -> Result<Self> {
        require_probability(probability, "degrade_by")?;
        Ok(self.partition(probability, seed, SALT_DEGRADE, true))
    }

    /// Drop roughly half the events, see [`degrade_by`](Pattern::degrade_by).
    pub fn degrade(&self, seed: u64) -> Self {
        self.partition(0.5, seed, SALT_DEGRADE, true)
    }

    /// Per event, apply `transform` with probability `probability`, else pass
    /// the event through unchanged. The kept and transformed halves use
    /// complementary draws, so no event is duplicated or lost by the gate.
    pub fn sometimes<F>(&self, probability: f64, transform: F, seed: u64) -> Result<Self>
    where
        F: FnOnce(&Self) -> Self,
    {
        require_probability(probability, "sometimes")?;
        let kept = self.partition(probability, seed, SALT_SOMETIMES, true);
        let chosen = self.partition(probability, seed, SALT_SOMETIMES, false);
        let transformed = transform(&chosen);
        Ok(super::combine::overlay(&kept, &transformed))
    }

    /// Split events by a per-event draw against `probability`: with
    /// `keep_above` the survivors are those drawn at or above it (the
    /// "kept" side), otherwise those drawn below (the "affected" side).
    fn partition(&self, probability: f64, seed: u64, salt: u32, keep_above: bool) -> Self {
        self.filter_events(move |ev| {
            let anchor = ev.whole_or_part().start;
            let r = rand_at(seed, cycle_of(anchor), anchor, salt);
            if keep_above {
                r >= probability
            } else {
                r < probability
            }
        })
    }
}
