//! Combinators over multiple patterns.

use super::core::Pattern;
use super::event::Event;
use crate::error::{PatternError, Result};
use crate::rand::{irand, SALT_CHOOSE};
use crate::time::{cycle_of, Span, Time};

fn require_non_empty<X>(items: &[X], what: &str) -> Result<()> {
    if items.is_empty() {
        return Err(PatternError::Argument(format!(
            "{} requires at least one element",
            what
        )));
    }
    Ok(())
}

/// Query every pattern with the same span and union the events.
pub fn stack<T: Clone + Send + Sync + 'static>(pats: &[Pattern<T>]) -> Result<Pattern<T>> {
    require_non_empty(pats, "stack")?;
    let pats = pats.to_vec();
    Ok(Pattern::new(move |span| {
        pats.iter().flat_map(|p| p.query(span)).collect()
    }))
}

/// Two-pattern stack.
pub fn overlay<T: Clone + Send + Sync + 'static>(a: &Pattern<T>, b: &Pattern<T>) -> Pattern<T> {
    let (a, b) = (a.clone(), b.clone());
    Pattern::new(move |span| {
        let mut events = a.query(span);
        events.extend(b.query(span));
        events
    })
}

/// Cycle `n` delegates entirely to `pats[n mod len]`, queried at its own
/// local cycle `n`. One sub-pattern fully occupies each outer cycle.
pub fn cat<T: Clone + Send + Sync + 'static>(pats: &[Pattern<T>]) -> Result<Pattern<T>> {
    require_non_empty(pats, "cat")?;
    let pats = pats.to_vec();
    let len = pats.len() as i64;
    Ok(Pattern::new(move |span| {
        span.split_cycles()
            .flat_map(|piece| {
                let ix = cycle_of(piece.start).rem_euclid(len) as usize;
                pats[ix].query(piece)
            })
            .collect()
    }))
}

/// All sub-patterns packed into a single cycle, one per step:
/// `fast(len, cat(pats))`.
pub fn fastcat<T: Clone + Send + Sync + 'static>(pats: &[Pattern<T>]) -> Result<Pattern<T>> {
    let len = pats.len();
    cat(pats)?.fast(Time::from_integer(len as i64))
}

/// One whole-cycle event per cycle, its value drawn deterministically from
/// `options` via the coordinate-keyed hash.
pub fn choose<T: Clone + Send + Sync + 'static>(options: Vec<T>, seed: u64) -> Result<Pattern<T>> {
    require_non_empty(&options, "choose")?;
    Ok(Pattern::new(move |span| {
        span.split_cycles()
            .map(|part| {
                let c = cycle_of(part.start);
                let ix = irand(seed, c, SALT_CHOOSE, options.len());
                Event::new(Some(Span::cycle(c)), part, options[ix].clone())
            })
            .collect()
    }))
}

/// Map a numeric pattern (values expected in `[0, 1)`) onto `options` by
/// `floor(value * len)`, clamped into range.
pub fn choose_by<T: Clone + Send + Sync + 'static>(
    pat: &Pattern<f64>,
    options: Vec<T>,
) -> Result<Pattern<T>> {
    require_non_empty(&options, "choose_by")?;
    let len = options.len();
    Ok(pat.map(move |v| {
        let ix = if v.is_finite() && *v > 0.0 {
            ((v * len as f64) as usize).min(len - 1)
        } else {
            0
        };
        options[ix].clone()
    }))
}

/// Merge two patterns at every intersection of their event parts.
///
/// The combined event's part is the intersection; its whole is the
/// intersection of both wholes when both are defined.
pub fn zip_with<A, B, C, F>(a: &Pattern<A>, b: &Pattern<B>, f: F) -> Pattern<C>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
    F: Fn(&A, &B) -> C + Send + Sync + 'static,
{
    let (a, b) = (a.clone(), b.clone());
    Pattern::new(move |span| {
        let left = a.query(span);
        let right = b.query(span);
        let mut events = Vec::new();
        for ea in &left {
            for eb in &right {
                if let Some(part) = ea.part.intersect(eb.part) {
                    let whole = match (ea.whole, eb.whole) {
                        (Some(wa), Some(wb)) => wa.intersect(wb),
                        _ => None,
                    };
                    events.push(Event::new(whole, part, f(&ea.value, &eb.value)));
                }
            }
        }
        events
    })
}

/// Align all patterns: wherever event parts overlap across every input, emit
/// one event carrying the aligned values in input order. Events without a
/// counterpart in every pattern are dropped.
pub fn zip<T: Clone + Send + Sync + 'static>(pats: &[Pattern<T>]) -> Result<Pattern<Vec<T>>> {
    require_non_empty(pats, "zip")?;
    let mut acc = pats[0].map(|v| vec![v.clone()]);
    for p in &pats[1..] {
        acc = zip_with(&acc, p, |xs, x| {
            let mut xs = xs.clone();
            xs.push(x.clone());
            xs
        });
    }
    Ok(acc)
}
