//! Polymetric and polyrhythmic composition.

use super::combine::overlay;
use super::core::Pattern;
use super::euclid::euclid;
use super::event::Event;
use crate::error::{PatternError, Result};
use crate::time::Span;
use std::collections::BTreeMap;

/// Named parts that each advance through their own step grid, sharing
/// outer-cycle boundaries as the only re-synchronization points.
///
/// A 3-step part and a 4-step part both complete one pass of their own grid
/// per outer cycle; the interlock comes from their differing subdivisions
/// phasing against each other within the shared cycle.
#[derive(Debug, Clone)]
pub struct Polymeter<T> {
    parts: BTreeMap<String, PolymeterPart<T>>,
}

#[derive(Debug, Clone)]
struct PolymeterPart<T> {
    pattern: Pattern<T>,
    steps: usize,
}

/// Build a [`Polymeter`] from named `(pattern, steps_per_cycle)` pairs.
pub fn polymeter<T, I>(parts: I) -> Result<Polymeter<T>>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = (String, Pattern<T>, usize)>,
{
    let mut map = BTreeMap::new();
    for (name, pattern, steps) in parts {
        if steps == 0 {
            return Err(PatternError::Argument(format!(
                "polymeter part '{}' must have a positive step count",
                name
            )));
        }
        map.insert(name, PolymeterPart { pattern, steps });
    }
    if map.is_empty() {
        return Err(PatternError::Argument(
            "polymeter requires at least one part".to_string(),
        ));
    }
    Ok(Polymeter { parts: map })
}

impl<T: Clone + Send + Sync + 'static> Polymeter<T> {
    /// Names of all parts, in stable (sorted) order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    /// A part's declared steps per cycle.
    pub fn steps(&self, name: &str) -> Option<usize> {
        self.parts.get(name).map(|p| p.steps)
    }

    /// Query one part on its own local cycle index (which coincides with the
    /// outer wall-clock cycle). Returns `None` for an unknown part name.
    pub fn query(&self, name: &str, span: Span) -> Option<Vec<Event<T>>> {
        self.parts.get(name).map(|p| p.pattern.query(span))
    }

    /// The combined schedule: all parts stacked onto the shared outer cycle.
    pub fn stacked(&self) -> Pattern<T> {
        let mut parts = self.parts.values();
        // `polymeter` guarantees at least one part.
        let mut acc = match parts.next() {
            Some(p) => p.pattern.clone(),
            None => Pattern::silence(),
        };
        for p in parts {
            acc = overlay(&acc, &p.pattern);
        }
        acc
    }
}

/// Two Euclidean onset patterns tiled onto a shared outer cycle of
/// `lcm(main_steps, cross_steps)` steps, see [`polyrhythm`].
#[derive(Debug, Clone)]
pub struct Polyrhythm {
    pub main: Pattern<bool>,
    pub cross: Pattern<bool>,
    pub outer_steps: usize,
}

impl Polyrhythm {
    /// Both onset grids stacked onto the shared outer cycle.
    pub fn combined(&self) -> Pattern<bool> {
        overlay(&self.main, &self.cross)
    }
}

/// Produce a "3 over 4" style cross-rhythm: both Euclidean sequences are
/// repeated until they fill `lcm(main_steps, cross_steps)` outer steps, so
/// each fits a whole number of times into the shared outer cycle.
pub fn polyrhythm(
    main_pulses: usize,
    main_steps: usize,
    cross_pulses: usize,
    cross_steps: usize,
) -> Result<Polyrhythm> {
    let main_onsets = euclid(main_pulses, main_steps, 0)?;
    let cross_onsets = euclid(cross_pulses, cross_steps, 0)?;
    let outer_steps = lcm(main_steps, cross_steps);

    let tile = |onsets: Vec<bool>| -> Vec<bool> {
        let reps = outer_steps / onsets.len();
        let mut tiled = Vec::with_capacity(outer_steps);
        for _ in 0..reps {
            tiled.extend(onsets.iter().copied());
        }
        tiled
    };

    Ok(Polyrhythm {
        main: Pattern::from_steps(tile(main_onsets))?,
        cross: Pattern::from_steps(tile(cross_onsets))?,
        outer_steps,
    })
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: usize, b: usize) -> usize {
    a / gcd(a, b) * b
}
