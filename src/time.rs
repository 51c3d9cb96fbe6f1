//! Rational timing types for exact cycle positions.
//!
//! Every time value in the engine is an exact `Ratio<i64>`. Arithmetic stays
//! in the rationals from parse to rendered event list, which is what makes
//! long sessions, nested fast/slow, and polyrhythms drift-free. Floats only
//! appear at the rendering boundary via the lossy conversion helpers.

use crate::error::{PatternError, Result};
use num_rational::Ratio;
use num_traits::Zero;

/// Exact time point in cycles from the origin.
pub type Time = Ratio<i64>;

/// Helper to create a `Time` from a ratio n/d.
#[inline]
pub fn time(n: i64, d: i64) -> Time {
    Ratio::new(n, d)
}

/// Create a `Time` from a whole number of cycles.
#[inline]
pub fn cycles(n: i64) -> Time {
    Ratio::from_integer(n)
}

/// Convert a rational to f64 for rendering output.
#[inline]
pub fn to_f64(t: Time) -> f64 {
    *t.numer() as f64 / *t.denom() as f64
}

/// The cycle containing `t`: `floor(t)`.
#[inline]
pub fn cycle_of(t: Time) -> i64 {
    t.floor().to_integer()
}

/// Position of `t` within its cycle, always in `[0, 1)`.
#[inline]
pub fn phase_of(t: Time) -> Time {
    t - t.floor()
}

/// Exact division, failing on a zero divisor instead of panicking.
pub fn checked_div(a: Time, b: Time) -> Result<Time> {
    if b.is_zero() {
        return Err(PatternError::Arithmetic(format!(
            "division of {} by zero",
            a
        )));
    }
    Ok(a / b)
}

/// A half-open span of cycle time `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: Time,
    pub end: Time,
}

impl Span {
    /// Create a new span from start to end. Internal span math only ever
    /// produces non-empty spans; spans built from external input go through
    /// [`Span::try_new`].
    pub fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    /// Validating constructor for externally supplied spans: a degenerate
    /// span (`start >= end`) is rejected.
    pub fn try_new(start: Time, end: Time) -> Result<Self> {
        if start >= end {
            return Err(PatternError::Argument(format!(
                "span must satisfy start < end, got [{}, {})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Create a span from integers: `[n1/d1, n2/d2)`.
    pub fn from_parts(start_n: i64, start_d: i64, end_n: i64, end_d: i64) -> Self {
        Self {
            start: Ratio::new(start_n, start_d),
            end: Ratio::new(end_n, end_d),
        }
    }

    /// The span of a whole cycle `[n, n+1)`.
    pub fn cycle(n: i64) -> Self {
        Self {
            start: Ratio::from_integer(n),
            end: Ratio::from_integer(n + 1),
        }
    }

    /// Duration of this span.
    pub fn duration(&self) -> Time {
        self.end - self.start
    }

    /// Check if a time point falls within this span `[start, end)`.
    pub fn contains(&self, t: Time) -> bool {
        t >= self.start && t < self.end
    }

    /// The overlapping section of two spans, if they overlap at all.
    pub fn intersect(&self, other: Span) -> Option<Span> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(Span { start, end })
        } else {
            None
        }
    }

    /// Whether this span overlaps another (non-empty intersection).
    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Split this span at cycle boundaries, yielding one sub-span per
    /// touched cycle. An empty span yields nothing. This is the backbone of
    /// every per-cycle pattern query.
    pub fn split_cycles(&self) -> CycleSplit {
        CycleSplit {
            current: self.start,
            end: self.end,
        }
    }

    /// Apply a point mapping to both ends of the span.
    pub fn map(&self, f: impl Fn(Time) -> Time) -> Span {
        Span {
            start: f(self.start),
            end: f(self.end),
        }
    }
}

/// Iterator over the per-cycle pieces of a span, see [`Span::split_cycles`].
#[derive(Clone, Debug)]
pub struct CycleSplit {
    current: Time,
    end: Time,
}

impl Iterator for CycleSplit {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        if self.current >= self.end {
            return None;
        }
        let boundary = self.current.floor() + Ratio::from_integer(1);
        let end = boundary.min(self.end);
        let piece = Span::new(self.current, end);
        self.current = end;
        Some(piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_arithmetic_is_exact() {
        let a = time(1, 3);
        let b = time(1, 6);
        assert_eq!(a + b, time(1, 2));
        assert_eq!(a * b, time(1, 18));
    }

    #[test]
    fn test_cycle_and_phase() {
        assert_eq!(cycle_of(time(7, 2)), 3);
        assert_eq!(phase_of(time(7, 2)), time(1, 2));
        // Negative positions still phase into [0, 1).
        assert_eq!(cycle_of(time(-1, 4)), -1);
        assert_eq!(phase_of(time(-1, 4)), time(3, 4));
    }

    #[test]
    fn test_checked_div_by_zero() {
        assert!(checked_div(time(1, 2), cycles(0)).is_err());
        assert_eq!(checked_div(time(1, 2), time(1, 4)), Ok(cycles(2)));
    }

    #[test]
    fn test_try_new_rejects_degenerate_spans() {
        assert!(Span::try_new(cycles(1), cycles(1)).is_err());
        assert!(Span::try_new(cycles(2), cycles(1)).is_err());
        assert_eq!(Span::try_new(cycles(0), cycles(1)), Ok(Span::cycle(0)));
    }

    #[test]
    fn test_span_contains_end_exclusive() {
        let span = Span::from_parts(0, 1, 1, 3);
        assert!(span.contains(time(0, 1)));
        assert!(span.contains(time(1, 6)));
        assert!(!span.contains(time(1, 3)));
    }

    #[test]
    fn test_span_intersect() {
        let a = Span::from_parts(0, 1, 1, 2);
        let b = Span::from_parts(1, 4, 3, 4);
        assert_eq!(a.intersect(b), Some(Span::from_parts(1, 4, 1, 2)));
        let c = Span::from_parts(1, 2, 1, 1);
        assert_eq!(a.intersect(c), None); // touching is not overlapping
    }

    #[test]
    fn test_split_cycles() {
        let span = Span::from_parts(1, 2, 5, 2);
        let pieces: Vec<Span> = span.split_cycles().collect();
        assert_eq!(
            pieces,
            vec![
                Span::from_parts(1, 2, 1, 1),
                Span::from_parts(1, 1, 2, 1),
                Span::from_parts(2, 1, 5, 2),
            ]
        );
        // Empty span yields no pieces.
        assert_eq!(Span::cycle(0).intersect(Span::cycle(1)), None);
        let empty = Span::new(cycles(1), cycles(1));
        assert_eq!(empty.split_cycles().count(), 0);
    }
}
