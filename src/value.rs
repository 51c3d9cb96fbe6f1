//! The payload type carried by compiled mini-notation patterns.
//!
//! The engine never interprets these values; mapping atoms to instruments,
//! numbers to parameters and so on is the renderer's job. Keeping the union
//! closed lets renderers pattern-match exhaustively.

use crate::time::{to_f64, Time};
use std::fmt;

/// A mini-notation leaf value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// A bare word, e.g. a drum-piece or sample name.
    Atom(String),
    /// An exact number (integers and `a/b` fractions in the notation).
    Number(Time),
    /// A combined value, produced when patterns are zipped together.
    Group(Vec<Value>),
}

impl Value {
    pub fn atom(s: impl Into<String>) -> Self {
        Value::Atom(s.into())
    }

    /// The numeric payload as f64, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(t) => Some(to_f64(*t)),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Atom(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Time::from_integer(n))
    }
}

impl From<Vec<Value>> for Value {
    fn from(vs: Vec<Value>) -> Self {
        Value::Group(vs)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Atom(s) => write!(f, "{}", s),
            Value::Number(t) => {
                if t.is_integer() {
                    write!(f, "{}", t.numer())
                } else {
                    write!(f, "{}/{}", t.numer(), t.denom())
                }
            }
            Value::Group(vs) => {
                write!(f, "[")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::time;

    #[test]
    fn test_display() {
        assert_eq!(Value::atom("bd").to_string(), "bd");
        assert_eq!(Value::from(7).to_string(), "7");
        assert_eq!(Value::Number(time(3, 4)).to_string(), "3/4");
        let group = Value::from(vec![Value::atom("bd"), Value::from(2)]);
        assert_eq!(group.to_string(), "[bd, 2]");
    }

    #[test]
    fn test_as_f64_only_for_numbers() {
        assert_eq!(Value::Number(time(1, 2)).as_f64(), Some(0.5));
        assert_eq!(Value::atom("bd").as_f64(), None);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from("sn"), Value::Atom("sn".to_string()));
        assert_eq!(Value::from(3), Value::Number(Time::from_integer(3)));
    }
}
