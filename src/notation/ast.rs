//! AST for the mini-notation, produced by the parser and consumed by the
//! compile step. Transient: nothing holds onto nodes once a pattern is built.

use std::fmt;

/// A parsed mini-notation node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A bare word or numeric literal.
    Atom(String),
    /// `~` — silence for one step.
    Rest,
    /// Whitespace-separated steps sharing one cycle.
    Sequence(Vec<Node>),
    /// `[...]` — a sub-sequence compressed into a single step.
    FastGroup(Vec<Node>),
    /// `<...>` — one child per cycle.
    Alternation(Vec<Node>),
    /// `(k,n[,r])` suffix — Euclidean onsets applied to the child.
    Euclid {
        child: Box<Node>,
        pulses: usize,
        steps: usize,
        rotation: usize,
    },
    /// Top-level `,` — parallel sub-patterns.
    Stack(Vec<Node>),
    /// `|` — one alternative chosen per cycle.
    RandomChoice(Vec<Node>),
    /// `*n` suffix — the child fast-repeated `n` times within its slot.
    Repeat { child: Box<Node>, count: usize },
}

fn join(f: &mut fmt::Formatter<'_>, children: &[Node], sep: &str) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", child)?;
    }
    Ok(())
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Atom(word) => write!(f, "{}", word),
            Node::Rest => write!(f, "~"),
            Node::Sequence(children) => join(f, children, " "),
            Node::FastGroup(children) => {
                write!(f, "[")?;
                join(f, children, " ")?;
                write!(f, "]")
            }
            Node::Alternation(children) => {
                write!(f, "<")?;
                join(f, children, " ")?;
                write!(f, ">")
            }
            Node::Euclid {
                child,
                pulses,
                steps,
                rotation,
            } => {
                if *rotation == 0 {
                    write!(f, "{}({},{})", child, pulses, steps)
                } else {
                    write!(f, "{}({},{},{})", child, pulses, steps, rotation)
                }
            }
            Node::Stack(children) => join(f, children, ", "),
            Node::RandomChoice(children) => join(f, children, " | "),
            Node::Repeat { child, count } => write!(f, "{}*{}", child, count),
        }
    }
}
