//! Compile a mini-notation AST into a `Pattern<Value>`.
//!
//! Each node maps onto the pattern algebra: sequences and groups become
//! `fastcat`, Euclid suffixes slot the child into the generated onset grid,
//! and `<...>` alternations and `|` alternatives select one branch per wall
//! cycle. All failures happen here; the compiled pattern's queries are total.
//!
//! Every `fastcat`-shaped node subdivides time, so a node nested inside one
//! sees its local cycle index multiplied by the subdivision. The compiler
//! threads that accumulated factor down the tree; cycle-selecting nodes
//! divide it back out, which is what keeps `<bd sn> hh` advancing once per
//! wall cycle no matter how deeply the alternation is nested.

use super::ast::Node;
use super::parser::parse;
use crate::error::Result;
use crate::pattern::{euclid, fastcat, stack, Pattern};
use crate::rand::{irand, SALT_ALTERNATIVE};
use crate::time::{cycle_of, time, Time};
use crate::value::Value;

/// Parse and compile mini-notation into a pattern. `seed` drives the `|`
/// random-choice branches.
pub fn compile(src: &str, seed: u64) -> Result<Pattern<Value>> {
    let ast = parse(src)?;
    // Each RandomChoice node gets its own salt so sibling choices in one
    // pattern draw independently.
    let mut next_salt = SALT_ALTERNATIVE;
    compile_node(&ast, seed, 1, &mut next_salt)
}

/// `factor` is the number of local cycles this node plays per wall cycle,
/// accumulated from the subdividing nodes above it.
fn compile_node(node: &Node, seed: u64, factor: i64, next_salt: &mut u32) -> Result<Pattern<Value>> {
    match node {
        Node::Atom(word) => Ok(Pattern::pure(atom_value(word))),
        Node::Rest => Ok(Pattern::silence()),
        Node::Sequence(children) | Node::FastGroup(children) => {
            let inner = factor * children.len() as i64;
            let pats = compile_children(children, seed, inner, next_salt)?;
            fastcat(&pats)
        }
        Node::Alternation(children) => {
            let pats = compile_children(children, seed, factor, next_salt)?;
            let len = pats.len() as i64;
            Ok(Pattern::new(move |span| {
                span.split_cycles()
                    .flat_map(|piece| {
                        let wall = cycle_of(piece.start).div_euclid(factor);
                        pats[wall.rem_euclid(len) as usize].query(piece)
                    })
                    .collect()
            }))
        }
        Node::Stack(children) => {
            let pats = compile_children(children, seed, factor, next_salt)?;
            stack(&pats)
        }
        Node::RandomChoice(children) => {
            let pats = compile_children(children, seed, factor, next_salt)?;
            let salt = *next_salt;
            *next_salt = next_salt.wrapping_add(1);
            Ok(Pattern::new(move |span| {
                span.split_cycles()
                    .flat_map(|piece| {
                        let wall = cycle_of(piece.start).div_euclid(factor);
                        let ix = irand(seed, wall, salt, pats.len());
                        pats[ix].query(piece)
                    })
                    .collect()
            }))
        }
        Node::Euclid {
            child,
            pulses,
            steps,
            rotation,
        } => {
            let onsets = euclid(*pulses, *steps, *rotation)?;
            let child_pat = compile_node(child, seed, factor * *steps as i64, next_salt)?;
            let slots: Vec<Pattern<Value>> = onsets
                .into_iter()
                .map(|on| if on { child_pat.clone() } else { Pattern::silence() })
                .collect();
            fastcat(&slots)
        }
        Node::Repeat { child, count } => {
            let child_pat = compile_node(child, seed, factor * *count as i64, next_salt)?;
            let copies = vec![child_pat; *count];
            fastcat(&copies)
        }
    }
}

fn compile_children(
    children: &[Node],
    seed: u64,
    factor: i64,
    next_salt: &mut u32,
) -> Result<Vec<Pattern<Value>>> {
    children
        .iter()
        .map(|child| compile_node(child, seed, factor, next_salt))
        .collect()
}

/// Numeric literals (`7`, `3/4`) become exact numbers; everything else is an
/// opaque atom for the renderer.
fn atom_value(word: &str) -> Value {
    if let Ok(n) = word.parse::<i64>() {
        if n >= 0 {
            return Value::Number(Time::from_integer(n));
        }
    }
    if let Some((numer, denom)) = word.split_once('/') {
        if let (Ok(n), Ok(d)) = (numer.parse::<i64>(), denom.parse::<i64>()) {
            if n >= 0 && d > 0 {
                return Value::Number(time(n, d));
            }
        }
    }
    Value::atom(word)
}
