//! The pattern algebra: query engine, rhythm generator, transformations,
//! combinators, and polymetric composition.
//!
//! A `Pattern<T>` is a pure function from a queried [`Span`](crate::time::Span)
//! to timed events; everything else in this module rewrites or composes such
//! functions.

mod combine;
mod core;
mod euclid;
mod event;
mod poly;
mod transform;


pub use combine::{cat, choose, choose_by, fastcat, overlay, stack, zip, zip_with};
pub use core::Pattern;
pub use euclid::euclid;
pub use event::Event;
pub use poly::{polymeter, polyrhythm, Polymeter, Polyrhythm};
