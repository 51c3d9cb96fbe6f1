//! Mini-notation: the textual DSL compiled into pattern values.
//!
//! Token set: `~ [ ] < > ( ) * ! , |` plus bare words and non-negative
//! integer or `a/b` fraction literals. See [`parse`] for the AST step and
//! [`compile`] for the full text-to-pattern pipeline.

mod ast;
mod compile;
mod parser;

pub use ast::Node;
pub use compile::compile;
pub use parser::parse;
