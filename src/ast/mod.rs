//! The abstract syntax tree produced by the parser.
//!
//! Statements and expressions are two disjoint closed enums; the evaluator
//! walks them with exhaustive matches. Nodes value-copy the tokens they need
//! so source positions survive into evaluation, and `Display` reconstructs
//! canonical source text (the `raw` tag uses this to re-emit its body).

mod expression;
mod statement;

pub use self::expression::*;
pub use self::statement::*;
