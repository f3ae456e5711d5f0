//! The tag extension protocol.
//!
//! Tags are the work-horses of the template language: where `{{ ... }}`
//! substitutions put data into the output, tags carry the restricted
//! programming logic. A tag lives inside `{% ... %}` designators and is
//! either stand-alone or a block closed by a matching `{% end %}`.
//!
//! Every tag declares its grammar through a [`ParseConfig`] and is handed a
//! [`ParseResult`] plus an [`Environment`] when it runs. Tags depend on the
//! `Environment` contract only, never on the concrete evaluator, so tag
//! logic can be driven by a test double.

mod assign;
mod capture;
mod comment;
mod for_tag;
mod if_tag;
mod include;
mod promote;
mod raw;

#[cfg(test)]
pub mod test_helpers;

pub use self::assign::*;
pub use self::capture::*;
pub use self::comment::*;
pub use self::for_tag::*;
pub use self::if_tag::*;
pub use self::include::*;
pub use self::promote::*;
pub use self::raw::*;

use serde::{Deserialize, Serialize};

use crate::ast::Statement;
use crate::lexer::TokenKind;
use crate::value::Value;

pub trait Tag {
    /// Declare how this tag is parsed.
    fn parse(&self) -> ParseConfig;

    /// Run the tag against the evaluated parse result.
    fn eval(&self, env: &mut dyn Environment, result: &ParseResult<'_>) -> Value;
}

/// The capability surface the evaluator presents to tag implementations.
pub trait Environment {
    /// Write into the current scope frame, observing shadow rules.
    fn set(&mut self, name: &str, value: Value);

    /// Write into the current frame even when it is a shadow frame.
    fn shadow_set(&mut self, name: &str, value: Value);

    /// Look a name up through the scope chain; missing names are Null.
    fn get(&self, name: &str) -> Value;

    /// Copy the current value of `name` up to the root frame.
    fn promote(&mut self, name: &str);

    fn push_scope(&mut self);
    fn push_shadow_scope(&mut self);
    fn pop_scope(&mut self);

    /// Read a partial through the host's file reader.
    fn read_file(&self, path: &str) -> String;

    /// Re-enter the engine on `body` with the current environment,
    /// returning the rendering as a String value.
    fn render(&mut self, body: &str) -> Value;

    fn eval(&mut self, statement: &Statement) -> Value;

    /// Evaluate a statement sequence, returning an Array of per-statement
    /// results. Evaluation stops once the interrupt register is set.
    fn eval_all(&mut self, statements: &[Statement]) -> Value;

    /// The current interrupt reason; empty means no interrupt is pending.
    fn interrupt(&self) -> String;
    fn clear_interrupt(&mut self);
}

/// How a single tag argument is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseRule {
    /// Expect an identifier, captured as an Identifier node.
    Identifier,
    /// Expect a specific token kind, captured as a bare string.
    Token(TokenKind),
    /// Expect a specific bare word, such as the `in` of a `for` tag.
    Literal(String),
    /// Parse a full expression.
    Expression,
}

impl ParseRule {
    /// What this rule expects, for error messages.
    pub fn expects(&self) -> String {
        match self {
            ParseRule::Identifier => TokenKind::Ident.to_string(),
            ParseRule::Token(kind) => kind.to_string(),
            ParseRule::Literal(literal) => literal.clone(),
            ParseRule::Expression => TokenKind::Expression.to_string(),
        }
    }
}

/// The grammar a tag declares: its name, whether it opens a block, whether
/// it interrupts a surrounding loop, the rules for its arguments, and the
/// subtags that may appear inside its block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseConfig {
    pub tag_name: String,
    pub block: bool,
    pub interrupt: bool,
    pub rules: Vec<ParseRule>,
    pub sub_tags: Vec<ParseConfig>,
}

/// Everything a tag needs at evaluation time: its evaluated argument nodes
/// (identifier arguments arrive verbatim as String values), the statements
/// of its block body, and the recursively built results of its subtags.
#[derive(Debug)]
pub struct ParseResult<'a> {
    pub tag_name: &'a str,
    pub nodes: Vec<Value>,
    pub statements: &'a [Statement],
    pub sub_tags: Vec<ParseResult<'a>>,
}
