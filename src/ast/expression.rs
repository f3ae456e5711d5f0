use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::lexer::{Token, TokenKind};

/// The closed family of expression nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Identifier(Identifier),
    Number(NumberLiteral),
    Boolean(BooleanLiteral),
    String(StringLiteral),
    Array(ArrayLiteral),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    Index(IndexExpression),
    Filter(FilterExpression),
    FilterLiteral(FilterLiteral),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub token: Token,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberLiteral {
    pub token: Token,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLiteral {
    pub token: Token,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayLiteral {
    pub token: Token,
    pub elements: Vec<Expression>,
}

/// Unary `-`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixExpression {
    pub token: Token,
    pub operator: String,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfixExpression {
    pub token: Token,
    pub operator: String,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// `a[b]`. Dotted access `a.b` is desugared to `a["b"]` at parse time, so
/// both forms build identical trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexExpression {
    pub token: Token,
    pub left: Box<Expression>,
    pub index: Box<Expression>,
}

/// `input | filter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpression {
    pub token: Token,
    pub input: Box<Expression>,
    pub filter: Box<Expression>,
}

/// The right-hand side of a pipe: a filter name with its parameter list.
/// The first parameter is keyed by the filter name itself
/// (`replace: "a", with: "b"` yields `replace` and `with`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterLiteral {
    pub token: Token,
    pub name: String,
    pub parameters: Vec<(String, Expression)>,
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Identifier(identifier) => f.write_str(&identifier.name),
            Expression::Number(number) => f.write_str(&number.token.literal),
            Expression::Boolean(boolean) => write!(f, "{}", boolean.value),
            Expression::String(string) => {
                // Parse-rule captures reuse StringLiteral for bare words such
                // as `in` or `=`; only genuine string tokens get quotes back.
                if string.token.kind == TokenKind::String {
                    write!(f, "\"{}\"", string.value.replace('"', "\\\""))
                } else {
                    f.write_str(&string.value)
                }
            }
            Expression::Array(array) => {
                let elements = array
                    .elements
                    .iter()
                    .map(|element| element.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{elements}]")
            }
            Expression::Prefix(prefix) => write!(f, "{}{}", prefix.operator, prefix.right),
            Expression::Infix(infix) => {
                write!(f, "{} {} {}", infix.left, infix.operator, infix.right)
            }
            Expression::Index(index) => write!(f, "{}[{}]", index.left, index.index),
            Expression::Filter(filter) => write!(f, "{} | {}", filter.input, filter.filter),
            Expression::FilterLiteral(filter) => {
                f.write_str(&filter.name)?;
                for (position, (name, expression)) in filter.parameters.iter().enumerate() {
                    match position {
                        0 => write!(f, ": {expression}")?,
                        _ => write!(f, ", {name}: {expression}")?,
                    }
                }
                Ok(())
            }
        }
    }
}
