use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::lexer::Token;
use crate::tag::ParseConfig;

use super::Expression;

/// The closed family of statement nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Raw(RawStatement),
    Variable(VariableStatement),
    Tag(TagStatement),
}

/// Literal template text, emitted unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatement {
    pub token: Token,
}

/// `{{ expression }}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableStatement {
    pub token: Token,
    pub expression: Expression,
}

/// `{% name args %}`, optionally with a block body and subtags.
///
/// The node carries the `ParseConfig` captured from the tag at parse time;
/// the evaluator uses it to drive interrupt handling and fetches a fresh tag
/// instance from the registry when the statement runs. Subtags (`elsif`,
/// `else`) are owned directly by the tag they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagStatement {
    pub token: Token,
    pub name: String,
    pub config: ParseConfig,
    pub args: Vec<Expression>,
    pub body: Vec<Statement>,
    pub sub_tags: Vec<TagStatement>,
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Raw(raw) => f.write_str(&raw.token.raw),
            Statement::Variable(variable) => write!(f, "{{{{ {} }}}}", variable.expression),
            Statement::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

impl Display for TagStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{% {}", self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        f.write_str(" %}")?;

        if !self.config.block {
            return Ok(());
        }

        for statement in &self.body {
            write!(f, "{statement}")?;
        }

        for sub_tag in &self.sub_tags {
            write!(f, "{{% {}", sub_tag.name)?;
            for arg in &sub_tag.args {
                write!(f, " {arg}")?;
            }
            f.write_str(" %}")?;
            for statement in &sub_tag.body {
                write!(f, "{statement}")?;
            }
        }

        f.write_str("{% end %}")
    }
}
