use crate::lexer::TokenKind;
use crate::value::Value;

use super::{Environment, ParseConfig, ParseResult, ParseRule, Tag};

/// The assign tag sets a variable in the template's current scope. It can
/// be made visible to an including template via the `promote` tag.
///
///   {% assign var_name = EXPRESSION %}
pub struct Assign;

impl Tag for Assign {
    fn parse(&self) -> ParseConfig {
        ParseConfig {
            tag_name: "assign".into(),
            rules: vec![
                ParseRule::Identifier,
                ParseRule::Token(TokenKind::Assign),
                ParseRule::Expression,
            ],
            ..Default::default()
        }
    }

    fn eval(&self, env: &mut dyn Environment, result: &ParseResult<'_>) -> Value {
        let Value::String(name) = &result.nodes[0] else {
            return Value::Null;
        };

        env.set(name, result.nodes[2].clone());
        Value::Null
    }
}
