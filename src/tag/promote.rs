use crate::value::Value;

use super::{Environment, ParseConfig, ParseResult, ParseRule, Tag};

/// The promote tag copies a variable up to the root scope, making it
/// visible outside the current frame. Mainly useful inside partials, to
/// hand values back to the template that `include`d them.
///
///   {% promote variable %}
pub struct Promote;

impl Tag for Promote {
    fn parse(&self) -> ParseConfig {
        ParseConfig {
            tag_name: "promote".into(),
            rules: vec![ParseRule::Identifier],
            ..Default::default()
        }
    }

    fn eval(&self, env: &mut dyn Environment, result: &ParseResult<'_>) -> Value {
        let Value::String(name) = &result.nodes[0] else {
            return Value::Null;
        };

        env.promote(name);
        Value::Null
    }
}
