use crate::value::Value;

use super::{Environment, ParseConfig, ParseResult, ParseRule, Tag};

/// The capture block evaluates its body and assigns the rendered result to
/// a variable usable elsewhere.
///
///   {% capture header %}
///     <title>{{ site_title }}</title>
///   {% end %}
///
///   {{ header }}
pub struct Capture;

impl Tag for Capture {
    fn parse(&self) -> ParseConfig {
        ParseConfig {
            tag_name: "capture".into(),
            block: true,
            rules: vec![ParseRule::Identifier],
            ..Default::default()
        }
    }

    fn eval(&self, env: &mut dyn Environment, result: &ParseResult<'_>) -> Value {
        let Value::String(name) = &result.nodes[0] else {
            return Value::Null;
        };

        let content = env.eval_all(result.statements).inspect();
        env.set(name, Value::from(content));

        Value::Null
    }
}
