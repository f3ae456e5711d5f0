use crate::value::Value;

use super::{Environment, ParseConfig, ParseResult, Tag};

/// The raw block re-emits everything in its block as written, without any
/// evaluation. This is the tag-level sibling of the lexer's `{{{ ... }}}`
/// form.
///
///   {% raw %}
///     {{ "This is not a substitution" }}
///   {% end %}
pub struct Raw;

impl Tag for Raw {
    fn parse(&self) -> ParseConfig {
        ParseConfig {
            tag_name: "raw".into(),
            block: true,
            ..Default::default()
        }
    }

    fn eval(&self, _env: &mut dyn Environment, result: &ParseResult<'_>) -> Value {
        let mut output = String::new();

        for statement in result.statements {
            output.push_str(&statement.to_string());
        }

        Value::from(output)
    }
}
