use crate::value::Value;

use super::{Environment, ParseConfig, ParseResult, Tag};

/// The comment block throws away all content inside of it.
///
///   {% comment %}
///   ...
///   {% end %}
pub struct Comment;

impl Tag for Comment {
    fn parse(&self) -> ParseConfig {
        ParseConfig {
            tag_name: "comment".into(),
            block: true,
            ..Default::default()
        }
    }

    fn eval(&self, _env: &mut dyn Environment, _result: &ParseResult<'_>) -> Value {
        Value::Null
    }
}
