use crate::value::Value;

use super::{Environment, ParseConfig, ParseResult, ParseRule, Tag};

/// The veritable `if` tag, with `elsif` and `else` subtags.
pub struct If;

impl Tag for If {
    fn parse(&self) -> ParseConfig {
        ParseConfig {
            tag_name: "if".into(),
            block: true,
            rules: vec![ParseRule::Expression],
            sub_tags: vec![
                ParseConfig {
                    tag_name: "elsif".into(),
                    block: true,
                    rules: vec![ParseRule::Expression],
                    ..Default::default()
                },
                ParseConfig {
                    tag_name: "else".into(),
                    block: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    fn eval(&self, env: &mut dyn Environment, result: &ParseResult<'_>) -> Value {
        if result.nodes[0].truthy() {
            return env.eval_all(result.statements);
        }

        for sub_tag in &result.sub_tags {
            let matches = match sub_tag.tag_name {
                "elsif" => sub_tag.nodes[0].truthy(),
                "else" => true,
                _ => false,
            };

            if matches {
                return env.eval_all(sub_tag.statements);
            }
        }

        Value::Null
    }
}
