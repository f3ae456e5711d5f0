use crate::value::Value;

use super::{Environment, ParseConfig, ParseResult, ParseRule, Tag};

/// Render another template in place.
///
///   {% include "header" %}
///
/// The partial's body comes from the host's file reader and is rendered
/// with the current environment inside a fresh scope, so its assigns stay
/// local unless it promotes them.
pub struct Include;

impl Tag for Include {
    fn parse(&self) -> ParseConfig {
        ParseConfig {
            tag_name: "include".into(),
            rules: vec![ParseRule::Expression],
            ..Default::default()
        }
    }

    fn eval(&self, env: &mut dyn Environment, result: &ParseResult<'_>) -> Value {
        let partial_name = match &result.nodes[0] {
            Value::String(name) => name.clone(),
            other => other.inspect(),
        };

        let body = env.read_file(&partial_name);

        env.push_scope();
        let rendered = env.render(&body);
        env.pop_scope();

        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::TestEnv;
    use super::*;

    #[test]
    fn test_renders_the_partial_in_its_own_scope() {
        let tag = Include;
        let mut env = TestEnv::default();

        let result = ParseResult {
            tag_name: "include",
            nodes: vec![Value::from("partials/header")],
            statements: &[],
            sub_tags: vec![],
        };

        let rendered = tag.eval(&mut env, &result);

        assert_eq!(Value::from("I read from partials/header"), rendered);
        assert_eq!(1, env.scope_pushes);
        assert_eq!(1, env.scope_pops);
    }
}
