use log::warn;

use crate::value::Value;

use super::{Environment, ParseConfig, ParseResult, ParseRule, Tag};

/// The for loop.
///
///   {% for entry in collection %} {{ entry }} {% end %}
///
/// The loop variable and the `forloop` bookkeeping hash live in a shadow
/// scope: they disappear with the loop, while `assign`s made inside the
/// body escape to the surrounding scope.
pub struct For;

impl Tag for For {
    fn parse(&self) -> ParseConfig {
        ParseConfig {
            tag_name: "for".into(),
            block: true,
            rules: vec![
                ParseRule::Identifier,
                ParseRule::Literal("in".into()),
                ParseRule::Expression,
            ],
            ..Default::default()
        }
    }

    fn eval(&self, env: &mut dyn Environment, result: &ParseResult<'_>) -> Value {
        let Value::String(variable) = &result.nodes[0] else {
            return Value::Null;
        };

        let Value::Array(elements) = &result.nodes[2] else {
            warn!(
                "for loop over a {} has nothing to iterate",
                result.nodes[2].type_name()
            );
            return Value::Null;
        };

        let elements = elements.borrow().clone();
        let mut output = String::new();

        env.push_shadow_scope();

        let forloop = Value::hash();
        forloop.hash_set("length", elements.len() as f64);
        env.shadow_set("forloop", forloop.clone());

        for (index, entry) in elements.iter().enumerate() {
            env.shadow_set(variable, entry.clone());

            forloop.hash_set("index", index as f64);
            forloop.hash_set("first", index == 0);
            forloop.hash_set("last", index == elements.len() - 1);

            output.push_str(&env.eval_all(result.statements).inspect());

            match env.interrupt().as_str() {
                "continue" => env.clear_interrupt(),
                "break" => {
                    env.clear_interrupt();
                    break;
                }
                _ => {}
            }
        }

        env.pop_scope();

        Value::from(output)
    }
}

/// `continue` requests that a surrounding loop skip to its next iteration.
/// The evaluator raises the interrupt register when it runs an interrupt
/// tag; the tag itself has no further effect.
pub struct Continue;

impl Tag for Continue {
    fn parse(&self) -> ParseConfig {
        ParseConfig {
            tag_name: "continue".into(),
            interrupt: true,
            ..Default::default()
        }
    }

    fn eval(&self, _env: &mut dyn Environment, _result: &ParseResult<'_>) -> Value {
        Value::Null
    }
}

/// `break` requests that a surrounding loop stop entirely.
pub struct Break;

impl Tag for Break {
    fn parse(&self) -> ParseConfig {
        ParseConfig {
            tag_name: "break".into(),
            interrupt: true,
            ..Default::default()
        }
    }

    fn eval(&self, _env: &mut dyn Environment, _result: &ParseResult<'_>) -> Value {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::{raw_statement, TestEnv};
    use super::*;
    use crate::value::HashKey;

    #[test]
    fn test_loops_over_every_element() {
        let tag = For;
        let mut env = TestEnv::default();

        let statements = [raw_statement("x")];
        let result = ParseResult {
            tag_name: "for",
            nodes: vec![
                Value::from("entry"),
                Value::from("in"),
                Value::array(vec![Value::from(1), Value::from(2), Value::from(3)]),
            ],
            statements: &statements,
            sub_tags: vec![],
        };

        assert_eq!(Value::from("xxx"), tag.eval(&mut env, &result));
        assert_eq!(1, env.shadow_scope_pushes);
        assert_eq!(1, env.scope_pops);

        // The loop variable was shadow-set, never plainly set.
        assert_eq!(Value::from(3), env.shadow_values["entry"].clone());
        assert!(env.values.is_empty());
    }

    #[test]
    fn test_forloop_bookkeeping() {
        let tag = For;
        let mut env = TestEnv::default();

        let result = ParseResult {
            tag_name: "for",
            nodes: vec![
                Value::from("entry"),
                Value::from("in"),
                Value::array(vec![Value::from(1), Value::from(2)]),
            ],
            statements: &[],
            sub_tags: vec![],
        };

        tag.eval(&mut env, &result);

        let Value::Hash(forloop) = env.shadow_values["forloop"].clone() else {
            panic!("forloop is not a hash");
        };
        let forloop = forloop.borrow();

        assert_eq!(
            Some(&Value::from(2)),
            forloop.get(&HashKey::String("length".into()))
        );
        // After the final iteration the bookkeeping points at the last entry.
        assert_eq!(
            Some(&Value::from(1)),
            forloop.get(&HashKey::String("index".into()))
        );
        assert_eq!(
            Some(&Value::Boolean(true)),
            forloop.get(&HashKey::String("last".into()))
        );
        assert_eq!(
            Some(&Value::Boolean(false)),
            forloop.get(&HashKey::String("first".into()))
        );
    }

    #[test]
    fn test_non_array_collections_iterate_nothing() {
        let tag = For;
        let mut env = TestEnv::default();

        let result = ParseResult {
            tag_name: "for",
            nodes: vec![Value::from("entry"), Value::from("in"), Value::from(42)],
            statements: &[],
            sub_tags: vec![],
        };

        assert_eq!(Value::Null, tag.eval(&mut env, &result));
        assert_eq!(0, env.shadow_scope_pushes);
    }

    #[test]
    fn test_interrupt_tags_do_nothing_themselves() {
        let mut env = TestEnv::default();
        let result = ParseResult {
            tag_name: "break",
            nodes: vec![],
            statements: &[],
            sub_tags: vec![],
        };

        assert_eq!(Value::Null, Break.eval(&mut env, &result));
        assert_eq!(Value::Null, Continue.eval(&mut env, &result));
        assert_eq!("", env.interrupt);
    }
}
