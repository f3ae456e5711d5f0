//! The tree-walking evaluator.
//!
//! Evaluation is deliberately lenient: type mismatches, unknown names and
//! unknown filters all evaluate to Null instead of failing the render.
//! Control flow between loops and their interrupt tags runs over a string
//! register rather than any exception-like mechanism.

use log::warn;

use crate::ast::{Expression, Statement, TagStatement};
use crate::context::Context;
use crate::registry;
use crate::tag::{Environment, ParseResult};
use crate::value::Value;

pub struct Evaluator<'ctx> {
    ctx: &'ctx mut Context,
    /// The pending loop interrupt: empty for none, otherwise the name of
    /// the interrupt tag (`break`, `continue`) that raised it.
    interrupt: String,
}

impl<'ctx> Evaluator<'ctx> {
    pub fn new(ctx: &'ctx mut Context) -> Self {
        Self {
            ctx,
            interrupt: String::new(),
        }
    }

    /// Evaluate a template body and concatenate the rendered form of every
    /// top-level result.
    pub fn eval_template(&mut self, statements: &[Statement]) -> String {
        self.eval_all(statements).inspect()
    }

    fn eval_statement(&mut self, statement: &Statement) -> Value {
        match statement {
            Statement::Raw(raw) => Value::from(raw.token.raw.as_str()),
            Statement::Variable(variable) => self.eval_expression(&variable.expression),
            Statement::Tag(tag) => self.eval_tag_statement(tag),
        }
    }

    fn eval_tag_statement(&mut self, statement: &TagStatement) -> Value {
        let result = self.build_parse_result(statement);

        if statement.config.interrupt {
            self.interrupt = statement.name.clone();
        }

        let Some(tag) = registry::find_tag(&statement.name) else {
            // The parser only builds tag statements for registered tags.
            warn!("tag '{}' disappeared from the registry", statement.name);
            return Value::Null;
        };

        tag.eval(self, &result)
    }

    /// Fold a tag statement's argument nodes into values. Identifier
    /// arguments pass their name through verbatim: `assign` wants the
    /// variable's name, not its current value.
    fn build_parse_result<'t>(&mut self, statement: &'t TagStatement) -> ParseResult<'t> {
        let nodes = statement
            .args
            .iter()
            .map(|arg| match arg {
                Expression::Identifier(identifier) => Value::from(identifier.name.as_str()),
                other => self.eval_expression(other),
            })
            .collect();

        let sub_tags = statement
            .sub_tags
            .iter()
            .map(|sub_tag| self.build_parse_result(sub_tag))
            .collect();

        ParseResult {
            tag_name: &statement.name,
            nodes,
            statements: &statement.body,
            sub_tags,
        }
    }

    fn eval_expression(&mut self, expression: &Expression) -> Value {
        match expression {
            Expression::Identifier(identifier) => self.get(&identifier.name),
            Expression::Number(number) => Value::Number(number.value),
            Expression::Boolean(boolean) => Value::Boolean(boolean.value),
            Expression::String(string) => Value::from(string.value.as_str()),
            Expression::Array(array) => Value::array(
                array
                    .elements
                    .iter()
                    .map(|element| self.eval_expression(element))
                    .collect(),
            ),
            Expression::Prefix(prefix) => {
                let right = self.eval_expression(&prefix.right);
                match (prefix.operator.as_str(), &right) {
                    ("-", Value::Number(value)) => Value::Number(-value),
                    _ => right,
                }
            }
            Expression::Infix(infix) => {
                let left = self.eval_expression(&infix.left);
                let right = self.eval_expression(&infix.right);
                eval_infix(&infix.operator, left, right)
            }
            Expression::Index(index) => {
                let left = self.eval_expression(&index.left);
                let key = self.eval_expression(&index.index);
                eval_index(left, key)
            }
            Expression::Filter(filter) => {
                let input = self.eval_expression(&filter.input);
                let handle = self.eval_expression(&filter.filter);
                self.apply_filter(input, handle)
            }
            Expression::FilterLiteral(literal) => {
                let mut parameters = crate::filter::Parameters::new();
                for (name, expression) in &literal.parameters {
                    let value = self.eval_expression(expression);
                    parameters.insert(name.clone(), value);
                }
                Value::Filter(crate::value::FilterHandle {
                    name: literal.name.clone(),
                    parameters,
                })
            }
        }
    }

    fn apply_filter(&mut self, input: Value, handle: Value) -> Value {
        let Value::Filter(handle) = handle else {
            return Value::Null;
        };

        let Some(filter) = registry::find_filter(&handle.name) else {
            warn!("unknown filter '{}'", handle.name);
            return Value::Null;
        };

        filter.call(input, &handle.parameters)
    }
}

fn eval_infix(operator: &str, left: Value, right: Value) -> Value {
    if let (Value::Number(left), Value::Number(right)) = (&left, &right) {
        return match operator {
            "+" => Value::Number(left + right),
            "-" => Value::Number(left - right),
            "*" => Value::Number(left * right),
            "/" => Value::Number(left / right),
            "<" => Value::Boolean(left < right),
            "<=" => Value::Boolean(left <= right),
            ">" => Value::Boolean(left > right),
            ">=" => Value::Boolean(left >= right),
            "==" => Value::Boolean(left == right),
            "!=" => Value::Boolean(left != right),
            _ => Value::Null,
        };
    }

    match operator {
        "==" => Value::Boolean(left == right),
        "!=" => Value::Boolean(left != right),
        _ => Value::Null,
    }
}

fn eval_index(left: Value, key: Value) -> Value {
    match (&left, &key) {
        (Value::Array(elements), Value::Number(position)) => {
            if *position < 0.0 {
                return Value::Null;
            }

            elements
                .borrow()
                .get(*position as usize)
                .cloned()
                .unwrap_or(Value::Null)
        }
        (Value::Array(_), _) => Value::Null,
        (Value::Hash(entries), key) => match key.as_key() {
            Some(key) => entries.borrow().get(&key).cloned().unwrap_or(Value::Null),
            None => Value::Null,
        },
        _ => Value::Null,
    }
}

impl Environment for Evaluator<'_> {
    fn set(&mut self, name: &str, value: Value) {
        self.ctx.scope.set(name, value);
    }

    fn shadow_set(&mut self, name: &str, value: Value) {
        self.ctx.scope.shadow_set(name, value);
    }

    fn get(&self, name: &str) -> Value {
        self.ctx.scope.get(name)
    }

    fn promote(&mut self, name: &str) {
        self.ctx.scope.promote(name);
    }

    fn push_scope(&mut self) {
        self.ctx.scope.push();
    }

    fn push_shadow_scope(&mut self) {
        self.ctx.scope.push_shadow();
    }

    fn pop_scope(&mut self) {
        self.ctx.scope.pop();
    }

    fn read_file(&self, path: &str) -> String {
        self.ctx.read_file(path)
    }

    fn render(&mut self, body: &str) -> Value {
        match self.ctx.render_fn {
            Some(render) => render(self.ctx, body),
            None => Value::Null,
        }
    }

    fn eval(&mut self, statement: &Statement) -> Value {
        self.eval_statement(statement)
    }

    fn eval_all(&mut self, statements: &[Statement]) -> Value {
        let mut results = vec![];

        for statement in statements {
            if !self.interrupt.is_empty() {
                break;
            }
            results.push(self.eval_statement(statement));
        }

        Value::array(results)
    }

    fn interrupt(&self) -> String {
        self.interrupt.clone()
    }

    fn clear_interrupt(&mut self) {
        self.interrupt.clear();
    }
}
