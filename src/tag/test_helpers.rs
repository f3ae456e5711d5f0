//! An in-memory `Environment` double for driving tag logic in isolation.

use std::collections::HashMap;

use crate::ast::Statement;
use crate::lexer::{Token, TokenKind};
use crate::value::Value;

use super::Environment;

#[derive(Default)]
pub struct TestEnv {
    pub values: HashMap<String, Value>,
    pub shadow_values: HashMap<String, Value>,
    pub statements_ran: Vec<String>,
    pub promoted: Vec<String>,
    pub interrupt: String,
    pub scope_pushes: usize,
    pub shadow_scope_pushes: usize,
    pub scope_pops: usize,
}

impl Environment for TestEnv {
    fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    fn shadow_set(&mut self, name: &str, value: Value) {
        self.shadow_values.insert(name.to_string(), value);
    }

    fn get(&self, name: &str) -> Value {
        self.shadow_values
            .get(name)
            .or_else(|| self.values.get(name))
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn promote(&mut self, name: &str) {
        self.promoted.push(name.to_string());
    }

    fn push_scope(&mut self) {
        self.scope_pushes += 1;
    }

    fn push_shadow_scope(&mut self) {
        self.shadow_scope_pushes += 1;
    }

    fn pop_scope(&mut self) {
        self.scope_pops += 1;
    }

    fn read_file(&self, path: &str) -> String {
        format!("I read from {path}")
    }

    fn render(&mut self, body: &str) -> Value {
        Value::from(body)
    }

    fn eval(&mut self, statement: &Statement) -> Value {
        let rendered = statement.to_string();
        self.statements_ran.push(rendered.clone());
        Value::from(rendered)
    }

    fn eval_all(&mut self, statements: &[Statement]) -> Value {
        let mut results = vec![];
        for statement in statements {
            if !self.interrupt.is_empty() {
                break;
            }
            results.push(self.eval(statement));
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

/// A raw statement carrying the given text, for feeding tag bodies.
pub fn raw_statement(text: &str) -> Statement {
    Statement::Raw(crate::ast::RawStatement {
        token: Token::new(TokenKind::Raw, text),
    })
}
