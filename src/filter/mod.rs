//! Filters transform a single input value inside a pipe expression.
//!
//! A filter receives the piped input plus its named parameters and returns
//! a new value. Filters are registered process-wide by name; see
//! [`crate::registry`].

mod standard;

pub use standard::*;

use std::collections::HashMap;

use crate::value::Value;

/// Named parameters of a filter call. The first parameter of a pipe is
/// keyed by the filter's own name: `replace: "a", with: "b"` arrives as
/// `{"replace": "a", "with": "b"}`.
pub type Parameters = HashMap<String, Value>;

pub type FilterFunc = fn(Value, &Parameters) -> Value;

#[derive(Debug, Clone, Copy)]
pub struct Filter {
    func: FilterFunc,
}

impl Filter {
    pub fn new(func: FilterFunc) -> Self {
        Self { func }
    }

    pub fn call(&self, input: Value, parameters: &Parameters) -> Value {
        (self.func)(input, parameters)
    }
}
