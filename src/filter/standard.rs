use log::warn;

use crate::value::Value;

use super::Parameters;

/// `size` returns the character length of a string. Every other input
/// passes through unchanged.
pub fn size(input: Value, _parameters: &Parameters) -> Value {
    match &input {
        Value::String(value) => Value::from(value.chars().count() as f64),
        _ => input,
    }
}

/// `upcase` upper-cases a string and leaves everything else unchanged.
pub fn upcase(input: Value, _parameters: &Parameters) -> Value {
    match &input {
        Value::String(value) => Value::from(value.to_uppercase()),
        _ => input,
    }
}

/// `replace` substitutes every occurrence of the `replace` parameter with
/// the `with` parameter. Missing or non-string parameters leave the input
/// unchanged.
pub fn replace(input: Value, parameters: &Parameters) -> Value {
    let Value::String(value) = &input else {
        return input;
    };

    let (Some(Value::String(replace)), Some(Value::String(with))) =
        (parameters.get("replace"), parameters.get("with"))
    else {
        warn!("filter 'replace' requires string parameters 'replace' and 'with'");
        return input;
    };

    Value::from(value.replace(replace.as_str(), with))
}
