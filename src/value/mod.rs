//! The runtime value model.
//!
//! Every number is an IEEE-754 binary64; host integers widen on the way in.
//! Arrays and hashes are shared handles: cloning a `Value` clones the
//! handle, not the contents, mirroring how composite values flow through
//! the engine (the `for` tag keeps updating its `forloop` hash after it has
//! been installed in scope). Rendering is single-threaded, so `Rc` is
//! sufficient.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use crate::filter::Parameters;

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Rc<RefCell<Vec<Value>>>),
    Hash(Rc<RefCell<HashMap<HashKey, Value>>>),
    Filter(FilterHandle),
}

/// A filter call folded out of a pipe expression: the filter name plus its
/// evaluated parameters, waiting to be applied to an input.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterHandle {
    pub name: String,
    pub parameters: Parameters,
}

/// Hash keys are restricted to scalars. Numbers are stored by their bit
/// pattern so `f64` keys can be hashed and compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashKey {
    Null,
    Boolean(bool),
    Number(u64),
    String(String),
}

impl Display for HashKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashKey::Null => f.write_str("null"),
            HashKey::Boolean(value) => write!(f, "{value}"),
            HashKey::Number(bits) => write!(f, "{}", f64::from_bits(*bits)),
            HashKey::String(value) => f.write_str(value),
        }
    }
}

impl Value {
    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn hash() -> Value {
        Value::Hash(Rc::new(RefCell::new(HashMap::new())))
    }

    /// Insert into a hash value. A no-op for every other variant and for
    /// non-scalar keys (arrays and hashes must never be used as keys).
    pub fn hash_set(&self, key: impl Into<Value>, value: impl Into<Value>) {
        let Value::Hash(entries) = self else {
            return;
        };

        if let Some(key) = key.into().as_key() {
            entries.borrow_mut().insert(key, value.into());
        }
    }

    /// A value is truthy unless it is `Null` or `false`. Empty strings,
    /// zero and empty collections are all truthy.
    pub fn truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn as_key(&self) -> Option<HashKey> {
        match self {
            Value::Null => Some(HashKey::Null),
            Value::Boolean(value) => Some(HashKey::Boolean(*value)),
            Value::Number(value) => Some(HashKey::Number(value.to_bits())),
            Value::String(value) => Some(HashKey::String(value.clone())),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Boolean(_) => "BOOLEAN",
            Value::Number(_) => "NUMBER",
            Value::String(_) => "STRING",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Filter(_) => "FILTER",
        }
    }

    /// The rendered form of this value.
    ///
    /// Null renders empty, so side-effect tags contribute nothing to the
    /// output. Numbers render as the shortest decimal that round-trips,
    /// never in scientific notation, and integral values render without a
    /// decimal point. An array renders as the concatenation of its members.
    pub fn inspect(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(value) => value.to_string(),
            Value::Number(value) => value.to_string(),
            Value::String(value) => value.clone(),
            Value::Array(elements) => elements.borrow().iter().map(Value::inspect).collect(),
            Value::Hash(entries) => {
                let entries = entries.borrow();
                let mut pairs = entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.inspect()))
                    .collect::<Vec<_>>();
                // Iteration order of a hash is unspecified; render sorted so
                // the output is at least deterministic.
                pairs.sort();

                let inner = pairs
                    .iter()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{{inner}}}")
            }
            Value::Filter(filter) => filter.name.clone(),
        }
    }
}

/// Equality unwraps scalars and compares their values; mixed scalar types
/// are never equal. Arrays and hashes compare by identity: two distinct
/// instances are unequal even when their contents match element for
/// element.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(left), Value::Boolean(right)) => left == right,
            (Value::Number(left), Value::Number(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Array(left), Value::Array(right)) => Rc::ptr_eq(left, right),
            (Value::Hash(left), Value::Hash(right)) => Rc::ptr_eq(left, right),
            (Value::Filter(left), Value::Filter(right)) => left == right,
            _ => false,
        }
    }
}

macro_rules! widen_to_number {
    ($($source:ty),*) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::Number(value as f64)
                }
            }
        )*
    };
}

widen_to_number!(u8, i8, u16, i16, u32, i32, u64, i64, usize, isize, f32, f64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::array(elements)
    }
}

/// The universal entry point for structured host data: JSON objects become
/// hashes, arrays become arrays, and every number widens to binary64.
impl From<serde_json::Value> for Value {
    fn from(input: serde_json::Value) -> Self {
        match input {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(value) => Value::Boolean(value),
            serde_json::Value::Number(value) => Value::Number(value.as_f64().unwrap_or_default()),
            serde_json::Value::String(value) => Value::String(value),
            serde_json::Value::Array(items) => {
                Value::array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => {
                let hash = Value::hash();
                for (key, value) in entries {
                    hash.hash_set(key, Value::from(value));
                }
                hash
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(Value::Boolean(true).truthy());
        assert!(Value::from("any string").truthy());
        assert!(Value::from("").truthy());
        assert!(Value::from(0).truthy());
        assert!(Value::array(vec![]).truthy());
        assert!(Value::hash().truthy());

        assert!(!Value::Boolean(false).truthy());
        assert!(!Value::Null.truthy());
    }

    #[test]
    fn test_number_inspection() {
        assert_eq!("3", Value::from(3).inspect());
        assert_eq!("3.5", Value::from(3.5).inspect());
        assert_eq!("-42", Value::from(-42).inspect());
        assert_eq!("0.1", Value::from(0.1).inspect());
        assert_eq!("1000000000000000000000", Value::from(1e21).inspect());
    }

    #[test]
    fn test_null_inspects_empty() {
        assert_eq!("", Value::Null.inspect());
    }

    #[test]
    fn test_array_inspects_concatenated() {
        let array = Value::array(vec![Value::from(1), Value::from("a"), Value::Null]);
        assert_eq!("1a", array.inspect());
    }

    #[test]
    fn test_scalar_equality_unwraps() {
        assert_eq!(Value::from(3), Value::from(3.0));
        assert_eq!(Value::from("a"), Value::from("a".to_string()));
        assert_ne!(Value::from("3"), Value::from(3));
        assert_ne!(Value::from(0), Value::Null);
    }

    #[test]
    fn test_composite_equality_is_identity() {
        let left = Value::array(vec![Value::from(1)]);
        let right = Value::array(vec![Value::from(1)]);

        assert_ne!(left, right);
        assert_eq!(left, left.clone());

        let hash = Value::hash();
        let other = Value::hash();
        assert_ne!(hash, other);
        assert_eq!(hash, hash.clone());
    }

    #[test]
    fn test_integer_widening() {
        assert_eq!(Value::from(3u8), Value::from(3i64));
        assert_eq!(Value::from(3usize), Value::from(3.0));
    }

    #[test]
    fn test_from_json_object_builds_hash_recursively() {
        let value = Value::from(json!({
            "name": "late",
            "count": 2,
            "nested": { "deep": true },
            "items": [1, "two"]
        }));

        let Value::Hash(entries) = &value else {
            panic!("expected a hash, got {value:?}");
        };

        let entries = entries.borrow();
        assert_eq!(
            Some(&Value::from("late")),
            entries.get(&HashKey::String("name".into()))
        );
        assert_eq!(
            Some(&Value::from(2)),
            entries.get(&HashKey::String("count".into()))
        );

        let nested = entries.get(&HashKey::String("nested".into())).unwrap();
        let Value::Hash(nested) = nested else {
            panic!("expected nested hash, got {nested:?}");
        };
        assert_eq!(
            Some(&Value::Boolean(true)),
            nested.borrow().get(&HashKey::String("deep".into()))
        );

        let items = entries.get(&HashKey::String("items".into())).unwrap();
        let Value::Array(items) = items else {
            panic!("expected array, got {items:?}");
        };
        assert_eq!(2, items.borrow().len());
    }

    #[test]
    fn test_composites_are_not_keys() {
        assert_eq!(None, Value::array(vec![]).as_key());
        assert_eq!(None, Value::hash().as_key());
        assert_eq!(Some(HashKey::Null), Value::Null.as_key());
        assert_eq!(
            Some(HashKey::Number(2.0f64.to_bits())),
            Value::from(2).as_key()
        );
    }

    #[test]
    fn test_hash_handles_are_shared() {
        let hash = Value::hash();
        let alias = hash.clone();

        alias.hash_set("index", 4);

        let Value::Hash(entries) = &hash else {
            unreachable!()
        };
        assert_eq!(
            Some(&Value::from(4)),
            entries.borrow().get(&HashKey::String("index".into()))
        );
    }
}
