//! Process-wide tag and filter registries.
//!
//! Both maps are seeded with the standard set on first touch and mutated
//! only through the explicit registration calls. Renders read them
//! concurrently; registration belongs in process start-up, not in the
//! middle of rendering.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::filter::{self, Filter, FilterFunc};
use crate::tag::{self, Tag};

pub type TagFactory = fn() -> Box<dyn Tag>;

static TAGS: Lazy<RwLock<HashMap<String, TagFactory>>> = Lazy::new(|| {
    let factories: [TagFactory; 10] = [
        || Box::new(tag::Assign),
        || Box::new(tag::Capture),
        || Box::new(tag::If),
        || Box::new(tag::For),
        || Box::new(tag::Break),
        || Box::new(tag::Continue),
        || Box::new(tag::Include),
        || Box::new(tag::Promote),
        || Box::new(tag::Raw),
        || Box::new(tag::Comment),
    ];

    let mut tags = HashMap::new();
    for factory in factories {
        tags.insert(factory().parse().tag_name, factory);
    }

    RwLock::new(tags)
});

static FILTERS: Lazy<RwLock<HashMap<String, Filter>>> = Lazy::new(|| {
    let mut filters = HashMap::new();

    for (name, func) in [
        ("size", filter::size as FilterFunc),
        ("upcase", filter::upcase),
        ("replace", filter::replace),
    ] {
        filters.insert(name.to_string(), Filter::new(func));
    }

    RwLock::new(filters)
});

/// Register a tag under the name its `ParseConfig` declares.
pub fn add_tag(factory: TagFactory) {
    let name = factory().parse().tag_name;
    TAGS.write()
        .expect("tag registry poisoned")
        .insert(name, factory);
}

/// A fresh instance of the named tag, one per call.
pub fn find_tag(name: &str) -> Option<Box<dyn Tag>> {
    TAGS.read()
        .expect("tag registry poisoned")
        .get(name)
        .map(|factory| factory())
}

pub fn add_filter(name: &str, func: FilterFunc) {
    FILTERS
        .write()
        .expect("filter registry poisoned")
        .insert(name.to_string(), Filter::new(func));
}

pub fn find_filter(name: &str) -> Option<Filter> {
    FILTERS
        .read()
        .expect("filter registry poisoned")
        .get(name)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Parameters;
    use crate::value::Value;

    #[test]
    fn test_standard_set_is_registered() {
        for name in [
            "assign", "capture", "if", "for", "break", "continue", "include", "promote", "raw",
            "comment",
        ] {
            assert!(find_tag(name).is_some(), "missing tag {name}");
        }

        for name in ["size", "upcase", "replace"] {
            assert!(find_filter(name).is_some(), "missing filter {name}");
        }
    }

    #[test]
    fn test_subtags_are_not_tags() {
        assert!(find_tag("elsif").is_none());
        assert!(find_tag("else").is_none());
    }

    #[test]
    fn test_found_filters_are_callable() {
        let filter = find_filter("size").expect("size is registered");
        let result = filter.call(Value::from("String"), &Parameters::new());
        assert_eq!(Value::from(6), result);
    }

    #[test]
    fn test_find_tag_builds_a_fresh_instance_per_call() {
        let first = find_tag("assign").expect("assign is registered");
        let second = find_tag("assign").expect("assign is registered");

        // Each call goes through the factory again; the instances agree on
        // their configuration but are independently owned.
        assert_eq!(first.parse(), second.parse());
        drop(first);
        assert_eq!("assign", second.parse().tag_name);
    }

    #[test]
    fn test_custom_registrations() {
        add_filter("reverse", |input, _| match input {
            Value::String(value) => Value::from(value.chars().rev().collect::<String>()),
            other => other,
        });

        let filter = find_filter("reverse").expect("reverse was just registered");
        assert_eq!(
            Value::from("olleh"),
            filter.call(Value::from("hello"), &Parameters::new())
        );
    }
}
