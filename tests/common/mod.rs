use std::collections::HashMap;

use tardy::{Assigns, Context, FileReader, Template};

pub fn init_logging() {
    let _ = simple_logger::init_with_level(log::Level::Warn);
}

/// Render `input` with the given assigns and expect a clean, exact result.
pub fn assert_render(input: &str, assigns: Assigns, expected: &str) {
    init_logging();

    let mut ctx = Context::new();
    ctx.assign(assigns);

    let mut template = Template::new(input);
    let output = template.render(&mut ctx);

    assert!(
        template.errors.is_empty(),
        "unexpected errors rendering {input:?}: {:?}",
        template.errors
    );
    assert_eq!(expected, output, "template {input:?}");
}

/// An in-memory partial store standing in for the host's file system.
pub struct PartialReader {
    partials: HashMap<String, String>,
}

impl PartialReader {
    pub fn new(partials: &[(&str, &str)]) -> Self {
        Self {
            partials: partials
                .iter()
                .map(|(name, body)| (name.to_string(), body.to_string()))
                .collect(),
        }
    }
}

impl FileReader for PartialReader {
    fn read(&self, path: &str) -> String {
        self.partials
            .get(path)
            .cloned()
            .unwrap_or_else(|| format!("no partial named {path}"))
    }
}
