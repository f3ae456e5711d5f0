//! The host-facing rendering context.
//!
//! A `Context` carries everything one render needs from its host: the
//! pre-seeded assigns, the scope stack they live in, the reader used to
//! resolve partials, and the re-entrant render function the template
//! façade installs so `include` can call back into the engine. Contexts
//! are single-render state and must not be shared between concurrent
//! renders.

mod scope;

pub use scope::*;

use std::collections::HashMap;

use crate::value::Value;

/// Host-supplied variable seed, merged into the root scope.
pub type Assigns = HashMap<String, Value>;

/// How `include` finds the content of a partial. Implementations decide
/// what a path means; nothing in the engine touches the file system.
pub trait FileReader {
    fn read(&self, path: &str) -> String;
}

/// The default reader, for hosts that never use partials: every read
/// answers with a diagnostic that renders into the output where the
/// partial would have been.
pub struct NullReader;

impl FileReader for NullReader {
    fn read(&self, path: &str) -> String {
        format!("ERROR: Reader not implemented. Cannot read content at {path}")
    }
}

/// The render function a template installs on its context. Stored as a
/// plain function pointer so the context stays free of captured state.
pub type RenderFn = fn(&mut Context, &str) -> Value;

pub struct Context {
    pub(crate) scope: Scope,
    pub(crate) reader: Box<dyn FileReader>,
    pub(crate) render_fn: Option<RenderFn>,
    /// Parse errors collected by renders driven through this context.
    pub errors: Vec<String>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            scope: Scope::new(),
            reader: Box::new(NullReader),
            render_fn: None,
            errors: vec![],
        }
    }

    /// Replace the partial reader.
    pub fn with_reader(mut self, reader: impl FileReader + 'static) -> Self {
        self.reader = Box::new(reader);
        self
    }

    /// Merge a set of host assigns into the scope.
    pub fn assign(&mut self, assigns: Assigns) {
        for (name, value) in assigns {
            self.scope.set(&name, value);
        }
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.scope.set(name, value.into());
    }

    pub fn get(&self, name: &str) -> Value {
        self.scope.get(name)
    }

    pub fn read_file(&self, path: &str) -> String {
        self.reader.read(path)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
