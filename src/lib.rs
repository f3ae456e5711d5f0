//! Tardy is a Liquid-style templating engine.
//!
//! A template interleaves literal text with expression substitutions
//! (`{{ ... }}`), tags (`{% ... %}`), comments (`{# ... #}`) and verbatim
//! sections (`{{{ ... }}}`). Rendering runs the classic pipeline of lexer,
//! parser and tree-walking evaluator against a host-supplied [`Context`].
//!
//! ```
//! use tardy::{Context, Template};
//!
//! let mut ctx = Context::new();
//! ctx.set("name", "World");
//!
//! let mut template = Template::new("Hello, {{ name | upcase }}!");
//! assert_eq!("Hello, WORLD!", template.render(&mut ctx));
//! ```

pub mod ast;
pub mod context;
pub mod evaluator;
pub mod filter;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod tag;
pub mod template;
pub mod value;

pub use context::{Assigns, Context, FileReader, NullReader};
pub use registry::{add_filter, add_tag, find_filter, find_tag};
pub use template::Template;
pub use value::Value;
