//! The template façade: lexer → parser → evaluator for one body string.

use crate::context::Context;
use crate::evaluator::Evaluator;
use crate::parser::Parser;
use crate::value::Value;

/// A template body and the parse errors of its last render.
///
/// Rendering never panics and never throws: when parsing fails the body
/// comes back unrendered and the errors are readable strings on both the
/// template and the context.
pub struct Template {
    /// The raw source of the template we're parsing and rendering.
    pub body: String,
    pub errors: Vec<String>,
}

impl Template {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            errors: vec![],
        }
    }

    /// Render the template against the given context, returning the final
    /// output as a string.
    pub fn render(&mut self, ctx: &mut Context) -> String {
        // Hand the context a way back into the engine so `include` can
        // render partials against the same scope stack.
        ctx.render_fn = Some(render_partial);

        let mut parser = Parser::new(&self.body);
        let statements = parser.parse();

        if !parser.errors.is_empty() {
            self.errors = parser.errors.clone();
            ctx.errors.extend(parser.errors);
            return self.body.clone();
        }

        self.errors.clear();
        Evaluator::new(ctx).eval_template(&statements)
    }
}

fn render_partial(ctx: &mut Context, body: &str) -> Value {
    let mut template = Template::new(body);
    Value::from(template.render(ctx))
}
