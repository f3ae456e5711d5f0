use std::collections::HashMap;

use log::warn;

use crate::value::Value;

/// A stack of variable frames. The root frame holds the host's assigns and
/// survives the whole render; block tags push and pop frames around their
/// bodies.
///
/// A *shadow* frame forwards plain writes to the frame below it, so user
/// assignments escape the block, while shadow writes stay local. Loops use
/// this to keep their loop variable and `forloop` bookkeeping scoped
/// without trapping the user's own `assign`s.
#[derive(Debug)]
pub struct Scope {
    frames: Vec<Frame>,
}

#[derive(Debug, Default)]
struct Frame {
    assigns: HashMap<String, Value>,
    shadow: bool,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(Frame::default());
    }

    pub fn push_shadow(&mut self) {
        self.frames.push(Frame {
            shadow: true,
            ..Default::default()
        });
    }

    /// Popping the root frame is a no-op.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Write into the nearest frame that accepts plain writes: shadow
    /// frames pass the write down to their parent.
    pub fn set(&mut self, name: &str, value: Value) {
        let frame = self
            .frames
            .iter_mut()
            .rev()
            .find(|frame| !frame.shadow)
            .expect("the root frame is never a shadow frame");

        frame.assigns.insert(name.to_string(), value);
    }

    /// Write into the current frame, shadow or not.
    pub fn shadow_set(&mut self, name: &str, value: Value) {
        let frame = self
            .frames
            .last_mut()
            .expect("the scope always has a root frame");

        frame.assigns.insert(name.to_string(), value);
    }

    /// Walk the frames towards the root; a name that is nowhere bound is
    /// Null rather than an error.
    pub fn get(&self, name: &str) -> Value {
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.assigns.get(name) {
                return value.clone();
            }
        }

        warn!("referenced undefined variable '{name}'");
        Value::Null
    }

    /// Copy the current value of `name` directly into the root frame, so
    /// it stays visible after every enclosing frame is popped. A no-op
    /// when the current frame already is the root.
    pub fn promote(&mut self, name: &str) {
        if self.frames.len() == 1 {
            return;
        }

        let value = self.get(name);
        self.frames[0].assigns.insert(name.to_string(), value);
    }
}
