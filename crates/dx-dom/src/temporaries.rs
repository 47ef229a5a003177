use std::collections::HashMap;

use web_sys::Node;

use crate::error::InterpreterError;

/// Sparse integer-indexed slots holding node references extracted during a
/// traversal, for reuse later in the same frame. Cleared at frame end; never
/// read across frames.
#[derive(Default)]
pub struct Temporaries {
    slots: HashMap<u32, Node>,
}

impl Temporaries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, index: u32, node: Node) {
        self.slots.insert(index, node);
    }

    pub fn get(&self, index: u32) -> Result<Node, InterpreterError> {
        self.slots
            .get(&index)
            .cloned()
            .ok_or(InterpreterError::UnknownTemporary(index))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
