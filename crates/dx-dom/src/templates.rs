use std::collections::HashMap;

use web_sys::Node;

use crate::error::InterpreterError;

/// Clonable detached-subtree prototypes, keyed by guest-chosen id. Persist
/// across frames; never implicitly evicted -- dropping a template is the
/// guest's decision, and there is no opcode that does it.
#[derive(Default)]
pub struct TemplateCache {
    entries: HashMap<u32, Node>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-clones `node` and stores the clone under `id`, so later
    /// mutation of the live `node` cannot affect the saved template.
    pub fn save(&mut self, id: u32, node: &Node) -> Result<(), InterpreterError> {
        let clone = node
            .clone_node_with_deep(true)
            .map_err(InterpreterError::dom)?;
        self.entries.insert(id, clone);
        Ok(())
    }

    /// Deep-clones the stored prototype for `id` and returns the clone, so
    /// mutating the pushed node cannot affect the saved template.
    pub fn instantiate(&self, id: u32) -> Result<Node, InterpreterError> {
        let prototype = self
            .entries
            .get(&id)
            .ok_or(InterpreterError::UnknownTemplateId(id))?;
        prototype.clone_node_with_deep(true).map_err(InterpreterError::dom)
    }
}
