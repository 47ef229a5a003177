use std::collections::HashMap;
use std::rc::Rc;

use crate::error::InterpreterError;

/// Interns strings the guest has written into shared memory, keyed by
/// guest-chosen integer ids.
///
/// Entries persist across frames; only the guest decides when an id is
/// retired (`dropCachedString`, opcode 15). Lookups of an id the guest never
/// added, or already dropped, are a protocol violation here -- failing fast
/// surfaces guest bugs instead of feeding a stray `undefined` into a DOM
/// call.
#[derive(Default)]
pub struct StringCache {
    entries: HashMap<u32, Rc<str>>,
}

impl StringCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u32, value: String) {
        self.entries.insert(id, Rc::from(value));
    }

    pub fn remove(&mut self, id: u32) {
        self.entries.remove(&id);
    }

    pub fn get(&self, id: u32) -> Result<Rc<str>, InterpreterError> {
        self.entries
            .get(&id)
            .cloned()
            .ok_or(InterpreterError::UnknownStringId(id))
    }
}
