use js_sys::Function;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, Node};

use dx_binary::Decoder;
use dx_core::MemoryView;

use crate::error::InterpreterError;
use crate::machine::Machine;

/// A pending `(offset, length)` submission, in bytes.
struct PendingRange {
    offset: u32,
    length: u32,
}

/// Owns the container, the [`Machine`], and the ranges accumulated since the
/// last commit. One `FrameController` per mounted root, so multiple
/// containers on the same page don't share traversal state.
pub struct FrameController {
    container: Element,
    machine: Machine,
    ranges: Vec<PendingRange>,
}

impl FrameController {
    pub fn new(container: Element, document: Document) -> Self {
        Self {
            container,
            machine: Machine::new(document),
            ranges: Vec::new(),
        }
    }

    pub fn submit_range(&mut self, offset: u32, length: u32) {
        if length == 0 {
            return;
        }
        self.ranges.push(PendingRange { offset, length });
    }

    pub fn init_events_trampoline(&mut self, trampoline: Function) {
        self.machine.events.bind_trampoline(trampoline);
    }

    /// Runs every pending range through the dispatch loop in submission
    /// order. On success, clears the traversal cursor, temporaries, and
    /// pending ranges; the string and template caches are untouched. On
    /// failure, leaves all state as-is and propagates the error -- the
    /// frame is considered corrupt and the caller should unmount.
    pub fn commit(&mut self, memory: &JsValue) -> Result<(), InterpreterError> {
        if self.ranges.is_empty() {
            return Ok(());
        }

        let view = MemoryView::new(memory).map_err(InterpreterError::Memory)?;

        let root: Node = self.container.clone().into();
        self.machine.stack.push_option(root.first_child(), 0);

        for range in &self.ranges {
            let decoder = Decoder::new(&view, range.offset, range.length)?;
            for instruction in decoder {
                self.machine.execute(instruction?, &view)?;
            }
        }

        self.machine.stack.clear();
        self.machine.temporaries.clear();
        self.ranges.clear();
        Ok(())
    }
}
