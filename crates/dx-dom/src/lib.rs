//! # dx-dom: the change-list interpreter
//!
//! A host-side stack machine that applies a diffing guest's opcode stream to
//! a live document. The guest computes a virtual-DOM diff and writes it as
//! [`dx_binary::Instruction`]s into shared linear memory; this crate decodes
//! and executes them against a real `container` element.
//!
//! Module layout, leaves first:
//! - [`strings`] -- guest-keyed string interning
//! - [`stack`] -- the traversal cursor
//! - [`temporaries`] -- per-frame node slots
//! - [`templates`] -- clonable detached-subtree prototypes
//! - [`events`] -- the shared event handler and per-element payload table
//! - [`machine`] -- the opcode dispatch loop
//! - [`controller`] -- range accumulation and frame commit
//!
//! `Interpreter`, below, is the only public surface; everything else is an
//! implementation detail reachable for testing via `pub(crate)` visibility.

mod controller;
mod error;
mod events;
mod log;
mod machine;
mod stack;
mod strings;
mod temporaries;
mod templates;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use controller::FrameController;
pub use error::InterpreterError;

/// One mounted root. Guests construct one per container element; nothing is
/// shared between instances, so a page may mount any number of them.
#[wasm_bindgen]
pub struct Interpreter {
    inner: Option<FrameController>,
}

#[wasm_bindgen]
impl Interpreter {
    /// Mounts onto `container`. The document the container belongs to is
    /// used for `createElement`/`createTextNode`/`createElementNS`.
    #[wasm_bindgen(constructor)]
    pub fn new(container: Element) -> Result<Interpreter, JsValue> {
        #[cfg(target_arch = "wasm32")]
        dx_core::panic_hook();

        let document = container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("container element has no owner document"))?;
        Ok(Self {
            inner: Some(FrameController::new(container, document)),
        })
    }

    /// Binds the shared event handler. Must be called once, before the
    /// first `newEventListener` opcode is dispatched.
    #[wasm_bindgen(js_name = initEventsTrampoline)]
    pub fn init_events_trampoline(&mut self, trampoline: Function) -> Result<(), JsValue> {
        self.controller_mut()?.init_events_trampoline(trampoline);
        Ok(())
    }

    /// Queues a `(offset, length)` byte range for the next `applyChanges`.
    /// Accumulates across calls; a zero-length range is ignored.
    #[wasm_bindgen(js_name = addChangeListRange)]
    pub fn add_change_list_range(&mut self, offset: u32, length: u32) -> Result<(), JsValue> {
        self.controller_mut()?.submit_range(offset, length);
        Ok(())
    }

    /// Dispatches every queued range against `memory` (anything exposing a
    /// `.buffer` property, typically a `WebAssembly.Memory`) and clears the
    /// traversal cursor, temporaries, and the queue on success.
    #[wasm_bindgen(js_name = applyChanges)]
    pub fn apply_changes(&mut self, memory: &JsValue) -> Result<(), JsValue> {
        self.controller_mut()?.commit(memory).map_err(JsValue::from)
    }

    /// Releases the mounted state. Every call made afterward, including the
    /// shared event handler if it still fires, fails with "used after
    /// unmount".
    pub fn unmount(&mut self) {
        if self.inner.is_none() {
            log::warn("dx-dom: unmount() called on an already-unmounted interpreter");
        }
        self.inner = None;
    }

    fn controller_mut(&mut self) -> Result<&mut FrameController, JsValue> {
        self.inner
            .as_mut()
            .ok_or_else(|| JsValue::from(InterpreterError::UsedAfterUnmount))
    }
}
