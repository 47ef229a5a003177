use js_sys::{Array, Function, Map, WeakMap};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{Event, EventTarget, Node};

use crate::error::InterpreterError;

/// Per-(element, event type) payload storage plus the single shared DOM
/// handler.
///
/// Payloads live in a `WeakMap` keyed by the element itself, so removing the
/// element from the DOM and dropping our last `Node` reference to it frees
/// the annotation with it -- no explicit teardown opcode required, unlike a
/// side table keyed by an ad-hoc element property.
///
/// The shared handler is bound once, in [`EventRegistry::bind_trampoline`],
/// and is owned by this struct: dropping the `Interpreter` (which happens on
/// `unmount`) drops the `Closure`, invalidating every `addEventListener`
/// registration that still referenced it. A listener that somehow still
/// fires after that point calls into a function wasm-bindgen has already
/// freed, which is itself a failure -- "fires after unmount" falls directly
/// out of Rust's ownership model here, rather than needing a manually
/// checked flag.
pub struct EventRegistry {
    payloads: WeakMap,
    handler: Option<Closure<dyn Fn(Event)>>,
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self {
            payloads: WeakMap::new(),
            handler: None,
        }
    }
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the shared handler. Must be called before `newEventListener`
    /// fires for the first time; calling it again replaces the handler
    /// (existing DOM registrations keep pointing at the old `Closure` until
    /// the element's listener is re-added).
    pub fn bind_trampoline(&mut self, trampoline: Function) {
        let payloads = self.payloads.clone();
        let handler = Closure::<dyn Fn(Event)>::new(move |event: Event| {
            let Some(target) = event.current_target() else {
                return;
            };
            let target: JsValue = target.into();
            let per_element = payloads.get(&target);
            if per_element.is_undefined() {
                return;
            }
            let per_element: Map = per_element.unchecked_into();
            let entry = per_element.get(&JsValue::from_str(&event.type_()));
            if entry.is_undefined() {
                return;
            }
            let entry: Array = entry.unchecked_into();
            let a = entry.get(0);
            let b = entry.get(1);
            let event_js: JsValue = event.clone().into();
            let _ = trampoline.call3(&JsValue::NULL, &event_js, &a, &b);
        });
        self.handler = Some(handler);
    }

    fn handler_function(&self) -> Result<&Function, InterpreterError> {
        match &self.handler {
            Some(closure) => Ok(closure.as_ref().unchecked_ref()),
            None => Err(InterpreterError::Memory(
                "initEventsTrampoline must be called before the first newEventListener",
            )),
        }
    }

    fn per_element_map(&self, element: &Node) -> Map {
        let key: &JsValue = element.as_ref();
        let existing = self.payloads.get(key);
        if !existing.is_undefined() {
            return existing.unchecked_into();
        }
        let map = Map::new();
        self.payloads.set(key, &map);
        map
    }

    pub fn add_or_update(
        &mut self,
        element: &Node,
        event_type: &str,
        a: u32,
        b: u32,
    ) -> Result<(), InterpreterError> {
        let per_element = self.per_element_map(element);
        let already_registered = !per_element.get(&JsValue::from_str(event_type)).is_undefined();
        let payload = Array::of2(&JsValue::from_f64(a as f64), &JsValue::from_f64(b as f64));
        per_element.set(&JsValue::from_str(event_type), &payload);

        if !already_registered {
            let target: &EventTarget = element.unchecked_ref();
            let handler = self.handler_function()?;
            target
                .add_event_listener_with_callback(event_type, handler)
                .map_err(InterpreterError::dom)?;
        }
        Ok(())
    }

    pub fn remove(&mut self, element: &Node, event_type: &str) -> Result<(), InterpreterError> {
        let per_element = self.per_element_map(element);
        let key = JsValue::from_str(event_type);
        if per_element.get(&key).is_undefined() {
            return Ok(());
        }
        per_element.delete(&key);

        let target: &EventTarget = element.unchecked_ref();
        let handler = self.handler_function()?;
        target
            .remove_event_listener_with_callback(event_type, handler)
            .map_err(InterpreterError::dom)?;
        Ok(())
    }
}
