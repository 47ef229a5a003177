//! End-to-end scenarios, run in a real browser document via
//! `wasm-bindgen-test`. Each builds a small wire-format program by hand
//! (opcode words plus a packed string pool in the same buffer) and checks
//! the resulting DOM against the opcode table's documented effect.

use js_sys::{Object, Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{Document, Element};

use dx_binary::OpCode;
use dx_dom::Interpreter;

wasm_bindgen_test_configure!(run_in_browser);

/// Builds a shared-memory buffer as `[string pool][opcode program]`, so
/// string offsets are known before the program that references them is
/// written.
struct Wire {
    pool: Vec<u8>,
    program: Vec<u8>,
}

impl Wire {
    fn new() -> Self {
        Self {
            pool: Vec::new(),
            program: Vec::new(),
        }
    }

    /// Packs `s` into the string pool, 4-byte aligned, and returns its
    /// `(ptr, len)`. `ptr` is relative to the final buffer, not the pool --
    /// callers must not read it before [`Wire::finish`].
    fn text(&mut self, s: &str) -> (u32, u32) {
        while self.pool.len() % 4 != 0 {
            self.pool.push(0);
        }
        let ptr = self.pool.len() as u32;
        self.pool.extend_from_slice(s.as_bytes());
        (ptr, s.len() as u32)
    }

    fn word(&mut self, w: u32) -> &mut Self {
        self.program.extend_from_slice(&w.to_le_bytes());
        self
    }

    fn op(&mut self, op: OpCode) -> &mut Self {
        self.word(op as u32)
    }

    /// Finishes the buffer and returns `(memory, program_offset, program_length)`.
    /// `text()` ptrs become valid only once this has run, since they're
    /// relative to the pool prefix this prepends.
    fn finish(self) -> (JsValue, u32, u32) {
        let program_offset = {
            let mut len = self.pool.len();
            while len % 4 != 0 {
                len += 1;
            }
            len as u32
        };
        let mut bytes = self.pool;
        while bytes.len() % 4 != 0 {
            bytes.push(0);
        }
        let program_length = self.program.len() as u32;
        bytes.extend_from_slice(&self.program);

        let array = Uint8Array::new_with_length(bytes.len() as u32);
        array.copy_from(&bytes);
        let buffer = array.buffer();

        let memory = Object::new();
        Reflect::set(&memory, &JsValue::from_str("buffer"), &buffer).unwrap();
        (memory.into(), program_offset, program_length)
    }
}

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn detached_container() -> Element {
    document().create_element("div").unwrap()
}

#[wasm_bindgen_test]
fn create_and_attach() {
    let container = detached_container();
    let mut interp = Interpreter::new(container.clone()).unwrap();

    let mut wire = Wire::new();
    let (tag_ptr, tag_len) = wire.text("div");
    wire.op(OpCode::AddCachedString)
        .word(tag_ptr)
        .word(tag_len)
        .word(1);
    wire.op(OpCode::CreateElement).word(1);
    wire.op(OpCode::AppendChild);
    let (memory, offset, length) = wire.finish();

    interp.add_change_list_range(offset, length).unwrap();
    interp.apply_changes(&memory).unwrap();

    let first = container.first_element_child().unwrap();
    assert_eq!(first.tag_name().to_lowercase(), "div");
}

#[wasm_bindgen_test]
fn set_text() {
    let container = detached_container();
    container.set_inner_html("<p></p>");
    let mut interp = Interpreter::new(container.clone()).unwrap();

    let mut wire = Wire::new();
    let (ptr, len) = wire.text("hi");
    wire.op(OpCode::PushFirstChild);
    wire.op(OpCode::SetText).word(ptr).word(len);
    wire.op(OpCode::Pop);
    let (memory, offset, length) = wire.finish();

    interp.add_change_list_range(offset, length).unwrap();
    interp.apply_changes(&memory).unwrap();

    assert_eq!(container.inner_html(), "<p>hi</p>");
}

#[wasm_bindgen_test]
fn volatile_attribute() {
    let container = detached_container();
    container.set_inner_html("<input>");
    let mut interp = Interpreter::new(container.clone()).unwrap();

    let mut wire = Wire::new();
    let (name_ptr, name_len) = wire.text("value");
    let (val_ptr, val_len) = wire.text("42");
    wire.op(OpCode::AddCachedString)
        .word(name_ptr)
        .word(name_len)
        .word(2);
    wire.op(OpCode::AddCachedString)
        .word(val_ptr)
        .word(val_len)
        .word(3);
    wire.op(OpCode::PushFirstChild);
    wire.op(OpCode::SetAttribute).word(2).word(3);
    let (memory, offset, length) = wire.finish();

    interp.add_change_list_range(offset, length).unwrap();
    interp.apply_changes(&memory).unwrap();

    let input = container.first_element_child().unwrap();
    assert_eq!(input.get_attribute("value").as_deref(), Some("42"));
    let live_value = Reflect::get(&input, &JsValue::from_str("value")).unwrap();
    assert_eq!(live_value.as_string().as_deref(), Some("42"));
}

#[wasm_bindgen_test]
fn event_payload_update_without_reregistration() {
    let container = detached_container();
    container.set_inner_html("<button></button>");
    let mut interp = Interpreter::new(container.clone()).unwrap();
    let button = container.first_element_child().unwrap();

    // Count real addEventListener invocations by shadowing it with an
    // own-property wrapper before any opcode runs.
    let call_count = std::rc::Rc::new(std::cell::Cell::new(0));
    let count_clone = call_count.clone();
    let original_add: js_sys::Function =
        Reflect::get(&button, &JsValue::from_str("addEventListener"))
            .unwrap()
            .unchecked_into();
    let button_for_wrapper = button.clone();
    let counting_add = wasm_bindgen::closure::Closure::<dyn Fn(JsValue, JsValue)>::new(
        move |event_type: JsValue, listener: JsValue| {
            count_clone.set(count_clone.get() + 1);
            let _ = original_add.call2(button_for_wrapper.as_ref(), &event_type, &listener);
        },
    );
    Reflect::set(
        &button,
        &JsValue::from_str("addEventListener"),
        counting_add.as_ref(),
    )
    .unwrap();
    counting_add.forget();

    let received = std::rc::Rc::new(std::cell::RefCell::new(None));
    let received_clone = received.clone();
    let trampoline = wasm_bindgen::closure::Closure::<dyn Fn(JsValue, u32, u32)>::new(
        move |_event: JsValue, a: u32, b: u32| {
            *received_clone.borrow_mut() = Some((a, b));
        },
    );
    interp
        .init_events_trampoline(trampoline.as_ref().unchecked_ref::<js_sys::Function>().clone())
        .unwrap();
    trampoline.forget();

    let mut wire = Wire::new();
    let (click_ptr, click_len) = wire.text("click");
    wire.op(OpCode::AddCachedString)
        .word(click_ptr)
        .word(click_len)
        .word(4);
    wire.op(OpCode::PushFirstChild);
    wire.op(OpCode::NewEventListener).word(4).word(7).word(8);
    let (memory, offset, length) = wire.finish();
    interp.add_change_list_range(offset, length).unwrap();
    interp.apply_changes(&memory).unwrap();

    let mut wire2 = Wire::new();
    wire2.op(OpCode::PushFirstChild);
    wire2
        .op(OpCode::UpdateEventListener)
        .word(4)
        .word(9)
        .word(10);
    let (memory2, offset2, length2) = wire2.finish();
    interp.add_change_list_range(offset2, length2).unwrap();
    interp.apply_changes(&memory2).unwrap();

    let event = web_sys::Event::new("click").unwrap();
    button.dispatch_event(&event).unwrap();

    assert_eq!(*received.borrow(), Some((9, 10)));
    assert_eq!(call_count.get(), 1);
}

#[wasm_bindgen_test]
fn template_clone_isolation() {
    // container's first child is the <ul>; commit auto-pushes it, so the
    // stack's initial top is already the node to save -- no pushFirstChild
    // needed before saveTemplate.
    let container = detached_container();
    container.set_inner_html("<ul><li>a</li></ul>");
    let mut interp = Interpreter::new(container.clone()).unwrap();

    let mut wire = Wire::new();
    wire.op(OpCode::SaveTemplate).word(5);
    let (memory, offset, length) = wire.finish();
    interp.add_change_list_range(offset, length).unwrap();
    interp.apply_changes(&memory).unwrap();

    // Push one clone and mutate its first child -- this must not affect the
    // stored template.
    let mut wire2 = Wire::new();
    let (ptr, len) = wire2.text("b");
    wire2.op(OpCode::PushTemplate).word(5);
    wire2.op(OpCode::PushFirstChild);
    wire2.op(OpCode::SetText).word(ptr).word(len);
    let (memory2, offset2, length2) = wire2.finish();
    interp.add_change_list_range(offset2, length2).unwrap();
    interp.apply_changes(&memory2).unwrap();

    // Push a second, independent clone and attach it so we can inspect it:
    // if saveTemplate/pushTemplate shared structure instead of deep-cloning,
    // this clone would read "b" too.
    let mut wire3 = Wire::new();
    wire3.op(OpCode::PushTemplate).word(5);
    wire3.op(OpCode::AppendChild);
    let (memory3, offset3, length3) = wire3.finish();
    interp.add_change_list_range(offset3, length3).unwrap();
    interp.apply_changes(&memory3).unwrap();

    let attached_clone = container
        .first_element_child()
        .unwrap()
        .first_element_child()
        .unwrap();
    assert_eq!(
        attached_clone.first_element_child().unwrap().text_content().as_deref(),
        Some("a")
    );
}

#[wasm_bindgen_test]
fn remove_self_and_siblings() {
    let container = detached_container();
    container.set_inner_html("<root><a></a><b></b><c></c></root>");
    let root = container.first_element_child().unwrap();
    let mut interp = Interpreter::new(root.clone()).unwrap();

    let mut wire = Wire::new();
    wire.op(OpCode::PushFirstChild);
    wire.op(OpCode::RemoveSelfAndNextSiblings);
    let (memory, offset, length) = wire.finish();
    interp.add_change_list_range(offset, length).unwrap();
    interp.apply_changes(&memory).unwrap();

    assert!(root.first_element_child().is_none());
}

#[wasm_bindgen_test]
fn used_after_unmount_fails() {
    let container = detached_container();
    let mut interp = Interpreter::new(container).unwrap();
    interp.unmount();

    assert!(interp.add_change_list_range(0, 4).is_err());
}
