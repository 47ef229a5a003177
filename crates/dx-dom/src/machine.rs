use dx_binary::{Instruction, TextOperand};
use dx_core::MemoryView;
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element};

use crate::error::InterpreterError;
use crate::events::EventRegistry;
use crate::stack::TraversalStack;
use crate::strings::StringCache;
use crate::temporaries::Temporaries;
use crate::templates::TemplateCache;

/// Attribute names that also need their live property set, because the
/// attribute alone doesn't reflect into the property after initial parse.
fn is_volatile_attribute(name: &str) -> bool {
    matches!(name, "value" | "checked" | "selected")
}

/// Owns the stack machine's state (string cache, traversal cursor,
/// temporaries, templates, event registry) and executes decoded
/// [`Instruction`]s against a live document. An exhaustive `match` over
/// `Instruction` lets the type checker verify every opcode is handled.
pub struct Machine {
    document: Document,
    pub strings: StringCache,
    pub stack: TraversalStack,
    pub temporaries: Temporaries,
    pub templates: TemplateCache,
    pub events: EventRegistry,
}

impl Machine {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            strings: StringCache::new(),
            stack: TraversalStack::new(),
            temporaries: Temporaries::new(),
            templates: TemplateCache::new(),
            events: EventRegistry::new(),
        }
    }

    fn text(&self, memory: &MemoryView, op: TextOperand) -> Result<String, InterpreterError> {
        memory.utf8_at(op.ptr, op.len).map_err(InterpreterError::Memory)
    }

    fn top_element(&self) -> Result<Element, InterpreterError> {
        self.stack
            .top()?
            .clone()
            .dyn_into::<Element>()
            .map_err(|_| InterpreterError::NotAnElement)
    }

    pub fn execute(
        &mut self,
        instruction: Instruction,
        memory: &MemoryView,
    ) -> Result<(), InterpreterError> {
        match instruction {
            Instruction::SetText(op) => {
                let text = self.text(memory, op)?;
                self.stack.top()?.set_text_content(Some(&text));
            }

            Instruction::RemoveSelfAndNextSiblings => {
                let first = self.stack.pop_node()?;
                if let Some(parent) = first.parent_node() {
                    let mut current = Some(first);
                    while let Some(node) = current {
                        let next = node.next_sibling();
                        parent.remove_child(&node).map_err(InterpreterError::dom)?;
                        current = next;
                    }
                }
            }

            Instruction::ReplaceWith => {
                let new_node = self.stack.pop_node()?;
                let old_node = self.stack.pop_node()?;
                if let Some(parent) = old_node.parent_node() {
                    parent
                        .insert_before(&new_node, Some(&old_node))
                        .map_err(InterpreterError::dom)?;
                    parent.remove_child(&old_node).map_err(InterpreterError::dom)?;
                }
                self.stack.push(new_node, -1);
            }

            Instruction::SetAttribute { name_id, value_id } => {
                let name = self.strings.get(name_id)?;
                let value = self.strings.get(value_id)?;
                let element = self.top_element()?;
                element
                    .set_attribute(&name, &value)
                    .map_err(InterpreterError::dom)?;
                if is_volatile_attribute(&name) {
                    set_volatile_property(&element, &name, &JsValue::from_str(&value))?;
                }
            }

            Instruction::RemoveAttribute { name_id } => {
                let name = self.strings.get(name_id)?;
                let element = self.top_element()?;
                element
                    .remove_attribute(&name)
                    .map_err(InterpreterError::dom)?;
                if is_volatile_attribute(&name) {
                    let reset = if name == "checked" || name == "selected" {
                        JsValue::FALSE
                    } else {
                        JsValue::NULL
                    };
                    set_volatile_property(&element, &name, &reset)?;
                }
            }

            Instruction::PushFirstChild => {
                let first_child = self.stack.top()?.first_child();
                self.stack.push_option(first_child, 0);
            }

            Instruction::PopPushNextSibling => {
                let node = self.stack.pop_node()?;
                let next = node.next_sibling();
                self.stack.push_option(next, -1);
            }

            Instruction::Pop => {
                self.stack.pop()?;
            }

            Instruction::AppendChild => {
                let child = self.stack.pop_node()?;
                self.stack
                    .top()?
                    .append_child(&child)
                    .map_err(InterpreterError::dom)?;
            }

            Instruction::CreateTextNode(op) => {
                let text = self.text(memory, op)?;
                let node = self.document.create_text_node(&text);
                self.stack.push(node.into(), -1);
            }

            Instruction::CreateElement { tag_id } => {
                let tag = self.strings.get(tag_id)?;
                let element = self
                    .document
                    .create_element(&tag)
                    .map_err(InterpreterError::dom)?;
                self.stack.push(element.into(), -1);
            }

            Instruction::NewEventListener {
                event_type_id,
                a,
                b,
            } => {
                let event_type = self.strings.get(event_type_id)?;
                let element = self.top_element()?;
                self.events
                    .add_or_update(element.as_ref(), &event_type, a, b)?;
            }

            Instruction::UpdateEventListener {
                event_type_id,
                a,
                b,
            } => {
                let event_type = self.strings.get(event_type_id)?;
                let element = self.top_element()?;
                self.events
                    .add_or_update(element.as_ref(), &event_type, a, b)?;
            }

            Instruction::RemoveEventListener { event_type_id } => {
                let event_type = self.strings.get(event_type_id)?;
                let element = self.top_element()?;
                self.events.remove(element.as_ref(), &event_type)?;
            }

            Instruction::AddCachedString { text, id } => {
                let value = self.text(memory, text)?;
                self.strings.insert(id, value);
            }

            Instruction::DropCachedString { id } => {
                self.strings.remove(id);
            }

            Instruction::CreateElementNs { tag_id, ns_id } => {
                let tag = self.strings.get(tag_id)?;
                let ns = self.strings.get(ns_id)?;
                let element = self
                    .document
                    .create_element_ns(Some(&ns), &tag)
                    .map_err(InterpreterError::dom)?;
                self.stack.push(element.into(), -1);
            }

            Instruction::SetAttributeNs { name_id, value_id } => {
                // Always applies with a null namespace URI, regardless of
                // what createElementNS resolved for this element -- the
                // namespace argument to this opcode is informational only.
                let name = self.strings.get(name_id)?;
                let value = self.strings.get(value_id)?;
                self.top_element()?
                    .set_attribute_ns(None, &name, &value)
                    .map_err(InterpreterError::dom)?;
            }

            Instruction::SaveChildrenToTemporaries {
                temp_base,
                start,
                end,
            } => {
                let children = self.stack.top()?.child_nodes();
                for i in start..end {
                    let child = children.item(i).ok_or(InterpreterError::ChildIndexOutOfBounds {
                        index: i,
                        len: children.length(),
                    })?;
                    self.temporaries.set(temp_base + (i - start), child);
                }
            }

            Instruction::PushChild { n } => {
                let children = self.stack.top()?.child_nodes();
                let child = children
                    .item(n)
                    .ok_or(InterpreterError::ChildIndexOutOfBounds {
                        index: n,
                        len: children.length(),
                    })?;
                self.stack.push(child, n as i32);
            }

            Instruction::PushTemporary { temp } => {
                let node = self.temporaries.get(temp)?;
                self.stack.push(node, -1);
            }

            Instruction::InsertBefore => {
                let before = self.stack.pop_node()?;
                let after = self.stack.pop_node()?;
                let parent = after.parent_node().ok_or(InterpreterError::NoParent {
                    op: "insertBefore",
                })?;
                parent
                    .insert_before(&before, Some(&after))
                    .map_err(InterpreterError::dom)?;
                self.stack.push(before, -1);
            }

            Instruction::PopPushReverseChild { n } => {
                self.stack.pop()?;
                let children = self.stack.top()?.child_nodes();
                let len = children.length();
                let index = len.checked_sub(n + 1).ok_or(InterpreterError::ChildIndexOutOfBounds {
                    index: n,
                    len,
                })?;
                let child = children
                    .item(index)
                    .ok_or(InterpreterError::ChildIndexOutOfBounds { index, len })?;
                self.stack.push(child, -1);
            }

            Instruction::RemoveChild { n } => {
                let children = self.stack.top()?.child_nodes();
                let child = children
                    .item(n)
                    .ok_or(InterpreterError::ChildIndexOutOfBounds {
                        index: n,
                        len: children.length(),
                    })?;
                let parent = child.parent_node().ok_or(InterpreterError::NoParent {
                    op: "removeChild",
                })?;
                parent.remove_child(&child).map_err(InterpreterError::dom)?;
            }

            Instruction::SetClass { class_id } => {
                let class = self.strings.get(class_id)?;
                self.top_element()?.set_class_name(&class);
            }

            Instruction::SaveTemplate { id } => {
                let node = self.stack.top()?.clone();
                self.templates.save(id, &node)?;
            }

            Instruction::PushTemplate { id } => {
                let node = self.templates.instantiate(id)?;
                self.stack.push(node, -1);
            }
        }
        Ok(())
    }
}

/// Sets a volatile property (`value`/`checked`/`selected`) via
/// `Reflect::set`, which works across `<input>`/`<select>`/`<option>`
/// without casting to a specific `Html*Element` type.
fn set_volatile_property(
    element: &Element,
    name: &str,
    value: &JsValue,
) -> Result<(), InterpreterError> {
    Reflect::set(element.as_ref(), &JsValue::from_str(name), value)
        .map(|_| ())
        .map_err(InterpreterError::dom)
}
