use crate::error::DecodeError;
use crate::opcode::OpCode;
use crate::word_source::WordSource;

/// A "text operand": a `(pointer, length)` pair naming a UTF-8 byte range in
/// guest memory. Decoding the bytes themselves is the interpreter's job (it
/// needs the live memory view); the decoder only carries the pointer/length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOperand {
    pub ptr: u32,
    pub len: u32,
}

/// A decoded opcode with its operands resolved. One variant per opcode in
/// [`OpCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    SetText(TextOperand),
    RemoveSelfAndNextSiblings,
    ReplaceWith,
    SetAttribute { name_id: u32, value_id: u32 },
    RemoveAttribute { name_id: u32 },
    PushFirstChild,
    PopPushNextSibling,
    Pop,
    AppendChild,
    CreateTextNode(TextOperand),
    CreateElement { tag_id: u32 },
    NewEventListener { event_type_id: u32, a: u32, b: u32 },
    UpdateEventListener { event_type_id: u32, a: u32, b: u32 },
    RemoveEventListener { event_type_id: u32 },
    AddCachedString { text: TextOperand, id: u32 },
    DropCachedString { id: u32 },
    CreateElementNs { tag_id: u32, ns_id: u32 },
    SetAttributeNs { name_id: u32, value_id: u32 },
    SaveChildrenToTemporaries { temp_base: u32, start: u32, end: u32 },
    PushChild { n: u32 },
    PushTemporary { temp: u32 },
    InsertBefore,
    PopPushReverseChild { n: u32 },
    RemoveChild { n: u32 },
    SetClass { class_id: u32 },
    SaveTemplate { id: u32 },
    PushTemplate { id: u32 },
}

impl Instruction {
    /// Decodes one instruction starting at `cursor` (a word index). Returns
    /// the instruction and the word index just past its operands.
    ///
    /// `end` bounds the range being decoded (exclusive); reading past it is a
    /// [`DecodeError::TruncatedOperand`], even if the underlying memory is
    /// technically larger -- a range submission is not allowed to read
    /// opcodes belonging to a different, not-yet-submitted range.
    pub fn decode<S: WordSource + ?Sized>(
        words: &S,
        cursor: usize,
        end: usize,
    ) -> Result<(Instruction, usize), DecodeError> {
        let opcode = OpCode::try_from(words.word(cursor))?;
        let operand_start = cursor + 1;
        let needed = opcode.operand_words();
        let available = end.saturating_sub(operand_start);
        if available < needed {
            return Err(DecodeError::TruncatedOperand {
                opcode,
                needed,
                available,
            });
        }

        let w = |i: usize| words.word(operand_start + i);
        let next_cursor = operand_start + needed;

        let instruction = match opcode {
            OpCode::SetText => Instruction::SetText(TextOperand {
                ptr: w(0),
                len: w(1),
            }),
            OpCode::RemoveSelfAndNextSiblings => Instruction::RemoveSelfAndNextSiblings,
            OpCode::ReplaceWith => Instruction::ReplaceWith,
            OpCode::SetAttribute => Instruction::SetAttribute {
                name_id: w(0),
                value_id: w(1),
            },
            OpCode::RemoveAttribute => Instruction::RemoveAttribute { name_id: w(0) },
            OpCode::PushFirstChild => Instruction::PushFirstChild,
            OpCode::PopPushNextSibling => Instruction::PopPushNextSibling,
            OpCode::Pop => Instruction::Pop,
            OpCode::AppendChild => Instruction::AppendChild,
            OpCode::CreateTextNode => Instruction::CreateTextNode(TextOperand {
                ptr: w(0),
                len: w(1),
            }),
            OpCode::CreateElement => Instruction::CreateElement { tag_id: w(0) },
            OpCode::NewEventListener => Instruction::NewEventListener {
                event_type_id: w(0),
                a: w(1),
                b: w(2),
            },
            OpCode::UpdateEventListener => Instruction::UpdateEventListener {
                event_type_id: w(0),
                a: w(1),
                b: w(2),
            },
            OpCode::RemoveEventListener => Instruction::RemoveEventListener {
                event_type_id: w(0),
            },
            OpCode::AddCachedString => Instruction::AddCachedString {
                text: TextOperand {
                    ptr: w(0),
                    len: w(1),
                },
                id: w(2),
            },
            OpCode::DropCachedString => Instruction::DropCachedString { id: w(0) },
            OpCode::CreateElementNs => Instruction::CreateElementNs {
                tag_id: w(0),
                ns_id: w(1),
            },
            OpCode::SetAttributeNs => Instruction::SetAttributeNs {
                name_id: w(0),
                value_id: w(1),
            },
            OpCode::SaveChildrenToTemporaries => Instruction::SaveChildrenToTemporaries {
                temp_base: w(0),
                start: w(1),
                end: w(2),
            },
            OpCode::PushChild => Instruction::PushChild { n: w(0) },
            OpCode::PushTemporary => Instruction::PushTemporary { temp: w(0) },
            OpCode::InsertBefore => Instruction::InsertBefore,
            OpCode::PopPushReverseChild => Instruction::PopPushReverseChild { n: w(0) },
            OpCode::RemoveChild => Instruction::RemoveChild { n: w(0) },
            OpCode::SetClass => Instruction::SetClass { class_id: w(0) },
            OpCode::SaveTemplate => Instruction::SaveTemplate { id: w(0) },
            OpCode::PushTemplate => Instruction::PushTemplate { id: w(0) },
        };

        Ok((instruction, next_cursor))
    }
}
