//! The 27 opcodes of the change-list wire format (spec table, §4.3).
//!
//! Numbering is internal to this implementation -- it need not match any
//! other change-list dialect, but every opcode present in one binary must
//! share this numbering.

use crate::error::DecodeError;

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    SetText = 0,
    RemoveSelfAndNextSiblings = 1,
    ReplaceWith = 2,
    SetAttribute = 3,
    RemoveAttribute = 4,
    PushFirstChild = 5,
    PopPushNextSibling = 6,
    Pop = 7,
    AppendChild = 8,
    CreateTextNode = 9,
    CreateElement = 10,
    NewEventListener = 11,
    UpdateEventListener = 12,
    RemoveEventListener = 13,
    AddCachedString = 14,
    DropCachedString = 15,
    CreateElementNs = 16,
    SetAttributeNs = 17,
    SaveChildrenToTemporaries = 18,
    PushChild = 19,
    PushTemporary = 20,
    InsertBefore = 21,
    PopPushReverseChild = 22,
    RemoveChild = 23,
    SetClass = 24,
    SaveTemplate = 25,
    PushTemplate = 26,
}

impl OpCode {
    /// Number of 32-bit operand words this opcode consumes, not counting the
    /// opcode word itself.
    pub const fn operand_words(self) -> usize {
        use OpCode::*;
        match self {
            // text operand: (ptr, len)
            SetText | CreateTextNode => 2,
            RemoveSelfAndNextSiblings | ReplaceWith | PushFirstChild | PopPushNextSibling | Pop
            | AppendChild | InsertBefore => 0,
            SetAttribute => 2,
            RemoveAttribute => 1,
            CreateElement => 1,
            NewEventListener | UpdateEventListener => 3,
            RemoveEventListener => 1,
            // text operand + id word
            AddCachedString => 3,
            DropCachedString => 1,
            CreateElementNs | SetAttributeNs => 2,
            SaveChildrenToTemporaries => 3,
            PushChild => 1,
            PushTemporary => 1,
            PopPushReverseChild => 1,
            RemoveChild => 1,
            SetClass => 1,
            SaveTemplate => 1,
            PushTemplate => 1,
        }
    }
}

impl TryFrom<u32> for OpCode {
    type Error = DecodeError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        use OpCode::*;
        Ok(match raw {
            0 => SetText,
            1 => RemoveSelfAndNextSiblings,
            2 => ReplaceWith,
            3 => SetAttribute,
            4 => RemoveAttribute,
            5 => PushFirstChild,
            6 => PopPushNextSibling,
            7 => Pop,
            8 => AppendChild,
            9 => CreateTextNode,
            10 => CreateElement,
            11 => NewEventListener,
            12 => UpdateEventListener,
            13 => RemoveEventListener,
            14 => AddCachedString,
            15 => DropCachedString,
            16 => CreateElementNs,
            17 => SetAttributeNs,
            18 => SaveChildrenToTemporaries,
            19 => PushChild,
            20 => PushTemporary,
            21 => InsertBefore,
            22 => PopPushReverseChild,
            23 => RemoveChild,
            24 => SetClass,
            25 => SaveTemplate,
            26 => PushTemplate,
            other => return Err(DecodeError::UnknownOpcode(other)),
        })
    }
}
