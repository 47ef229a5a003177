use thiserror::Error;

/// Decode-time protocol violations -- restricted to what the decoder alone
/// can detect. Stack underflow, unknown string ids, and missing templates
/// are detected by the interpreter, not the decoder, and live in
/// `dx_dom::InterpreterError`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("opcode range offset={offset} length={length} is not word-aligned (multiple of 4)")]
    UnalignedRange { offset: u32, length: u32 },

    #[error("unknown opcode {0}")]
    UnknownOpcode(u32),

    #[error("opcode {opcode:?} needs {needed} more operand word(s) but only {available} remain in range")]
    TruncatedOperand {
        opcode: crate::OpCode,
        needed: usize,
        available: usize,
    },
}
