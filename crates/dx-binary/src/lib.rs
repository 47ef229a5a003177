//! # dx-binary: the change-list wire format
//!
//! Defines the 27 opcodes a diffing guest writes into shared linear memory,
//! and the decoder that turns a word stream into [`Instruction`]s. Nothing
//! here touches a DOM or a guest's memory directly — decoding is generic
//! over [`WordSource`], so the whole crate is testable on any target with a
//! plain `Vec<u32>` standing in for guest memory.
//!
//! Wire format: little-endian 32-bit words, no framing beyond the
//! `(offset, length)` submission envelope the caller supplies — see
//! [`Decoder::decode_range`]. Offsets and lengths must be multiples of 4.

mod error;
mod instruction;
mod opcode;
mod word_source;

pub use error::DecodeError;
pub use instruction::Instruction;
pub use opcode::OpCode;
pub use word_source::WordSource;

/// Decodes a single `(offset, length)` submission range into a sequence of
/// [`Instruction`]s.
///
/// `offset` and `length` are in bytes; both must be multiples of 4. Decoding
/// stops (successfully) once the cursor reaches `(offset + length) / 4`.
pub struct Decoder<'a, S: WordSource> {
    words: &'a S,
    cursor: usize,
    end: usize,
}

impl<'a, S: WordSource> Decoder<'a, S> {
    /// Builds a decoder over the word range `[offset/4, (offset+length)/4)`.
    pub fn new(words: &'a S, offset: u32, length: u32) -> Result<Self, DecodeError> {
        if offset % 4 != 0 || length % 4 != 0 {
            return Err(DecodeError::UnalignedRange { offset, length });
        }
        let cursor = (offset / 4) as usize;
        let end = cursor + (length / 4) as usize;
        Ok(Self { words, cursor, end })
    }

    /// Decodes and returns the next instruction, or `None` once the range is
    /// exhausted.
    pub fn next_instruction(&mut self) -> Option<Result<Instruction, DecodeError>> {
        if self.cursor >= self.end {
            return None;
        }
        Some(self.decode_one())
    }

    fn decode_one(&mut self) -> Result<Instruction, DecodeError> {
        let (instruction, next_cursor) = Instruction::decode(self.words, self.cursor, self.end)?;
        self.cursor = next_cursor;
        Ok(instruction)
    }
}

impl<'a, S: WordSource> Iterator for Decoder<'a, S> {
    type Item = Result<Instruction, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_instruction()
    }
}
