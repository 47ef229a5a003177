/// A 32-bit-word-addressable view over guest memory.
///
/// Implemented by `dx_core::MemoryView` for real guest `ArrayBuffer`s, and by
/// `Vec<u32>`/`[u32]` here so the decoder can be unit-tested without a wasm
/// target or a DOM.
pub trait WordSource {
    /// Reads the word at the given word index (not byte offset).
    fn word(&self, index: usize) -> u32;
}

impl WordSource for [u32] {
    fn word(&self, index: usize) -> u32 {
        self[index]
    }
}

impl WordSource for Vec<u32> {
    fn word(&self, index: usize) -> u32 {
        self[index]
    }
}
