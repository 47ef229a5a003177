//! # dx-core: shared linear memory view
//!
//! The change-list interpreter and the diffing guest are separate
//! WebAssembly instances, so the interpreter cannot hold a Rust slice into
//! the guest's memory -- it reaches the guest's `ArrayBuffer` through
//! `js-sys` typed-array views instead. Those views alias the underlying
//! buffer with no copy, so reads stay zero-copy even across the instance
//! boundary.
//!
//! A `memory` object is anything exposing a `.buffer` property that resolves
//! to an `ArrayBuffer` -- in practice a `WebAssembly.Memory` export from the
//! guest module, passed through from JS as an opaque [`wasm_bindgen::JsValue`].

use dx_binary::WordSource;
use js_sys::{ArrayBuffer, Reflect, Uint32Array, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};

/// Byte/word view over a guest-owned `ArrayBuffer`.
pub struct MemoryView {
    bytes: Uint8Array,
    words: Uint32Array,
}

impl MemoryView {
    /// Builds a view over `memory.buffer`.
    ///
    /// Fails if `memory` has no readable `buffer` property, or if that
    /// property isn't an `ArrayBuffer`.
    pub fn new(memory: &JsValue) -> Result<Self, &'static str> {
        let buffer = Reflect::get(memory, &JsValue::from_str("buffer"))
            .map_err(|_| "memory object has no readable `buffer` property")?;
        let buffer: ArrayBuffer = buffer
            .dyn_into()
            .map_err(|_| "memory.buffer is not an ArrayBuffer")?;
        Ok(Self {
            bytes: Uint8Array::new(&buffer),
            words: Uint32Array::new(&buffer),
        })
    }

    /// Total length of the underlying buffer, in bytes.
    pub fn byte_len(&self) -> usize {
        self.bytes.length() as usize
    }

    /// Decodes the UTF-8 byte range `[ptr, ptr+len)` as a `String`.
    ///
    /// Invalid UTF-8 is replaced per `String::from_utf8_lossy`'s policy --
    /// treated as a transient decoding issue, not an error. An out-of-range
    /// `[ptr, ptr+len)` -- a malformed text operand -- is a protocol
    /// violation and fails instead of reaching `copy_to`: `subarray` clamps
    /// silently rather than throwing, and `copy_to` panics (and with this
    /// workspace's `panic = "abort"` profile, aborts) on a length mismatch
    /// between the clamped source and the requested destination.
    pub fn utf8_at(&self, ptr: u32, len: u32) -> Result<String, &'static str> {
        let end = ptr
            .checked_add(len)
            .ok_or("text operand (ptr, len) overflows u32")?;
        if end > self.byte_len() as u32 {
            return Err("text operand (ptr, len) out of bounds of guest memory");
        }
        let mut buf = vec![0u8; len as usize];
        self.bytes.subarray(ptr, end).copy_to(buf.as_mut_slice());
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl WordSource for MemoryView {
    fn word(&self, index: usize) -> u32 {
        self.words.get_index(index as u32)
    }
}

#[cfg(target_arch = "wasm32")]
pub fn panic_hook() {
    console_error_panic_hook::set_once();
}
