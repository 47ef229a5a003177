//! Thin wrapper over `web_sys::console`, compiled out entirely on non-wasm
//! targets so native `#[test]` runs stay free of `web-sys` calls.

#[cfg(target_arch = "wasm32")]
pub fn warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(_message: &str) {}
