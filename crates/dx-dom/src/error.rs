use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors the interpreter can raise while applying a change list.
///
/// Protocol violations fail fast and abandon the frame; DOM rejections pass
/// the underlying exception through unchanged; post-unmount use gets its own
/// explicit variant. Transient UTF-8 decoding issues have no variant here --
/// they're handled by `dx_core::MemoryView::utf8_at`'s replacement-character
/// policy.
#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("change-list decode error: {0}")]
    Decode(#[from] dx_binary::DecodeError),

    #[error("memory error: {0}")]
    Memory(&'static str),

    #[error("traversal cursor is empty")]
    CursorEmpty,

    #[error("traversal cursor top is the null sentinel (pushFirstChild on a childless node)")]
    CursorNullSentinel,

    #[error("cursor top is not an Element (tag/class/attribute op on a non-element node)")]
    NotAnElement,

    #[error("unknown string id {0} (guest must addCachedString before first use)")]
    UnknownStringId(u32),

    #[error("unknown template id {0} (guest must saveTemplate before pushTemplate)")]
    UnknownTemplateId(u32),

    #[error("unknown temporary slot {0}")]
    UnknownTemporary(u32),

    #[error("child index {index} out of bounds (parent has {len} children)")]
    ChildIndexOutOfBounds { index: u32, len: u32 },

    #[error("node has no parent, cannot {op}")]
    NoParent { op: &'static str },

    #[error("dom operation rejected: {0:?}")]
    Dom(JsValue),

    #[error("used after unmount")]
    UsedAfterUnmount,
}

impl InterpreterError {
    pub(crate) fn dom(err: JsValue) -> Self {
        InterpreterError::Dom(err)
    }
}

impl From<InterpreterError> for JsValue {
    fn from(err: InterpreterError) -> JsValue {
        match err {
            InterpreterError::Dom(js) => js,
            other => JsValue::from_str(&other.to_string()),
        }
    }
}
