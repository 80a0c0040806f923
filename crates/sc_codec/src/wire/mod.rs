//! `serde` drivers over shadow values.
//!
//! - [`ShadowSerializer`]: `Serialize` for a [`ShadowValue`] and its
//!   [`ShadowType`](crate::shadow::ShadowType).
//! - [`ShadowSeed`]: a `DeserializeSeed` that decodes into an existing
//!   [`ShadowValue`] in place.
//!
//! serde hooks can only report errors as format messages. Both drivers put
//! the typed [`CodecError`] into an [`ErrorSlot`] as well, so the caller can
//! return it instead of the message.
//!
//! [`ShadowValue`]: crate::transcode::ShadowValue

use core::cell::RefCell;
use core::fmt::Display;

use crate::error::CodecError;

// -----------------------------------------------------------------------------
// Modules

mod de;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use de::ShadowSeed;
pub use ser::ShadowSerializer;

// -----------------------------------------------------------------------------
// ErrorSlot

/// The first [`CodecError`] raised inside a serde hook.
#[derive(Debug, Default)]
pub struct ErrorSlot(RefCell<Option<CodecError>>);

impl ErrorSlot {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `err` unless an error is already recorded, and returns its
    /// message for the format.
    pub(crate) fn raise<E, F>(&self, err: CodecError, custom: F) -> E
    where
        F: FnOnce(&dyn Display) -> E,
    {
        let out = custom(&err);
        let mut slot = self.0.borrow_mut();
        if slot.is_none() {
            *slot = Some(err);
        }
        out
    }

    #[inline]
    pub fn take(&self) -> Option<CodecError> {
        self.0.borrow_mut().take()
    }
}
