use alloc::boxed::Box;
use core::error::Error;

use sc_reflect::ops::ReflectCloneError;

/// A type-erased error, as returned by adapter functions and formats.
pub type BoxError = Box<dyn Error + Send + Sync>;

pub type Result<T, E = CodecError> = core::result::Result<T, E>;

/// Errors produced by [`Codec`](crate::Codec) operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The baseline of a default-diff encode has another type than the value.
    #[error("type mismatch: value is `{candidate}`, baseline is `{baseline}`")]
    TypeMismatch {
        candidate: &'static str,
        baseline: &'static str,
    },

    /// Default-diff encoding needs a struct at the root.
    #[error("`{type_path}` is not a struct")]
    NotAStruct { type_path: &'static str },

    /// The format rejected the input or failed to write the output.
    #[error(transparent)]
    Format(BoxError),

    /// An adapter leaf whose descriptor is no longer in the registry.
    #[error("no adapter registered for `{type_path}`")]
    AdapterNotRegistered { type_path: &'static str },

    /// An adapter's encode or decode function failed.
    #[error("adapter for `{type_path}` failed: {source}")]
    Adapter {
        type_path: &'static str,
        #[source]
        source: BoxError,
    },

    /// An opaque leaf with neither an adapter nor `serde` support.
    #[error("`{type_path}` has neither an adapter nor serde support")]
    Unsupported { type_path: &'static str },

    #[error(transparent)]
    Clone(#[from] ReflectCloneError),

    /// The data model contains itself, e.g. through `Vec<Self>`.
    #[error("`{type_path}` is recursive and has no finite shadow schema")]
    RecursiveType { type_path: &'static str },
}
