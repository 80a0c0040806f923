//! Kind-specific access to reflected values.
//!
//! Each [`ReflectKind`](crate::info::ReflectKind) except `Opaque` has a
//! subtrait of [`Reflect`](crate::Reflect) reached through
//! [`reflect_ref`](crate::Reflect::reflect_ref) /
//! [`reflect_mut`](crate::Reflect::reflect_mut):
//!
//! - [`Struct`]: named fields by name or index.
//! - [`List`]: growable sequences, grow-only.
//! - [`Array`]: fixed-size arrays.
//! - [`Map`]: key/value maps.
//! - [`Nullable`]: `Option<T>`.
//! - [`Boxed`]: `Box<T>`.

// -----------------------------------------------------------------------------
// Modules

mod array_ops;
mod boxed_ops;
mod clone_error;
mod kind;
mod list_ops;
mod map_ops;
mod nullable_ops;
mod struct_ops;

// -----------------------------------------------------------------------------
// Exports

pub use clone_error::ReflectCloneError;
pub use kind::{ReflectMut, ReflectRef};

pub use array_ops::Array;
pub use boxed_ops::Boxed;
pub use list_ops::List;
pub use map_ops::Map;
pub use nullable_ops::Nullable;
pub use struct_ops::Struct;
