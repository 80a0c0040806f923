//! Compile-time type information.
//!
//! ## Menu
//!
//! - [`TypePath`]: stable names of a type (`type_path`, `type_name`, `type_ident`, `module_path`).
//! - [`TypeIdentity`]: the `(namespace, name)` pair used as the identity of a type.
//! - [`Type`]: a `TypeId` plus its [`TypePathTable`].
//! - [`TypeInfo`]: one of
//!     - [`StructInfo`] with its [`NamedField`]s,
//!     - [`ListInfo`], [`ArrayInfo`], [`MapInfo`],
//!     - [`NullableInfo`] (`Option<T>`), [`BoxedInfo`] (`Box<T>`),
//!     - [`OpaqueInfo`] for leaves.
//! - [`Typed`] / [`DynamicTyped`]: static and dynamic access to `TypeInfo`.

// -----------------------------------------------------------------------------
// Modules

mod array_info;
mod boxed_info;
mod field_info;
mod identity;
mod list_info;
mod map_info;
mod nullable_info;
mod opaque_info;
mod struct_info;
mod type_info;
mod type_path;
mod typed;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use type_path::impl_type_fn;

// -----------------------------------------------------------------------------
// Exports

pub use array_info::ArrayInfo;
pub use boxed_info::BoxedInfo;
pub use field_info::NamedField;
pub use identity::TypeIdentity;
pub use list_info::ListInfo;
pub use map_info::MapInfo;
pub use nullable_info::NullableInfo;
pub use opaque_info::OpaqueInfo;
pub use struct_info::StructInfo;
pub use type_info::{ReflectKind, ReflectKindError, TypeInfo};
pub use type_path::{DynamicTypePath, Type, TypePath, TypePathTable};
pub use typed::{DynamicTyped, Typed};
