//! `#[derive(Reflect)]` for `sc_reflect`.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` implements:
///
/// - `TypePath`
/// - `Typed`
/// - `Reflect`
/// - `GetTypeMeta`
/// - `Struct` (for `struct T { ... }`)
///
/// Structs with named fields are reflected as `Struct`. Any other struct
/// shape must be marked `opaque`, and enums are not supported.
///
/// ## Visibility
///
/// `pub` fields are *visible*; every other field is *hidden*. Hidden fields
/// can still be reached through `Struct`, but codecs built on the type
/// information never put them on the wire.
///
/// ## Type-level flags
///
/// ```rust, ignore
/// #[derive(Reflect, Clone, PartialEq, Debug, Default)]
/// #[reflect(clone, partial_eq, debug, default)]
/// struct Foo { /* ... */ }
/// ```
///
/// - `opaque`: treat the type as a leaf; its fields are not inspected.
///   `reflect_clone` then needs `clone`.
/// - `clone`: `reflect_clone` through `Clone` instead of field by field.
/// - `partial_eq`: `reflect_partial_eq` through `PartialEq` instead of field by field.
/// - `debug`: `reflect_debug` through `Debug`.
/// - `default`: store `TypeTraitDefault` in the `TypeMeta`.
/// - `serde`: store `TypeTraitSerialize` and `TypeTraitDeserialize`; the type
///   must implement `serde::Serialize` and `serde::Deserialize`. Codecs then
///   hand the whole value to serde.
///
/// ## Custom Type Path
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// #[reflect(type_path = "net::MacAddr")]
/// struct MacAddr([u8; 6]);
/// ```
///
/// The path excludes generics, they are appended automatically. The default
/// is `module_path!()` followed by the type name.
///
/// ## Field flags
///
/// `#[reflect(skip_serde)]` opts a visible field out of serialization. The
/// field keeps its value when a value is decoded into an existing instance.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// struct Session {
///     pub user: String,
///     #[reflect(skip_serde)]
///     pub token: String,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ReflectDerive::from_input(&ast) {
        Ok(derive) => impls::impl_reflect(&derive).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
