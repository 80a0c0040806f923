//! Per-type runtime capabilities.
//!
//! ## Menu
//!
//! - [`TypeTrait`]: a capability of a type, stored type-erased.
//! - [`FromType`]: builds a `TypeTrait` for a concrete type.
//! - [`TypeMeta`]: a [`TypeInfo`] plus a table of `TypeTrait`s.
//! - [`GetTypeMeta`]: builds the `TypeMeta` of a type and registers its dependencies.
//! - [`TypeRegistry`] / [`TypeRegistryArc`]: the store of `TypeMeta`s.
//! - TypeTraits:
//!     - [`TypeTraitDefault`]: `Default` for a reflected type.
//!     - [`TypeTraitSerialize`]: `serde` serialization of a reflected value.
//!     - [`TypeTraitDeserialize`]: `serde` deserialization into a boxed reflected value.
//!
//! Downstream crates define their own type traits and store them with
//! [`TypeMeta::insert_trait`]; any `Clone + Send + Sync + 'static` type qualifies.
//!
//! [`TypeInfo`]: crate::info::TypeInfo

// -----------------------------------------------------------------------------
// Modules

mod from_type;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use from_type::FromType;
pub use traits::TypeTraitDefault;
pub use traits::{TypeTraitDeserialize, TypeTraitSerialize};
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::{TypeRegistry, TypeRegistryArc};
pub use type_trait::TypeTrait;
