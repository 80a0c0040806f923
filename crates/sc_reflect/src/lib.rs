//! Runtime reflection for plain Rust data models.
//!
//! `sc_reflect` describes types through static [`TypeInfo`](info::TypeInfo)
//! graphs and lets callers read and write values through the [`Reflect`]
//! trait without knowing their concrete type. It is the substrate the
//! `sc_codec` engine walks when it derives shadow schemas.
//!
//! ## Menu
//!
//! - [`info`]: type paths, identities and the [`TypeInfo`](info::TypeInfo) tree.
//! - [`ops`]: kind-specific access traits such as [`Struct`](ops::Struct) and [`List`](ops::List).
//! - [`registry`]: [`TypeRegistry`](registry::TypeRegistry) with per-type capabilities ("type traits").
//! - [`impls`]: implementations for std types and helpers for derived ones.
//! - [`derive`]: the `#[derive(Reflect)]` macro.
//!
//! ```
//! use sc_reflect::{Reflect, derive::Reflect, info::Typed};
//!
//! #[derive(Reflect, Default)]
//! struct Limits {
//!     pub retries: u32,
//!     pub hosts: Vec<String>,
//! }
//!
//! let info = Limits::type_info().as_struct().unwrap();
//! assert_eq!(info.field_at(1).unwrap().name(), "hosts");
//!
//! let mut limits = Limits::default();
//! let retries = limits.reflect_mut().as_struct().unwrap().field_mut("retries").unwrap();
//! retries.set(Box::new(3_u32)).unwrap();
//! assert_eq!(limits.retries, 3);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate `sc_reflect`; the alias keeps those paths
// valid inside the crate itself.
extern crate self as sc_reflect;

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod hash;
pub mod impls;
pub mod info;
pub mod ops;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use reflection::Reflect;
pub use sc_reflect_derive as derive;

#[doc(hidden)]
pub mod __macro_exports {
    pub use alloc::boxed::Box;
}
