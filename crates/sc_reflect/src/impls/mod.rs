//! Reflection for std types, plus helpers for implementing [`Reflect`].
//!
//! - [`concat`]: string concatenation for generic `TypePath`s.
//! - [`NonGenericTypeInfoCell`]: `Typed` storage for non-generic types.
//! - [`GenericTypePathCell`] / [`GenericTypeInfoCell`]: the same for generic types.
//! - `xxx_debug`: kind-specific [`Reflect::reflect_debug`] bodies.
//! - `xxx_partial_eq`: kind-specific [`Reflect::reflect_partial_eq`] bodies.
//!
//! ## Implemented Menu
//!
//! - opaque: `bool`, `char`, `i8`-`i128`, `u8`-`u128`, `isize`, `usize`,
//!   `f32`, `f64`, `String`, `Duration`, `IpAddr`, `Ipv4Addr`, `Ipv6Addr`,
//!   and `chrono::DateTime<Utc>` with the `chrono` feature.
//! - list: `Vec<T>`
//! - array: `[T; N]`
//! - map: `HashMap<K, V, S>`, `BTreeMap<K, V>`
//! - nullable: `Option<T>`
//! - boxed: `Box<T>`
//!
//! Containers build new elements from `Default`, so their element, key,
//! value and payload types must implement it.
//!
//! [`Reflect`]: crate::Reflect
//! [`Reflect::reflect_debug`]: crate::Reflect::reflect_debug
//! [`Reflect::reflect_partial_eq`]: crate::Reflect::reflect_partial_eq

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod utils;

mod array;
mod boxed;
mod map;
mod opaque;
mod option;
mod vec;

#[cfg(feature = "chrono")]
mod chrono;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, GenericTypePathCell, NonGenericTypeInfoCell};
pub use cell::{GenericTypeCell, NonGenericTypeCell};

pub use utils::{array_debug, list_debug, map_debug, nullable_debug, struct_debug};
pub use utils::{array_partial_eq, list_partial_eq, nullable_partial_eq, struct_partial_eq};

/// String concatenation with a single allocation.
///
/// Used to build the `TypePath` of generic types.
///
/// ```
/// use sc_reflect::impls;
///
/// let s = impls::concat(&["alloc::vec::Vec", "<", "u8", ">"]);
/// assert_eq!(s, "alloc::vec::Vec<u8>");
/// assert_eq!(s.capacity(), 19);
/// ```
#[inline(never)]
pub fn concat(arr: &[&str]) -> ::alloc::string::String {
    let len = arr.iter().map(|item| item.len()).sum();
    let mut res = ::alloc::string::String::with_capacity(len);
    for &item in arr {
        res.push_str(item);
    }
    res
}
