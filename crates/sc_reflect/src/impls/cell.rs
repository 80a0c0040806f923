//! Static storage for type information.
//!
//! [`Typed::type_info`](crate::info::Typed::type_info) returns
//! `&'static TypeInfo`, so implementations keep the value in a `static`.
//!
//! - Non-generic types use [`NonGenericTypeInfoCell`], a thin `OnceLock`.
//! - Generic types cannot, because a `static` inside a generic function is
//!   shared by every instantiation. [`GenericTypeInfoCell`] and
//!   [`GenericTypePathCell`] key their values by `TypeId` instead and leak
//!   each value once.

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::hash::TypeIdMap;
use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// NonGenericTypeCell

/// A `OnceLock` holding a non-generic type's property.
///
/// ```
/// use sc_reflect::impls::NonGenericTypeInfoCell;
/// use sc_reflect::info::{OpaqueInfo, TypeInfo, TypePath, Typed};
///
/// struct Token;
///
/// impl TypePath for Token {
///     fn type_path() -> &'static str { "demo::Token" }
///     fn type_name() -> &'static str { "Token" }
///     fn type_ident() -> &'static str { "Token" }
///     fn module_path() -> Option<&'static str> { Some("demo") }
/// }
///
/// impl Typed for Token {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// assert!(core::ptr::eq(Token::type_info(), Token::type_info()));
/// ```
pub struct NonGenericTypeCell<T: 'static>(OnceLock<T>);

pub type NonGenericTypeInfoCell = NonGenericTypeCell<TypeInfo>;

impl<T: 'static> NonGenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeCell

/// A `TypeId`-keyed store for the properties of a generic type's
/// instantiations.
///
/// ```
/// use sc_reflect::impls::GenericTypePathCell;
///
/// fn path_of<T: 'static>(arg: &str) -> &'static str {
///     static CELL: GenericTypePathCell = GenericTypePathCell::new();
///     CELL.get_or_insert::<T>(|| format!("demo::Wrapper<{arg}>"))
/// }
///
/// assert_eq!(path_of::<u8>("u8"), "demo::Wrapper<u8>");
/// // the first value stored for `u8` wins
/// assert_eq!(path_of::<u8>("other"), "demo::Wrapper<u8>");
/// ```
pub struct GenericTypeCell<T: 'static>(RwLock<TypeIdMap<&'static T>>);

pub type GenericTypeInfoCell = GenericTypeCell<TypeInfo>;

pub type GenericTypePathCell = GenericTypeCell<String>;

impl<T: 'static> GenericTypeCell<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &T {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    // Kept out of line so every instantiation shares one copy.
    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &T {
        let found = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();
        match found {
            Some(value) => value,
            None => {
                // `f` may recurse into this cell for another type, so it runs
                // before the write lock is taken.
                let value = f();
                *self
                    .0
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get_or_insert(type_id, || Box::leak(Box::new(value)))
            }
        }
    }
}
