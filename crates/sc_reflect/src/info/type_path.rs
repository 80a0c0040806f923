use core::any::{Any, TypeId};
use core::fmt;

use crate::info::TypeIdentity;

// -----------------------------------------------------------------------------
// TypePath

/// Stable, human-readable names for a type.
///
/// Unlike [`core::any::type_name`], these strings are part of the contract:
/// `sc_codec` keys adapter registrations by them. The conventions are:
///
/// - [`type_path`](TypePath::type_path): `module_path::type_name`, or just
///   `type_name` for types without a module (primitives, arrays).
/// - [`type_name`](TypePath::type_name): the name with generics, e.g. `Vec<u8>`.
/// - [`type_ident`](TypePath::type_ident): the name without generics, e.g. `Vec`.
/// - [`module_path`](TypePath::module_path): e.g. `alloc::vec`.
///
/// ```
/// use sc_reflect::info::TypePath;
///
/// assert_eq!(<Vec<u8> as TypePath>::type_path(), "alloc::vec::Vec<u8>");
/// assert_eq!(<Vec<u8> as TypePath>::type_name(), "Vec<u8>");
/// assert_eq!(<Vec<u8> as TypePath>::type_ident(), "Vec");
/// assert_eq!(<u8 as TypePath>::module_path(), None);
/// ```
pub trait TypePath: 'static {
    fn type_path() -> &'static str;

    fn type_name() -> &'static str;

    fn type_ident() -> &'static str;

    fn module_path() -> Option<&'static str> {
        None
    }
}

// -----------------------------------------------------------------------------
// DynamicTypePath

/// Object-safe access to [`TypePath`].
pub trait DynamicTypePath {
    fn reflect_type_path(&self) -> &'static str;

    fn reflect_type_name(&self) -> &'static str;

    fn reflect_type_ident(&self) -> &'static str;

    fn reflect_module_path(&self) -> Option<&'static str>;
}

impl<T: TypePath> DynamicTypePath for T {
    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        Self::type_path()
    }

    #[inline]
    fn reflect_type_name(&self) -> &'static str {
        Self::type_name()
    }

    #[inline]
    fn reflect_type_ident(&self) -> &'static str {
        Self::type_ident()
    }

    #[inline]
    fn reflect_module_path(&self) -> Option<&'static str> {
        Self::module_path()
    }
}

// -----------------------------------------------------------------------------
// TypePathTable

/// The [`TypePath`] functions of one type, stored as function pointers.
#[derive(Clone, Copy)]
pub struct TypePathTable {
    type_path: fn() -> &'static str,
    type_name: fn() -> &'static str,
    type_ident: fn() -> &'static str,
    module_path: fn() -> Option<&'static str>,
}

impl TypePathTable {
    #[inline]
    pub const fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            type_path: T::type_path,
            type_name: T::type_name,
            type_ident: T::type_ident,
            module_path: T::module_path,
        }
    }

    #[inline(always)]
    pub fn path(&self) -> &'static str {
        (self.type_path)()
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        (self.type_name)()
    }

    #[inline(always)]
    pub fn ident(&self) -> &'static str {
        (self.type_ident)()
    }

    #[inline(always)]
    pub fn module_path(&self) -> Option<&'static str> {
        (self.module_path)()
    }
}

impl fmt::Debug for TypePathTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypePathTable")
            .field("type_path", &self.path())
            .field("type_name", &self.name())
            .field("module_path", &self.module_path())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Type

/// A [`TypeId`] together with the type's [`TypePathTable`].
///
/// Equality and hashing only look at the `TypeId`.
#[derive(Copy, Clone)]
pub struct Type {
    path_table: TypePathTable,
    type_id: TypeId,
}

impl Type {
    #[inline]
    pub const fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            path_table: TypePathTable::of::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.type_id
    }

    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        TypeId::of::<T>() == self.type_id
    }

    #[inline(always)]
    pub const fn path_table(&self) -> TypePathTable {
        self.path_table
    }

    #[inline]
    pub fn path(&self) -> &'static str {
        self.path_table.path()
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.path_table.name()
    }

    #[inline]
    pub fn ident(&self) -> &'static str {
        self.path_table.ident()
    }

    #[inline]
    pub fn module_path(&self) -> Option<&'static str> {
        self.path_table.module_path()
    }

    /// The qualified identity of this type, see [`TypeIdentity`].
    #[inline]
    pub fn identity(&self) -> TypeIdentity {
        TypeIdentity::from_table(self.path_table)
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Type {}

impl core::hash::Hash for Type {
    #[inline]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// -----------------------------------------------------------------------------
// Auxiliary macro

/// Accessors shared by every `*Info` struct holding a `ty: Type` field.
macro_rules! impl_type_fn {
    ($field:ident) => {
        #[inline(always)]
        pub const fn ty(&self) -> &$crate::info::Type {
            &self.$field
        }
        $crate::info::impl_type_fn!();
    };
    () => {
        #[inline]
        pub const fn ty_id(&self) -> ::core::any::TypeId {
            self.ty().id()
        }

        #[inline]
        pub fn type_is<T: ::core::any::Any>(&self) -> bool {
            self.ty().id() == ::core::any::TypeId::of::<T>()
        }

        #[inline]
        pub fn type_path(&self) -> &'static str {
            self.ty().path()
        }

        #[inline]
        pub fn type_name(&self) -> &'static str {
            self.ty().name()
        }

        #[inline]
        pub fn identity(&self) -> $crate::info::TypeIdentity {
            self.ty().identity()
        }
    };
}

pub(crate) use impl_type_fn;
