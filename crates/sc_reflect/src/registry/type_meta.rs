use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;
use core::ops::Deref;

use crate::hash::TypeIdMap;
use crate::info::{Type, TypeInfo, Typed};
use crate::registry::{TypeRegistry, TypeTrait};

// -----------------------------------------------------------------------------
// TypeMeta

/// Runtime metadata of one type: its [`TypeInfo`] and a [`TypeTrait`] table.
///
/// Usually produced by [`GetTypeMeta`], which `#[derive(Reflect)]` implements.
///
/// ```
/// # use sc_reflect::registry::{TypeMeta, TypeTraitDefault, FromType};
/// let mut meta = TypeMeta::of::<String>();
/// meta.insert_trait::<TypeTraitDefault>(FromType::<String>::from_type());
///
/// let f = meta.get_trait::<TypeTraitDefault>().unwrap();
/// assert_eq!(f.default().take::<String>().unwrap(), "");
/// ```
pub struct TypeMeta {
    // Cached, `TypeInfo::ty` would match on the kind every time.
    ty: &'static Type,
    type_info: &'static TypeInfo,
    trait_table: TypeIdMap<Box<dyn TypeTrait>>,
}

impl TypeMeta {
    /// An empty [`TypeMeta`] for `T`.
    #[inline]
    pub fn of<T: Typed>() -> Self {
        let type_info = T::type_info();
        Self {
            ty: type_info.ty(),
            type_info,
            trait_table: TypeIdMap::new(),
        }
    }

    #[inline(always)]
    pub const fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    #[inline(always)]
    pub const fn ty(&self) -> &'static Type {
        self.ty
    }

    crate::info::impl_type_fn!();

    /// Inserts a [`TypeTrait`], replacing one of the same type.
    ///
    /// Returns `true` if a previous value was replaced.
    #[inline(always)]
    pub fn insert_trait<T: TypeTrait>(&mut self, data: T) -> bool {
        self.insert_trait_by_id(TypeId::of::<T>(), Box::new(data))
    }

    #[inline(never)]
    fn insert_trait_by_id(&mut self, id: TypeId, val: Box<dyn TypeTrait>) -> bool {
        self.trait_table.insert(id, val).is_some()
    }

    #[inline]
    pub fn get_trait<T: TypeTrait>(&self) -> Option<&T> {
        self.trait_table
            .get(&TypeId::of::<T>())
            .and_then(|type_trait| type_trait.deref().downcast_ref())
    }

    #[inline]
    pub fn has_trait<T: TypeTrait>(&self) -> bool {
        self.trait_table.contains(&TypeId::of::<T>())
    }

    #[inline]
    pub fn trait_len(&self) -> usize {
        self.trait_table.len()
    }
}

impl Clone for TypeMeta {
    fn clone(&self) -> Self {
        let mut trait_table = TypeIdMap::new();
        for (id, type_trait) in self.trait_table.iter() {
            trait_table.insert(*id, (**type_trait).clone_type_trait());
        }
        Self {
            ty: self.ty,
            type_info: self.type_info,
            trait_table,
        }
    }
}

impl fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMeta")
            .field("type_path", &self.ty.path())
            .field("trait_len", &self.trait_len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// Builds the [`TypeMeta`] of a type for registration into a [`TypeRegistry`].
///
/// Implemented by `#[derive(Reflect)]`, which also registers every field
/// type as a dependency:
///
/// ```
/// use core::any::TypeId;
/// use sc_reflect::{derive::Reflect, registry::{TypeRegistry, TypeTraitDefault}};
///
/// #[derive(Reflect, Default)]
/// #[reflect(default)]
/// struct Peer {
///     pub name: Option<String>,
///     pub weight: i32,
/// }
///
/// let mut registry = TypeRegistry::empty();
/// registry.register::<Peer>();
///
/// assert!(registry.contains(TypeId::of::<Option<String>>()));
/// assert!(registry.contains(TypeId::of::<i32>()));
/// assert!(registry.get_type_trait::<TypeTraitDefault>(TypeId::of::<Peer>()).is_some());
/// ```
pub trait GetTypeMeta: Typed {
    fn get_type_meta() -> TypeMeta;

    /// Registers the types this type depends on, i.e. its field types.
    #[inline]
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}
