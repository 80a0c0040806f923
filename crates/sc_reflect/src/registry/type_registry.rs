use alloc::string::String;
use core::any::TypeId;
use core::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::hash::{HashMap, HashSet, TypeIdMap};
use crate::info::Typed;
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTrait};

// -----------------------------------------------------------------------------
// TypeRegistry

/// The central store of [`TypeMeta`]s, keyed by [`TypeId`] with indices by
/// type path and by short type name.
///
/// Every mutation bumps a [generation](TypeRegistry::generation) counter so
/// caches derived from the registry can tell when they are stale.
///
/// ```
/// use sc_reflect::registry::{TypeRegistry, TypeTraitDefault};
/// use sc_reflect::info::DynamicTypePath;
///
/// let registry = TypeRegistry::new();
///
/// let generator = registry
///     .get_with_type_name("String").unwrap()
///     .get_trait::<TypeTraitDefault>().unwrap();
///
/// let s = generator.default();
/// assert_eq!(s.reflect_type_path(), "alloc::string::String");
/// ```
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
    generation: u64,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::default(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
            generation: 0,
        }
    }

    /// A registry holding the primitives and `String`, all with native
    /// `serde` support.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<u128>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<i128>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry
    }

    /// A counter bumped by every mutation of the registry.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // The type must not be present yet.
    fn add_new_type_indices(
        type_meta: &TypeMeta,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
        type_name_to_id: &mut HashMap<&'static str, TypeId>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        let ty = type_meta.ty();
        let type_name = ty.name();

        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, ty.id());
            }
        }

        type_path_to_id.insert(ty.path(), ty.id());
    }

    // Inserts unless present, returns `true` if inserted.
    fn register_internal(&mut self, type_id: TypeId, get_type_meta: impl FnOnce() -> TypeMeta) -> bool {
        let inserted = self.type_meta_table.try_insert(type_id, || {
            let meta = get_type_meta();
            Self::add_new_type_indices(
                &meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
            meta
        });
        if inserted {
            self.generation += 1;
        }
        inserted
    }

    /// Registers `T` and, recursively, its dependencies.
    ///
    /// Already registered types are left untouched, dependencies included.
    pub fn register<T: GetTypeMeta>(&mut self) {
        if self.register_internal(TypeId::of::<T>(), T::get_type_meta) {
            T::register_dependencies(self);
        }
    }

    /// Adds the type trait `D` to the registered type `T`.
    ///
    /// # Panics
    ///
    /// If `T` is not registered.
    pub fn register_type_trait<T: Typed, D: TypeTrait + FromType<T>>(&mut self) {
        match self.get_mut(TypeId::of::<T>()) {
            Some(type_meta) => {
                type_meta.insert_trait(D::from_type());
            }
            None => panic!(
                "called `TypeRegistry::register_type_trait` for `{}` before registering the type",
                T::type_path(),
            ),
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    /// Mutable access counts as a mutation and bumps the generation.
    #[inline]
    pub fn get_mut(&mut self, type_id: TypeId) -> Option<&mut TypeMeta> {
        self.generation += 1;
        self.type_meta_table.get_mut(&type_id)
    }

    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `None` for unknown and for [ambiguous](Self::is_ambiguous) names.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeMeta> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Whether `type_name` is shared by several registered types.
    ///
    /// ```
    /// # use sc_reflect::registry::TypeRegistry;
    /// # mod foo {
    /// #     use sc_reflect::derive::Reflect;
    /// #     #[derive(Reflect)]
    /// #     pub struct Link { pub id: u8 }
    /// # }
    /// # mod bar {
    /// #     use sc_reflect::derive::Reflect;
    /// #     #[derive(Reflect)]
    /// #     pub struct Link { pub id: u8 }
    /// # }
    /// let mut registry = TypeRegistry::empty();
    /// registry.register::<foo::Link>();
    /// registry.register::<bar::Link>();
    /// assert!(registry.is_ambiguous("Link"));
    /// ```
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    pub fn get_type_trait<T: TypeTrait>(&self, type_id: TypeId) -> Option<&T> {
        match self.get(type_id) {
            Some(type_meta) => type_meta.get_trait::<T>(),
            None => None,
        }
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }

    /// All `(TypeMeta, T)` pairs of types carrying the type trait `T`.
    pub fn iter_with_trait<T: TypeTrait>(&self) -> impl Iterator<Item = (&TypeMeta, &T)> {
        self.type_meta_table
            .values()
            .filter_map(|meta| meta.get_trait::<T>().map(|type_trait| (meta, type_trait)))
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("len", &self.type_meta_table.len())
            .field("generation", &self.generation)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

/// A shared, lock-protected [`TypeRegistry`].
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    #[inline]
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }

    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read().fmt(f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use super::TypeRegistry;
    use crate::registry::{TypeTraitDeserialize, TypeTraitSerialize};

    #[test]
    fn new_has_primitives() {
        let registry = TypeRegistry::new();
        assert!(registry.contains(TypeId::of::<u64>()));
        assert!(registry.get_type_trait::<TypeTraitSerialize>(TypeId::of::<String>()).is_some());
        assert!(registry.get_type_trait::<TypeTraitDeserialize>(TypeId::of::<f32>()).is_some());
        assert!(registry.get_with_type_path("alloc::string::String").is_some());
    }

    #[test]
    fn generation_tracks_mutation() {
        let mut registry = TypeRegistry::empty();
        let start = registry.generation();

        registry.register::<Vec<u8>>();
        let after_register = registry.generation();
        assert!(after_register > start);
        assert!(registry.contains(TypeId::of::<u8>()));

        registry.register::<Vec<u8>>();
        assert_eq!(registry.generation(), after_register);

        let _ = registry.get(TypeId::of::<u8>());
        assert_eq!(registry.generation(), after_register);

        let _ = registry.get_mut(TypeId::of::<u8>());
        assert!(registry.generation() > after_register);
    }
}
