use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};
use std::collections::HashMap;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{MapInfo, TypeInfo, TypePath, Typed};
use crate::ops::{Map, ReflectCloneError};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

/// Implements reflection for a map type with key `K` and value `V`.
///
/// The map must implement `Default` and have inherent `iter`, `get`,
/// `insert` and `len` methods.
macro_rules! impl_reflect_for_map {
    (
        impl<$($param:ident),*> $ty:ty
        where [$($bound:tt)*]
        => $module:literal :: $ident:literal
    ) => {
        impl<$($param),*> TypePath for $ty
        where
            $($bound)*
        {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    concat(&[
                        $module, "::", $ident, "<", K::type_path(), ", ", V::type_path(), ">",
                    ])
                })
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    concat(&[$ident, "<", K::type_name(), ", ", V::type_name(), ">"])
                })
            }

            #[inline]
            fn type_ident() -> &'static str {
                $ident
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                Some($module)
            }
        }

        impl<$($param),*> Typed for $ty
        where
            $($bound)*
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::Map(MapInfo::new::<Self, K, V>()))
            }
        }

        impl<$($param),*> Reflect for $ty
        where
            $($bound)*
        {
            crate::reflection::impl_reflect_cast_fn!(Map);

            fn reflect_clone(&self) -> Result<Box<dyn Reflect>, ReflectCloneError> {
                let mut map = <Self as Default>::default();
                for (key, value) in self.iter() {
                    let Ok(key) = key.reflect_clone()?.take::<K>() else {
                        return Err(ReflectCloneError::NotSupport {
                            type_path: K::type_path().into(),
                        });
                    };
                    let Ok(value) = value.reflect_clone()?.take::<V>() else {
                        return Err(ReflectCloneError::NotSupport {
                            type_path: V::type_path().into(),
                        });
                    };
                    map.insert(key, value);
                }
                Ok(Box::new(map))
            }

            fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
                let Some(other) = other.downcast_ref::<Self>() else {
                    return Some(false);
                };
                if self.len() != other.len() {
                    return Some(false);
                }
                let mut comparable = true;
                for (key, value) in self.iter() {
                    let Some(other_value) = other.get(key) else {
                        return Some(false);
                    };
                    match value.reflect_partial_eq(other_value) {
                        Some(true) => {}
                        Some(false) => return Some(false),
                        None => comparable = false,
                    }
                }
                comparable.then_some(true)
            }
        }

        impl<$($param),*> Map for $ty
        where
            $($bound)*
        {
            #[inline]
            fn len(&self) -> usize {
                Self::len(self)
            }

            fn entries(&self) -> Vec<(&dyn Reflect, &dyn Reflect)> {
                self.iter()
                    .map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect))
                    .collect()
            }

            #[inline]
            fn new_key(&self) -> Box<dyn Reflect> {
                Box::new(K::default())
            }

            #[inline]
            fn new_value(&self) -> Box<dyn Reflect> {
                Box::new(V::default())
            }

            fn insert_boxed(
                &mut self,
                key: Box<dyn Reflect>,
                value: Box<dyn Reflect>,
            ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)> {
                let key = match key.take::<K>() {
                    Ok(key) => key,
                    Err(key) => return Err((key, value)),
                };
                let value = match value.take::<V>() {
                    Ok(value) => value,
                    Err(value) => return Err((Box::new(key), value)),
                };
                self.insert(key, value);
                Ok(())
            }
        }

        impl<$($param),*> GetTypeMeta for $ty
        where
            $($bound)*
            K: GetTypeMeta,
            V: GetTypeMeta,
        {
            fn get_type_meta() -> TypeMeta {
                let mut type_meta = TypeMeta::of::<Self>();
                type_meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                type_meta
            }

            fn register_dependencies(registry: &mut TypeRegistry) {
                registry.register::<K>();
                registry.register::<V>();
            }
        }
    };
}

impl_reflect_for_map!(
    impl<K, V, S> HashMap<K, V, S>
    where [
        K: Reflect + Typed + Default + Eq + Hash,
        V: Reflect + Typed + Default,
        S: BuildHasher + Default + Send + Sync + 'static,
    ]
    => "std::collections"::"HashMap"
);

impl_reflect_for_map!(
    impl<K, V> BTreeMap<K, V>
    where [
        K: Reflect + Typed + Default + Ord,
        V: Reflect + Typed + Default,
    ]
    => "alloc::collections"::"BTreeMap"
);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use std::collections::HashMap;

    use crate::Reflect;
    use crate::info::{TypePath, Typed};

    #[test]
    fn map_type_path() {
        assert_eq!(
            <BTreeMap<String, u8>>::type_path(),
            "alloc::collections::BTreeMap<alloc::string::String, u8>"
        );
        assert_eq!(<HashMap<u8, u8>>::type_name(), "HashMap<u8, u8>");
        let info = <HashMap<String, u32>>::type_info().as_map().unwrap();
        assert!(info.key_info().type_is::<String>());
        assert!(info.value_info().type_is::<u32>());
    }

    #[test]
    fn insert_boxed() {
        let mut value = BTreeMap::<String, u32>::new();
        let map = value.reflect_mut().as_map().unwrap();

        let mut key = map.new_key();
        key.set(Box::new(String::from("a"))).unwrap();
        map.insert_boxed(key, Box::new(1_u32)).unwrap();

        let (key, _) = map.insert_boxed(Box::new(1_u8), Box::new(2_u32)).unwrap_err();
        assert!(key.is::<u8>());
        assert_eq!(value.get("a"), Some(&1));
        assert_eq!(value.len(), 1);
    }

    #[test]
    fn map_eq() {
        let a = BTreeMap::from([(1_u8, 10_u8), (2, 20)]);
        assert_eq!(a.reflect_partial_eq(&a.clone()), Some(true));
        assert_eq!(a.reflect_partial_eq(&BTreeMap::from([(1_u8, 10_u8)])), Some(false));
    }
}
