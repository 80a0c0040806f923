use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{ArrayInfo, TypeInfo, TypePath, Typed};
use crate::ops::{Array, ReflectCloneError};
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};

impl<T: TypePath, const N: usize> TypePath for [T; N] {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["[", T::type_path(), "; ", &N.to_string(), "]"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["[", T::type_name(), "; ", &N.to_string(), "]"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "array"
    }
}

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Array(ArrayInfo::new::<Self, T>(N)))
    }
}

impl<T: Reflect + Typed, const N: usize> Reflect for [T; N] {
    crate::reflection::impl_reflect_cast_fn!(Array);

    fn reflect_clone(&self) -> Result<Box<dyn Reflect>, ReflectCloneError> {
        let mut items = Vec::with_capacity(N);
        for item in self {
            let Ok(item) = item.reflect_clone()?.take::<T>() else {
                return Err(ReflectCloneError::NotSupport {
                    type_path: T::type_path().into(),
                });
            };
            items.push(item);
        }
        match <[T; N]>::try_from(items) {
            Ok(array) => Ok(Box::new(array)),
            Err(_) => unreachable!("exactly `N` items were cloned"),
        }
    }

    #[inline]
    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        crate::impls::array_partial_eq(self, other)
    }
}

impl<T: Reflect + Typed, const N: usize> Array for [T; N] {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(Reflect::as_reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(Reflect::as_reflect_mut)
    }

    #[inline]
    fn len(&self) -> usize {
        N
    }
}

impl<T: Reflect + Typed + GetTypeMeta, const N: usize> GetTypeMeta for [T; N] {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>()
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::{TypePath, Typed};

    #[test]
    fn array_info() {
        assert_eq!(<[u8; 6]>::type_path(), "[u8; 6]");
        let info = <[u8; 6]>::type_info().as_array().unwrap();
        assert_eq!(info.capacity(), 6);
        assert!(info.item_info().type_is::<u8>());
    }

    #[test]
    fn array_clone_and_set() {
        let mut value = [1_u8, 2, 3];
        let cloned = value.reflect_clone().unwrap().take::<[u8; 3]>().unwrap();
        assert_eq!(cloned, [1, 2, 3]);

        let array = value.reflect_mut().as_array().unwrap();
        array.get_mut(2).unwrap().set(alloc::boxed::Box::new(9_u8)).unwrap();
        assert_eq!(value, [1, 2, 9]);
    }
}
