use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{ListInfo, TypeInfo, TypePath, Typed};
use crate::ops::{List, ReflectCloneError};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

impl<T: TypePath> TypePath for Vec<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["alloc::vec::Vec<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Vec<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Vec"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::vec")
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>()))
    }
}

impl<T: Reflect + Typed + Default> Reflect for Vec<T> {
    crate::reflection::impl_reflect_cast_fn!(List);

    fn reflect_clone(&self) -> Result<Box<dyn Reflect>, ReflectCloneError> {
        let mut vec = Vec::with_capacity(self.len());
        for item in self {
            let Ok(item) = item.reflect_clone()?.take::<T>() else {
                return Err(ReflectCloneError::NotSupport {
                    type_path: T::type_path().into(),
                });
            };
            vec.push(item);
        }
        Ok(Box::new(vec))
    }

    #[inline]
    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        crate::impls::list_partial_eq(self, other)
    }
}

impl<T: Reflect + Typed + Default> List for Vec<T> {
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
        Vec::len(self)
    }

    fn push_default(&mut self) -> &mut dyn Reflect {
        let index = Vec::len(self);
        self.push(T::default());
        &mut self[index]
    }
}

impl<T: Reflect + Typed + Default + GetTypeMeta> GetTypeMeta for Vec<T> {
    fn get_type_meta() -> TypeMeta {
        let mut type_meta = TypeMeta::of::<Self>();
        type_meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
        type_meta
    }

    fn register_dependencies(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::Reflect;
    use crate::info::{TypePath, Typed};

    #[test]
    fn vec_type_path() {
        assert_eq!(<Vec<String>>::type_path(), "alloc::vec::Vec<alloc::string::String>");
        assert_eq!(<Vec<String>>::type_name(), "Vec<String>");
        let info = <Vec<u8>>::type_info().as_list().unwrap();
        assert!(info.item_info().type_is::<u8>());
    }

    #[test]
    fn push_default_grows() {
        let mut value = vec![1_u32];
        let list = value.reflect_mut().as_list().unwrap();
        list.push_default().set(alloc::boxed::Box::new(5_u32)).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(value, [1, 5]);
    }

    #[test]
    fn list_eq() {
        let a = vec![1_u8, 2];
        assert_eq!(a.reflect_partial_eq(&vec![1_u8, 2]), Some(true));
        assert_eq!(a.reflect_partial_eq(&vec![1_u8]), Some(false));
        assert_eq!(a.reflect_partial_eq(&vec![1_u16, 2]), Some(false));
    }
}
