use alloc::boxed::Box;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{BoxedInfo, TypeInfo, TypePath, Typed};
use crate::ops::{Boxed, ReflectCloneError};
use crate::registry::{GetTypeMeta, TypeMeta, TypeRegistry};

impl<T: TypePath> TypePath for Box<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["alloc::boxed::Box<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Box<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Box"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::boxed")
    }
}

impl<T: Typed> Typed for Box<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Boxed(BoxedInfo::new::<Self, T>()))
    }
}

impl<T: Reflect + Typed> Reflect for Box<T> {
    crate::reflection::impl_reflect_cast_fn!(Boxed);

    fn reflect_clone(&self) -> Result<Box<dyn Reflect>, ReflectCloneError> {
        match (**self).reflect_clone()?.downcast::<T>() {
            Ok(value) => Ok(Box::new(value)),
            Err(_) => Err(ReflectCloneError::NotSupport {
                type_path: T::type_path().into(),
            }),
        }
    }

    #[inline]
    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        match other.downcast_ref::<Self>() {
            Some(other) => (**self).reflect_partial_eq(&**other),
            None => Some(false),
        }
    }
}

impl<T: Reflect + Typed> Boxed for Box<T> {
    #[inline]
    fn pointee(&self) -> &dyn Reflect {
        (**self).as_reflect()
    }

    #[inline]
    fn pointee_mut(&mut self) -> &mut dyn Reflect {
        (**self).as_reflect_mut()
    }
}

impl<T: Reflect + Typed + GetTypeMeta> GetTypeMeta for Box<T> {
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
    use alloc::boxed::Box;

    use crate::Reflect;
    use crate::info::Typed;

    #[test]
    fn boxed_info_peels() {
        let info = <Box<Box<u16>>>::type_info();
        assert!(info.as_boxed().is_ok());
        assert!(info.peel_boxed().type_is::<u16>());
    }

    #[test]
    fn boxed_clone() {
        let value = Box::new(7_u16);
        let cloned = value.reflect_clone().unwrap().take::<Box<u16>>().unwrap();
        assert_eq!(*cloned, 7);
        assert_eq!(value.reflect_partial_eq(&Box::new(7_u16)), Some(true));
    }
}
