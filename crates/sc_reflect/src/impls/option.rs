use alloc::boxed::Box;

use crate::Reflect;
use crate::impls::{GenericTypeInfoCell, GenericTypePathCell, concat};
use crate::info::{NullableInfo, TypeInfo, TypePath, Typed};
use crate::ops::{Nullable, ReflectCloneError};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};

impl<T: TypePath> TypePath for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["core::option::Option<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Option<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Option"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("core::option")
    }
}

impl<T: Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Nullable(NullableInfo::new::<Self, T>()))
    }
}

impl<T: Reflect + Typed + Default> Reflect for Option<T> {
    crate::reflection::impl_reflect_cast_fn!(Nullable);

    fn reflect_clone(&self) -> Result<Box<dyn Reflect>, ReflectCloneError> {
        let Some(value) = self else {
            return Ok(Box::new(None::<T>));
        };
        match value.reflect_clone()?.take::<T>() {
            Ok(value) => Ok(Box::new(Some(value))),
            Err(_) => Err(ReflectCloneError::NotSupport {
                type_path: T::type_path().into(),
            }),
        }
    }

    #[inline]
    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        crate::impls::nullable_partial_eq(self, other)
    }
}

impl<T: Reflect + Typed + Default> Nullable for Option<T> {
    #[inline]
    fn get(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(Reflect::as_reflect)
    }

    #[inline]
    fn get_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(Reflect::as_reflect_mut)
    }

    #[inline]
    fn set_none(&mut self) {
        *self = None;
    }

    #[inline]
    fn get_or_insert_default(&mut self) -> &mut dyn Reflect {
        let value: &mut T = self.get_or_insert_with(T::default);
        value
    }
}

impl<T: Reflect + Typed + Default + GetTypeMeta> GetTypeMeta for Option<T> {
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
    use alloc::boxed::Box;

    use crate::Reflect;
    use crate::info::{ReflectKind, TypePath};

    #[test]
    fn option_path() {
        assert_eq!(<Option<u8>>::type_path(), "core::option::Option<u8>");
        assert_eq!(Some(1_u8).reflect_kind(), ReflectKind::Nullable);
    }

    #[test]
    fn keeps_existing_allocation() {
        let mut value = Some(Box::new(3_u32));
        let before: *const u32 = &**value.as_ref().unwrap();

        let nullable = value.reflect_mut().as_nullable().unwrap();
        let boxed = nullable.get_or_insert_default().reflect_mut().as_boxed().unwrap();
        boxed.pointee_mut().set(Box::new(4_u32)).unwrap();

        let after: *const u32 = &**value.as_ref().unwrap();
        assert_eq!(before, after);
        assert_eq!(value.as_deref(), Some(&4));
    }

    #[test]
    fn set_none_and_eq() {
        let mut value = Some(1_i8);
        assert_eq!(value.reflect_partial_eq(&Some(1_i8)), Some(true));
        value.reflect_mut().as_nullable().unwrap().set_none();
        assert_eq!(value, None);
        assert_eq!(value.reflect_partial_eq(&None::<i8>), Some(true));
    }
}
