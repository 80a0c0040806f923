use core::any::TypeId;

use crate::info::{Type, TypeInfo, TypePath, Typed, impl_type_fn};

/// Type information for a value that may be absent, i.e. `Option<T>`.
#[derive(Clone, Debug)]
pub struct NullableInfo {
    ty: Type,
    inner_id: TypeId,
    inner_info: fn() -> &'static TypeInfo,
}

impl NullableInfo {
    impl_type_fn!(ty);

    #[inline]
    pub const fn new<TNullable: TypePath, TInner: Typed>() -> Self {
        Self {
            ty: Type::of::<TNullable>(),
            inner_id: TypeId::of::<TInner>(),
            inner_info: TInner::type_info,
        }
    }

    #[inline]
    pub const fn inner_id(&self) -> TypeId {
        self.inner_id
    }

    #[inline]
    pub fn inner_info(&self) -> &'static TypeInfo {
        (self.inner_info)()
    }
}
