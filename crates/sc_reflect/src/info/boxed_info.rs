use core::any::TypeId;

use crate::info::{Type, TypeInfo, TypePath, Typed, impl_type_fn};

/// Type information for a non-null owning pointer, i.e. `Box<T>`.
#[derive(Clone, Debug)]
pub struct BoxedInfo {
    ty: Type,
    pointee_id: TypeId,
    pointee_info: fn() -> &'static TypeInfo,
}

impl BoxedInfo {
    impl_type_fn!(ty);

    #[inline]
    pub const fn new<TBoxed: TypePath, TPointee: Typed>() -> Self {
        Self {
            ty: Type::of::<TBoxed>(),
            pointee_id: TypeId::of::<TPointee>(),
            pointee_info: TPointee::type_info,
        }
    }

    #[inline]
    pub const fn pointee_id(&self) -> TypeId {
        self.pointee_id
    }

    #[inline]
    pub fn pointee_info(&self) -> &'static TypeInfo {
        (self.pointee_info)()
    }
}
