use crate::Reflect;
use crate::info::{ReflectKind, ReflectKindError};
use crate::ops::{Array, Boxed, List, Map, Nullable, Struct};

// -----------------------------------------------------------------------------
// Auxiliary macro

macro_rules! impl_kind_casts {
    ($name:ident<$lt:lifetime> => $($ref_ty:tt)*) => {
        impl<$lt> $name<$lt> {
            /// The [`ReflectKind`] of the wrapped value.
            pub const fn kind(&self) -> ReflectKind {
                match self {
                    Self::Struct(_) => ReflectKind::Struct,
                    Self::List(_) => ReflectKind::List,
                    Self::Array(_) => ReflectKind::Array,
                    Self::Map(_) => ReflectKind::Map,
                    Self::Nullable(_) => ReflectKind::Nullable,
                    Self::Boxed(_) => ReflectKind::Boxed,
                    Self::Opaque(_) => ReflectKind::Opaque,
                }
            }

            impl_kind_casts!(@cast $lt as_struct: Struct => $($ref_ty)* dyn Struct);
            impl_kind_casts!(@cast $lt as_list: List => $($ref_ty)* dyn List);
            impl_kind_casts!(@cast $lt as_array: Array => $($ref_ty)* dyn Array);
            impl_kind_casts!(@cast $lt as_map: Map => $($ref_ty)* dyn Map);
            impl_kind_casts!(@cast $lt as_nullable: Nullable => $($ref_ty)* dyn Nullable);
            impl_kind_casts!(@cast $lt as_boxed: Boxed => $($ref_ty)* dyn Boxed);
            impl_kind_casts!(@cast $lt as_opaque: Opaque => $($ref_ty)* dyn Reflect);
        }
    };
    (@cast $lt:lifetime $fn_name:ident : $kind:ident => $($target:tt)*) => {
        #[inline]
        pub fn $fn_name(self) -> Result<$($target)*, ReflectKindError> {
            let received = self.kind();
            match self {
                Self::$kind(value) => Ok(value),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received,
                }),
            }
        }
    };
}

// -----------------------------------------------------------------------------
// ReflectRef

/// An immutable view of a reflected value, split by [`ReflectKind`].
///
/// ```
/// use sc_reflect::Reflect;
///
/// let value = vec![1_u8, 2, 3];
/// let list = value.reflect_ref().as_list().unwrap();
/// assert_eq!(list.len(), 3);
/// ```
pub enum ReflectRef<'a> {
    Struct(&'a dyn Struct),
    List(&'a dyn List),
    Array(&'a dyn Array),
    Map(&'a dyn Map),
    Nullable(&'a dyn Nullable),
    Boxed(&'a dyn Boxed),
    Opaque(&'a dyn Reflect),
}

impl_kind_casts!(ReflectRef<'a> => &'a);

// -----------------------------------------------------------------------------
// ReflectMut

/// A mutable view of a reflected value, split by [`ReflectKind`].
pub enum ReflectMut<'a> {
    Struct(&'a mut dyn Struct),
    List(&'a mut dyn List),
    Array(&'a mut dyn Array),
    Map(&'a mut dyn Map),
    Nullable(&'a mut dyn Nullable),
    Boxed(&'a mut dyn Boxed),
    Opaque(&'a mut dyn Reflect),
}

impl_kind_casts!(ReflectMut<'a> => &'a mut);
