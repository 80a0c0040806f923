//! Leaf types reflected as [`ReflectKind::Opaque`](crate::info::ReflectKind::Opaque).

/// Implements `TypePath`, `Typed`, `Reflect` and `GetTypeMeta` for a leaf
/// type through its `Clone`, `PartialEq` and `Debug` impls.
///
/// The trailing list names the type traits stored in its `TypeMeta`.
macro_rules! impl_reflect_opaque {
    ($ty:ident [$($type_trait:ident),*]) => {
        $crate::impls::opaque::impl_reflect_opaque!(
            @impl $ty, stringify!($ty), stringify!($ty), None, [$($type_trait),*]
        );
    };
    ($ty:ty => $module:literal :: $name:literal [$($type_trait:ident),*]) => {
        $crate::impls::opaque::impl_reflect_opaque!(
            @impl $ty, concat!($module, "::", $name), $name, Some($module), [$($type_trait),*]
        );
    };
    (@impl $ty:ty, $path:expr, $name:expr, $module:expr, [$($type_trait:ident),*]) => {
        impl $crate::info::TypePath for $ty {
            #[inline(always)]
            fn type_path() -> &'static str {
                $path
            }

            #[inline(always)]
            fn type_name() -> &'static str {
                $name
            }

            #[inline(always)]
            fn type_ident() -> &'static str {
                $name
            }

            #[inline(always)]
            fn module_path() -> Option<&'static str> {
                $module
            }
        }

        impl $crate::info::Typed for $ty {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::impls::NonGenericTypeInfoCell =
                    $crate::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::Opaque($crate::info::OpaqueInfo::new::<Self>())
                })
            }
        }

        impl $crate::Reflect for $ty {
            $crate::reflection::impl_reflect_cast_fn!(Opaque);

            #[inline]
            fn reflect_clone(
                &self,
            ) -> Result<::alloc::boxed::Box<dyn $crate::Reflect>, $crate::ops::ReflectCloneError> {
                Ok(::alloc::boxed::Box::new(Clone::clone(self)))
            }

            fn reflect_partial_eq(&self, other: &dyn $crate::Reflect) -> Option<bool> {
                match other.downcast_ref::<Self>() {
                    Some(other) => Some(PartialEq::eq(self, other)),
                    None => Some(false),
                }
            }

            #[inline]
            fn reflect_debug(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Debug::fmt(self, f)
            }
        }

        impl $crate::registry::GetTypeMeta for $ty {
            fn get_type_meta() -> $crate::registry::TypeMeta {
                #[allow(unused_mut)]
                let mut type_meta = $crate::registry::TypeMeta::of::<Self>();
                $(
                    type_meta.insert_trait::<$crate::registry::$type_trait>(
                        $crate::registry::FromType::<Self>::from_type(),
                    );
                )*
                type_meta
            }
        }
    };
}

pub(crate) use impl_reflect_opaque;

impl_reflect_opaque!(bool [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(char [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(u8 [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(u16 [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(u32 [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(u64 [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(u128 [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(usize [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(i8 [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(i16 [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(i32 [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(i64 [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(i128 [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(isize [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(f32 [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);
impl_reflect_opaque!(f64 [TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize]);

impl_reflect_opaque!(::alloc::string::String => "alloc::string"::"String" [
    TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize
]);
impl_reflect_opaque!(::core::time::Duration => "core::time"::"Duration" [
    TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize
]);

// No `Default` in std for addresses.
impl_reflect_opaque!(::core::net::IpAddr => "core::net"::"IpAddr" [
    TypeTraitSerialize, TypeTraitDeserialize
]);
impl_reflect_opaque!(::core::net::Ipv4Addr => "core::net"::"Ipv4Addr" [
    TypeTraitSerialize, TypeTraitDeserialize
]);
impl_reflect_opaque!(::core::net::Ipv6Addr => "core::net"::"Ipv6Addr" [
    TypeTraitSerialize, TypeTraitDeserialize
]);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::net::Ipv4Addr;

    use crate::Reflect;
    use crate::info::{ReflectKind, TypeIdentity, TypePath, Typed};
    use crate::registry::{GetTypeMeta, TypeTraitDefault, TypeTraitSerialize};

    #[test]
    fn primitive_paths() {
        assert_eq!(u32::type_path(), "u32");
        assert_eq!(u32::module_path(), None);
        assert_eq!(String::type_path(), "alloc::string::String");
        assert_eq!(Ipv4Addr::type_name(), "Ipv4Addr");
        assert_eq!(
            TypeIdentity::of::<Ipv4Addr>(),
            TypeIdentity::new_static("core::net", "Ipv4Addr")
        );
    }

    #[test]
    fn opaque_kind() {
        assert_eq!(f64::type_info().kind(), ReflectKind::Opaque);
        assert_eq!(1.5_f64.reflect_kind(), ReflectKind::Opaque);
        assert!(String::type_info().as_opaque().is_ok());
    }

    #[test]
    fn opaque_eq_and_clone() {
        let a = String::from("eth0");
        assert_eq!(a.reflect_partial_eq(&String::from("eth0")), Some(true));
        assert_eq!(a.reflect_partial_eq(&1_u8), Some(false));

        let cloned = a.reflect_clone().unwrap();
        assert_eq!(cloned.take::<String>().unwrap(), "eth0");
    }

    #[test]
    fn type_meta_traits() {
        let meta = u16::get_type_meta();
        assert!(meta.has_trait::<TypeTraitDefault>());
        assert!(meta.has_trait::<TypeTraitSerialize>());

        let meta = Ipv4Addr::get_type_meta();
        assert!(!meta.has_trait::<TypeTraitDefault>());
        assert!(meta.has_trait::<TypeTraitSerialize>());
    }
}
