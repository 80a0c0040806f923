use serde_core::{Serialize, Serializer};

use crate::Reflect;
use crate::info::Typed;
use crate::registry::FromType;

/// `serde` serialization of a reflected value.
///
/// Stores a function that downcasts the `&dyn Reflect` to the type it was
/// built from.
///
/// ```
/// use sc_reflect::{Reflect, registry::{TypeRegistry, TypeTraitSerialize}};
///
/// let registry = TypeRegistry::new();
/// let value = 42_u16;
///
/// let serializer = registry.get_type_trait::<TypeTraitSerialize>(value.ty_id()).unwrap();
/// let json = serializer.serialize(&value, serde_json::value::Serializer).unwrap();
/// assert_eq!(json, serde_json::json!(42));
/// ```
#[derive(Clone)]
pub struct TypeTraitSerialize {
    func: fn(value: &dyn Reflect) -> &dyn erased_serde::Serialize,
}

impl<T: erased_serde::Serialize + Typed + Reflect> FromType<T> for TypeTraitSerialize {
    fn from_type() -> Self {
        Self {
            func: |value| match value.downcast_ref::<T>() {
                Some(val) => val as &dyn erased_serde::Serialize,
                None => panic!(
                    "serialize type mismatch: expected `{}`, received `{}`",
                    T::type_path(),
                    value.reflect_type_path(),
                ),
            },
        }
    }
}

impl TypeTraitSerialize {
    /// Serializes `value` through the stored type's `Serialize`.
    ///
    /// # Panics
    ///
    /// If `value` is not of the stored type.
    #[inline(always)]
    pub fn serialize<S: Serializer>(
        &self,
        value: &dyn Reflect,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        (self.func)(value).serialize(serializer)
    }
}
