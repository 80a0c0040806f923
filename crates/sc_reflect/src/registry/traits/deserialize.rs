use alloc::boxed::Box;

use serde_core::{Deserialize, Deserializer};

use crate::Reflect;
use crate::info::Typed;
use crate::registry::FromType;

/// `serde` deserialization into a boxed reflected value.
///
/// ```
/// use core::any::TypeId;
/// use sc_reflect::registry::{TypeRegistry, TypeTraitDeserialize};
///
/// let registry = TypeRegistry::new();
/// let deserializer = registry
///     .get_type_trait::<TypeTraitDeserialize>(TypeId::of::<String>())
///     .unwrap();
///
/// let mut json = serde_json::Deserializer::from_str(r#""eth0""#);
/// let value = deserializer.deserialize(&mut json).unwrap();
/// assert_eq!(value.take::<String>().unwrap(), "eth0");
/// ```
#[derive(Clone)]
pub struct TypeTraitDeserialize {
    func: fn(
        deserializer: &mut dyn erased_serde::Deserializer,
    ) -> Result<Box<dyn Reflect>, erased_serde::Error>,
}

impl TypeTraitDeserialize {
    #[inline(always)]
    pub fn deserialize<'de, D: Deserializer<'de>>(
        &self,
        deserializer: D,
    ) -> Result<Box<dyn Reflect>, D::Error> {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        (self.func)(&mut erased).map_err(<D::Error as serde_core::de::Error>::custom)
    }
}

impl<T: for<'a> Deserialize<'a> + Typed + Reflect> FromType<T> for TypeTraitDeserialize {
    fn from_type() -> Self {
        Self {
            func: |deserializer| Ok(Box::new(T::deserialize(deserializer)?)),
        }
    }
}
