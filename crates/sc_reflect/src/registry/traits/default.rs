use alloc::boxed::Box;

use crate::Reflect;
use crate::info::Typed;
use crate::registry::FromType;

/// [`Default`] for a reflected type, looked up through the registry.
///
/// ```
/// use sc_reflect::{Reflect, registry::{TypeRegistry, TypeTraitDefault}};
///
/// let registry = TypeRegistry::new();
///
/// let generator = registry
///     .get_with_type_name("u32").unwrap()
///     .get_trait::<TypeTraitDefault>().unwrap();
///
/// let zero: Box<dyn Reflect> = generator.default();
/// assert_eq!(zero.take::<u32>().unwrap(), 0);
/// ```
#[derive(Clone)]
pub struct TypeTraitDefault {
    func: fn() -> Box<dyn Reflect>,
}

impl TypeTraitDefault {
    /// Calls `T::default()` for the type this was built from.
    #[inline(always)]
    pub fn default(&self) -> Box<dyn Reflect> {
        (self.func)()
    }
}

impl<T: Default + Typed + Reflect> FromType<T> for TypeTraitDefault {
    fn from_type() -> Self {
        Self {
            func: || Box::<T>::default(),
        }
    }
}
