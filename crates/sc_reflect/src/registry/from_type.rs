use crate::info::Typed;

/// Builds a [`TypeTrait`] for the concrete type `T`.
///
/// ```
/// # use sc_reflect::registry::{TypeMeta, TypeTraitDefault, FromType};
/// let mut meta = TypeMeta::of::<String>();
/// meta.insert_trait::<TypeTraitDefault>(FromType::<String>::from_type());
/// ```
///
/// [`TypeTrait`]: crate::registry::TypeTrait
pub trait FromType<T: Typed> {
    fn from_type() -> Self;
}
