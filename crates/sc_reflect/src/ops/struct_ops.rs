use crate::Reflect;

/// Field access for reflected structs with named fields.
///
/// Implemented by `#[derive(Reflect)]`. Indices follow declaration order and
/// match [`StructInfo::field_at`](crate::info::StructInfo::field_at).
///
/// ```
/// use sc_reflect::{Reflect, derive::Reflect, ops::Struct};
///
/// #[derive(Reflect, Default)]
/// struct Point {
///     pub x: i32,
///     pub y: i32,
/// }
///
/// let mut p = Point { x: 1, y: 2 };
/// assert_eq!(p.field_len(), 2);
/// assert_eq!(p.name_at(1), Some("y"));
/// p.field_at_mut(0).unwrap().set(Box::new(7_i32)).unwrap();
/// assert_eq!(p.x, 7);
/// ```
pub trait Struct: Reflect {
    /// Returns the field called `name`.
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    /// Returns the field called `name` mutably.
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    /// Returns the field at `index`.
    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    /// Returns the field at `index` mutably.
    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Returns the name of the field at `index`.
    fn name_at(&self, index: usize) -> Option<&'static str>;

    /// Returns the number of fields.
    fn field_len(&self) -> usize;
}
