use crate::Reflect;

/// Access to values that may be absent, i.e. `Option<T>`.
///
/// ```
/// use sc_reflect::Reflect;
///
/// let mut value: Option<u32> = None;
/// let nullable = value.reflect_mut().as_nullable().unwrap();
/// nullable.get_or_insert_default().set(Box::new(9_u32)).unwrap();
/// assert_eq!(value, Some(9));
/// ```
pub trait Nullable: Reflect {
    fn get(&self) -> Option<&dyn Reflect>;

    fn get_mut(&mut self) -> Option<&mut dyn Reflect>;

    #[inline]
    fn is_none(&self) -> bool {
        self.get().is_none()
    }

    /// Drops the held value, if any.
    fn set_none(&mut self);

    /// Returns the held value, first storing the zero value if absent.
    ///
    /// An existing value is returned as is, so an existing allocation
    /// (e.g. `Option<Box<T>>`) is kept.
    fn get_or_insert_default(&mut self) -> &mut dyn Reflect;
}
