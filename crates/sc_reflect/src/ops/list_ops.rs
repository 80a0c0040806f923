use crate::Reflect;

/// Access to growable sequences such as `Vec<T>`.
///
/// Only growth is exposed: elements can be appended with
/// [`push_default`](List::push_default) but never removed through reflection.
pub trait List: Reflect {
    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends the zero value of the item type and returns it.
    fn push_default(&mut self) -> &mut dyn Reflect;
}
