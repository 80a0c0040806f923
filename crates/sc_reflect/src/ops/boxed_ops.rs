use crate::Reflect;

/// Access to the pointee of an owning pointer, i.e. `Box<T>`.
pub trait Boxed: Reflect {
    fn pointee(&self) -> &dyn Reflect;

    fn pointee_mut(&mut self) -> &mut dyn Reflect;
}
