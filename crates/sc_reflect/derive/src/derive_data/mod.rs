// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod reflect_derive;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes};
pub(crate) use reflect_derive::{ReflectDerive, ReflectField, ReflectShape};
