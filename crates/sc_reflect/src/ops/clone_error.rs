use alloc::borrow::Cow;
use core::{error, fmt};

/// Returned by [`Reflect::reflect_clone`](crate::Reflect::reflect_clone).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectCloneError {
    /// The type does not support cloning through reflection.
    NotSupport { type_path: Cow<'static, str> },
    /// A field of the type could not be cloned.
    FieldNotCloneable {
        type_path: Cow<'static, str>,
        field: Cow<'static, str>,
    },
}

impl fmt::Display for ReflectCloneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSupport { type_path } => {
                write!(f, "`reflect_clone` not supported for `{type_path}`")
            }
            Self::FieldNotCloneable { type_path, field } => {
                write!(f, "field `{type_path}::{field}` cannot be cloned")
            }
        }
    }
}

impl error::Error for ReflectCloneError {}
