use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;

use crate::info::{TypePath, TypePathTable};

/// The qualified name of a type: `(namespace, name)`.
///
/// Two types are treated as the same type iff their identities are equal.
/// No structural comparison is ever made.
///
/// The namespace is the module path (empty for primitives) and the name is
/// the [`TypePath::type_name`], so the [`Display`](fmt::Display) form equals
/// [`TypePath::type_path`].
///
/// ```
/// use sc_reflect::info::TypeIdentity;
///
/// let id = TypeIdentity::of::<String>();
/// assert_eq!(id.namespace(), "alloc::string");
/// assert_eq!(id.name(), "String");
/// assert_eq!(id.to_string(), "alloc::string::String");
/// assert_eq!(TypeIdentity::of::<u16>().to_string(), "u16");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity {
    namespace: Cow<'static, str>,
    name: Cow<'static, str>,
}

impl TypeIdentity {
    #[inline]
    pub const fn new_static(namespace: &'static str, name: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(namespace),
            name: Cow::Borrowed(name),
        }
    }

    #[inline]
    pub fn new(namespace: impl Into<Cow<'static, str>>, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    #[inline]
    pub fn of<T: TypePath + ?Sized>() -> Self {
        Self::from_table(TypePathTable::of::<T>())
    }

    pub(crate) fn from_table(table: TypePathTable) -> Self {
        Self::new_static(table.module_path().unwrap_or(""), table.name())
    }

    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `namespace::name` form, as used by the registry's path index.
    pub fn qualified(&self) -> Cow<'_, str> {
        if self.namespace.is_empty() {
            Cow::Borrowed(&self.name)
        } else {
            let mut path = String::with_capacity(self.namespace.len() + 2 + self.name.len());
            path.push_str(&self.namespace);
            path.push_str("::");
            path.push_str(&self.name);
            Cow::Owned(path)
        }
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}::{}", self.namespace, self.name)
        }
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeIdentity({self})")
    }
}
