use core::{error, fmt};

use crate::info::{ArrayInfo, BoxedInfo, ListInfo, MapInfo};
use crate::info::{NullableInfo, OpaqueInfo, StructInfo, Type};

// -----------------------------------------------------------------------------
// ReflectKind

/// The structural shape of a reflected type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    /// A struct with named fields.
    Struct,
    /// A growable sequence, e.g. `Vec<T>`.
    List,
    /// A fixed-size array, e.g. `[T; N]`.
    Array,
    /// A key/value map, e.g. `BTreeMap<K, V>`.
    Map,
    /// A value that may be absent, e.g. `Option<T>`.
    Nullable,
    /// A non-null owning indirection, e.g. `Box<T>`.
    Boxed,
    /// A leaf whose inside is not reflected, e.g. `u32` or `String`.
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Struct => "Struct",
            Self::List => "List",
            Self::Array => "Array",
            Self::Map => "Map",
            Self::Nullable => "Nullable",
            Self::Boxed => "Boxed",
            Self::Opaque => "Opaque",
        })
    }
}

/// Returned by the `as_*` casts of [`TypeInfo`], [`ReflectRef`] and
/// [`ReflectMut`] when the kind does not match.
///
/// [`ReflectRef`]: crate::ops::ReflectRef
/// [`ReflectMut`]: crate::ops::ReflectMut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectKindError {
    pub expected: ReflectKind,
    pub received: ReflectKind,
}

impl fmt::Display for ReflectKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reflect kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl error::Error for ReflectKindError {}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time information about a type, one variant per [`ReflectKind`].
///
/// Obtained from [`Typed::type_info`](crate::info::Typed::type_info) and always
/// `'static`.
///
/// ```
/// use sc_reflect::info::{ReflectKind, Typed};
///
/// let info = <Option<Vec<u8>> as Typed>::type_info();
/// assert_eq!(info.kind(), ReflectKind::Nullable);
///
/// let inner = info.as_nullable().unwrap().inner_info();
/// assert!(inner.type_is::<Vec<u8>>());
/// assert!(inner.as_list().unwrap().item_info().type_is::<u8>());
/// ```
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Struct(StructInfo),
    List(ListInfo),
    Array(ArrayInfo),
    Map(MapInfo),
    Nullable(NullableInfo),
    Boxed(BoxedInfo),
    Opaque(OpaqueInfo),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        #[doc = concat!("Returns the [`", stringify!($info), "`] if this is a `", stringify!($kind), "`.")]
        pub const fn $name(&self) -> Result<&$info, ReflectKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_struct: Struct => StructInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_array: Array => ArrayInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_nullable: Nullable => NullableInfo);
    impl_cast_method!(as_boxed: Boxed => BoxedInfo);
    impl_cast_method!(as_opaque: Opaque => OpaqueInfo);

    pub const fn ty(&self) -> &Type {
        match self {
            Self::Struct(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Nullable(info) => info.ty(),
            Self::Boxed(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
        }
    }

    crate::info::impl_type_fn!();

    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Struct(_) => ReflectKind::Struct,
            Self::List(_) => ReflectKind::List,
            Self::Array(_) => ReflectKind::Array,
            Self::Map(_) => ReflectKind::Map,
            Self::Nullable(_) => ReflectKind::Nullable,
            Self::Boxed(_) => ReflectKind::Boxed,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }

    /// Follows [`Boxed`](TypeInfo::Boxed) indirections down to the pointee.
    pub fn peel_boxed(&self) -> &TypeInfo {
        let mut info = self;
        while let Self::Boxed(boxed) = info {
            info = boxed.pointee_info();
        }
        info
    }
}
