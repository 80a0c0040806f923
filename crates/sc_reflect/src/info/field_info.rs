use core::any::{Any, TypeId};

use crate::info::{TypeInfo, Typed};

// -----------------------------------------------------------------------------
// NamedField

/// A field of a [`StructInfo`](crate::info::StructInfo).
///
/// Besides the name and type, a field records two codec-facing flags:
///
/// - `visible`: the field is `pub`. Hidden fields exist for reflection but
///   are never put on the wire.
/// - `skip_serde`: the field carries `#[reflect(skip_serde)]`. It is kept for
///   round-tripping but never serialized.
#[derive(Clone, Debug)]
pub struct NamedField {
    ty_id: TypeId,
    name: &'static str,
    // Resolved lazily, recursive types would otherwise never finish.
    type_info: fn() -> &'static TypeInfo,
    visible: bool,
    skip_serde: bool,
}

impl NamedField {
    /// A visible field without opt-out.
    #[inline]
    pub const fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            type_info: T::type_info,
            ty_id: TypeId::of::<T>(),
            visible: true,
            skip_serde: false,
        }
    }

    #[inline]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[inline]
    pub const fn with_skip_serde(mut self, skip_serde: bool) -> Self {
        self.skip_serde = skip_serde;
        self
    }

    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.ty_id == TypeId::of::<T>()
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub const fn is_skip_serde(&self) -> bool {
        self.skip_serde
    }
}
