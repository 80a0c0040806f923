use core::fmt;

use crate::Reflect;
use crate::ops::{Array, List, Map, Nullable, ReflectRef, Struct};

// -----------------------------------------------------------------------------
// Debug

/// Formats a struct as `Ident { field: value, .. }`.
pub fn struct_debug(dyn_struct: &dyn Struct, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut debug = f.debug_struct(dyn_struct.reflect_type_ident());
    for index in 0..dyn_struct.field_len() {
        if let (Some(name), Some(value)) = (dyn_struct.name_at(index), dyn_struct.field_at(index)) {
            debug.field(name, &value);
        }
    }
    debug.finish()
}

pub fn list_debug(dyn_list: &dyn List, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list()
        .entries((0..dyn_list.len()).filter_map(|index| dyn_list.get(index)))
        .finish()
}

pub fn array_debug(dyn_array: &dyn Array, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list()
        .entries((0..dyn_array.len()).filter_map(|index| dyn_array.get(index)))
        .finish()
}

pub fn map_debug(dyn_map: &dyn Map, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(dyn_map.entries()).finish()
}

pub fn nullable_debug(dyn_nullable: &dyn Nullable, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match dyn_nullable.get() {
        Some(value) => f.debug_tuple("Some").field(&value).finish(),
        None => f.write_str("None"),
    }
}

// -----------------------------------------------------------------------------
// PartialEq

/// Folds element comparisons: `Some(false)` wins, then `None`.
fn all_eq(results: impl Iterator<Item = Option<bool>>) -> Option<bool> {
    let mut comparable = true;
    for result in results {
        match result {
            Some(false) => return Some(false),
            Some(true) => {}
            None => comparable = false,
        }
    }
    comparable.then_some(true)
}

/// Field-wise comparison of two structs of the same type.
///
/// ```
/// use sc_reflect::{Reflect, derive::Reflect};
///
/// #[derive(Reflect, Default)]
/// struct Port {
///     pub number: u16,
/// }
///
/// let a = Port { number: 22 };
/// assert_eq!(a.reflect_partial_eq(&Port { number: 22 }), Some(true));
/// assert_eq!(a.reflect_partial_eq(&Port { number: 23 }), Some(false));
/// assert_eq!(a.reflect_partial_eq(&22_u16), Some(false));
/// ```
pub fn struct_partial_eq(dyn_struct: &dyn Struct, other: &dyn Reflect) -> Option<bool> {
    if dyn_struct.ty_id() != other.ty_id() {
        return Some(false);
    }
    let ReflectRef::Struct(other) = other.reflect_ref() else {
        return Some(false);
    };
    all_eq((0..dyn_struct.field_len()).map(|index| {
        match (dyn_struct.field_at(index), other.field_at(index)) {
            (Some(lhs), Some(rhs)) => lhs.reflect_partial_eq(rhs),
            _ => Some(false),
        }
    }))
}

pub fn list_partial_eq(dyn_list: &dyn List, other: &dyn Reflect) -> Option<bool> {
    if dyn_list.ty_id() != other.ty_id() {
        return Some(false);
    }
    let ReflectRef::List(other) = other.reflect_ref() else {
        return Some(false);
    };
    if dyn_list.len() != other.len() {
        return Some(false);
    }
    all_eq((0..dyn_list.len()).map(|index| match (dyn_list.get(index), other.get(index)) {
        (Some(lhs), Some(rhs)) => lhs.reflect_partial_eq(rhs),
        _ => Some(false),
    }))
}

pub fn array_partial_eq(dyn_array: &dyn Array, other: &dyn Reflect) -> Option<bool> {
    if dyn_array.ty_id() != other.ty_id() {
        return Some(false);
    }
    let ReflectRef::Array(other) = other.reflect_ref() else {
        return Some(false);
    };
    all_eq((0..dyn_array.len()).map(|index| match (dyn_array.get(index), other.get(index)) {
        (Some(lhs), Some(rhs)) => lhs.reflect_partial_eq(rhs),
        _ => Some(false),
    }))
}

pub fn nullable_partial_eq(dyn_nullable: &dyn Nullable, other: &dyn Reflect) -> Option<bool> {
    if dyn_nullable.ty_id() != other.ty_id() {
        return Some(false);
    }
    let ReflectRef::Nullable(other) = other.reflect_ref() else {
        return Some(false);
    };
    match (dyn_nullable.get(), other.get()) {
        (None, None) => Some(true),
        (Some(lhs), Some(rhs)) => lhs.reflect_partial_eq(rhs),
        _ => Some(false),
    }
}
