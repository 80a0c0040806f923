//! Copying values between a data model and its shadow.
//!
//! [`to_shadow`] builds a [`ShadowValue`] from an original value,
//! [`to_original`] writes one back into an existing original. Writing back
//! works in place:
//!
//! - `Option` payloads that already exist are reused, so are boxes;
//! - lists are updated index by index and grow, they never shrink;
//! - maps receive the shadow's pairs, other keys are kept;
//! - struct fields that are hidden or opted out are not touched.
//!
//! The shadow value and the original must follow the same [`ShadowType`].
//! A mismatch is a bug in the caller and panics.

use alloc::boxed::Box;
use alloc::vec::Vec;

use sc_reflect::Reflect;
use sc_reflect::info::{ReflectKind, ReflectKindError};
use sc_reflect::ops::{ReflectMut, ReflectRef};
use sc_reflect::registry::{TypeRegistry, TypeTraitDefault};

use crate::adapter;
use crate::error::{CodecError, Result};
use crate::shadow::{ShadowKind, ShadowType};

// -----------------------------------------------------------------------------
// ShadowValue

/// A live instance of a [`ShadowType`].
///
/// An empty leaf (`None`) stands for the zero value of its type.
#[derive(Debug)]
pub enum ShadowValue {
    Nullable(Option<Box<ShadowValue>>),
    /// Owns one value of the adapted type.
    Adapter(Option<Box<dyn Reflect>>),
    Verbatim(Option<Box<dyn Reflect>>),
    Array(Vec<ShadowValue>),
    List(Vec<ShadowValue>),
    Map(Vec<(ShadowValue, ShadowValue)>),
    /// One entry per source field, [`Skipped`](ShadowValue::Skipped) for
    /// fields that do not take part.
    Struct(Vec<ShadowValue>),
    Skipped,
}

impl ShadowValue {
    /// The zero value of `ty`: empty leaves, empty options and lists, and
    /// arrays of zero values.
    pub fn empty(ty: &ShadowType) -> Self {
        match ty.kind() {
            ShadowKind::Nullable(_) => Self::Nullable(None),
            ShadowKind::Adapter { .. } => Self::Adapter(None),
            ShadowKind::Verbatim => Self::Verbatim(None),
            ShadowKind::Array { len, item } => {
                Self::Array((0..*len).map(|_| Self::empty(item)).collect())
            }
            ShadowKind::List { .. } => Self::List(Vec::new()),
            ShadowKind::Map { .. } => Self::Map(Vec::new()),
            ShadowKind::Struct { fields } => Self::Struct(
                fields
                    .iter()
                    .map(|field| match field.visible() {
                        Some(ty) => Self::empty(ty),
                        None => Self::Skipped,
                    })
                    .collect(),
            ),
        }
    }
}

// -----------------------------------------------------------------------------
// Helpers

#[cold]
#[inline(never)]
fn out_of_sync(ty: &ShadowType, received: impl core::fmt::Debug) -> ! {
    panic!(
        "shadow out of sync for `{}` ({:?}): received {received:?}",
        ty.type_path(),
        ty.source().kind(),
    )
}

#[cold]
#[inline(never)]
fn kind_error(ty: &ShadowType, err: ReflectKindError) -> ! {
    out_of_sync(ty, err)
}

/// Follows `Box`es down to the pointee.
pub(crate) fn peel(mut value: &dyn Reflect) -> &dyn Reflect {
    while let ReflectRef::Boxed(boxed) = value.reflect_ref() {
        value = boxed.pointee();
    }
    value
}

/// Follows `Box`es down to the pointee, keeping the allocations.
pub(crate) fn peel_mut(value: &mut dyn Reflect) -> &mut dyn Reflect {
    if value.reflect_kind() != ReflectKind::Boxed {
        return value;
    }
    match value.reflect_mut() {
        ReflectMut::Boxed(boxed) => peel_mut(boxed.pointee_mut()),
        _ => unreachable!("kind was checked above"),
    }
}

// -----------------------------------------------------------------------------
// Original to shadow

/// Builds the shadow of `value`.
///
/// Leaves are copied with [`Reflect::reflect_clone`].
pub fn to_shadow(ty: &ShadowType, value: &dyn Reflect) -> Result<ShadowValue> {
    let value = peel(value);
    let shadow = match ty.kind() {
        ShadowKind::Nullable(inner) => {
            let nullable = value
                .reflect_ref()
                .as_nullable()
                .unwrap_or_else(|err| kind_error(ty, err));
            match nullable.get() {
                None => ShadowValue::Nullable(None),
                Some(inner_value) => {
                    ShadowValue::Nullable(Some(Box::new(to_shadow(inner, inner_value)?)))
                }
            }
        }
        ShadowKind::Adapter { .. } => ShadowValue::Adapter(Some(value.reflect_clone()?)),
        ShadowKind::Verbatim => ShadowValue::Verbatim(Some(value.reflect_clone()?)),
        ShadowKind::Array { item, .. } => {
            let array = value
                .reflect_ref()
                .as_array()
                .unwrap_or_else(|err| kind_error(ty, err));
            let mut items = Vec::with_capacity(array.len());
            for index in 0..array.len() {
                let Some(element) = array.get(index) else {
                    out_of_sync(ty, index);
                };
                items.push(to_shadow(item, element)?);
            }
            ShadowValue::Array(items)
        }
        ShadowKind::List { item } => {
            let list = value
                .reflect_ref()
                .as_list()
                .unwrap_or_else(|err| kind_error(ty, err));
            let mut items = Vec::with_capacity(list.len());
            for index in 0..list.len() {
                let Some(element) = list.get(index) else {
                    out_of_sync(ty, index);
                };
                items.push(to_shadow(item, element)?);
            }
            ShadowValue::List(items)
        }
        ShadowKind::Map { key, value: value_ty } => {
            let map = value
                .reflect_ref()
                .as_map()
                .unwrap_or_else(|err| kind_error(ty, err));
            let mut pairs = Vec::with_capacity(map.len());
            for (entry_key, entry_value) in map.entries() {
                pairs.push((to_shadow(key, entry_key)?, to_shadow(value_ty, entry_value)?));
            }
            ShadowValue::Map(pairs)
        }
        ShadowKind::Struct { fields } => {
            let data = value
                .reflect_ref()
                .as_struct()
                .unwrap_or_else(|err| kind_error(ty, err));
            let mut values = Vec::with_capacity(fields.len());
            for field in fields {
                let shadow = match field.visible() {
                    Some(field_ty) => {
                        let Some(field_value) = data.field_at(field.index()) else {
                            out_of_sync(ty, field.source_name());
                        };
                        to_shadow(field_ty, field_value)?
                    }
                    None => ShadowValue::Skipped,
                };
                values.push(shadow);
            }
            ShadowValue::Struct(values)
        }
    };
    Ok(shadow)
}

// -----------------------------------------------------------------------------
// Shadow to original

/// Writes `shadow` into `dest`.
///
/// Empty adapter leaves write the adapter's zero value. Empty verbatim
/// leaves write `Default` if the type registered it and are skipped
/// otherwise.
///
/// # Errors
///
/// [`CodecError::AdapterNotRegistered`] if an adapter leaf meets a registry
/// that no longer knows its adapter.
pub fn to_original(
    registry: &TypeRegistry,
    ty: &ShadowType,
    shadow: ShadowValue,
    dest: &mut dyn Reflect,
) -> Result<()> {
    let dest = peel_mut(dest);
    match (ty.kind(), shadow) {
        (ShadowKind::Nullable(inner), ShadowValue::Nullable(value)) => {
            let nullable = dest
                .reflect_mut()
                .as_nullable()
                .unwrap_or_else(|err| kind_error(ty, err));
            match value {
                None => nullable.set_none(),
                Some(value) => to_original(registry, inner, *value, nullable.get_or_insert_default())?,
            }
        }
        (ShadowKind::Adapter { .. }, ShadowValue::Adapter(value)) => {
            let value = match value {
                Some(value) => value,
                None => match adapter::lookup_by_id(registry, ty.ty_id()) {
                    Some(descriptor) => descriptor.zero(),
                    None => {
                        return Err(CodecError::AdapterNotRegistered {
                            type_path: ty.type_path(),
                        });
                    }
                },
            };
            assign(ty, dest, value);
        }
        (ShadowKind::Verbatim, ShadowValue::Verbatim(value)) => {
            let value = match value {
                Some(value) => Some(value),
                None => registry
                    .get_type_trait::<TypeTraitDefault>(ty.ty_id())
                    .map(TypeTraitDefault::default),
            };
            if let Some(value) = value {
                assign(ty, dest, value);
            }
        }
        (ShadowKind::Array { item, .. }, ShadowValue::Array(items)) => {
            let array = dest
                .reflect_mut()
                .as_array()
                .unwrap_or_else(|err| kind_error(ty, err));
            for (index, value) in items.into_iter().enumerate() {
                let Some(slot) = array.get_mut(index) else {
                    out_of_sync(ty, index);
                };
                to_original(registry, item, value, slot)?;
            }
        }
        (ShadowKind::List { item }, ShadowValue::List(items)) => {
            let list = dest
                .reflect_mut()
                .as_list()
                .unwrap_or_else(|err| kind_error(ty, err));
            for (index, value) in items.into_iter().enumerate() {
                if index >= list.len() {
                    list.push_default();
                }
                let Some(slot) = list.get_mut(index) else {
                    out_of_sync(ty, index);
                };
                to_original(registry, item, value, slot)?;
            }
        }
        (ShadowKind::Map { key, value: value_ty }, ShadowValue::Map(pairs)) => {
            let map = dest
                .reflect_mut()
                .as_map()
                .unwrap_or_else(|err| kind_error(ty, err));
            for (entry_key, entry_value) in pairs {
                let mut new_key = map.new_key();
                to_original(registry, key, entry_key, &mut *new_key)?;
                let mut new_value = map.new_value();
                to_original(registry, value_ty, entry_value, &mut *new_value)?;
                if map.insert_boxed(new_key, new_value).is_err() {
                    out_of_sync(ty, "map entry of another type");
                }
            }
        }
        (ShadowKind::Struct { fields }, ShadowValue::Struct(values)) => {
            let data = dest
                .reflect_mut()
                .as_struct()
                .unwrap_or_else(|err| kind_error(ty, err));
            for (field, value) in fields.iter().zip(values) {
                let Some(field_ty) = field.visible() else {
                    continue;
                };
                let Some(slot) = data.field_at_mut(field.index()) else {
                    out_of_sync(ty, field.source_name());
                };
                to_original(registry, field_ty, value, slot)?;
            }
        }
        (_, shadow) => out_of_sync(ty, shadow),
    }
    Ok(())
}

fn assign(ty: &ShadowType, dest: &mut dyn Reflect, value: Box<dyn Reflect>) {
    if let Err(value) = dest.set(value) {
        out_of_sync(ty, value.reflect_type_path());
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use alloc::collections::BTreeMap;

    use sc_reflect::derive::Reflect;
    use sc_reflect::info::Typed;
    use sc_reflect::registry::TypeRegistry;

    use super::{ShadowValue, to_original, to_shadow};
    use crate::net::{self, MacAddr};
    use crate::shadow::{OptOutSet, ShadowKind, ShadowType, build_shadow};

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Port {
        pub name: String,
        pub mac: Option<Box<MacAddr>>,
        #[reflect(skip_serde)]
        pub token: String,
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Switch {
        pub ports: Vec<Port>,
        pub vlans: BTreeMap<u16, String>,
        pub uplink: Box<Port>,
        pub pair: [u8; 2],
        counter: u32,
    }

    fn schema() -> (TypeRegistry, ShadowType) {
        let mut registry = TypeRegistry::new();
        net::register_net_adapters(&mut registry);
        registry.register::<Switch>();
        let ty = build_shadow(&registry, Switch::type_info(), &OptOutSet::new()).unwrap();
        (registry, ty)
    }

    fn port(name: &str, mac: Option<[u8; 6]>) -> Port {
        Port {
            name: name.into(),
            mac: mac.map(|bytes| Box::new(MacAddr::new(bytes))),
            token: String::new(),
        }
    }

    #[test]
    fn round_trip_into_default() {
        let (registry, ty) = schema();
        let switch = Switch {
            ports: vec![port("a", Some([1, 2, 3, 4, 5, 6])), port("b", None)],
            vlans: BTreeMap::from([(10, "mgmt".into()), (20, "data".into())]),
            uplink: Box::new(port("up", Some([0; 6]))),
            pair: [7, 8],
            counter: 3,
        };

        let shadow = to_shadow(&ty, &switch).unwrap();
        let mut copy = Switch::default();
        to_original(&registry, &ty, shadow, &mut copy).unwrap();

        assert_eq!(copy.ports, switch.ports);
        assert_eq!(copy.vlans, switch.vlans);
        assert_eq!(copy.uplink, switch.uplink);
        assert_eq!(copy.pair, [7, 8]);
        // hidden
        assert_eq!(copy.counter, 0);
    }

    #[test]
    fn boxes_are_reused() {
        let (registry, ty) = schema();
        let mut dest = Switch {
            ports: vec![port("a", Some([1; 6]))],
            ..Switch::default()
        };
        let uplink_before: *const Port = &*dest.uplink;
        let mac_before: *const MacAddr = &**dest.ports[0].mac.as_ref().unwrap();

        let source = Switch {
            ports: vec![port("a2", Some([2; 6]))],
            uplink: Box::new(port("up", None)),
            ..Switch::default()
        };
        let shadow = to_shadow(&ty, &source).unwrap();
        to_original(&registry, &ty, shadow, &mut dest).unwrap();

        assert_eq!(dest.uplink.name, "up");
        assert_eq!(dest.ports[0].mac.as_deref(), Some(&MacAddr::new([2; 6])));
        assert!(core::ptr::eq(uplink_before, &*dest.uplink));
        assert!(core::ptr::eq(mac_before, &**dest.ports[0].mac.as_ref().unwrap()));
    }

    #[test]
    fn lists_never_shrink() {
        let (registry, ty) = schema();
        let mut dest = Switch {
            ports: vec![port("a", None), port("b", None), port("c", None)],
            ..Switch::default()
        };
        let source = Switch {
            ports: vec![port("x", None)],
            ..Switch::default()
        };
        let shadow = to_shadow(&ty, &source).unwrap();
        to_original(&registry, &ty, shadow, &mut dest).unwrap();

        let names: Vec<_> = dest.ports.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["x", "b", "c"]);
    }

    #[test]
    fn opted_out_fields_are_kept() {
        let (registry, ty) = schema();
        let mut dest = Switch::default();
        dest.uplink.token = "secret".into();

        let mut source = Switch::default();
        source.uplink.token = "leaked".into();
        source.uplink.name = "up".into();

        let shadow = to_shadow(&ty, &source).unwrap();
        to_original(&registry, &ty, shadow, &mut dest).unwrap();
        assert_eq!(dest.uplink.name, "up");
        assert_eq!(dest.uplink.token, "secret");
    }

    #[test]
    fn empty_leaves_write_zero_values() {
        let (registry, ty) = schema();
        let mut dest = Switch {
            ports: vec![port("a", Some([9; 6]))],
            ..Switch::default()
        };

        let ShadowValue::Struct(mut fields) = ShadowValue::empty(&ty) else {
            panic!("expected a struct");
        };
        let port_ty: &ShadowType = match ty.field_at(0).unwrap().visible().unwrap().kind() {
            ShadowKind::List { item } => item,
            _ => panic!("expected a list"),
        };
        let ShadowValue::Struct(mut port) = ShadowValue::empty(port_ty) else {
            panic!("expected a struct");
        };
        // mac: Some(<empty adapter leaf>)
        port[1] = ShadowValue::Nullable(Some(Box::new(ShadowValue::Adapter(None))));
        fields[0] = ShadowValue::List(vec![ShadowValue::Struct(port)]);

        to_original(&registry, &ty, ShadowValue::Struct(fields), &mut dest).unwrap();
        assert_eq!(dest.ports[0].name, "");
        assert_eq!(dest.ports[0].mac.as_deref(), Some(&MacAddr::default()));
    }
}
