use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde_core::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_core::de::Error as _;

use sc_reflect::Reflect;
use sc_reflect::registry::{TypeRegistry, TypeTraitDeserialize};

use crate::adapter;
use crate::error::CodecError;
use crate::shadow::{ShadowField, ShadowKind, ShadowType};
use crate::transcode::ShadowValue;
use crate::wire::ErrorSlot;

// -----------------------------------------------------------------------------
// Context

#[derive(Clone, Copy)]
struct Context<'a> {
    registry: &'a TypeRegistry,
    errors: &'a ErrorSlot,
    text_scalars: bool,
}

impl Context<'_> {
    fn fail<E: de::Error>(&self, err: CodecError) -> E {
        self.errors.raise(err, |msg| E::custom(msg))
    }
}

#[cold]
#[inline(never)]
fn out_of_sync(ty: &ShadowType, slot: &ShadowValue) -> ! {
    panic!(
        "shadow out of sync for `{}`: slot holds {slot:?}",
        ty.type_path()
    )
}

// -----------------------------------------------------------------------------
// ShadowSeed

/// Decodes into an existing [`ShadowValue`] following its [`ShadowType`].
///
/// Whatever the input does not mention keeps its current value:
///
/// - structs only overwrite the keys present in the input, unknown keys
///   are ignored;
/// - `null` empties an option, any other value decodes into the present
///   payload or a new one;
/// - lists and maps are replaced by the input's elements;
/// - arrays must have exactly their length;
/// - adapter leaves accept a string, number or boolean and pass its text to
///   the adapter's decode function, see [`ShadowSeed::text_scalars`].
pub struct ShadowSeed<'a> {
    cx: Context<'a>,
    ty: &'a ShadowType,
    slot: &'a mut ShadowValue,
}

impl<'a> ShadowSeed<'a> {
    #[inline]
    pub fn new(
        registry: &'a TypeRegistry,
        ty: &'a ShadowType,
        slot: &'a mut ShadowValue,
        errors: &'a ErrorSlot,
    ) -> Self {
        Self {
            cx: Context {
                registry,
                errors,
                text_scalars: false,
            },
            ty,
            slot,
        }
    }

    /// Reads adapter leaves with `deserialize_str` instead of
    /// `deserialize_any`.
    ///
    /// For self-describing formats that keep the source text of plain
    /// scalars (YAML), the adapter then sees `0x1F` or `1.10` exactly as
    /// written instead of a number rendered back to text.
    #[inline]
    pub fn text_scalars(mut self, enabled: bool) -> Self {
        self.cx.text_scalars = enabled;
        self
    }
}

impl<'de> DeserializeSeed<'de> for ShadowSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        let Self { cx, ty, slot } = self;
        match ty.kind() {
            ShadowKind::Nullable(inner) => {
                let ShadowValue::Nullable(value) = slot else {
                    out_of_sync(ty, slot);
                };
                deserializer.deserialize_option(NullableVisitor { cx, inner, value })
            }
            ShadowKind::Adapter { .. } => {
                let ShadowValue::Adapter(value) = slot else {
                    out_of_sync(ty, slot);
                };
                let visitor = AdapterVisitor { cx, ty, value };
                if cx.text_scalars {
                    // `null` still means the zero value, anything else is text.
                    deserializer.deserialize_option(visitor)
                } else {
                    deserializer.deserialize_any(visitor)
                }
            }
            ShadowKind::Verbatim => {
                let ShadowValue::Verbatim(value) = slot else {
                    out_of_sync(ty, slot);
                };
                let Some(deserialize) = cx.registry.get_type_trait::<TypeTraitDeserialize>(ty.ty_id())
                else {
                    return Err(cx.fail(CodecError::Unsupported {
                        type_path: ty.type_path(),
                    }));
                };
                *value = Some(deserialize.deserialize(deserializer)?);
                Ok(())
            }
            ShadowKind::Array { len, item } => {
                let ShadowValue::Array(items) = slot else {
                    out_of_sync(ty, slot);
                };
                if items.len() != *len {
                    panic!(
                        "shadow out of sync for `{}`: {} items for an array of {len}",
                        ty.type_path(),
                        items.len(),
                    );
                }
                deserializer.deserialize_tuple(*len, ArrayVisitor { cx, ty, item, items })
            }
            ShadowKind::List { item } => {
                let ShadowValue::List(items) = slot else {
                    out_of_sync(ty, slot);
                };
                deserializer.deserialize_seq(ListVisitor { cx, ty, item, items })
            }
            ShadowKind::Map { key, value } => {
                let ShadowValue::Map(pairs) = slot else {
                    out_of_sync(ty, slot);
                };
                deserializer.deserialize_map(MapVisitor {
                    cx,
                    ty,
                    key,
                    value,
                    pairs,
                })
            }
            ShadowKind::Struct { fields } => {
                let ShadowValue::Struct(values) = slot else {
                    out_of_sync(ty, slot);
                };
                deserializer.deserialize_map(StructVisitor {
                    cx,
                    ty,
                    fields,
                    values,
                })
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Nullable

struct NullableVisitor<'a> {
    cx: Context<'a>,
    inner: &'a ShadowType,
    value: &'a mut Option<Box<ShadowValue>>,
}

impl<'de> Visitor<'de> for NullableVisitor<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an optional `{}`", self.inner.type_path())
    }

    fn visit_none<E: de::Error>(self) -> Result<(), E> {
        *self.value = None;
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        self.visit_none()
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        let inner = self.inner;
        let slot = self
            .value
            .get_or_insert_with(|| Box::new(ShadowValue::empty(inner)));
        ShadowSeed {
            cx: self.cx,
            ty: inner,
            slot,
        }
        .deserialize(deserializer)
    }
}

// -----------------------------------------------------------------------------
// Adapter

struct AdapterVisitor<'a> {
    cx: Context<'a>,
    ty: &'a ShadowType,
    value: &'a mut Option<Box<dyn Reflect>>,
}

impl AdapterVisitor<'_> {
    fn decode<E: de::Error>(self, text: &str) -> Result<(), E> {
        let Some(descriptor) = adapter::lookup_by_id(self.cx.registry, self.ty.ty_id()) else {
            return Err(self.cx.fail(CodecError::AdapterNotRegistered {
                type_path: self.ty.type_path(),
            }));
        };
        match descriptor.decode(text) {
            Ok(decoded) => {
                *self.value = Some(decoded);
                Ok(())
            }
            Err(err) => Err(self.cx.fail(err)),
        }
    }
}

impl<'de> Visitor<'de> for AdapterVisitor<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "the text form of `{}`", self.ty.type_path())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<(), E> {
        self.decode(v)
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<(), E> {
        self.decode(&v)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<(), E> {
        self.decode(if v { "true" } else { "false" })
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<(), E> {
        self.decode(&v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<(), E> {
        self.decode(&v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<(), E> {
        self.decode(&v.to_string())
    }

    // `null`: the zero value.
    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        *self.value = None;
        Ok(())
    }

    fn visit_none<E: de::Error>(self) -> Result<(), E> {
        self.visit_unit()
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_str(self)
    }
}

// -----------------------------------------------------------------------------
// Array

struct ArrayVisitor<'a> {
    cx: Context<'a>,
    ty: &'a ShadowType,
    item: &'a ShadowType,
    items: &'a mut Vec<ShadowValue>,
}

impl<'de> Visitor<'de> for ArrayVisitor<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an array of {} items", self.items.len())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        let len = self.items.len();
        for index in 0..len {
            let seed = ShadowSeed {
                cx: self.cx,
                ty: self.item,
                slot: &mut self.items[index],
            };
            if seq.next_element_seed(seed)?.is_none() {
                return Err(A::Error::invalid_length(index, &self));
            }
        }
        if seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(A::Error::custom(format_args!(
                "`{}` takes exactly {len} items",
                self.ty.type_path()
            )));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// List

struct ListVisitor<'a> {
    cx: Context<'a>,
    ty: &'a ShadowType,
    item: &'a ShadowType,
    items: &'a mut Vec<ShadowValue>,
}

impl<'de> Visitor<'de> for ListVisitor<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a sequence for `{}`", self.ty.type_path())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        let mut items = Vec::new();
        loop {
            let mut slot = ShadowValue::empty(self.item);
            let seed = ShadowSeed {
                cx: self.cx,
                ty: self.item,
                slot: &mut slot,
            };
            match seq.next_element_seed(seed)? {
                Some(()) => items.push(slot),
                None => break,
            }
        }
        *self.items = items;
        Ok(())
    }

    // `null`: an empty list.
    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        self.items.clear();
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Map

struct MapVisitor<'a> {
    cx: Context<'a>,
    ty: &'a ShadowType,
    key: &'a ShadowType,
    value: &'a ShadowType,
    pairs: &'a mut Vec<(ShadowValue, ShadowValue)>,
}

impl<'de> Visitor<'de> for MapVisitor<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a map for `{}`", self.ty.type_path())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        let mut pairs = Vec::new();
        loop {
            let mut key = ShadowValue::empty(self.key);
            let key_seed = ShadowSeed {
                cx: self.cx,
                ty: self.key,
                slot: &mut key,
            };
            if map.next_key_seed(key_seed)?.is_none() {
                break;
            }

            let mut value = ShadowValue::empty(self.value);
            map.next_value_seed(ShadowSeed {
                cx: self.cx,
                ty: self.value,
                slot: &mut value,
            })?;
            pairs.push((key, value));
        }
        *self.pairs = pairs;
        Ok(())
    }

    // `null`: an empty map.
    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        self.pairs.clear();
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Struct

struct StructVisitor<'a> {
    cx: Context<'a>,
    ty: &'a ShadowType,
    fields: &'a [ShadowField],
    values: &'a mut Vec<ShadowValue>,
}

impl<'de> Visitor<'de> for StructVisitor<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "struct `{}`", self.ty.type_path())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        while let Some(key) = map.next_key::<String>()? {
            let target = self
                .fields
                .iter()
                .find(|field| field.source_name() == key)
                .and_then(|field| Some((field.index(), field.visible()?)));
            match target {
                Some((index, field_ty)) => map.next_value_seed(ShadowSeed {
                    cx: self.cx,
                    ty: field_ty,
                    slot: &mut self.values[index],
                })?,
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(())
    }

    // An empty document.
    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use sc_reflect::derive::Reflect;
    use sc_reflect::info::Typed;
    use sc_reflect::registry::TypeRegistry;
    use serde_core::de::DeserializeSeed;

    use super::ShadowSeed;
    use crate::error::CodecError;
    use crate::net::{self, MacAddr};
    use crate::shadow::{OptOutSet, ShadowType, build_shadow};
    use crate::transcode::{ShadowValue, to_original, to_shadow};
    use crate::wire::ErrorSlot;

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Bond {
        pub name: String,
        pub members: Vec<MacAddr>,
        pub weights: BTreeMap<String, u32>,
        pub primary: Option<MacAddr>,
        pub lanes: [u8; 2],
    }

    fn schema() -> (TypeRegistry, ShadowType) {
        let mut registry = TypeRegistry::new();
        net::register_net_adapters(&mut registry);
        registry.register::<Bond>();
        let ty = build_shadow(&registry, Bond::type_info(), &OptOutSet::new()).unwrap();
        (registry, ty)
    }

    fn decode_json(json: &str, dest: &mut Bond) -> Result<(), CodecError> {
        let (registry, ty) = schema();
        let mut shadow = to_shadow(&ty, &*dest)?;
        let errors = ErrorSlot::new();
        let mut de = serde_json::Deserializer::from_str(json);
        if let Err(err) = ShadowSeed::new(&registry, &ty, &mut shadow, &errors).deserialize(&mut de) {
            return Err(errors.take().unwrap_or(CodecError::Format(err.into())));
        }
        to_original(&registry, &ty, shadow, dest)
    }

    #[test]
    fn partial_input_keeps_the_rest() {
        let mut bond = Bond {
            name: "bond0".into(),
            members: vec![MacAddr::new([1; 6]), MacAddr::new([2; 6])],
            weights: BTreeMap::from([("a".into(), 1)]),
            primary: Some(MacAddr::new([1; 6])),
            lanes: [1, 2],
        };

        decode_json(
            r#"{"members": ["03:03:03:03:03:03"], "weights": {"b": 2}, "extra": [1, 2]}"#,
            &mut bond,
        )
        .unwrap();

        assert_eq!(bond.name, "bond0");
        assert_eq!(bond.members, [MacAddr::new([3; 6]), MacAddr::new([2; 6])]);
        assert_eq!(bond.weights, BTreeMap::from([("a".into(), 1), ("b".into(), 2)]));
        assert_eq!(bond.primary, Some(MacAddr::new([1; 6])));
        assert_eq!(bond.lanes, [1, 2]);
    }

    #[test]
    fn null_clears_option() {
        let mut bond = Bond {
            primary: Some(MacAddr::new([1; 6])),
            ..Bond::default()
        };
        decode_json(r#"{"primary": null, "lanes": [4, 5]}"#, &mut bond).unwrap();
        assert_eq!(bond.primary, None);
        assert_eq!(bond.lanes, [4, 5]);
    }

    #[test]
    fn array_length_is_checked() {
        let mut bond = Bond::default();
        let err = decode_json(r#"{"lanes": [1, 2, 3]}"#, &mut bond).unwrap_err();
        assert!(matches!(err, CodecError::Format(_)));
        assert_eq!(bond.lanes, [0, 0]);
    }

    #[test]
    fn registry_without_adapter_is_reported() {
        let (_, ty) = schema();
        let bare = TypeRegistry::new();

        let mut shadow = ShadowValue::empty(&ty);
        let errors = ErrorSlot::new();
        let mut de = serde_json::Deserializer::from_str(r#"{"primary": "02:00:00:00:00:01"}"#);
        let result = ShadowSeed::new(&bare, &ty, &mut shadow, &errors).deserialize(&mut de);
        assert!(result.is_err());
        assert!(matches!(
            errors.take(),
            Some(CodecError::AdapterNotRegistered { type_path }) if type_path == "sc_codec::net::MacAddr"
        ));

        let ShadowValue::Struct(mut fields) = ShadowValue::empty(&ty) else {
            panic!("expected a struct shadow");
        };
        fields[3] = ShadowValue::Nullable(Some(Box::new(ShadowValue::Adapter(None))));
        let mut bond = Bond::default();
        let err = to_original(&bare, &ty, ShadowValue::Struct(fields), &mut bond).unwrap_err();
        assert!(matches!(
            err,
            CodecError::AdapterNotRegistered { type_path } if type_path == "sc_codec::net::MacAddr"
        ));
    }

    #[test]
    fn adapter_errors_surface_typed() {
        let mut bond = Bond::default();
        let err = decode_json(r#"{"primary": "not-a-mac"}"#, &mut bond).unwrap_err();
        let CodecError::Adapter { type_path, .. } = err else {
            panic!("expected an adapter error, got {err:?}");
        };
        assert_eq!(type_path, "sc_codec::net::MacAddr");
        assert_eq!(bond.primary, None);
    }
}
