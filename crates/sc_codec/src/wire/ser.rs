use serde_core::ser::{Error as _, SerializeMap, SerializeStruct, SerializeTuple, SerializeSeq};
use serde_core::{Serialize, Serializer};

use sc_reflect::registry::{TypeRegistry, TypeTraitDefault, TypeTraitSerialize};

use crate::adapter;
use crate::error::CodecError;
use crate::shadow::{ShadowKind, ShadowType};
use crate::transcode::ShadowValue;
use crate::wire::ErrorSlot;

/// `Serialize` for a [`ShadowValue`] following its [`ShadowType`].
///
/// - structs: visible fields only, keyed by field name;
/// - lists and arrays: sequences and tuples;
/// - `None`: unit `null`;
/// - adapter leaves: the string from the adapter's encode function;
/// - verbatim leaves: the type's own `Serialize`.
pub struct ShadowSerializer<'a> {
    registry: &'a TypeRegistry,
    ty: &'a ShadowType,
    value: &'a ShadowValue,
    errors: &'a ErrorSlot,
}

impl<'a> ShadowSerializer<'a> {
    #[inline]
    pub fn new(
        registry: &'a TypeRegistry,
        ty: &'a ShadowType,
        value: &'a ShadowValue,
        errors: &'a ErrorSlot,
    ) -> Self {
        Self {
            registry,
            ty,
            value,
            errors,
        }
    }

    #[inline]
    fn child(&self, ty: &'a ShadowType, value: &'a ShadowValue) -> Self {
        Self {
            registry: self.registry,
            ty,
            value,
            errors: self.errors,
        }
    }

    fn fail<E: serde_core::ser::Error>(&self, err: CodecError) -> E {
        self.errors.raise(err, |msg| E::custom(msg))
    }
}

impl Serialize for ShadowSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ty = self.ty;
        match (ty.kind(), self.value) {
            (ShadowKind::Nullable(inner), ShadowValue::Nullable(value)) => match value {
                None => serializer.serialize_none(),
                Some(value) => serializer.serialize_some(&self.child(inner, value)),
            },
            (ShadowKind::Adapter { .. }, ShadowValue::Adapter(value)) => {
                let Some(descriptor) = adapter::lookup_by_id(self.registry, ty.ty_id()) else {
                    return Err(self.fail(CodecError::AdapterNotRegistered {
                        type_path: ty.type_path(),
                    }));
                };
                let text = match value {
                    Some(value) => descriptor.encode(&**value),
                    None => descriptor.encode(&*descriptor.zero()),
                };
                match text {
                    Ok(text) => serializer.serialize_str(&text),
                    Err(err) => Err(self.fail(err)),
                }
            }
            (ShadowKind::Verbatim, ShadowValue::Verbatim(value)) => {
                let Some(serialize) = self
                    .registry
                    .get_type_trait::<TypeTraitSerialize>(ty.ty_id())
                else {
                    return Err(self.fail(CodecError::Unsupported {
                        type_path: ty.type_path(),
                    }));
                };
                match value {
                    Some(value) => serialize.serialize(&**value, serializer),
                    None => match self.registry.get_type_trait::<TypeTraitDefault>(ty.ty_id()) {
                        Some(default) => serialize.serialize(&*default.default(), serializer),
                        None => serializer.serialize_none(),
                    },
                }
            }
            (ShadowKind::Array { len, item }, ShadowValue::Array(items)) => {
                if items.len() != *len {
                    return Err(S::Error::custom(format_args!(
                        "array `{}` holds {} items, expected {len}",
                        ty.type_path(),
                        items.len(),
                    )));
                }
                let mut tuple = serializer.serialize_tuple(*len)?;
                for value in items {
                    tuple.serialize_element(&self.child(item, value))?;
                }
                tuple.end()
            }
            (ShadowKind::List { item }, ShadowValue::List(items)) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for value in items {
                    seq.serialize_element(&self.child(item, value))?;
                }
                seq.end()
            }
            (ShadowKind::Map { key, value: value_ty }, ShadowValue::Map(pairs)) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (entry_key, entry_value) in pairs {
                    map.serialize_entry(&self.child(key, entry_key), &self.child(value_ty, entry_value))?;
                }
                map.end()
            }
            (ShadowKind::Struct { fields }, ShadowValue::Struct(values)) => {
                let len = fields.iter().filter(|field| field.visible().is_some()).count();
                let mut state = serializer.serialize_struct(ty.source().ty().ident(), len)?;
                for (field, value) in fields.iter().zip(values) {
                    match field.visible() {
                        Some(field_ty) => {
                            state.serialize_field(field.source_name(), &self.child(field_ty, value))?;
                        }
                        None => state.skip_field(field.source_name())?,
                    }
                }
                state.end()
            }
            (_, value) => panic!(
                "shadow out of sync for `{}`: received {value:?}",
                ty.type_path()
            ),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use sc_reflect::derive::Reflect;
    use sc_reflect::info::Typed;
    use sc_reflect::registry::TypeRegistry;
    use serde_json::json;

    use super::ShadowSerializer;
    use crate::error::CodecError;
    use crate::net::{self, MacAddr};
    use crate::shadow::{OptOutSet, build_shadow};
    use crate::transcode::{ShadowValue, to_shadow};
    use crate::wire::ErrorSlot;

    #[derive(Reflect, Default)]
    struct Nic {
        pub name: String,
        pub mac: MacAddr,
        pub aliases: Option<Vec<MacAddr>>,
        #[reflect(skip_serde)]
        pub driver: String,
        index: u32,
    }

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    #[reflect(opaque, clone, partial_eq, debug, default)]
    struct Blob(Vec<u8>);

    #[derive(Reflect, Default)]
    struct Holder {
        pub blob: Blob,
    }

    #[test]
    fn json_value_of_nic() {
        let mut registry = TypeRegistry::new();
        net::register_net_adapters(&mut registry);
        registry.register::<Nic>();
        let ty = build_shadow(&registry, Nic::type_info(), &OptOutSet::new()).unwrap();

        let nic = Nic {
            name: "eth1".into(),
            mac: MacAddr::new([0xaa, 0xbb, 0xcc, 0, 1, 2]),
            aliases: Some(vec![MacAddr::default()]),
            driver: "e1000".into(),
            index: 4,
        };
        let shadow = to_shadow(&ty, &nic).unwrap();
        let errors = ErrorSlot::new();
        let json = serde_json::to_value(ShadowSerializer::new(&registry, &ty, &shadow, &errors)).unwrap();

        assert_eq!(
            json,
            json!({
                "name": "eth1",
                "mac": "aa:bb:cc:00:01:02",
                "aliases": ["00:00:00:00:00:00"],
            })
        );

        let empty = ShadowValue::empty(&ty);
        let json = serde_json::to_value(ShadowSerializer::new(&registry, &ty, &empty, &errors)).unwrap();
        assert_eq!(
            json,
            json!({ "name": "", "mac": "00:00:00:00:00:00", "aliases": null })
        );
        assert!(errors.take().is_none());
    }

    #[test]
    fn leaf_without_serde_is_unsupported() {
        let mut registry = TypeRegistry::new();
        registry.register::<Holder>();
        let ty = build_shadow(&registry, Holder::type_info(), &OptOutSet::new()).unwrap();
        let shadow = to_shadow(&ty, &Holder::default()).unwrap();

        let errors = ErrorSlot::new();
        let result = serde_json::to_value(ShadowSerializer::new(&registry, &ty, &shadow, &errors));
        assert!(result.is_err());
        assert!(matches!(
            errors.take(),
            Some(CodecError::Unsupported { type_path }) if type_path.ends_with("::Blob")
        ));
    }

    #[test]
    fn registry_without_adapter_is_reported() {
        let mut registry = TypeRegistry::new();
        net::register_net_adapters(&mut registry);
        registry.register::<Nic>();
        let ty = build_shadow(&registry, Nic::type_info(), &OptOutSet::new()).unwrap();
        let shadow = to_shadow(&ty, &Nic::default()).unwrap();

        let bare = TypeRegistry::new();
        let errors = ErrorSlot::new();
        let result = serde_json::to_value(ShadowSerializer::new(&bare, &ty, &shadow, &errors));
        assert!(result.is_err());
        assert!(matches!(
            errors.take(),
            Some(CodecError::AdapterNotRegistered { type_path }) if type_path == "sc_codec::net::MacAddr"
        ));
    }
}
