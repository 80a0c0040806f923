//! The [`Codec`] facade.
//!
//! A [`Codec`] owns a shared [`TypeRegistry`] and a [`ShadowCache`], and
//! writes through a wire [`Format`]:
//!
//! - [`Codec::encode`]: value -> shadow -> bytes.
//! - [`Codec::decode`]: bytes -> shadow seeded from the destination ->
//!   destination.
//! - [`Codec::encode_with_defaults`]: like `encode`, leaving out every field
//!   equal to a baseline value.
//! - [`Codec::register_adapter`]: adds or replaces a string adapter.

use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use core::marker::PhantomData;

use log::trace;
use serde_core::Serialize;
use serde_core::de::DeserializeSeed;

use sc_reflect::Reflect;
use sc_reflect::info::TypeInfo;
use sc_reflect::registry::{GetTypeMeta, TypeRegistry, TypeRegistryArc};

use crate::adapter;
use crate::annotate::annotate_skips;
use crate::error::{BoxError, CodecError, Result};
use crate::net::register_net_adapters;
use crate::shadow::{OptOutSet, ShadowCache};
use crate::transcode::{peel, to_original, to_shadow};
use crate::wire::{ErrorSlot, ShadowSeed, ShadowSerializer};

// -----------------------------------------------------------------------------
// Format

/// A `serde` wire format.
pub trait Format {
    const NAME: &'static str;

    /// Whether plain scalars keep their source text when read as strings.
    ///
    /// If set, adapter leaves receive `007` and `1.10` verbatim, otherwise
    /// numbers and booleans reach the adapter re-rendered by Rust.
    const TEXT_SCALARS: bool = false;

    fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, BoxError>;

    fn from_slice_seed<'de, S: DeserializeSeed<'de>>(
        input: &'de [u8],
        seed: S,
    ) -> Result<S::Value, BoxError>;
}

/// YAML through `serde_yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

/// JSON through `serde_json`, compact output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

#[cfg(feature = "yaml")]
impl Format for Yaml {
    const NAME: &'static str = "yaml";
    const TEXT_SCALARS: bool = true;

    fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, BoxError> {
        Ok(serde_yaml::to_string(value)?.into_bytes())
    }

    fn from_slice_seed<'de, S: DeserializeSeed<'de>>(
        input: &'de [u8],
        seed: S,
    ) -> Result<S::Value, BoxError> {
        Ok(seed.deserialize(serde_yaml::Deserializer::from_slice(input))?)
    }
}

#[cfg(feature = "json")]
impl Format for Json {
    const NAME: &'static str = "json";

    fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, BoxError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn from_slice_seed<'de, S: DeserializeSeed<'de>>(
        input: &'de [u8],
        seed: S,
    ) -> Result<S::Value, BoxError> {
        let mut de = serde_json::Deserializer::from_slice(input);
        let value = seed.deserialize(&mut de)?;
        de.end()?;
        Ok(value)
    }
}

// -----------------------------------------------------------------------------
// Codec

/// Encodes and decodes reflected values through their shadow schemas.
///
/// Cloning a registry handle with [`Codec::with_registry`] shares adapters
/// between codecs of different formats.
///
/// ```
/// use sc_codec::Codec;
/// use sc_codec::net::IpNet;
/// use sc_reflect::derive::Reflect;
///
/// #[derive(Reflect, Default)]
/// struct Route {
///     pub dest: IpNet,
///     pub metric: u32,
/// }
///
/// let codec = Codec::json();
/// let mut route = Route { dest: "10.0.0.0/8".parse().unwrap(), metric: 5 };
///
/// codec.decode(br#"{"metric": 20}"#, &mut route).unwrap();
/// assert_eq!(route.metric, 20);
/// assert_eq!(route.dest.to_string(), "10.0.0.0/8");
///
/// let defaults = Route { dest: route.dest, metric: 0 };
/// let diff = codec.encode_with_defaults(&route, &defaults).unwrap();
/// assert_eq!(diff, br#"{"metric":20}"#);
/// ```
pub struct Codec<F = Yaml> {
    registry: TypeRegistryArc,
    cache: ShadowCache,
    marker: PhantomData<fn() -> F>,
}

fn default_registry() -> TypeRegistryArc {
    let mut registry = TypeRegistry::new();
    register_net_adapters(&mut registry);
    TypeRegistryArc::new(registry)
}

impl Codec<Yaml> {
    /// A YAML codec with the primitive types and the [`net`](crate::net)
    /// adapters registered.
    pub fn new() -> Self {
        Self::with_registry(default_registry())
    }
}

impl Default for Codec<Yaml> {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec<Json> {
    /// A JSON codec with the primitive types and the [`net`](crate::net)
    /// adapters registered.
    pub fn json() -> Self {
        Self::with_registry(default_registry())
    }
}

impl<F> Codec<F> {
    pub fn with_registry(registry: TypeRegistryArc) -> Self {
        Self {
            registry,
            cache: ShadowCache::new(),
            marker: PhantomData,
        }
    }

    /// The shared registry handle.
    #[inline]
    pub fn registry(&self) -> &TypeRegistryArc {
        &self.registry
    }

    /// Runs `func` with write access to the registry.
    pub fn update_registry<R>(&self, func: impl FnOnce(&mut TypeRegistry) -> R) -> R {
        let result = func(&mut self.registry.write());
        self.cache.clear();
        result
    }

    /// Registers `encode`/`decode` as the adapter of `T`, replacing any
    /// previous one.
    ///
    /// Registration is meant to happen before the codec is used. Encodes and
    /// decodes running concurrently see either the old or the new adapter.
    pub fn register_adapter<T, E, D, EE, DE>(&self, encode: E, decode: D)
    where
        T: Reflect + GetTypeMeta + Default,
        E: Fn(&T) -> Result<String, EE> + Send + Sync + 'static,
        D: Fn(&str) -> Result<T, DE> + Send + Sync + 'static,
        EE: Into<BoxError>,
        DE: Into<BoxError>,
    {
        self.update_registry(|registry| {
            adapter::register_adapter::<T, E, D, EE, DE>(registry, encode, decode);
        });
    }
}

impl<F: Format> Codec<F> {
    /// Encodes `value`.
    ///
    /// # Errors
    ///
    /// - [`CodecError::RecursiveType`] for self-referential data models.
    /// - [`CodecError::Adapter`] if an adapter's encode function fails.
    /// - [`CodecError::Unsupported`] for leaves without adapter or serde
    ///   support.
    /// - [`CodecError::Format`] if the format rejects the output.
    pub fn encode<T: Reflect + GetTypeMeta>(&self, value: &T) -> Result<Vec<u8>> {
        self.ensure_registered::<T>();
        self.write(T::type_info(), value, &OptOutSet::new())
    }

    /// [`encode`](Self::encode) into a `String`.
    pub fn encode_to_string<T: Reflect + GetTypeMeta>(&self, value: &T) -> Result<String> {
        let bytes = self.encode(value)?;
        String::from_utf8(bytes).map_err(|err| CodecError::Format(err.into()))
    }

    /// Decodes `input` into `dest`.
    ///
    /// Fields absent from the input keep their current value, see
    /// [`ShadowSeed`] for the exact merge rules. `dest` is left untouched if
    /// decoding fails.
    pub fn decode<T: Reflect + GetTypeMeta>(&self, input: &[u8], dest: &mut T) -> Result<()> {
        self.ensure_registered::<T>();
        let registry = self.registry.read();
        let ty = self
            .cache
            .get_or_build(&registry, T::type_info(), &OptOutSet::new())?;
        let mut shadow = to_shadow(&ty, &*dest)?;

        trace!(
            "decoding `{}` from {} bytes of {}",
            ty.type_path(),
            input.len(),
            F::NAME
        );
        let errors = ErrorSlot::new();
        let seed =
            ShadowSeed::new(&registry, &ty, &mut shadow, &errors).text_scalars(F::TEXT_SCALARS);
        F::from_slice_seed(input, seed)
            .map_err(|err| errors.take().unwrap_or(CodecError::Format(err)))?;

        to_original(&registry, &ty, shadow, dest)
    }

    /// Encodes only the fields of `value` that differ from `defaults`.
    ///
    /// Nested structs whose fields all equal the baseline are left out as a
    /// whole. `None` and an empty list or map count as equal.
    ///
    /// # Errors
    ///
    /// - [`CodecError::TypeMismatch`] if `defaults` is not a `T`.
    /// - [`CodecError::NotAStruct`] if `T` is not a struct, possibly boxed.
    /// - Everything [`encode`](Self::encode) reports.
    pub fn encode_with_defaults<T: Reflect + GetTypeMeta>(
        &self,
        value: &T,
        defaults: &dyn Reflect,
    ) -> Result<Vec<u8>> {
        if defaults.ty_id() != value.ty_id() {
            return Err(CodecError::TypeMismatch {
                candidate: T::type_path(),
                baseline: defaults.reflect_type_path(),
            });
        }
        let root = peel(value);
        if !matches!(root.reflect_type_info(), TypeInfo::Struct(_)) {
            return Err(CodecError::NotAStruct {
                type_path: root.reflect_type_path(),
            });
        }

        self.ensure_registered::<T>();
        let skips = annotate_skips(&self.registry.read(), value, defaults);
        trace!(
            "`{}` matches its defaults at {} path(s)",
            T::type_path(),
            skips.len()
        );
        self.write(T::type_info(), value, &skips)
    }

    // Field types with native serde support are only known as such once
    // registered.
    fn ensure_registered<T: GetTypeMeta>(&self) {
        if !self.registry.read().contains(TypeId::of::<T>()) {
            self.registry.write().register::<T>();
        }
    }

    fn write(&self, info: &'static TypeInfo, value: &dyn Reflect, opt_out: &OptOutSet) -> Result<Vec<u8>> {
        let registry = self.registry.read();
        let ty = self.cache.get_or_build(&registry, info, opt_out)?;
        let shadow = to_shadow(&ty, value)?;

        trace!("encoding `{}` as {}", ty.type_path(), F::NAME);
        let errors = ErrorSlot::new();
        F::to_vec(&ShadowSerializer::new(&registry, &ty, &shadow, &errors))
            .map_err(|err| errors.take().unwrap_or(CodecError::Format(err)))
    }
}

impl<F> fmt::Debug for Codec<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("format", &core::any::type_name::<F>())
            .field("cached_shadows", &self.cache.len())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;
    use core::convert::Infallible;
    use alloc::collections::BTreeMap;

    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use sc_reflect::derive::Reflect;

    use super::Codec;
    use crate::error::CodecError;
    use crate::net::{IpNet, MacAddr};
    use crate::shadow::MAX_ANNOTATED_SHADOWS;

    const RFC1123: &str = "%a, %d %b %Y %H:%M:%S GMT";

    #[derive(Reflect, Default, Debug, Clone, PartialEq)]
    struct Port {
        pub name: String,
        pub mac: MacAddr,
        pub speed: u32,
    }

    #[derive(Reflect, Default, Debug, Clone, PartialEq)]
    struct Switch {
        pub name: String,
        pub ports: Vec<Port>,
        pub vlans: BTreeMap<String, u16>,
        pub uplink: Option<Box<Port>>,
        pub trunks: Option<Vec<u16>>,
        pub mgmt: IpNet,
    }

    #[derive(Reflect, Default, Debug, Clone, PartialEq)]
    struct Node {
        pub id: u32,
        pub port: Port,
    }

    #[derive(Reflect, Default, Debug, Clone, PartialEq)]
    struct Lease {
        pub mac: MacAddr,
        pub expires: DateTime<Utc>,
    }

    #[derive(Reflect, Default)]
    struct Tree {
        pub name: String,
        pub children: Vec<Tree>,
    }

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    #[reflect(opaque, clone, partial_eq, debug, default)]
    struct Blob(Vec<u8>);

    #[derive(Reflect, Default)]
    struct Firmware {
        pub image: Blob,
    }

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    #[reflect(opaque, clone, partial_eq, debug, default)]
    struct Raw(String);

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Versions {
        pub a: Raw,
        pub b: Raw,
        pub c: Raw,
    }

    #[derive(Reflect, Default)]
    struct Flags {
        pub a: u32,
        pub b: u32,
        pub c: u32,
        pub d: u32,
        pub e: u32,
        pub f: u32,
        pub g: u32,
        pub h: u32,
    }

    fn flags(mask: u32) -> Flags {
        let bit = |n: u32| (mask >> n) & 1;
        Flags {
            a: bit(0),
            b: bit(1),
            c: bit(2),
            d: bit(3),
            e: bit(4),
            f: bit(5),
            g: bit(6),
            h: bit(7),
        }
    }

    fn port(name: &str, last: u8) -> Port {
        Port {
            name: name.into(),
            mac: MacAddr::new([0x02, 0, 0, 0, 0, last]),
            speed: 1000,
        }
    }

    fn switch() -> Switch {
        Switch {
            name: "core".into(),
            ports: vec![port("ge-0", 1), port("ge-1", 2)],
            vlans: BTreeMap::from([("mgmt".into(), 10), ("users".into(), 20)]),
            uplink: Some(Box::new(port("xe-0", 9))),
            trunks: Some(vec![10, 20]),
            mgmt: "192.168.0.0/16".parse().unwrap(),
        }
    }

    fn register_rfc1123<F>(codec: &Codec<F>) {
        codec.register_adapter::<DateTime<Utc>, _, _, _, _>(
            |time| Ok::<_, Infallible>(time.format(RFC1123).to_string()),
            |text| NaiveDateTime::parse_from_str(text, RFC1123).map(|naive| naive.and_utc()),
        );
    }

    #[test]
    fn custom_adapter_for_timestamps() {
        let lease = Lease {
            mac: MacAddr::new([0x02, 0, 0, 0, 0, 1]),
            expires: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        };

        let codec = Codec::json();
        register_rfc1123(&codec);
        let json = codec.encode_to_string(&lease).unwrap();
        assert_eq!(
            json,
            r#"{"mac":"02:00:00:00:00:01","expires":"Fri, 01 Mar 2024 12:30:00 GMT"}"#
        );
        let mut decoded = Lease::default();
        codec.decode(json.as_bytes(), &mut decoded).unwrap();
        assert_eq!(decoded, lease);

        let codec = Codec::new();
        register_rfc1123(&codec);
        let yaml = codec.encode_to_string(&lease).unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(doc["expires"], "Fri, 01 Mar 2024 12:30:00 GMT");
        assert_eq!(doc["mac"], "02:00:00:00:00:01");
        let mut decoded = Lease::default();
        codec.decode(yaml.as_bytes(), &mut decoded).unwrap();
        assert_eq!(decoded, lease);
    }

    #[test]
    fn yaml_adapters_see_scalars_as_written() {
        let codec = Codec::new();
        codec.register_adapter::<Raw, _, _, _, _>(
            |raw| Ok::<_, Infallible>(raw.0.clone()),
            |text| Ok::<_, Infallible>(Raw(text.into())),
        );

        let mut doc = Versions::default();
        codec.decode(b"a: 0x1F\nb: 007\nc: 1.10\n", &mut doc).unwrap();
        assert_eq!(
            doc,
            Versions {
                a: Raw("0x1F".into()),
                b: Raw("007".into()),
                c: Raw("1.10".into()),
            }
        );

        codec.decode(b"a: ~\nb: 'true'\n", &mut doc).unwrap();
        assert_eq!(doc.a, Raw::default());
        assert_eq!(doc.b, Raw("true".into()));
        assert_eq!(doc.c, Raw("1.10".into()));
    }

    #[test]
    fn yaml_round_trip() {
        let codec = Codec::new();
        let original = switch();

        let text = codec.encode_to_string(&original).unwrap();
        assert!(text.starts_with("name: core\n"));

        let mut decoded = Switch::default();
        codec.decode(text.as_bytes(), &mut decoded).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn decode_reuses_boxed_payload() {
        let codec = Codec::new();
        let mut value = switch();
        let before: *const Port = &**value.uplink.as_ref().unwrap();

        codec.decode(b"uplink:\n  speed: 10\n", &mut value).unwrap();

        let uplink = value.uplink.as_ref().unwrap();
        assert!(core::ptr::eq(before, &**uplink));
        assert_eq!(uplink.speed, 10);
        assert_eq!(uplink.name, "xe-0");
    }

    #[test]
    fn decode_never_shrinks_lists() {
        let codec = Codec::json();
        let mut value = switch();

        codec
            .decode(br#"{"ports": [{"name": "ge-7"}], "vlans": {"voice": 30}}"#, &mut value)
            .unwrap();

        assert_eq!(value.ports.len(), 2);
        assert_eq!(
            value.ports[0],
            Port {
                name: "ge-7".into(),
                ..Port::default()
            }
        );
        assert_eq!(value.ports[1], port("ge-1", 2));
        assert_eq!(value.vlans.len(), 3);
        assert_eq!(value.vlans["voice"], 30);
    }

    #[test]
    fn defaults_leave_only_differences() {
        let codec = Codec::json();
        let defaults = Switch {
            name: "core".into(),
            vlans: BTreeMap::from([("mgmt".into(), 10)]),
            ..Switch::default()
        };
        let value = Switch {
            ports: vec![port("ge-0", 1)],
            ..defaults.clone()
        };

        let diff = codec.encode_with_defaults(&value, &defaults).unwrap();
        assert_eq!(
            diff,
            br#"{"ports":[{"name":"ge-0","mac":"02:00:00:00:00:01","speed":1000}]}"#
        );

        let mut decoded = defaults.clone();
        codec.decode(&diff, &mut decoded).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn equal_to_defaults_is_empty() {
        let codec = Codec::new();
        let value = switch();
        let text = codec.encode_with_defaults(&value, &value.clone()).unwrap();
        assert_eq!(text, b"{}\n");
    }

    #[test]
    fn none_and_empty_are_equal_defaults() {
        let codec = Codec::json();
        let value = Switch {
            trunks: Some(Vec::new()),
            ..Switch::default()
        };
        let diff = codec.encode_with_defaults(&value, &Switch::default()).unwrap();
        assert_eq!(diff, b"{}");
    }

    #[test]
    fn default_nested_struct_is_omitted() {
        let codec = Codec::json();
        let value = Node {
            id: 1,
            ..Node::default()
        };
        let diff = codec.encode_with_defaults(&value, &Node::default()).unwrap();
        assert_eq!(diff, br#"{"id":1}"#);

        let value = Node {
            id: 1,
            port: Port {
                speed: 100,
                ..Port::default()
            },
        };
        let diff = codec.encode_with_defaults(&value, &Node::default()).unwrap();
        assert_eq!(diff, br#"{"id":1,"port":{"speed":100}}"#);
    }

    #[test]
    fn annotated_schemas_are_bounded() {
        let codec = Codec::json();
        for mask in 0..256 {
            codec.encode_with_defaults(&flags(mask), &Flags::default()).unwrap();
        }
        // The first annotated sets plus the one with nothing left out.
        assert_eq!(codec.cache.len(), MAX_ANNOTATED_SHADOWS + 1);

        let diff = codec.encode_with_defaults(&flags(200), &Flags::default()).unwrap();
        assert_eq!(diff, br#"{"d":1,"g":1,"h":1}"#);
        assert_eq!(codec.cache.len(), MAX_ANNOTATED_SHADOWS + 1);
    }

    #[test]
    fn replaced_adapter_takes_effect() {
        let codec = Codec::json();
        let node = Node {
            id: 1,
            port: port("ge-0", 0xab),
        };
        let before = codec.encode_to_string(&node).unwrap();
        assert!(before.contains(r#""mac":"02:00:00:00:00:ab""#));

        codec.register_adapter::<MacAddr, _, _, _, _>(
            |mac| Ok::<_, Infallible>(mac.to_string().replace(':', "-").to_uppercase()),
            |text| text.parse::<MacAddr>(),
        );
        let after = codec.encode_to_string(&node).unwrap();
        assert!(after.contains(r#""mac":"02-00-00-00-00-AB""#));
    }

    #[test]
    fn defaults_of_another_type() {
        let codec = Codec::json();
        let err = codec
            .encode_with_defaults(&switch(), &Port::default())
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::TypeMismatch { candidate, baseline }
                if candidate.ends_with("::Switch") && baseline.ends_with("::Port")
        ));
    }

    #[test]
    fn defaults_of_a_non_struct() {
        let codec = Codec::json();
        let value: Vec<u32> = vec![1, 2];
        let err = codec.encode_with_defaults(&value, &value.clone()).unwrap_err();
        assert!(matches!(err, CodecError::NotAStruct { .. }));
    }

    #[test]
    fn recursive_model_is_rejected() {
        let codec = Codec::json();
        let err = codec.encode(&Tree::default()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::RecursiveType { type_path } if type_path.ends_with("::Tree")
        ));
    }

    #[test]
    fn opaque_without_serde_is_unsupported() {
        let codec = Codec::json();
        let err = codec.encode(&Firmware::default()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Unsupported { type_path } if type_path.ends_with("::Blob")
        ));
    }

    #[test]
    fn failed_decode_leaves_destination() {
        let codec = Codec::json();
        let mut value = switch();
        let err = codec
            .decode(br#"{"name": "edge", "mgmt": "10.0.0.0/40"}"#, &mut value)
            .unwrap_err();

        let CodecError::Adapter { type_path, .. } = err else {
            panic!("expected an adapter error, got {err:?}");
        };
        assert_eq!(type_path, "sc_codec::net::IpNet");
        assert_eq!(value, switch());

        let err = codec.decode(b"{", &mut value).unwrap_err();
        assert!(matches!(err, CodecError::Format(_)));
    }
}
