//! Shadow schemas: the codec-facing mirror of a data model.
//!
//! A [`ShadowType`] has the shape of the [`TypeInfo`] it is built from,
//! except that
//!
//! - types with a registered [adapter](crate::adapter) become
//!   [`ShadowKind::Adapter`] string leaves,
//! - types with registered `serde` support are kept as
//!   [`ShadowKind::Verbatim`] leaves and never looked into,
//! - `Box<T>` disappears, the box is kept by the transcoder,
//! - hidden fields and opted-out fields stay in place but do not take part.
//!
//! Opted-out fields come from `#[reflect(skip_serde)]` or from an
//! [`OptOutSet`] of field paths. Their shadow name gets the
//! [`SKIP_NAMING_PREFIX`].
//!
//! Building a schema is a pure function of the type, the registry contents
//! and the opt-out set. [`ShadowCache`] memoizes it until the registry
//! changes.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use std::sync::{PoisonError, RwLock};

use log::{debug, trace};
use sc_reflect::hash::HashMap;
use sc_reflect::info::{TypeIdentity, TypeInfo};
use sc_reflect::registry::{TypeRegistry, TypeTraitDeserialize, TypeTraitSerialize};

use crate::adapter;
use crate::error::{CodecError, Result};

/// Prefix of the shadow name of an opted-out field.
pub const SKIP_NAMING_PREFIX: &str = "skippedExtField";

// -----------------------------------------------------------------------------
// OptOutSet

/// A path of field names, starting at the root struct.
pub type FieldPath = Vec<&'static str>;

/// Field paths excluded from a shadow schema.
///
/// `Option` and `Box` are transparent to paths. Paths do not reach into
/// list, array or map elements.
///
/// ```
/// use sc_codec::shadow::OptOutSet;
///
/// let mut set = OptOutSet::new();
/// assert!(set.insert(vec!["uplink", "mtu"]));
/// assert!(set.contains(&["uplink", "mtu"]));
/// assert!(!set.contains(&["uplink"]));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptOutSet(BTreeSet<FieldPath>);

impl OptOutSet {
    #[inline]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns `true` if the path was not present.
    #[inline]
    pub fn insert(&mut self, path: FieldPath) -> bool {
        self.0.insert(path)
    }

    #[inline]
    pub fn contains(&self, path: &[&'static str]) -> bool {
        self.0.contains(path)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Removes every path strictly below `prefix`.
    pub fn remove_below(&mut self, prefix: &[&'static str]) {
        self.0
            .retain(|path| !(path.len() > prefix.len() && path.starts_with(prefix)));
    }

    pub fn iter(&self) -> impl Iterator<Item = &[&'static str]> {
        self.0.iter().map(Vec::as_slice)
    }
}

// -----------------------------------------------------------------------------
// ShadowType

/// One node of a shadow schema.
#[derive(Clone, Debug)]
pub struct ShadowType {
    source: &'static TypeInfo,
    kind: ShadowKind,
}

#[derive(Clone, Debug)]
pub enum ShadowKind {
    /// `Option<T>`.
    Nullable(Box<ShadowType>),
    /// A type with a registered adapter, written as a string.
    Adapter {
        original: TypeIdentity,
        adapter: TypeIdentity,
    },
    /// A leaf handed to `serde` as is.
    Verbatim,
    Array { len: usize, item: Box<ShadowType> },
    List { item: Box<ShadowType> },
    Map { key: Box<ShadowType>, value: Box<ShadowType> },
    Struct { fields: Vec<ShadowField> },
}

impl ShadowType {
    /// Type information of the mirrored type. Never `Boxed`.
    #[inline]
    pub fn source(&self) -> &'static TypeInfo {
        self.source
    }

    #[inline]
    pub fn kind(&self) -> &ShadowKind {
        &self.kind
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.source.type_path()
    }

    #[inline]
    pub fn ty_id(&self) -> TypeId {
        self.source.ty_id()
    }

    /// The field at `index` if this is a struct schema.
    pub fn field_at(&self, index: usize) -> Option<&ShadowField> {
        match &self.kind {
            ShadowKind::Struct { fields } => fields.get(index),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// ShadowField

/// How a struct field takes part in the shadow.
#[derive(Clone, Debug)]
pub enum FieldState {
    Visible(ShadowType),
    /// A non-`pub` field.
    Hidden,
    /// A field excluded by `skip_serde` or an [`OptOutSet`].
    OptOut,
}

#[derive(Clone, Debug)]
pub struct ShadowField {
    name: Cow<'static, str>,
    source_name: &'static str,
    index: usize,
    state: FieldState,
}

impl ShadowField {
    /// Shadow name, prefixed with [`SKIP_NAMING_PREFIX`] when opted out.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the field in the source struct, which is also its wire key.
    #[inline]
    pub fn source_name(&self) -> &'static str {
        self.source_name
    }

    /// Index of the field in the source struct.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn state(&self) -> &FieldState {
        &self.state
    }

    /// The schema of the field if it takes part in encoding.
    #[inline]
    pub fn visible(&self) -> Option<&ShadowType> {
        match &self.state {
            FieldState::Visible(ty) => Some(ty),
            FieldState::Hidden | FieldState::OptOut => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Builder

/// Builds the shadow schema of `info`.
///
/// ```
/// use sc_codec::shadow::{self, OptOutSet, ShadowKind};
/// use sc_reflect::{derive::Reflect, info::Typed, registry::TypeRegistry};
///
/// #[derive(Reflect, Default)]
/// struct Link {
///     pub peers: Vec<String>,
///     #[reflect(skip_serde)]
///     pub secret: String,
///     state: u8,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Link>();
///
/// let ty = shadow::build_shadow(&registry, Link::type_info(), &OptOutSet::new()).unwrap();
/// let secret = ty.field_at(1).unwrap();
/// assert_eq!(secret.name(), "skippedExtFieldsecret");
/// assert!(secret.visible().is_none());
///
/// let peers = ty.field_at(0).unwrap().visible().unwrap();
/// assert!(matches!(peers.kind(), ShadowKind::List { .. }));
/// ```
pub fn build_shadow(
    registry: &TypeRegistry,
    info: &'static TypeInfo,
    opt_out: &OptOutSet,
) -> Result<ShadowType> {
    let mut builder = Builder {
        registry,
        opt_out,
        path: Vec::new(),
        stack: Vec::new(),
    };
    builder.build(info, true)
}

/// Whether `type_id` is registered with both `serde` type traits.
pub(crate) fn has_serde(registry: &TypeRegistry, type_id: TypeId) -> bool {
    registry.get(type_id).is_some_and(|type_meta| {
        type_meta.has_trait::<TypeTraitSerialize>() && type_meta.has_trait::<TypeTraitDeserialize>()
    })
}

struct Builder<'a> {
    registry: &'a TypeRegistry,
    opt_out: &'a OptOutSet,
    path: FieldPath,
    // Structs currently being built, outermost first.
    stack: Vec<TypeId>,
}

impl Builder<'_> {
    fn build(&mut self, info: &'static TypeInfo, with_paths: bool) -> Result<ShadowType> {
        let info = info.peel_boxed();

        if let Some(descriptor) = adapter::lookup(self.registry, &info.identity()) {
            return Ok(ShadowType {
                source: info,
                kind: ShadowKind::Adapter {
                    original: descriptor.original().clone(),
                    adapter: descriptor.adapter().clone(),
                },
            });
        }
        if has_serde(self.registry, info.ty_id()) {
            return Ok(ShadowType {
                source: info,
                kind: ShadowKind::Verbatim,
            });
        }

        let kind = match info {
            TypeInfo::Nullable(nullable) => {
                ShadowKind::Nullable(Box::new(self.build(nullable.inner_info(), with_paths)?))
            }
            TypeInfo::Array(array) => ShadowKind::Array {
                len: array.capacity(),
                item: Box::new(self.build(array.item_info(), false)?),
            },
            TypeInfo::List(list) => ShadowKind::List {
                item: Box::new(self.build(list.item_info(), false)?),
            },
            TypeInfo::Map(map) => ShadowKind::Map {
                key: Box::new(self.build(map.key_info(), false)?),
                value: Box::new(self.build(map.value_info(), false)?),
            },
            TypeInfo::Struct(info) => {
                if self.stack.contains(&info.ty_id()) {
                    return Err(CodecError::RecursiveType {
                        type_path: info.type_path(),
                    });
                }
                self.stack.push(info.ty_id());

                let mut fields = Vec::with_capacity(info.field_len());
                for (index, field) in info.iter().enumerate() {
                    if with_paths {
                        self.path.push(field.name());
                    }
                    let opted_out =
                        field.is_skip_serde() || (with_paths && self.opt_out.contains(&self.path));

                    let (name, state) = if !field.is_visible() {
                        (Cow::Borrowed(field.name()), FieldState::Hidden)
                    } else if opted_out {
                        let name = alloc::format!("{SKIP_NAMING_PREFIX}{}", field.name());
                        (Cow::Owned(name), FieldState::OptOut)
                    } else {
                        let ty = self.build(field.type_info(), with_paths)?;
                        (Cow::Borrowed(field.name()), FieldState::Visible(ty))
                    };

                    if with_paths {
                        self.path.pop();
                    }
                    fields.push(ShadowField {
                        name,
                        source_name: field.name(),
                        index,
                        state,
                    });
                }

                self.stack.pop();
                ShadowKind::Struct { fields }
            }
            TypeInfo::Opaque(_) => ShadowKind::Verbatim,
            TypeInfo::Boxed(_) => unreachable!("boxes are peeled above"),
        };

        Ok(ShadowType { source: info, kind })
    }
}

// -----------------------------------------------------------------------------
// ShadowCache

/// Memoized shadow schemas per `(type, opt-out set)`.
///
/// All entries are dropped when the registry
/// [generation](TypeRegistry::generation) moves.
///
/// Schemas with an empty opt-out set are always kept. At most
/// [`MAX_ANNOTATED_SHADOWS`] schemas with a non-empty one are kept, later
/// ones are built per call.
#[derive(Default)]
pub struct ShadowCache {
    state: RwLock<CacheState>,
}

/// Cap on cached schemas with a non-empty [`OptOutSet`].
///
/// Diffing many values against one baseline yields up to one opt-out set
/// per subset of fields.
pub const MAX_ANNOTATED_SHADOWS: usize = 64;

#[derive(Default)]
struct CacheState {
    generation: u64,
    entries: HashMap<(TypeId, OptOutSet), Arc<ShadowType>>,
    annotated: usize,
}

impl CacheState {
    fn reset(&mut self, generation: u64) {
        self.entries.clear();
        self.annotated = 0;
        self.generation = generation;
    }
}

impl ShadowCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached schema or builds it, caching it if there is room.
    pub fn get_or_build(
        &self,
        registry: &TypeRegistry,
        info: &'static TypeInfo,
        opt_out: &OptOutSet,
    ) -> Result<Arc<ShadowType>> {
        let key = (info.ty_id(), opt_out.clone());
        {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if state.generation == registry.generation()
                && let Some(ty) = state.entries.get(&key)
            {
                trace!("shadow cache hit for `{}`", info.type_path());
                return Ok(Arc::clone(ty));
            }
        }

        let ty = Arc::new(build_shadow(registry, info, opt_out)?);
        debug!(
            "derived shadow schema for `{}` with {} opt-out path(s)",
            info.type_path(),
            opt_out.len(),
        );

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.generation != registry.generation() {
            state.reset(registry.generation());
        }
        if opt_out.is_empty() {
            state.entries.insert(key, Arc::clone(&ty));
        } else if state.annotated < MAX_ANNOTATED_SHADOWS
            && state.entries.insert(key, Arc::clone(&ty)).is_none()
        {
            state.annotated += 1;
        }
        Ok(ty)
    }

    pub fn clear(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let generation = state.generation;
        state.reset(generation);
    }

    pub fn len(&self) -> usize {
        self.state.read().unwrap_or_else(PoisonError::into_inner).entries.len()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use std::collections::BTreeMap;

    use sc_reflect::derive::Reflect;
    use sc_reflect::info::Typed;
    use sc_reflect::registry::TypeRegistry;
    use serde::{Deserialize, Serialize};

    use super::{FieldState, OptOutSet, ShadowCache, ShadowKind, build_shadow};
    use crate::error::CodecError;
    use crate::net::{self, MacAddr};

    #[derive(Reflect, Default)]
    struct Uplink {
        pub mac: Option<Box<MacAddr>>,
        pub mtu: u16,
    }

    #[derive(Reflect, Default, Clone, Serialize, Deserialize)]
    #[reflect(serde, default, clone)]
    struct Version {
        pub major: u8,
    }

    #[derive(Reflect, Default)]
    struct Device {
        pub uplink: Option<Uplink>,
        pub macs: [MacAddr; 2],
        pub labels: BTreeMap<String, Vec<MacAddr>>,
        pub version: Version,
        pub note: Box<String>,
        serial: u64,
    }

    #[derive(Reflect, Default)]
    struct Tree {
        pub name: String,
        pub children: Vec<Tree>,
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        net::register_net_adapters(&mut registry);
        registry.register::<Device>();
        registry
    }

    #[test]
    fn mirrors_device() {
        let registry = registry();
        let ty = build_shadow(&registry, Device::type_info(), &OptOutSet::new()).unwrap();

        let ShadowKind::Struct { fields } = ty.kind() else {
            panic!("expected a struct");
        };
        assert_eq!(fields.len(), 6);

        // uplink: Option<Uplink> with Option<Box<MacAddr>> inside.
        let uplink = fields[0].visible().unwrap();
        let ShadowKind::Nullable(inner) = uplink.kind() else {
            panic!("expected a nullable");
        };
        let mac = inner.field_at(0).unwrap().visible().unwrap();
        let ShadowKind::Nullable(mac) = mac.kind() else {
            panic!("expected a nullable");
        };
        assert!(matches!(mac.kind(), ShadowKind::Adapter { .. }));
        assert!(mac.source().type_is::<MacAddr>());

        let macs = fields[1].visible().unwrap();
        assert!(matches!(macs.kind(), ShadowKind::Array { len: 2, .. }));

        let labels = fields[2].visible().unwrap();
        let ShadowKind::Map { key, value } = labels.kind() else {
            panic!("expected a map");
        };
        assert!(matches!(key.kind(), ShadowKind::Verbatim));
        assert!(matches!(value.kind(), ShadowKind::List { .. }));

        assert!(matches!(fields[3].visible().unwrap().kind(), ShadowKind::Verbatim));

        let note = fields[4].visible().unwrap();
        assert!(note.source().type_is::<String>());

        assert!(matches!(fields[5].state(), FieldState::Hidden));
        assert_eq!(fields[5].name(), "serial");
    }

    #[test]
    fn opt_out_paths_see_through_options() {
        let registry = registry();
        let mut opt_out = OptOutSet::new();
        opt_out.insert(vec!["uplink", "mtu"]);
        opt_out.insert(vec!["version"]);

        let ty = build_shadow(&registry, Device::type_info(), &opt_out).unwrap();
        let version = ty.field_at(3).unwrap();
        assert!(matches!(version.state(), FieldState::OptOut));
        assert_eq!(version.name(), "skippedExtFieldversion");
        assert_eq!(version.source_name(), "version");

        let ShadowKind::Nullable(uplink) = ty.field_at(0).unwrap().visible().unwrap().kind() else {
            panic!("expected a nullable");
        };
        assert!(matches!(uplink.field_at(1).unwrap().state(), FieldState::OptOut));
        assert!(uplink.field_at(0).unwrap().visible().is_some());
    }

    #[test]
    fn recursion_is_rejected() {
        let mut registry = TypeRegistry::new();
        registry.register::<Tree>();
        let err = build_shadow(&registry, Tree::type_info(), &OptOutSet::new()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::RecursiveType { type_path } if type_path.ends_with("::Tree")
        ));
    }

    #[test]
    fn cache_follows_registry_generation() {
        let mut registry = registry();
        let cache = ShadowCache::new();
        let empty = OptOutSet::new();

        let first = cache.get_or_build(&registry, Device::type_info(), &empty).unwrap();
        let second = cache.get_or_build(&registry, Device::type_info(), &empty).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let mut opt_out = OptOutSet::new();
        opt_out.insert(vec!["note"]);
        let third = cache.get_or_build(&registry, Device::type_info(), &opt_out).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(cache.len(), 2);

        registry.register::<Tree>();
        let fourth = cache.get_or_build(&registry, Device::type_info(), &empty).unwrap();
        assert!(!Arc::ptr_eq(&first, &fourth));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remove_below_keeps_prefix() {
        let mut set = OptOutSet::new();
        set.insert(vec!["a"]);
        set.insert(vec!["a", "b"]);
        set.insert(vec!["ab"]);
        set.remove_below(&["a"]);
        let paths: Vec<_> = set.iter().collect();
        assert_eq!(paths, [&["a"][..], &["ab"][..]]);
    }
}
