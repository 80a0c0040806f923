//! String adapters for types a format cannot write natively.
//!
//! An adapter is a pair of functions `encode: &T -> String` and
//! `decode: &str -> T`. It is stored as a [`TypeTraitAdapter`] in the
//! [`TypeMeta`](sc_reflect::registry::TypeMeta) of `T`, so the registry that
//! describes a data model also knows how to adapt its leaves.
//!
//! ```
//! use sc_codec::adapter::{self, Direction};
//! use sc_reflect::info::{TypeIdentity, Typed};
//! use sc_reflect::registry::TypeRegistry;
//! use core::time::Duration;
//!
//! let mut registry = TypeRegistry::new();
//! adapter::register_adapter::<Duration, _, _, _, _>(
//!     &mut registry,
//!     |d| Ok::<_, core::num::ParseIntError>(d.as_secs().to_string()),
//!     |s| s.parse().map(Duration::from_secs),
//! );
//!
//! let original = TypeIdentity::of::<Duration>();
//! assert!(adapter::is_registered(&registry, &original, Direction::Original));
//!
//! let descriptor = adapter::lookup(&registry, &original).unwrap();
//! assert!(adapter::is_registered(&registry, descriptor.adapter(), Direction::Adapter));
//! assert_eq!(descriptor.encode(&Duration::from_secs(90)).unwrap(), "90");
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use log::{debug, warn};
use sc_reflect::Reflect;
use sc_reflect::info::{TypeIdentity, TypePath};
use sc_reflect::registry::{GetTypeMeta, TypeRegistry};

use crate::error::{BoxError, CodecError};

/// Namespace of every generated adapter identity.
pub const ADAPTER_NAMESPACE: &str = "sc_codec::adapter";

type EncodeFn = Arc<dyn Fn(&dyn Reflect) -> Result<String, BoxError> + Send + Sync>;
type DecodeFn = Arc<dyn Fn(&str) -> Result<Box<dyn Reflect>, BoxError> + Send + Sync>;

// -----------------------------------------------------------------------------
// TypeTraitAdapter

/// The adapter descriptor of one original type.
///
/// Immutable once built; registering again replaces the whole descriptor.
#[derive(Clone)]
pub struct TypeTraitAdapter {
    original: TypeIdentity,
    adapter: TypeIdentity,
    type_path: &'static str,
    encode: EncodeFn,
    decode: DecodeFn,
    zero: fn() -> Box<dyn Reflect>,
}

impl TypeTraitAdapter {
    fn new<T, E, D, EE, DE>(encode: E, decode: D) -> Self
    where
        T: Reflect + TypePath + Default,
        E: Fn(&T) -> Result<String, EE> + Send + Sync + 'static,
        D: Fn(&str) -> Result<T, DE> + Send + Sync + 'static,
        EE: Into<BoxError>,
        DE: Into<BoxError>,
    {
        let encode: EncodeFn = Arc::new(move |value: &dyn Reflect| match value.downcast_ref::<T>() {
            Some(value) => encode(value).map_err(Into::into),
            None => panic!(
                "adapter type mismatch: expected `{}`, received `{}`",
                T::type_path(),
                value.reflect_type_path(),
            ),
        });
        let decode: DecodeFn = Arc::new(move |text: &str| match decode(text) {
            Ok(value) => Ok(Box::new(value)),
            Err(err) => Err(err.into()),
        });

        let original = TypeIdentity::of::<T>();
        let adapter = TypeIdentity::new(
            ADAPTER_NAMESPACE,
            alloc::format!("Adapter<{}>", T::type_path()),
        );

        Self {
            original,
            adapter,
            type_path: T::type_path(),
            encode,
            decode,
            zero: || Box::<T>::default(),
        }
    }

    /// Identity of the adapted type.
    #[inline]
    pub fn original(&self) -> &TypeIdentity {
        &self.original
    }

    /// Identity of the generated adapter, `sc_codec::adapter::Adapter<path>`.
    #[inline]
    pub fn adapter(&self) -> &TypeIdentity {
        &self.adapter
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Renders `value` as text.
    ///
    /// # Panics
    ///
    /// If `value` is not of the original type.
    pub fn encode(&self, value: &dyn Reflect) -> Result<String, CodecError> {
        (self.encode)(value).map_err(|source| CodecError::Adapter {
            type_path: self.type_path,
            source,
        })
    }

    /// Parses `text` into a boxed value of the original type.
    pub fn decode(&self, text: &str) -> Result<Box<dyn Reflect>, CodecError> {
        (self.decode)(text).map_err(|source| CodecError::Adapter {
            type_path: self.type_path,
            source,
        })
    }

    /// The zero value of the original type, used for empty adapter leaves.
    #[inline]
    pub fn zero(&self) -> Box<dyn Reflect> {
        (self.zero)()
    }
}

impl fmt::Debug for TypeTraitAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeTraitAdapter")
            .field("original", &self.original)
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Registration

/// Registers `encode`/`decode` as the adapter of `T`.
///
/// `T` and its dependencies are registered first if missing. An existing
/// adapter of `T` is replaced.
pub fn register_adapter<T, E, D, EE, DE>(registry: &mut TypeRegistry, encode: E, decode: D)
where
    T: Reflect + GetTypeMeta + Default,
    E: Fn(&T) -> Result<String, EE> + Send + Sync + 'static,
    D: Fn(&str) -> Result<T, DE> + Send + Sync + 'static,
    EE: Into<BoxError>,
    DE: Into<BoxError>,
{
    let descriptor = TypeTraitAdapter::new::<T, E, D, EE, DE>(encode, decode);

    registry.register::<T>();
    match registry.get_mut(TypeId::of::<T>()) {
        Some(type_meta) => {
            if type_meta.insert_trait(descriptor) {
                warn!("adapter for `{}` replaced", T::type_path());
            } else {
                debug!("adapter for `{}` registered", T::type_path());
            }
        }
        None => unreachable!("`{}` was registered above", T::type_path()),
    }
}

// -----------------------------------------------------------------------------
// Lookup

/// Which side of an adapter descriptor an identity is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The identity of an adapted type.
    Original,
    /// The identity of a generated adapter.
    Adapter,
}

/// Whether a descriptor exists for `identity` on the given side.
pub fn is_registered(registry: &TypeRegistry, identity: &TypeIdentity, direction: Direction) -> bool {
    match direction {
        Direction::Original => lookup(registry, identity).is_some(),
        Direction::Adapter => lookup_adapter(registry, identity).is_some(),
    }
}

/// The descriptor registered for the original type `identity`.
pub fn lookup<'a>(registry: &'a TypeRegistry, identity: &TypeIdentity) -> Option<&'a TypeTraitAdapter> {
    let type_meta = registry.get_with_type_path(&identity.qualified())?;
    let descriptor = type_meta.get_trait::<TypeTraitAdapter>()?;
    (descriptor.original() == identity).then_some(descriptor)
}

/// The descriptor whose generated adapter identity is `identity`.
pub fn lookup_adapter<'a>(
    registry: &'a TypeRegistry,
    identity: &TypeIdentity,
) -> Option<&'a TypeTraitAdapter> {
    if identity.namespace() != ADAPTER_NAMESPACE {
        return None;
    }
    registry
        .iter_with_trait::<TypeTraitAdapter>()
        .map(|(_, descriptor)| descriptor)
        .find(|descriptor| descriptor.adapter() == identity)
}

/// The descriptor of the type with `type_id`, if it has one.
#[inline]
pub(crate) fn lookup_by_id(registry: &TypeRegistry, type_id: TypeId) -> Option<&TypeTraitAdapter> {
    registry.get_type_trait::<TypeTraitAdapter>(type_id)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use core::any::TypeId;
    use core::num::ParseIntError;

    use sc_reflect::derive::Reflect;
    use sc_reflect::info::TypeIdentity;
    use sc_reflect::registry::TypeRegistry;

    use super::{Direction, TypeTraitAdapter, is_registered, lookup, lookup_adapter};
    use crate::error::CodecError;

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    #[reflect(opaque, clone, partial_eq, debug, default)]
    struct Celsius(i32);

    fn register(registry: &mut TypeRegistry, suffix: &'static str) {
        super::register_adapter::<Celsius, _, _, _, _>(
            registry,
            move |c| Ok::<_, ParseIntError>(alloc::format!("{}{suffix}", c.0)),
            |s| s.trim_end_matches('C').parse().map(Celsius),
        );
    }

    #[test]
    fn register_adds_type_and_trait() {
        let mut registry = TypeRegistry::empty();
        register(&mut registry, "C");

        assert!(registry.contains(TypeId::of::<Celsius>()));
        let descriptor = registry
            .get_type_trait::<TypeTraitAdapter>(TypeId::of::<Celsius>())
            .unwrap();
        assert_eq!(descriptor.original(), &TypeIdentity::of::<Celsius>());
        assert_eq!(descriptor.adapter().namespace(), "sc_codec::adapter");
        assert_eq!(
            descriptor.adapter().name(),
            "Adapter<sc_codec::adapter::tests::Celsius>"
        );
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = TypeRegistry::empty();
        register(&mut registry, "C");
        register(&mut registry, " degC");

        let descriptor = lookup(&registry, &TypeIdentity::of::<Celsius>()).unwrap();
        assert_eq!(descriptor.encode(&Celsius(21)).unwrap(), "21 degC");
    }

    #[test]
    fn lookup_both_directions() {
        let mut registry = TypeRegistry::new();
        let original = TypeIdentity::of::<Celsius>();
        assert!(!is_registered(&registry, &original, Direction::Original));

        register(&mut registry, "C");
        assert!(is_registered(&registry, &original, Direction::Original));
        assert!(!is_registered(&registry, &original, Direction::Adapter));

        let adapter = lookup(&registry, &original).unwrap().adapter().clone();
        assert!(is_registered(&registry, &adapter, Direction::Adapter));
        assert!(!is_registered(&registry, &adapter, Direction::Original));
        assert_eq!(lookup_adapter(&registry, &adapter).unwrap().original(), &original);

        let string = TypeIdentity::of::<String>();
        assert!(!is_registered(&registry, &string, Direction::Original));
    }

    #[test]
    fn decode_errors_keep_source() {
        let mut registry = TypeRegistry::empty();
        register(&mut registry, "C");
        let descriptor = lookup(&registry, &TypeIdentity::of::<Celsius>()).unwrap();

        let value = descriptor.decode("-4C").unwrap();
        assert_eq!(value.take::<Celsius>().unwrap(), Celsius(-4));

        let err = descriptor.decode("warm").unwrap_err();
        let CodecError::Adapter { type_path, source } = err else {
            panic!("expected an adapter error");
        };
        assert_eq!(type_path, "sc_codec::adapter::tests::Celsius");
        assert!(source.is::<ParseIntError>());
        assert_eq!(source.to_string(), "invalid digit found in string");

        assert!(descriptor.zero().reflect_partial_eq(&Celsius(0)).unwrap());
    }
}
