//! Default-diff annotation.
//!
//! [`annotate_skips`] compares a value with a baseline of the same type and
//! returns the field paths whose value equals the baseline. Feeding that
//! [`OptOutSet`] to the shadow builder leaves only the differences on the
//! wire.
//!
//! A field counts as equal to its baseline when
//!
//! - both sides are `None`, or one side is `None` and the other an empty
//!   list or map;
//! - both sides are empty lists or maps;
//! - it is a struct (without adapter or serde support) all of whose fields
//!   are equal, the struct is then skipped as a whole;
//! - otherwise [`Reflect::reflect_partial_eq`] says so. A type without an
//!   equality is never equal.
//!
//! Hidden and opted-out fields are always treated as equal.

use sc_reflect::Reflect;
use sc_reflect::info::{StructInfo, TypeInfo};
use sc_reflect::ops::{ReflectRef, Struct};
use sc_reflect::registry::TypeRegistry;

use crate::adapter;
use crate::shadow::{self, FieldPath, OptOutSet};
use crate::transcode::peel;

/// The paths of the fields of `candidate` that equal those of `baseline`.
///
/// Both values must have the same type. The root itself is never part of
/// the result, and neither are non-struct roots' contents.
///
/// ```
/// use sc_codec::annotate::annotate_skips;
/// use sc_reflect::{derive::Reflect, registry::TypeRegistry};
///
/// #[derive(Reflect, Default)]
/// struct Limits {
///     pub retries: u32,
///     pub hosts: Vec<String>,
///     pub proxy: Option<String>,
/// }
///
/// let registry = TypeRegistry::new();
/// let baseline = Limits::default();
/// let value = Limits { retries: 5, ..Limits::default() };
///
/// let skips = annotate_skips(&registry, &value, &baseline);
/// assert!(!skips.contains(&["retries"]));
/// assert!(skips.contains(&["hosts"]));
/// assert!(skips.contains(&["proxy"]));
/// ```
pub fn annotate_skips(
    registry: &TypeRegistry,
    candidate: &dyn Reflect,
    baseline: &dyn Reflect,
) -> OptOutSet {
    let mut annotator = Annotator {
        registry,
        skips: OptOutSet::new(),
        path: FieldPath::new(),
    };

    let candidate = peel(candidate);
    let baseline = peel(baseline);
    if candidate.ty_id() == baseline.ty_id()
        && let TypeInfo::Struct(info) = candidate.reflect_type_info()
        && let (ReflectRef::Struct(c), ReflectRef::Struct(b)) =
            (candidate.reflect_ref(), baseline.reflect_ref())
    {
        annotator.visit_struct(info, c, b);
    }
    annotator.skips
}

struct Annotator<'a> {
    registry: &'a TypeRegistry,
    skips: OptOutSet,
    path: FieldPath,
}

impl Annotator<'_> {
    /// Records the equal fields, returns `true` if all of them are equal.
    fn visit_struct(&mut self, info: &StructInfo, candidate: &dyn Struct, baseline: &dyn Struct) -> bool {
        let mut all_equal = true;
        for (index, field) in info.iter().enumerate() {
            if !field.is_visible() || field.is_skip_serde() {
                continue;
            }
            let (Some(c), Some(b)) = (candidate.field_at(index), baseline.field_at(index)) else {
                all_equal = false;
                continue;
            };

            self.path.push(field.name());
            if self.is_equal(field.type_info(), c, b) {
                self.skips.remove_below(&self.path);
                self.skips.insert(self.path.clone());
            } else {
                all_equal = false;
            }
            self.path.pop();
        }
        all_equal
    }

    fn is_equal(&mut self, info: &'static TypeInfo, candidate: &dyn Reflect, baseline: &dyn Reflect) -> bool {
        let info = info.peel_boxed();
        let candidate = peel(candidate);
        let baseline = peel(baseline);

        match (info, candidate.reflect_ref(), baseline.reflect_ref()) {
            (TypeInfo::Nullable(nullable), ReflectRef::Nullable(c), ReflectRef::Nullable(b)) => {
                match (c.get(), b.get()) {
                    (None, None) => true,
                    (Some(present), None) | (None, Some(present)) => is_empty_container(present),
                    (Some(c), Some(b)) => self.is_equal(nullable.inner_info(), c, b),
                }
            }
            (TypeInfo::List(_), ReflectRef::List(c), ReflectRef::List(b)) if c.is_empty() && b.is_empty() => {
                true
            }
            (TypeInfo::Map(_), ReflectRef::Map(c), ReflectRef::Map(b)) if c.is_empty() && b.is_empty() => true,
            (TypeInfo::Struct(info), ReflectRef::Struct(c), ReflectRef::Struct(b))
                if !self.is_leaf(info.ty_id()) =>
            {
                self.visit_struct(info, c, b)
            }
            _ => candidate.reflect_partial_eq(baseline) == Some(true),
        }
    }

    // Structs the shadow keeps whole.
    fn is_leaf(&self, type_id: core::any::TypeId) -> bool {
        adapter::lookup_by_id(self.registry, type_id).is_some() || shadow::has_serde(self.registry, type_id)
    }
}

fn is_empty_container(value: &dyn Reflect) -> bool {
    match peel(value).reflect_ref() {
        ReflectRef::List(list) => list.is_empty(),
        ReflectRef::Map(map) => map.is_empty(),
        _ => false,
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
    use std::collections::HashMap;

    use sc_reflect::derive::Reflect;
    use sc_reflect::registry::TypeRegistry;

    use super::annotate_skips;
    use crate::net::{self, MacAddr};

    #[derive(Reflect, Default, Clone)]
    struct Timers {
        pub hello: u32,
        pub dead: u32,
    }

    #[derive(Reflect, Default, Clone)]
    struct Area {
        pub id: u32,
        pub timers: Box<Timers>,
        pub neighbors: Option<Vec<MacAddr>>,
        pub costs: HashMap<String, u32>,
        pub router: MacAddr,
        #[reflect(skip_serde)]
        pub scratch: u32,
        generation: u64,
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        net::register_net_adapters(&mut registry);
        registry.register::<Area>();
        registry
    }

    #[test]
    fn equal_values_skip_every_visible_field() {
        let area = Area {
            id: 7,
            scratch: 1,
            generation: 9,
            ..Area::default()
        };
        let skips = annotate_skips(&registry(), &area, &area.clone());

        let paths: Vec<_> = skips.iter().collect();
        assert_eq!(
            paths,
            [
                &["costs"][..],
                &["id"][..],
                &["neighbors"][..],
                &["router"][..],
                &["timers"][..],
            ]
        );
    }

    #[test]
    fn nested_struct_keeps_only_its_differences() {
        let baseline = Area::default();
        let mut area = Area::default();
        area.timers.dead = 40;

        let skips = annotate_skips(&registry(), &area, &baseline);
        assert!(!skips.contains(&["timers"]));
        assert!(skips.contains(&["timers", "hello"]));
        assert!(!skips.contains(&["timers", "dead"]));
    }

    #[test]
    fn none_equals_empty() {
        let baseline = Area::default();
        let area = Area {
            neighbors: Some(Vec::new()),
            ..Area::default()
        };
        assert!(annotate_skips(&registry(), &area, &baseline).contains(&["neighbors"]));

        let area = Area {
            neighbors: Some(vec![MacAddr::default()]),
            ..Area::default()
        };
        assert!(!annotate_skips(&registry(), &area, &baseline).contains(&["neighbors"]));
    }

    #[test]
    fn adapted_structs_compare_whole() {
        let baseline = Area::default();
        let area = Area {
            router: MacAddr::new([0, 0, 0, 0, 0, 1]),
            costs: HashMap::from([("a".into(), 1)]),
            ..Area::default()
        };
        let skips = annotate_skips(&registry(), &area, &baseline);
        assert!(!skips.contains(&["router"]));
        assert!(!skips.contains(&["costs"]));
        assert!(skips.contains(&["id"]));
    }
}
