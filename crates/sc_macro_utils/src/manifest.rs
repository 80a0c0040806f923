use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The parsed `Cargo.toml` of the crate currently invoking a proc-macro.
///
/// Generated code has to name workspace crates by a path that resolves from
/// the *caller*, which may depend on `sc_reflect` directly or only on the
/// `sc_core` facade. [`Manifest::crate_path`] picks the right one:
///
/// 1. `name` listed in `[dependencies]`: `::name`.
/// 2. `name` starts with `sc_` and `sc_core` is listed: `::sc_core::<rest>`
///    (e.g. `sc_reflect` -> `::sc_core::reflect`).
/// 3. Steps 1-2 again against `[dev-dependencies]`.
/// 4. Otherwise `::name`.
///
/// Crates that expand their own macros in doc tests should declare
/// `extern crate self as <name>;` so that rule 4 also holds inside the crate.
///
/// ```rust
/// # use sc_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.crate_path("sc_reflect"));
/// ```
#[derive(Debug)]
pub struct Manifest {
    document: Document<Box<str>>,
    modified: SystemTime,
}

const FACADE_NAME: &str = "sc_core";
const CRATE_PREFIX: &str = "sc_";

impl Manifest {
    fn locate() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR is set by cargo for proc-macro expansion");
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(path.exists(), "no Cargo.toml at {}", path.display());
        path
    }

    fn modified_at(path: &Path) -> std::io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }

    fn load(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
        Document::parse(text.into_boxed_str())
            .unwrap_or_else(|e| panic!("cannot parse {}: {e}", path.display()))
    }

    fn parse_path(text: &str) -> syn::Path {
        syn::parse_str(text).unwrap_or_else(|e| panic!("invalid path `{text}`: {e}"))
    }

    fn resolve_in(table: &Table, name: &str) -> Option<syn::Path> {
        if table.contains_key(name) {
            return Some(Self::parse_path(&format!("::{name}")));
        }
        let short = name.strip_prefix(CRATE_PREFIX)?;
        table
            .contains_key(FACADE_NAME)
            .then(|| Self::parse_path(&format!("::{FACADE_NAME}::{short}")))
    }

    /// Resolve the path of crate `name` as seen from the caller.
    pub fn crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .filter_map(|section| match self.document.get(section) {
                Some(Item::Table(table)) => Self::resolve_in(table, name),
                _ => None,
            })
            .next()
            .unwrap_or_else(|| Self::parse_path(&format!("::{name}")))
    }

    /// Run `func` against the caller's manifest.
    ///
    /// Parsed manifests are cached per path and reparsed only when the file's
    /// modification time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static CACHE: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::locate();
        let modified = Self::modified_at(&path).unwrap_or(SystemTime::UNIX_EPOCH);

        {
            let cache = CACHE.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = cache.get(&path)
                && manifest.modified == modified
            {
                return func(manifest);
            }
        }

        let manifest = Manifest {
            document: Self::load(&path),
            modified,
        };
        let result = func(&manifest);
        CACHE
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);
        result
    }
}
