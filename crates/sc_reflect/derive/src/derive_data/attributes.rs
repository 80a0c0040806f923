use proc_macro2::Span;
use syn::{Attribute, LitStr};

use crate::REFLECT_ATTRIBUTE_NAME;

/// Type-level `#[reflect(...)]` options.
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    pub opaque: Option<Span>,
    pub clone: Option<Span>,
    pub partial_eq: Option<Span>,
    pub debug: Option<Span>,
    pub default: Option<Span>,
    pub serde: Option<Span>,
    pub type_path: Option<LitStr>,
}

impl TypeAttributes {
    pub(crate) fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut res = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(REFLECT_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| {
                let span = Some(meta.path.get_ident().map_or_else(Span::call_site, syn::Ident::span));
                let flag = if meta.path.is_ident("opaque") {
                    &mut res.opaque
                } else if meta.path.is_ident("clone") {
                    &mut res.clone
                } else if meta.path.is_ident("partial_eq") {
                    &mut res.partial_eq
                } else if meta.path.is_ident("debug") {
                    &mut res.debug
                } else if meta.path.is_ident("default") {
                    &mut res.default
                } else if meta.path.is_ident("serde") {
                    &mut res.serde
                } else if meta.path.is_ident("type_path") {
                    let lit: LitStr = meta.value()?.parse()?;
                    if lit.value().split("::").any(str::is_empty) {
                        return Err(syn::Error::new(lit.span(), "expected a path like `a::b::Name`"));
                    }
                    res.type_path = Some(lit);
                    return Ok(());
                } else if meta.path.is_ident("skip_serde") {
                    return Err(meta.error("`skip_serde` is a field attribute"));
                } else {
                    return Err(meta.error("unsupported reflect attribute"));
                };
                *flag = span;
                Ok(())
            })?;
        }
        Ok(res)
    }
}

/// Field-level `#[reflect(...)]` options.
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    pub skip_serde: bool,
}

impl FieldAttributes {
    pub(crate) fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut res = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(REFLECT_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip_serde") {
                    res.skip_serde = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported reflect field attribute"))
                }
            })?;
        }
        Ok(res)
    }
}
