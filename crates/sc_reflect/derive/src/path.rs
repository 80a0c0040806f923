//! Paths into `sc_reflect` used by generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// The path of `sc_reflect` as seen from the crate invoking the macro.
///
/// Resolving reads the caller's `Cargo.toml`, so it is done once per
/// derive and passed around.
pub(crate) fn sc_reflect() -> syn::Path {
    sc_macro_utils::Manifest::shared(|manifest| manifest.crate_path("sc_reflect"))
}

#[inline(always)]
pub(crate) fn reflect_(sc_reflect: &syn::Path) -> TokenStream {
    quote!(#sc_reflect::Reflect)
}

#[inline(always)]
pub(crate) fn box_(sc_reflect: &syn::Path) -> TokenStream {
    quote!(#sc_reflect::__macro_exports::Box)
}

#[inline(always)]
pub(crate) fn info_(sc_reflect: &syn::Path) -> TokenStream {
    quote!(#sc_reflect::info)
}

#[inline(always)]
pub(crate) fn ops_(sc_reflect: &syn::Path) -> TokenStream {
    quote!(#sc_reflect::ops)
}

#[inline(always)]
pub(crate) fn impls_(sc_reflect: &syn::Path) -> TokenStream {
    quote!(#sc_reflect::impls)
}

#[inline(always)]
pub(crate) fn registry_(sc_reflect: &syn::Path) -> TokenStream {
    quote!(#sc_reflect::registry)
}
