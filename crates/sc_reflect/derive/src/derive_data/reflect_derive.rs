use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Generics, Ident, Type, Visibility};

use crate::derive_data::{FieldAttributes, TypeAttributes};

/// A named field of a reflected struct.
pub(crate) struct ReflectField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub visible: bool,
    pub attrs: FieldAttributes,
}

pub(crate) enum ReflectShape<'a> {
    Struct(Vec<ReflectField<'a>>),
    Opaque,
}

/// Everything the impl generators need to know about the input type.
pub(crate) struct ReflectDerive<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub attrs: TypeAttributes,
    pub shape: ReflectShape<'a>,
    pub sc_reflect: syn::Path,
}

impl<'a> ReflectDerive<'a> {
    pub(crate) fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;

        let shape = match &input.data {
            _ if attrs.opaque.is_some() => ReflectShape::Opaque,
            Data::Struct(data) => match &data.fields {
                Fields::Named(fields) => {
                    let mut res = Vec::with_capacity(fields.named.len());
                    for field in &fields.named {
                        let Some(ident) = field.ident.as_ref() else {
                            continue;
                        };
                        res.push(ReflectField {
                            ident,
                            ty: &field.ty,
                            visible: matches!(field.vis, Visibility::Public(_)),
                            attrs: FieldAttributes::parse_attrs(&field.attrs)?,
                        });
                    }
                    ReflectShape::Struct(res)
                }
                _ => {
                    return Err(syn::Error::new_spanned(
                        &input.ident,
                        "only structs with named fields can be reflected, mark other shapes `#[reflect(opaque)]`",
                    ));
                }
            },
            Data::Enum(_) | Data::Union(_) => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "enums and unions cannot be reflected, mark them `#[reflect(opaque)]`",
                ));
            }
        };

        Ok(Self {
            ident: &input.ident,
            generics: &input.generics,
            attrs,
            shape,
            sc_reflect: crate::path::sc_reflect(),
        })
    }

    pub(crate) fn is_generic(&self) -> bool {
        self.generics.type_params().next().is_some()
    }

    /// `(module_path, type_ident)` expressions without generics.
    pub(crate) fn path_parts(&self) -> (TokenStream, String) {
        match &self.attrs.type_path {
            Some(custom) => {
                let value = custom.value();
                match value.rsplit_once("::") {
                    Some((module, ident)) => (quote!(Some(#module)), ident.to_owned()),
                    None => (quote!(None), value),
                }
            }
            None => (quote!(Some(module_path!())), self.ident.to_string()),
        }
    }

    /// `(impl_generics, ty_generics, where_clause)` with the reflection bounds
    /// added to every type parameter.
    pub(crate) fn split_generics(&self) -> (TokenStream, TokenStream, TokenStream) {
        let sc_reflect = &self.sc_reflect;
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let params = self.generics.type_params().map(|param| &param.ident);
        let predicates = where_clause.map(|clause| {
            let predicates = clause.predicates.iter();
            quote!(#(#predicates,)*)
        });
        let where_tokens = quote! {
            where
                #predicates
                #(
                    #params: #sc_reflect::Reflect
                        + #sc_reflect::info::Typed
                        + #sc_reflect::registry::GetTypeMeta,
                )*
        };

        (quote!(#impl_generics), quote!(#ty_generics), where_tokens)
    }
}
