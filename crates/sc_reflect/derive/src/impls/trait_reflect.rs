use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use crate::derive_data::{ReflectDerive, ReflectShape};

/// `Reflect`, with `reflect_clone`, `reflect_partial_eq` and `reflect_debug`
/// chosen from the type-level flags.
pub(crate) fn impl_trait_reflect(derive: &ReflectDerive) -> TokenStream {
    let ident = derive.ident;
    let sc_reflect = &derive.sc_reflect;
    let reflect_ = crate::path::reflect_(sc_reflect);
    let box_ = crate::path::box_(sc_reflect);
    let info_ = crate::path::info_(sc_reflect);
    let ops_ = crate::path::ops_(sc_reflect);
    let (impl_generics, ty_generics, where_clause) = derive.split_generics();

    let kind = match &derive.shape {
        ReflectShape::Struct(_) => quote!(Struct),
        ReflectShape::Opaque => quote!(Opaque),
    };

    let clone_tokens = reflect_clone_tokens(derive);
    let partial_eq_tokens = reflect_partial_eq_tokens(derive);
    let debug_tokens = match derive.attrs.debug {
        Some(span) => quote_spanned! { span =>
            #[inline]
            fn reflect_debug(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Debug::fmt(self, f)
            }
        },
        None => TokenStream::new(),
    };

    quote! {
        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            fn set(&mut self, value: #box_<dyn #reflect_>) -> Result<(), #box_<dyn #reflect_>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> #info_::ReflectKind {
                #info_::ReflectKind::#kind
            }

            #[inline]
            fn reflect_ref(&self) -> #ops_::ReflectRef<'_> {
                #ops_::ReflectRef::#kind(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #ops_::ReflectMut<'_> {
                #ops_::ReflectMut::#kind(self)
            }

            #clone_tokens

            #partial_eq_tokens

            #debug_tokens
        }
    }
}

fn reflect_clone_tokens(derive: &ReflectDerive) -> TokenStream {
    let sc_reflect = &derive.sc_reflect;
    let reflect_ = crate::path::reflect_(sc_reflect);
    let box_ = crate::path::box_(sc_reflect);
    let info_ = crate::path::info_(sc_reflect);
    let ops_ = crate::path::ops_(sc_reflect);

    let body = match (&derive.shape, derive.attrs.clone) {
        (_, Some(span)) => quote_spanned! { span =>
            Ok(#box_::new(Clone::clone(self)))
        },
        (ReflectShape::Struct(fields), None) => {
            let idents = fields.iter().map(|field| field.ident);
            let values = fields.iter().map(|field| {
                let ident = field.ident;
                let name = ident.to_string();
                let ty = field.ty;
                quote! {
                    match #reflect_::reflect_clone(&self.#ident)?.take::<#ty>() {
                        Ok(value) => value,
                        Err(_) => {
                            return Err(#ops_::ReflectCloneError::FieldNotCloneable {
                                type_path: <Self as #info_::TypePath>::type_path().into(),
                                field: #name.into(),
                            });
                        }
                    }
                }
            });
            quote! {
                Ok(#box_::new(Self {
                    #(#idents: #values,)*
                }))
            }
        }
        (ReflectShape::Opaque, None) => quote! {
            Err(#ops_::ReflectCloneError::NotSupport {
                type_path: <Self as #info_::TypePath>::type_path().into(),
            })
        },
    };

    quote! {
        fn reflect_clone(&self) -> Result<#box_<dyn #reflect_>, #ops_::ReflectCloneError> {
            #body
        }
    }
}

fn reflect_partial_eq_tokens(derive: &ReflectDerive) -> TokenStream {
    let sc_reflect = &derive.sc_reflect;
    let reflect_ = crate::path::reflect_(sc_reflect);
    let impls_ = crate::path::impls_(sc_reflect);

    let body = match (&derive.shape, derive.attrs.partial_eq) {
        (_, Some(span)) => quote_spanned! { span =>
            match other.downcast_ref::<Self>() {
                Some(other) => Some(PartialEq::eq(self, other)),
                None => Some(false),
            }
        },
        (ReflectShape::Struct(_), None) => quote! {
            #impls_::struct_partial_eq(self, other)
        },
        (ReflectShape::Opaque, None) => return TokenStream::new(),
    };

    quote! {
        fn reflect_partial_eq(&self, other: &dyn #reflect_) -> Option<bool> {
            #body
        }
    }
}
