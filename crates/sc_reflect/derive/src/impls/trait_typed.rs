use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{ReflectDerive, ReflectShape};

/// `Typed`: a `StructInfo` listing every named field, or an `OpaqueInfo`.
pub(crate) fn impl_trait_typed(derive: &ReflectDerive) -> TokenStream {
    let ident = derive.ident;
    let info_ = crate::path::info_(&derive.sc_reflect);
    let impls_ = crate::path::impls_(&derive.sc_reflect);
    let (impl_generics, ty_generics, where_clause) = derive.split_generics();

    let info_tokens = match &derive.shape {
        ReflectShape::Struct(fields) => {
            let fields = fields.iter().map(|field| {
                let name = field.ident.to_string();
                let ty = field.ty;
                let visible = field.visible;
                let skip_serde = field.attrs.skip_serde;
                quote! {
                    #info_::NamedField::new::<#ty>(#name)
                        .with_visible(#visible)
                        .with_skip_serde(#skip_serde)
                }
            });
            quote! {
                #info_::TypeInfo::Struct(#info_::StructInfo::new::<Self>(&[#(#fields),*]))
            }
        }
        ReflectShape::Opaque => quote! {
            #info_::TypeInfo::Opaque(#info_::OpaqueInfo::new::<Self>())
        },
    };

    let body = if derive.is_generic() {
        quote! {
            static CELL: #impls_::GenericTypeInfoCell = #impls_::GenericTypeInfoCell::new();
            CELL.get_or_insert::<Self>(|| #info_tokens)
        }
    } else {
        quote! {
            static CELL: #impls_::NonGenericTypeInfoCell = #impls_::NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| #info_tokens)
        }
    };

    quote! {
        impl #impl_generics #info_::Typed for #ident #ty_generics #where_clause {
            fn type_info() -> &'static #info_::TypeInfo {
                #body
            }
        }
    }
}
