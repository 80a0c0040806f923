use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};

use crate::derive_data::{ReflectDerive, ReflectShape};

/// `GetTypeMeta`: the flagged type traits, plus every field type as a
/// registry dependency.
pub(crate) fn impl_trait_get_type_meta(derive: &ReflectDerive) -> TokenStream {
    let ident = derive.ident;
    let registry_ = crate::path::registry_(&derive.sc_reflect);
    let (impl_generics, ty_generics, where_clause) = derive.split_generics();

    let mut insert_traits = Vec::new();
    if let Some(span) = derive.attrs.default {
        insert_traits.push(quote_spanned! { span =>
            type_meta.insert_trait::<#registry_::TypeTraitDefault>(
                #registry_::FromType::<Self>::from_type(),
            );
        });
    }
    if let Some(span) = derive.attrs.serde {
        insert_traits.push(quote_spanned! { span =>
            type_meta.insert_trait::<#registry_::TypeTraitSerialize>(
                #registry_::FromType::<Self>::from_type(),
            );
            type_meta.insert_trait::<#registry_::TypeTraitDeserialize>(
                #registry_::FromType::<Self>::from_type(),
            );
        });
    }

    let dependencies = match &derive.shape {
        ReflectShape::Struct(fields) => {
            let types = fields.iter().map(|field| field.ty);
            quote! {
                fn register_dependencies(registry: &mut #registry_::TypeRegistry) {
                    #(registry.register::<#types>();)*
                }
            }
        }
        ReflectShape::Opaque => TokenStream::new(),
    };

    quote! {
        impl #impl_generics #registry_::GetTypeMeta for #ident #ty_generics #where_clause {
            fn get_type_meta() -> #registry_::TypeMeta {
                #[allow(unused_mut)]
                let mut type_meta = #registry_::TypeMeta::of::<Self>();
                #(#insert_traits)*
                type_meta
            }

            #dependencies
        }
    }
}
