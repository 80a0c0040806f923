use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectDerive;

/// `TypePath`: `module::Name`, with `<Param, ..>` appended for generic types.
pub(crate) fn impl_trait_type_path(derive: &ReflectDerive) -> TokenStream {
    let ident = derive.ident;
    let info_ = crate::path::info_(&derive.sc_reflect);
    let impls_ = crate::path::impls_(&derive.sc_reflect);
    let (impl_generics, ty_generics, where_clause) = derive.split_generics();
    let (module_path, type_ident) = derive.path_parts();

    let base_path = match &derive.attrs.type_path {
        Some(custom) => quote!(#custom),
        None => quote!(concat!(module_path!(), "::", #type_ident)),
    };

    let (type_path, type_name) = if derive.is_generic() {
        let params: Vec<_> = derive.generics.type_params().map(|p| &p.ident).collect();
        let path_args = params.iter().enumerate().map(|(index, param)| {
            let sep = if index == 0 { "<" } else { ", " };
            quote!(#sep, <#param as #info_::TypePath>::type_path(),)
        });
        let name_args = params.iter().enumerate().map(|(index, param)| {
            let sep = if index == 0 { "<" } else { ", " };
            quote!(#sep, <#param as #info_::TypePath>::type_name(),)
        });
        (
            quote! {
                static CELL: #impls_::GenericTypePathCell = #impls_::GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| #impls_::concat(&[#base_path, #(#path_args)* ">"]))
            },
            quote! {
                static CELL: #impls_::GenericTypePathCell = #impls_::GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| #impls_::concat(&[#type_ident, #(#name_args)* ">"]))
            },
        )
    } else {
        (quote!(#base_path), quote!(#type_ident))
    };

    quote! {
        impl #impl_generics #info_::TypePath for #ident #ty_generics #where_clause {
            fn type_path() -> &'static str {
                #type_path
            }

            fn type_name() -> &'static str {
                #type_name
            }

            #[inline]
            fn type_ident() -> &'static str {
                #type_ident
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                #module_path
            }
        }
    }
}
