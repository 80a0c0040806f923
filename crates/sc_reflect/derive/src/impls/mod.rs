// -----------------------------------------------------------------------------
// Modules

mod struct_kind;
mod trait_get_type_meta;
mod trait_reflect;
mod trait_type_path;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{ReflectDerive, ReflectShape};

pub(crate) use struct_kind::impl_trait_struct;
pub(crate) use trait_get_type_meta::impl_trait_get_type_meta;
pub(crate) use trait_reflect::impl_trait_reflect;
pub(crate) use trait_type_path::impl_trait_type_path;
pub(crate) use trait_typed::impl_trait_typed;

/// All impls for the derived type.
pub(crate) fn impl_reflect(derive: &ReflectDerive) -> TokenStream {
    let type_path_tokens = impl_trait_type_path(derive);
    let typed_tokens = impl_trait_typed(derive);
    let reflect_tokens = impl_trait_reflect(derive);
    let get_type_meta_tokens = impl_trait_get_type_meta(derive);
    let struct_tokens = match &derive.shape {
        ReflectShape::Struct(fields) => impl_trait_struct(derive, fields),
        ReflectShape::Opaque => TokenStream::new(),
    };

    quote! {
        #type_path_tokens

        #typed_tokens

        #struct_tokens

        #reflect_tokens

        #get_type_meta_tokens
    }
}
