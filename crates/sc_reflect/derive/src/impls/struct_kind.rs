use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{ReflectDerive, ReflectField};

/// `Struct`: field access by name and by declaration index.
pub(crate) fn impl_trait_struct(derive: &ReflectDerive, fields: &[ReflectField]) -> TokenStream {
    let ident = derive.ident;
    let sc_reflect = &derive.sc_reflect;
    let reflect_ = crate::path::reflect_(sc_reflect);
    let ops_ = crate::path::ops_(sc_reflect);
    let (impl_generics, ty_generics, where_clause) = derive.split_generics();

    let idents: Vec<_> = fields.iter().map(|field| field.ident).collect();
    let names: Vec<_> = idents.iter().map(|ident| ident.to_string()).collect();
    let indices: Vec<_> = (0..fields.len()).collect();
    let field_len = fields.len();

    quote! {
        impl #impl_generics #ops_::Struct for #ident #ty_generics #where_clause {
            fn field(&self, name: &str) -> Option<&dyn #reflect_> {
                match name {
                    #(#names => Some(&self.#idents),)*
                    _ => None,
                }
            }

            fn field_mut(&mut self, name: &str) -> Option<&mut dyn #reflect_> {
                match name {
                    #(#names => Some(&mut self.#idents),)*
                    _ => None,
                }
            }

            fn field_at(&self, index: usize) -> Option<&dyn #reflect_> {
                match index {
                    #(#indices => Some(&self.#idents),)*
                    _ => None,
                }
            }

            fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn #reflect_> {
                match index {
                    #(#indices => Some(&mut self.#idents),)*
                    _ => None,
                }
            }

            fn name_at(&self, index: usize) -> Option<&'static str> {
                match index {
                    #(#indices => Some(#names),)*
                    _ => None,
                }
            }

            #[inline]
            fn field_len(&self) -> usize {
                #field_len
            }
        }
    }
}
