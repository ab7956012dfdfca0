//! Code generation for the Resolve derive macro.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, Ident};

use crate::parse::FieldRole;

/// One addressable field of the struct being derived.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub ident: Ident,
    pub name: String,
    pub role: FieldRole,
    pub alias: Option<String>,
}

/// Generate the complete `Resolve` impl for a struct.
pub fn generate_resolve_impl(
    struct_name: &Ident,
    generics: &Generics,
    type_name: &str,
    fields: &[FieldSpec],
) -> TokenStream {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let infos = fields.iter().map(generate_field_info);
    let arms = fields.iter().enumerate().map(|(index, field)| {
        let ident = &field.ident;
        let handle = match field.role {
            FieldRole::Scalar => quote! { ::cfgmock::FieldMut::Scalar(&mut self.#ident) },
            FieldRole::Nested | FieldRole::Embedded => {
                quote! { ::cfgmock::FieldMut::Struct(&mut self.#ident) }
            }
        };
        quote! { #index => ::core::option::Option::Some(#handle), }
    });

    quote! {
        impl #impl_generics ::cfgmock::Resolve for #struct_name #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn fields(&self) -> &'static [::cfgmock::FieldInfo] {
                const FIELDS: &[::cfgmock::FieldInfo] = &[
                    #(#infos),*
                ];
                FIELDS
            }

            #[allow(unreachable_patterns)]
            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<::cfgmock::FieldMut<'_>> {
                match index {
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    }
}

/// Generate the `FieldInfo` constructor expression for one field.
fn generate_field_info(field: &FieldSpec) -> TokenStream {
    let name = &field.name;
    let base = match field.role {
        FieldRole::Scalar => quote! { ::cfgmock::FieldInfo::scalar(#name) },
        FieldRole::Nested => quote! { ::cfgmock::FieldInfo::nested(#name) },
        FieldRole::Embedded => quote! { ::cfgmock::FieldInfo::embedded(#name) },
    };

    match &field.alias {
        Some(alias) => quote! { #base.with_alias(#alias) },
        None => base,
    }
}
