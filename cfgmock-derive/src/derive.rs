//! Resolve derive implementation.

use proc_macro2::TokenStream;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Error, Fields, Result};

use crate::codegen::{generate_resolve_impl, FieldSpec};
use crate::parse::{parse_field_attrs, parse_struct_attrs};

/// Derive the `Resolve` trait for a struct.
pub fn derive_resolve(input: DeriveInput) -> Result<TokenStream> {
    let data = match &input.data {
        Data::Struct(data) => data,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                &input,
                "Resolve can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                &input,
                "Resolve can only be derived for structs, not unions",
            ));
        }
    };

    let struct_attrs = parse_struct_attrs(&input.attrs)?;

    let fields = match &data.fields {
        Fields::Named(fields) => parse_named_fields(fields)?,
        Fields::Unnamed(_) => {
            return Err(Error::new_spanned(
                &input,
                "Resolve does not support tuple structs; use named fields",
            ));
        }
        Fields::Unit => Vec::new(),
    };

    let type_name = struct_attrs
        .rename
        .unwrap_or_else(|| input.ident.to_string());

    Ok(generate_resolve_impl(
        &input.ident,
        &input.generics,
        &type_name,
        &fields,
    ))
}

fn parse_named_fields(fields: &syn::FieldsNamed) -> Result<Vec<FieldSpec>> {
    let mut result = Vec::new();

    for field in &fields.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "field must have a name"))?;

        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        result.push(FieldSpec {
            name: ident.unraw().to_string(),
            ident,
            role: attrs.role,
            alias: attrs.alias,
        });
    }

    Ok(result)
}
