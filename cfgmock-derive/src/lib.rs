//! Derive macro for the cfgmock mock configuration loader.
//!
//! `#[derive(Resolve)]` generates a `cfgmock::Resolve` impl that lets the
//! mock loader address the struct's fields by dotted path.
//!
//! # Basic Usage
//!
//! ```ignore
//! use cfgmock::Resolve;
//!
//! #[derive(Default, Resolve)]
//! struct Config {
//!     #[resolve(alias = "Field1")]
//!     field1: String,
//!     #[resolve(nested)]
//!     database: Database,
//! }
//! ```
//!
//! # Field Attributes
//!
//! - *(none)* - scalar field; its type must implement `cfgmock::Scalar`
//! - `nested` - the field is a struct addressed as `field.child`
//! - `embed` - the field is a transparent struct; its fields are promoted
//!   into this struct and also reachable as `TypeName.child`
//! - `alias = "Name"` - extra name the field answers to
//! - `skip` - the field is not addressable
//!
//! A `#[serde(rename = "...")]` on a field is used as its alias when no
//! `alias` is given.
//!
//! # Struct Attributes
//!
//! - `rename = "Name"` - name used to qualify this struct when embedded
//!   (defaults to the struct's identifier)
//!
//! # Embedding
//!
//! ```ignore
//! #[derive(Default, Resolve)]
//! struct ConfigWithEmbeds {
//!     #[resolve(embed)]
//!     config: Config,
//!     #[resolve(alias = "Field4")]
//!     field4: f64,
//! }
//! ```
//!
//! Both `"Field1"` and `"Config.Field1"` address `config.field1`.

extern crate proc_macro;

mod codegen;
mod derive;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive the `Resolve` trait for a struct with named fields.
#[proc_macro_derive(Resolve, attributes(resolve))]
pub fn derive_resolve(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive::derive_resolve(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
