//! Attribute parsing for the Resolve derive macro.
//!
//! Handles `#[resolve(...)]` on fields and structs, plus the `rename` key of
//! `#[serde(...)]` which doubles as a field alias.

use syn::{
    punctuated::Punctuated, Attribute, Error, Expr, ExprLit, Lit, LitStr, Meta, Result, Token,
};

/// How a field takes part in path resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldRole {
    #[default]
    Scalar,
    Nested,
    Embedded,
}

impl FieldRole {
    /// Attribute keyword for this role.
    pub fn name(self) -> &'static str {
        match self {
            FieldRole::Scalar => "scalar",
            FieldRole::Nested => "nested",
            FieldRole::Embedded => "embed",
        }
    }
}

/// Parsed attributes of one field.
#[derive(Debug, Clone, Default)]
pub struct FieldAttrs {
    pub role: FieldRole,
    pub alias: Option<String>,
    pub skip: bool,
}

/// Parsed struct-level attributes.
#[derive(Debug, Clone, Default)]
pub struct StructAttrs {
    pub rename: Option<String>,
}

/// Check if an attribute is a `#[resolve(...)]` attribute.
pub fn is_resolve_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("resolve")
}

/// Check if an attribute is a `#[serde(...)]` attribute.
pub fn is_serde_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("serde")
}

/// Parse every `#[resolve(...)]` and `#[serde(rename)]` on a field.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();
    let mut role_set: Option<FieldRole> = None;
    let mut serde_alias = None;

    for attr in attrs {
        if is_serde_attr(attr) {
            if let Some(rename) = parse_serde_rename(attr)? {
                serde_alias = Some(rename);
            }
            continue;
        }
        if !is_resolve_attr(attr) {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let role = if meta.path.is_ident("nested") {
                Some(FieldRole::Nested)
            } else if meta.path.is_ident("embed") {
                Some(FieldRole::Embedded)
            } else {
                None
            };

            if let Some(role) = role {
                if let Some(previous) = role_set {
                    return Err(meta.error(format!(
                        "'{}' cannot be combined with '{}'",
                        role.name(),
                        previous.name()
                    )));
                }
                role_set = Some(role);
                parsed.role = role;
                return Ok(());
            }

            if meta.path.is_ident("alias") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() || lit.value().contains('.') {
                    return Err(Error::new(
                        lit.span(),
                        "alias must be non-empty and must not contain '.'",
                    ));
                }
                parsed.alias = Some(lit.value());
                return Ok(());
            }

            if meta.path.is_ident("skip") {
                parsed.skip = true;
                return Ok(());
            }

            let name = meta
                .path
                .get_ident()
                .map(|i| i.to_string())
                .unwrap_or_default();
            let hint = match name.as_str() {
                "embedded" | "flatten" | "inline" => "; did you mean 'embed'?",
                "nest" | "struct" => "; did you mean 'nested'?",
                "rename" | "name" => "; did you mean 'alias'?",
                _ => "",
            };
            Err(meta.error(format!("unknown resolve attribute '{}'{}", name, hint)))
        })?;
    }

    if parsed.skip && (role_set.is_some() || parsed.alias.is_some()) {
        return Err(Error::new_spanned(
            attrs.iter().find(|a| is_resolve_attr(a)),
            "'skip' cannot be combined with other resolve attributes",
        ));
    }

    if parsed.alias.is_none() {
        parsed.alias = serde_alias;
    }

    Ok(parsed)
}

/// Parse struct-level `#[resolve(rename = "...")]`.
pub fn parse_struct_attrs(attrs: &[Attribute]) -> Result<StructAttrs> {
    let mut parsed = StructAttrs::default();

    for attr in attrs.iter().filter(|a| is_resolve_attr(a)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                parsed.rename = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error(
                    "unknown struct-level resolve attribute; only 'rename' is supported",
                ))
            }
        })?;
    }

    Ok(parsed)
}

/// Pull a plain `rename = "..."` out of a `#[serde(...)]` attribute.
///
/// Anything else serde accepts is ignored.
fn parse_serde_rename(attr: &Attribute) -> Result<Option<String>> {
    let items = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;

    for item in items {
        if let Meta::NameValue(nv) = item {
            if nv.path.is_ident("rename") {
                if let Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) = nv.value
                {
                    return Ok(Some(s.value()));
                }
            }
        }
    }

    Ok(None)
}
