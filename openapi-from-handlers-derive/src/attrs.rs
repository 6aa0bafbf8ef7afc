//! Reading `#[serde(...)]` and `#[swagger(...)]` attributes.
//!
//! Serde attributes are honoured so a type documents the way it serializes.
//! Swagger attributes are read after serde ones and win on conflict. Serde
//! keys that do not affect the documented shape are skipped.

use crate::case::RenameRule;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Token};

#[derive(Debug, Default)]
pub struct ContainerAttrs {
    /// Definition name override
    pub rename: Option<String>,
    pub rename_all: Option<RenameRule>,
}

#[derive(Debug, Default)]
pub struct FieldAttrs {
    pub rename: Option<String>,
    pub skip: bool,
    pub flatten: bool,
    /// `kind = "..."`: forced Swagger type
    pub kind: Option<String>,
    pub values: Option<Vec<String>>,
    pub required: bool,
    pub description: Option<String>,
}

impl ContainerAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut container = ContainerAttrs::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    if let Some(rule) = serialize_name(&meta)? {
                        container.rename_all = Some(parse_rule(&meta, &rule)?);
                    }
                    Ok(())
                } else {
                    ignore_meta(&meta)
                }
            })?;
        }

        for attr in attrs.iter().filter(|a| a.path().is_ident("swagger")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    container.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported swagger container attribute, expected `rename`"))
                }
            })?;
        }

        Ok(container)
    }
}

impl FieldAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut field = FieldAttrs::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if let Some(name) = serialize_name(&meta)? {
                        field.rename = Some(name);
                    }
                    Ok(())
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    field.skip = true;
                    Ok(())
                } else if meta.path.is_ident("flatten") {
                    field.flatten = true;
                    Ok(())
                } else {
                    ignore_meta(&meta)
                }
            })?;
        }

        for attr in attrs.iter().filter(|a| a.path().is_ident("swagger")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    field.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("skip") {
                    field.skip = true;
                } else if meta.path.is_ident("flatten") {
                    field.flatten = true;
                } else if meta.path.is_ident("kind") {
                    field.kind = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("values") {
                    let values = meta.value()?.parse::<LitStr>()?.value();
                    field.values = Some(
                        values
                            .split(',')
                            .map(str::trim)
                            .filter(|v| !v.is_empty())
                            .map(String::from)
                            .collect(),
                    );
                } else if meta.path.is_ident("required") {
                    field.required = true;
                } else if meta.path.is_ident("description") {
                    field.description = Some(meta.value()?.parse::<LitStr>()?.value());
                } else {
                    return Err(meta.error("unsupported swagger attribute"));
                }
                Ok(())
            })?;
        }

        Ok(field)
    }
}

/// `key = "name"` or `key(serialize = "name", ...)`
fn serialize_name(meta: &ParseNestedMeta) -> syn::Result<Option<String>> {
    if meta.input.peek(Token![=]) {
        return Ok(Some(meta.value()?.parse::<LitStr>()?.value()));
    }

    let mut name = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("serialize") {
            name = Some(inner.value()?.parse::<LitStr>()?.value());
            Ok(())
        } else {
            ignore_meta(&inner)
        }
    })?;
    Ok(name)
}

fn parse_rule(meta: &ParseNestedMeta, rule: &str) -> syn::Result<RenameRule> {
    RenameRule::from_str(rule)
        .ok_or_else(|| meta.error(format!("unknown rename rule `{}`", rule)))
}

/// Consume a serde key this derive has no use for.
fn ignore_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| ignore_meta(&inner))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_serde_field_attributes() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[serde(rename = "mapString", default, skip_serializing_if = "Option::is_none")]),
            parse_quote!(#[serde(with = "custom")]),
        ];
        let field = FieldAttrs::from_attrs(&attrs).unwrap();

        assert_eq!(field.rename.as_deref(), Some("mapString"));
        assert!(!field.skip);
    }

    #[test]
    fn test_serde_rename_serialize_form() {
        let attrs: Vec<Attribute> =
            vec![parse_quote!(#[serde(rename(serialize = "out", deserialize = "in"))])];
        let field = FieldAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(field.rename.as_deref(), Some("out"));
    }

    #[test]
    fn test_swagger_overrides_serde() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[swagger(rename = "b", kind = "string", values = "x, y", required)]),
            parse_quote!(#[serde(rename = "a", skip_serializing)]),
        ];
        let field = FieldAttrs::from_attrs(&attrs).unwrap();

        assert_eq!(field.rename.as_deref(), Some("b"));
        assert_eq!(field.kind.as_deref(), Some("string"));
        assert_eq!(field.values, Some(vec!["x".to_string(), "y".to_string()]));
        assert!(field.required);
        assert!(field.skip);
    }

    #[test]
    fn test_unknown_swagger_attribute_is_an_error() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[swagger(colour = "red")])];
        assert!(FieldAttrs::from_attrs(&attrs).is_err());
    }

    #[test]
    fn test_container_attributes() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[serde(rename_all = "camelCase", deny_unknown_fields)]),
            parse_quote!(#[swagger(rename = "Page")]),
        ];
        let container = ContainerAttrs::from_attrs(&attrs).unwrap();

        assert_eq!(container.rename_all, Some(RenameRule::CamelCase));
        assert_eq!(container.rename.as_deref(), Some("Page"));
    }
}
