//! `#[derive(Describe)]` expansion.
//!
//! - records: a named object shape whose fields are produced on demand, plus a
//!   value-driven `describe` that follows each field's own `describe`
//! - newtype structs: transparent
//! - unit-only enums: a named string enum

use crate::attrs::{ContainerAttrs, FieldAttrs};
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    parse_quote, Data, DataEnum, DeriveInput, Field, Fields, FieldsNamed, Generics, Ident,
};

pub fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let container = ContainerAttrs::from_attrs(&input.attrs)?;

    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => expand_record(&input, &container, fields),
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                expand_newtype(&input, &fields.unnamed[0])
            }
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                "Describe can only be derived for structs with named fields or newtype structs",
            )),
        },
        Data::Enum(data) => expand_enum(&input, &container, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "Describe cannot be derived for unions",
        )),
    }
}

/// Every type parameter must describe itself too
fn add_bounds(mut generics: Generics) -> Generics {
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::openapi_from_handlers::Describe));
    }
    generics
}

/// Expression producing the definition name. Generic records get one
/// definition per instantiation: `Page_TestStruct`.
fn definition_name(input: &DeriveInput, container: &ContainerAttrs) -> TokenStream {
    let base = container
        .rename
        .clone()
        .unwrap_or_else(|| input.ident.unraw().to_string());
    let params: Vec<&Ident> = input.generics.type_params().map(|p| &p.ident).collect();

    if params.is_empty() {
        return quote!(#base);
    }
    quote! {{
        let mut name = ::std::string::String::from(#base);
        #(
            name.push('_');
            name.push_str(
                &<#params as ::openapi_from_handlers::Describe>::shape().canonical_name(),
            );
        )*
        name
    }}
}

fn expand_record(
    input: &DeriveInput,
    container: &ContainerAttrs,
    fields: &FieldsNamed,
) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let generics = add_bounds(input.generics.clone());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let name = definition_name(input, container);

    let mut static_fields = Vec::new();
    let mut value_fields = Vec::new();
    for field in &fields.named {
        let attrs = FieldAttrs::from_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let member = field.ident.as_ref().ok_or_else(|| {
            syn::Error::new_spanned(field, "named field without an identifier")
        })?;
        let ty = &field.ty;

        let static_shape = quote!(<#ty as ::openapi_from_handlers::Describe>::shape());
        let value_shape = quote!(::openapi_from_handlers::Describe::describe(&self.#member));
        let modifiers = field_modifiers(&attrs);

        if attrs.flatten {
            static_fields.push(quote!(
                ::openapi_from_handlers::Field::flattened(#static_shape)#modifiers
            ));
            value_fields.push(quote!(
                ::openapi_from_handlers::Field::flattened(#value_shape)#modifiers
            ));
        } else {
            let property = property_name(field, &attrs, container);
            static_fields.push(quote!(
                ::openapi_from_handlers::Field::new(#property, #static_shape)#modifiers
            ));
            value_fields.push(quote!(
                ::openapi_from_handlers::Field::new(#property, #value_shape)#modifiers
            ));
        }
    }

    Ok(quote! {
        impl #impl_generics ::openapi_from_handlers::Describe for #ident #ty_generics #where_clause {
            fn shape() -> ::openapi_from_handlers::Shape {
                ::openapi_from_handlers::Shape::Object(
                    ::openapi_from_handlers::ObjectShape::deferred(#name, || {
                        ::std::vec![#(#static_fields),*]
                    }),
                )
            }

            fn describe(&self) -> ::openapi_from_handlers::Shape {
                ::openapi_from_handlers::Shape::Object(
                    ::openapi_from_handlers::ObjectShape::resolved(
                        #name,
                        ::std::vec![#(#value_fields),*],
                    ),
                )
            }
        }
    })
}

fn property_name(field: &Field, attrs: &FieldAttrs, container: &ContainerAttrs) -> String {
    if let Some(rename) = &attrs.rename {
        return rename.clone();
    }
    let name = field
        .ident
        .as_ref()
        .map(|ident| ident.unraw().to_string())
        .unwrap_or_default();
    match container.rename_all {
        Some(rule) => rule.apply_to_field(&name),
        None => name,
    }
}

fn field_modifiers(attrs: &FieldAttrs) -> TokenStream {
    let mut modifiers = TokenStream::new();
    if let Some(kind) = &attrs.kind {
        modifiers.extend(quote!(.with_type(#kind)));
    }
    if let Some(values) = &attrs.values {
        modifiers.extend(quote!(.with_values({
            let values: &[&str] = &[#(#values),*];
            values.iter().copied()
        })));
    }
    if attrs.required {
        modifiers.extend(quote!(.required()));
    }
    if let Some(description) = &attrs.description {
        modifiers.extend(quote!(.with_description(#description)));
    }
    modifiers
}

fn expand_newtype(input: &DeriveInput, field: &Field) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let generics = add_bounds(input.generics.clone());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let ty = &field.ty;

    Ok(quote! {
        impl #impl_generics ::openapi_from_handlers::Describe for #ident #ty_generics #where_clause {
            fn shape() -> ::openapi_from_handlers::Shape {
                <#ty as ::openapi_from_handlers::Describe>::shape()
            }

            fn describe(&self) -> ::openapi_from_handlers::Shape {
                ::openapi_from_handlers::Describe::describe(&self.0)
            }
        }
    })
}

fn expand_enum(
    input: &DeriveInput,
    container: &ContainerAttrs,
    data: &DataEnum,
) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let generics = add_bounds(input.generics.clone());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let name = definition_name(input, container);

    let mut variants = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Describe can only be derived for enums whose variants are all unit variants",
            ));
        }
        let attrs = FieldAttrs::from_attrs(&variant.attrs)?;
        if attrs.skip {
            continue;
        }
        let value = match (&attrs.rename, container.rename_all) {
            (Some(rename), _) => rename.clone(),
            (None, Some(rule)) => rule.apply_to_variant(&variant.ident.unraw().to_string()),
            (None, None) => variant.ident.unraw().to_string(),
        };
        variants.push(value);
    }

    Ok(quote! {
        impl #impl_generics ::openapi_from_handlers::Describe for #ident #ty_generics #where_clause {
            fn shape() -> ::openapi_from_handlers::Shape {
                ::openapi_from_handlers::Shape::Enum(
                    ::openapi_from_handlers::EnumShape::new(#name, {
                        let variants: &[&str] = &[#(#variants),*];
                        variants.iter().copied()
                    }),
                )
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_str(input: DeriveInput) -> String {
        expand(input).unwrap().to_string()
    }

    #[test]
    fn test_record_uses_renamed_properties() {
        let out = expand_str(parse_quote! {
            #[serde(rename_all = "camelCase")]
            struct Sample {
                interface_field: String,
                #[serde(skip)]
                hidden: i32,
                #[swagger(rename = "count")]
                counter: i64,
            }
        });

        assert!(out.contains("\"interfaceField\""));
        assert!(out.contains("\"count\""));
        assert!(!out.contains("hidden"));
    }

    #[test]
    fn test_generic_record_names_instantiation() {
        let out = expand_str(parse_quote! {
            struct Page<T> { items: Vec<T> }
        });
        assert!(out.contains("canonical_name"));
        assert!(out.contains(":: openapi_from_handlers :: Describe"));
    }

    #[test]
    fn test_unit_enum_values() {
        let out = expand_str(parse_quote! {
            #[serde(rename_all = "snake_case")]
            enum Status { InProgress, #[serde(rename = "gone")] Removed }
        });
        assert!(out.contains("\"in_progress\""));
        assert!(out.contains("\"gone\""));
    }

    #[test]
    fn test_rejects_data_enums() {
        let input: DeriveInput = parse_quote! {
            enum Message { Text(String) }
        };
        assert!(expand(input).is_err());
    }

    #[test]
    fn test_rejects_tuple_structs() {
        let input: DeriveInput = parse_quote! {
            struct Pair(i32, i32);
        };
        assert!(expand(input).is_err());
    }
}
