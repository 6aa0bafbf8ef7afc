//! `#[derive(Describe)]` for openapi-from-handlers.
//!
//! ```ignore
//! #[derive(Serialize, Describe)]
//! #[serde(rename_all = "camelCase")]
//! pub struct TestStructWithStructField {
//!     pub struct_field: TestStruct,
//!     #[serde(skip)]
//!     pub test_skip: i32,
//!     #[swagger(kind = "string")]
//!     pub test_int_as_string: i32,
//! }
//! ```
//!
//! Serde attributes shape the description the way they shape the JSON;
//! `#[swagger(...)]` adds documentation-only settings (`rename`, `skip`,
//! `flatten`, `kind`, `values`, `required`, `description`) and wins over serde.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attrs;
mod case;
mod expand;

#[proc_macro_derive(Describe, attributes(swagger, serde))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
