//! openapi-from-handlers - Swagger 2.0 documents from self-describing route handlers.
//!
//! Instead of parsing source or annotating routes, every handler describes its
//! own parameters and responses through the same code path that serves real
//! traffic. At startup the adapter invokes each route's handler once in
//! documenting mode; the handler fills a method description and returns
//! without side effects. The example values it hands over are walked into
//! schemas, with named records collected once per document as definitions.
//!
//! # Architecture
//!
//! 1. [`describe`] - [`Describe`] shapes of types and values (derive with `#[derive(Describe)]`)
//! 2. [`schema_generator`] - Walks shapes into schemas and the [`definitions`] registry
//! 3. [`method`] - Method, parameter and response model with its fluent builder
//! 4. [`capture`] - The live/documenting signal handed to every handler
//! 5. [`adapter`] - Router contract, build pass, axum route table and docs endpoint
//! 6. [`openapi_builder`] - Document assembly
//! 7. [`store`] - Built documents by address and base path
//! 8. [`serializer`] - YAML and JSON output
//!
//! # Example Usage
//!
//! ```
//! use openapi_from_handlers::adapter::router::RouteTable;
//! use openapi_from_handlers::adapter::{build_swagger, HttpMethod, Request};
//! use openapi_from_handlers::capture::Capture;
//! use openapi_from_handlers::openapi_builder::ApiConfig;
//! use openapi_from_handlers::store::DocumentStore;
//! use openapi_from_handlers::Describe;
//!
//! #[derive(Describe, Default)]
//! struct User {
//!     id: u32,
//!     name: String,
//! }
//!
//! fn get_user(request: &Request, mut capture: Capture<'_>) -> String {
//!     if capture.is_documenting() {
//!         capture
//!             .method()
//!             .summary("Get a user")
//!             .path_parameter::<u32>("id", "User id")
//!             .response(200, "The user", &User::default());
//!         return String::new();
//!     }
//!     format!("user {}", request.path_param("id").unwrap_or_default())
//! }
//!
//! let table = RouteTable::new().route("/api/users/{id:[0-9]+}", HttpMethod::Get, get_user);
//! let mut store = DocumentStore::new();
//! let key = build_swagger(&table, ":8080", ApiConfig::new().base_path("/api"), &mut store).unwrap();
//!
//! let document = store.get(&key).unwrap();
//! assert!(document.paths.contains_key("/users/{id}"));
//! assert!(document.definitions.contains("User"));
//!
//! // the same table serves live traffic
//! let app: axum::Router = table.router().unwrap();
//! # drop(app);
//! ```
//!
//! # Command-Line Interface
//!
//! The [`cli`] module prints the document of the bundled [`sample_service`],
//! or serves it with Swagger UI.

extern crate self as openapi_from_handlers;

pub mod adapter;
pub mod capture;
pub mod cli;
pub mod definitions;
pub mod describe;
pub mod error;
pub mod method;
pub mod openapi_builder;
pub mod sample_service;
pub mod schema;
pub mod schema_generator;
pub mod serializer;
pub mod store;

pub use describe::{Describe, EnumShape, Field, ObjectShape, Scalar, Shape};
pub use openapi_from_handlers_derive::Describe;
