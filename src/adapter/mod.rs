//! Adapter contract between a router and the documentation build pass.
//!
//! A router exposes its routes through [`RouteSource`]. [`build_swagger`] walks
//! them, invokes every handler once in documenting mode and registers the
//! resulting document in a [`DocumentStore`].
//!
//! # Supported Routers
//!
//! - **axum**: See [`router::RouteTable`], which registers into an `axum::Router`
//!
//! The documentation endpoint itself lives in [`ui::DocsHandler`].

pub mod router;
pub mod template;
pub mod ui;

pub use template::{convert_path_template, PathTemplate};

use crate::capture::Capture;
use crate::error::Result;
use crate::method::Method;
use crate::openapi_builder::{ApiConfig, Document, DocumentBuilder};
use crate::store::{DocKey, DocumentStore};
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::http::{header, request::Parts, HeaderMap, Method as HttpVerb, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::MethodFilter;
use axum::Json;
use log::{debug, info};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;

/// HTTP methods a route can be registered for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    /// HTTP GET method
    #[default]
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP DELETE method
    Delete,
    /// HTTP PATCH method
    Patch,
    /// HTTP OPTIONS method
    Options,
    /// HTTP HEAD method
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Key of the method inside a Swagger path item
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }

    /// axum filter selecting this method
    pub fn filter(&self) -> MethodFilter {
        match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Delete => MethodFilter::DELETE,
            HttpMethod::Patch => MethodFilter::PATCH,
            HttpMethod::Options => MethodFilter::OPTIONS,
            HttpMethod::Head => MethodFilter::HEAD,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A buffered request as handed to a [`Handler`].
///
/// Query strings and JSON bodies go through axum's `Query` and `Json`
/// extractors; path parameters are the ones axum's `Path` matched.
#[derive(Debug)]
pub struct Request {
    parts: Parts,
    path_params: HashMap<String, String>,
    body: Bytes,
}

impl Request {
    pub fn new(request: axum::http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self::from_parts(parts, HashMap::new(), body)
    }

    pub fn from_parts(parts: Parts, path_params: HashMap<String, String>, body: Bytes) -> Self {
        Self {
            parts,
            path_params,
            body,
        }
    }

    /// The request handed to handlers during a dry run
    pub fn empty() -> Self {
        Self::new(axum::http::Request::new(Bytes::new()))
    }

    pub fn with_path_params(mut self, params: HashMap<String, String>) -> Self {
        self.path_params = params;
        self
    }

    pub fn method(&self) -> &HttpVerb {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Deserialize the query string
    pub fn query<T: DeserializeOwned>(&self) -> std::result::Result<T, QueryRejection> {
        Query::<T>::try_from_uri(&self.parts.uri).map(|Query(value)| value)
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, JsonRejection> {
        Json::<T>::from_bytes(&self.body).map(|Json(value)| value)
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// A route handler.
///
/// Every invocation carries a [`Capture`]; see the `capture` module for the
/// documenting protocol. Plain functions with the matching signature are
/// handlers through the blanket impl.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, request: &Request, capture: Capture<'_>) -> Response;

    /// Name used as the default `operationId`
    fn name(&self) -> String {
        short_type_name(std::any::type_name::<Self>()).to_string()
    }
}

impl<F, R> Handler for F
where
    F: Fn(&Request, Capture<'_>) -> R + Send + Sync + 'static,
    R: IntoResponse,
{
    fn call(&self, request: &Request, capture: Capture<'_>) -> Response {
        self(request, capture).into_response()
    }
}

/// `a::b::Type<c::D>` becomes `Type`
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Middleware that keeps the wrapped handler out of the document.
pub struct ExcludeFromDocs<H> {
    inner: H,
}

impl<H: Handler> ExcludeFromDocs<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H: Handler> Handler for ExcludeFromDocs<H> {
    fn call(&self, request: &Request, capture: Capture<'_>) -> Response {
        if capture.is_documenting() {
            return Response::default();
        }
        self.inner.call(request, capture)
    }

    fn name(&self) -> String {
        self.inner.name()
    }
}

/// One registered route as seen by the build pass
pub struct RouteEntry<'r> {
    /// Full path template, e.g. `/api/v1/users/{id}`
    pub path: String,
    pub methods: Vec<HttpMethod>,
    pub handler: &'r dyn Handler,
}

/// A router whose routes can be enumerated.
pub trait RouteSource {
    fn routes(&self) -> Result<Vec<RouteEntry<'_>>>;
}

/// Dry-run `handler` and return the method it described, if any.
///
/// The handler receives an empty request and its response is dropped. A
/// handler that described itself without an `operationId` gets its own name.
pub fn capture_method(handler: &dyn Handler) -> Option<Method> {
    let mut slot = None;
    drop(handler.call(&Request::empty(), Capture::documenting(&mut slot)));
    slot.map(|mut method| {
        if method.operation_id.is_empty() {
            method.operation_id = handler.name();
        }
        method
    })
}

/// Path relative to `base_path`, or `None` when the route lies outside it.
///
/// Matching is on whole segments: `/api/v10` is not under `/api/v1`.
pub fn strip_base_path<'p>(path: &'p str, base_path: &str) -> Option<&'p str> {
    let base = base_path.trim_end_matches('/');
    if base.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(base)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Join two path pieces with exactly one `/` between them
pub fn join_paths(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        return path.to_string();
    }

    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        prefix.to_string()
    } else {
        format!("{}/{}", prefix, path)
    }
}

/// Walk `source` and build the document covering `config.base_path`.
///
/// A malformed route template or a failing route source aborts the build.
pub fn build_document(source: &dyn RouteSource, config: ApiConfig) -> Result<Document> {
    let mut builder = DocumentBuilder::new(config);

    for route in source.routes()? {
        let template = convert_path_template(&route.path)?;
        let relative = match strip_base_path(&template, builder.base_path()) {
            Some(relative) => relative,
            None => {
                debug!("Skipping {} outside {}", template, builder.base_path());
                continue;
            }
        };
        let path = if relative.is_empty() { "/" } else { relative };

        for http_method in &route.methods {
            match capture_method(route.handler) {
                Some(method) => builder.add_method(path, *http_method, method),
                None => debug!("{} {} is not documented", http_method, template),
            }
        }
    }

    Ok(builder.build())
}

/// Build the document for `config.base_path` and register it under
/// `address` + base path. Nothing is registered when the build fails.
pub fn build_swagger(
    source: &dyn RouteSource,
    address: &str,
    config: ApiConfig,
    store: &mut DocumentStore,
) -> Result<DocKey> {
    let key = DocKey::new(address, config.base_path.clone());
    info!("Building swagger for {}", key);

    let document = build_document(source, config)?;
    store.register(key.clone(), document)?;
    Ok(key)
}
