//! Route table backed by axum.
//!
//! Routes are collected first so the documentation pass can enumerate them,
//! then registered into an `axum::Router`. Path matching, method dispatch
//! and percent-decoding are axum's; route constraints such as
//! `{id:[0-9]+}` are checked against the matched parameters before the
//! handler runs.

use super::template::PathTemplate;
use super::ui::DocsHandler;
use super::{join_paths, Handler, HttpMethod, Request, RouteEntry, RouteSource};
use crate::capture::Capture;
use crate::error::Result;
use crate::store::{DocKey, DocumentStore, UiConfig};
use axum::body::to_bytes;
use axum::extract::{FromRequestParts, Path};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::MethodRouter;
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Largest request body handed to a handler
const BODY_LIMIT: usize = 2 * 1024 * 1024;

struct Route {
    path: String,
    methods: Vec<HttpMethod>,
    handler: Arc<dyn Handler>,
}

struct DocsMount {
    prefix: String,
    handler: DocsHandler,
}

/// What a registered axum route needs at request time
struct LiveRoute {
    template: PathTemplate,
    handler: Arc<dyn Handler>,
}

/// Routes that can be enumerated for the documentation build pass and
/// turned into an `axum::Router` for serving.
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    docs: Vec<DocsMount>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `path` and a single method
    pub fn route(self, path: &str, method: HttpMethod, handler: impl Handler) -> Self {
        self.route_methods(path, &[method], handler)
    }

    /// Register one handler for several methods of `path`
    pub fn route_methods(mut self, path: &str, methods: &[HttpMethod], handler: impl Handler) -> Self {
        debug!("Registering {:?} {}", methods, path);
        self.routes.push(Route {
            path: path.to_string(),
            methods: methods.to_vec(),
            handler: Arc::new(handler),
        });
        self
    }

    /// Move every route and documentation endpoint of `table` below `prefix`
    pub fn nest(mut self, prefix: &str, table: RouteTable) -> Self {
        for route in table.routes {
            self.routes.push(Route {
                path: join_paths(prefix, &route.path),
                ..route
            });
        }
        for mount in table.docs {
            self.docs.push(DocsMount {
                prefix: join_prefix(prefix, &mount.prefix),
                ..mount
            });
        }
        self
    }

    /// Serve the document registered under `key` at `<base path><docs_path>`
    pub fn mount_docs(mut self, store: &Arc<DocumentStore>, key: &DocKey, docs_path: &str) -> Self {
        let prefix = join_prefix(&key.base_path, docs_path);
        debug!("Mounting documentation for {} at {}", key, prefix);
        self.docs.push(DocsMount {
            prefix,
            handler: DocsHandler::new(Arc::clone(store), UiConfig::fill("doc.json", key.clone())),
        });
        self
    }

    /// Register every route into an `axum::Router`.
    ///
    /// Fails on a malformed route template. When one path and method is
    /// registered twice the later handler serves it.
    pub fn router(&self) -> Result<axum::Router> {
        let mut by_path: BTreeMap<String, BTreeMap<HttpMethod, Arc<LiveRoute>>> = BTreeMap::new();
        for route in &self.routes {
            let template = PathTemplate::parse(&route.path)?;
            let live = Arc::new(LiveRoute {
                template: template.clone(),
                handler: Arc::clone(&route.handler),
            });
            let methods = by_path.entry(template.path().to_string()).or_default();
            for method in &route.methods {
                if methods.insert(*method, Arc::clone(&live)).is_some() {
                    debug!("{} {} registered twice, keeping the later handler", method, route.path);
                }
            }
        }

        let mut router = axum::Router::new();
        for (path, methods) in by_path {
            let mut method_router: MethodRouter = MethodRouter::new();
            for (method, live) in methods {
                method_router = method_router.on(method.filter(), move |request: axum::extract::Request| {
                    serve(Arc::clone(&live), request)
                });
            }
            router = router.route(&path, method_router);
        }

        for mount in &self.docs {
            router = router.merge(mount.handler.clone().router(&mount.prefix));
        }
        Ok(router)
    }
}

impl RouteSource for RouteTable {
    fn routes(&self) -> Result<Vec<RouteEntry<'_>>> {
        Ok(self
            .routes
            .iter()
            .map(|route| RouteEntry {
                path: route.path.clone(),
                methods: route.methods.clone(),
                handler: route.handler.as_ref(),
            })
            .collect())
    }
}

async fn serve(route: Arc<LiveRoute>, request: axum::extract::Request) -> Response {
    let (mut parts, body) = request.into_parts();

    let params = if route.template.has_parameters() {
        match Path::<HashMap<String, String>>::from_request_parts(&mut parts, &()).await {
            Ok(Path(params)) => params,
            Err(rejection) => return rejection.into_response(),
        }
    } else {
        HashMap::new()
    };

    if !route.template.accepts(&params) {
        debug!("{} does not satisfy {}", parts.uri.path(), route.template.path());
        return (StatusCode::NOT_FOUND, "404 page not found").into_response();
    }

    let body = match to_bytes(body, BODY_LIMIT).await {
        Ok(body) => body,
        Err(e) => return (StatusCode::PAYLOAD_TOO_LARGE, e.to_string()).into_response(),
    };

    let request = Request::from_parts(parts, params, body);
    route.handler.call(&request, Capture::live())
}

/// Like [`join_paths`], always ending in the `/` a docs prefix needs
fn join_prefix(prefix: &str, mount: &str) -> String {
    let joined = join_paths(prefix, mount);
    if joined.ends_with('/') {
        joined
    } else {
        format!("{}/", joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi_builder::{ApiConfig, DocumentBuilder};
    use axum::body::Body;
    use http_body_util::BodyExt;
    use std::collections::HashMap;
    use tower::ServiceExt;

    fn echo_id(request: &Request, _capture: Capture<'_>) -> String {
        request.path_param("id").unwrap_or("none").to_string()
    }

    fn echo_query(request: &Request, _capture: Capture<'_>) -> Response {
        match request.query::<HashMap<String, String>>() {
            Ok(query) => query.get("q").cloned().unwrap_or_default().into_response(),
            Err(rejection) => rejection.into_response(),
        }
    }

    fn ok(_request: &Request, _capture: Capture<'_>) -> &'static str {
        "ok"
    }

    fn replaced(_request: &Request, _capture: Capture<'_>) -> &'static str {
        "replaced"
    }

    async fn send(table: &RouteTable, method: &str, uri: &str) -> (StatusCode, String) {
        let request = axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = table.router().unwrap().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_path_params_reach_the_handler() {
        let table = RouteTable::new().route("/items/{id}", HttpMethod::Get, echo_id);
        assert_eq!(send(&table, "GET", "/items/42").await, (StatusCode::OK, "42".to_string()));

        let table = RouteTable::new().route("/items/:id", HttpMethod::Get, echo_id);
        assert_eq!(send(&table, "GET", "/items/7").await.1, "7");
    }

    #[tokio::test]
    async fn test_constraints_are_enforced() {
        let table = RouteTable::new().route("/items/{id:[0-9]+}", HttpMethod::Get, echo_id);

        assert_eq!(send(&table, "GET", "/items/42").await, (StatusCode::OK, "42".to_string()));
        assert_eq!(send(&table, "GET", "/items/abc").await.0, StatusCode::NOT_FOUND);

        let table = RouteTable::new().route("/items/{id:[0-9]{3}}", HttpMethod::Get, echo_id);
        assert_eq!(send(&table, "GET", "/items/123").await.0, StatusCode::OK);
        assert_eq!(send(&table, "GET", "/items/1234").await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_query_and_path_are_percent_decoded() {
        let table = RouteTable::new()
            .route("/search", HttpMethod::Get, echo_query)
            .route("/items/{id}", HttpMethod::Get, echo_id);

        assert_eq!(send(&table, "GET", "/search?q=a%20b%26c").await.1, "a b&c");
        assert_eq!(send(&table, "GET", "/search?q=a+b").await.1, "a b");
        assert_eq!(send(&table, "GET", "/items/x%2Fy").await.1, "x/y");
    }

    #[tokio::test]
    async fn test_not_found_and_not_allowed() {
        let table = RouteTable::new().route("/items", HttpMethod::Get, ok);

        assert_eq!(send(&table, "GET", "/missing").await.0, StatusCode::NOT_FOUND);
        assert_eq!(send(&table, "POST", "/items").await.0, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_same_path_different_methods() {
        let table = RouteTable::new()
            .route("/items", HttpMethod::Get, ok)
            .route("/items", HttpMethod::Post, echo_id);

        assert_eq!(send(&table, "GET", "/items").await.1, "ok");
        assert_eq!(send(&table, "POST", "/items").await.1, "none");
    }

    #[tokio::test]
    async fn test_later_registration_wins() {
        let table = RouteTable::new()
            .route("/items", HttpMethod::Get, ok)
            .route("/items", HttpMethod::Get, replaced);

        assert_eq!(send(&table, "GET", "/items").await.1, "replaced");
        assert_eq!(table.routes().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_nest_prefixes_routes_and_docs() {
        let mut store = DocumentStore::new();
        let key = DocKey::new(":1323", "/v1");
        store
            .register(key.clone(), DocumentBuilder::new(ApiConfig::new()).build())
            .unwrap();
        let store = Arc::new(store);

        let table = RouteTable::new().nest(
            "/api",
            RouteTable::new()
                .route("/items", HttpMethod::Get, ok)
                .mount_docs(&store, &key, "/swagger"),
        );

        let paths: Vec<_> = table.routes().unwrap().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/api/items"]);
        assert_eq!(send(&table, "GET", "/api/items").await.0, StatusCode::OK);
        assert_eq!(send(&table, "GET", "/api/v1/swagger/doc.json").await.0, StatusCode::OK);
    }

    #[test]
    fn test_router_rejects_malformed_templates() {
        let table = RouteTable::new().route("/items/{id", HttpMethod::Get, ok);
        assert!(table.router().is_err());
    }

    #[test]
    fn test_routes_lists_every_method() {
        let table = RouteTable::new().route_methods("/items", &[HttpMethod::Get, HttpMethod::Head], ok);
        let routes = table.routes().unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].methods, vec![HttpMethod::Get, HttpMethod::Head]);
    }

    #[test]
    fn test_join_prefix_ends_with_slash() {
        assert_eq!(join_prefix("/api/v1", "/swagger"), "/api/v1/swagger/");
        assert_eq!(join_prefix("/api/v1/", "swagger/"), "/api/v1/swagger/");
    }
}
