//! Documentation endpoint: the JSON document plus a Swagger UI page.

use crate::error::Error;
use crate::store::{DocumentStore, UiConfig};
use axum::extract::Path;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use log::{debug, error, warn};
use std::sync::Arc;

/// Page loading Swagger UI from a CDN; `{{url}}` points at the JSON document
const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Swagger UI</title>
  <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
  <style>
    html { box-sizing: border-box; overflow-y: scroll; }
    *, *:before, *:after { box-sizing: inherit; }
    body { margin: 0; background: #fafafa; }
  </style>
</head>
<body>
<div id="swagger-ui"></div>
<script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" charset="UTF-8"></script>
<script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js" charset="UTF-8"></script>
<script>
window.onload = function() {
  window.ui = SwaggerUIBundle({
    url: "{{url}}",
    dom_id: '#swagger-ui',
    deepLinking: true,
    presets: [
      SwaggerUIBundle.presets.apis,
      SwaggerUIStandalonePreset
    ],
    plugins: [
      SwaggerUIBundle.plugins.DownloadUrl
    ],
    layout: "StandaloneLayout"
  });
};
</script>
</body>
</html>
"#;

/// Serves `index.html` and `doc.json` below the prefix it is mounted at.
///
/// Registered as plain axum routes, so it never appears in a document.
#[derive(Clone)]
pub struct DocsHandler {
    store: Arc<DocumentStore>,
    config: Arc<UiConfig>,
}

impl DocsHandler {
    pub fn new(store: Arc<DocumentStore>, config: UiConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Routes for `prefix` and every file directly below it.
    ///
    /// `prefix` must end with `/`.
    pub fn router(self, prefix: &str) -> axum::Router {
        let root = self.clone();
        let root_prefix = prefix.to_string();
        let files_prefix = prefix.to_string();

        axum::Router::new()
            .route(
                prefix,
                get(move |headers: HeaderMap| {
                    let response = root.respond(&root_prefix, "", &headers);
                    async move { response }
                }),
            )
            .route(
                &format!("{}{{*file}}", prefix),
                get(move |Path(file): Path<String>, headers: HeaderMap| {
                    let response = self.respond(&files_prefix, &file, &headers);
                    async move { response }
                }),
            )
    }

    /// Response for `file` below `prefix`
    pub fn respond(&self, prefix: &str, file: &str, headers: &HeaderMap) -> Response {
        debug!("Docs request for {:?} below {}", file, prefix);
        match file {
            "index.html" => self.index(prefix, headers),
            doc if doc == self.config.url => self.document(),
            "" => {
                let location = format!("{}index.html", prefix);
                (StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]).into_response()
            }
            _ => not_found(),
        }
    }

    fn index(&self, prefix: &str, headers: &HeaderMap) -> Response {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        let scheme = header("x-forwarded-proto").unwrap_or("http");
        let host = header("host").unwrap_or("localhost");
        let url = format!("{}://{}{}{}", scheme, host, prefix, self.config.url);
        Html(INDEX_TEMPLATE.replace("{{url}}", &url)).into_response()
    }

    fn document(&self) -> Response {
        match self.store.read_doc(&self.config.name) {
            Ok(doc) => ([(CONTENT_TYPE, "application/json")], doc).into_response(),
            Err(Error::DocumentNotFound(key)) => {
                warn!("No document registered for {}", key);
                not_found()
            }
            Err(e) => {
                error!("Failed to read document {}: {}", self.config.name, e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}
