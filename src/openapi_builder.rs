use crate::adapter::HttpMethod;
use crate::definitions::DefinitionRegistry;
use crate::method::Method;
use crate::schema_generator::SchemaGenerator;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// Swagger version emitted in every document
pub const SWAGGER_VERSION: &str = "2.0";

/// Methods of one path, keyed by lower-case HTTP method name
pub type Methods = BTreeMap<String, Method>;

/// Swagger Info object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Terms of service URL
    #[serde(rename = "termsOfService", skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    /// API version
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

/// Swagger Contact object
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Swagger License object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct License {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Info {
    pub fn new() -> Self {
        Self {
            title: "Generated API".to_string(),
            description: None,
            terms_of_service: None,
            version: "1.0".to_string(),
            contact: None,
            license: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn terms_of_service(mut self, url: impl Into<String>) -> Self {
        self.terms_of_service = Some(url.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    pub fn license(mut self, license: License) -> Self {
        self.license = Some(license);
        self
    }
}

impl Default for Info {
    fn default() -> Self {
        Self::new()
    }
}

impl Contact {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl License {
    /// Apache 2.0, the license Swagger tooling defaults to
    pub fn new() -> Self {
        Self {
            name: "Apache 2.0".to_string(),
            url: Some("http://www.apache.org/licenses/LICENSE-2.0.html".to_string()),
        }
    }

    pub fn named(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }
}

impl Default for License {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration of one generated document: where the API lives and how it is presented
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Path prefix shared by every documented route
    pub base_path: String,
    pub info: Info,
}

impl ApiConfig {
    pub fn new() -> Self {
        Self {
            base_path: "/".to_string(),
            info: Info::new(),
        }
    }

    pub fn base_path(mut self, base_path: &str) -> Self {
        self.base_path = normalize_base_path(base_path);
        self
    }

    pub fn info(mut self, info: Info) -> Self {
        self.info = info;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `"api/v1/"` and `"/api/v1"` both become `"/api/v1"`; the root stays `"/"`.
pub fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Complete Swagger 2.0 document
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Swagger version
    pub swagger: String,
    /// API info
    pub info: Info,
    #[serde(rename = "basePath")]
    pub base_path: String,
    /// API paths, relative to the base path
    pub paths: BTreeMap<String, Methods>,
    /// Named schemas referenced from the paths
    pub definitions: DefinitionRegistry,
}

impl Document {
    /// Look up the method documented for `path`, by any-case method name
    pub fn method(&self, path: &str, method_name: &str) -> Option<&Method> {
        self.paths
            .get(path)
            .and_then(|methods| methods.get(&method_name.to_lowercase()))
    }
}

/// Swagger document builder
///
/// Collects captured methods, walking their example shapes into the
/// document's definitions as they are added.
#[derive(Debug)]
pub struct DocumentBuilder {
    info: Info,
    base_path: String,
    /// Paths collection (relative path -> methods)
    paths: BTreeMap<String, Methods>,
    definitions: DefinitionRegistry,
}

impl DocumentBuilder {
    pub fn new(config: ApiConfig) -> Self {
        debug!("Initializing DocumentBuilder for {}", config.base_path);
        Self {
            info: config.info,
            base_path: config.base_path,
            paths: BTreeMap::new(),
            definitions: DefinitionRegistry::new(),
        }
    }

    /// Set custom info for the API
    pub fn with_info(mut self, info: Info) -> Self {
        self.info = info;
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Resolve a captured method and install it under `path`.
    ///
    /// A second method for the same path and HTTP method replaces the first.
    pub fn add_method(&mut self, path: &str, http_method: HttpMethod, mut method: Method) {
        debug!("Adding method: {} {}", http_method, path);
        method.resolve(&mut SchemaGenerator::new(&mut self.definitions));

        let previous = self
            .paths
            .entry(path.to_string())
            .or_default()
            .insert(http_method.as_lower().to_string(), method);
        if previous.is_some() {
            debug!("Replaced earlier documentation of {} {}", http_method, path);
        }
    }

    /// Build the final document
    pub fn build(self) -> Document {
        debug!(
            "Building document with {} paths and {} definitions",
            self.paths.len(),
            self.definitions.len()
        );
        Document {
            swagger: SWAGGER_VERSION.to_string(),
            info: self.info,
            base_path: self.base_path,
            paths: self.paths,
            definitions: self.definitions,
        }
    }
}
