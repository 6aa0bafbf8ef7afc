//! Registry of built documents, keyed by network address and base path.

use crate::error::{Error, Result};
use crate::openapi_builder::Document;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fmt;

/// Identifies one document: the address the service listens on plus the
/// base path the document covers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocKey {
    pub address: String,
    pub base_path: String,
}

impl DocKey {
    pub fn new(address: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            base_path: base_path.into(),
        }
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.address, self.base_path)
    }
}

/// Write-once store of documents.
///
/// Filled mutably during startup, then shared read-only with the
/// documentation endpoints.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: BTreeMap<DocKey, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: DocKey, document: Document) -> Result<()> {
        if self.documents.contains_key(&key) {
            return Err(Error::DuplicateDocument(key.to_string()));
        }
        info!("Registered document {}", key);
        self.documents.insert(key, document);
        Ok(())
    }

    pub fn get(&self, key: &DocKey) -> Option<&Document> {
        self.documents.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &DocKey> {
        self.documents.keys()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The document for `key` as pretty JSON
    pub fn read_doc(&self, key: &DocKey) -> Result<String> {
        debug!("Reading document {}", key);
        let document = self
            .get(key)
            .ok_or_else(|| Error::DocumentNotFound(key.to_string()))?;
        Ok(serde_json::to_string_pretty(document)?)
    }
}

/// What a documentation endpoint serves: the relative URL of the JSON
/// document and the key it is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
    pub url: String,
    pub name: DocKey,
}

impl UiConfig {
    pub fn fill(url: impl Into<String>, name: DocKey) -> Self {
        Self {
            url: url.into(),
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi_builder::{ApiConfig, DocumentBuilder, Info};

    fn document(title: &str) -> Document {
        DocumentBuilder::new(ApiConfig::new().info(Info::new().title(title))).build()
    }

    #[test]
    fn test_key_display() {
        assert_eq!(DocKey::new(":1323", "/api/v1").to_string(), ":1323/api/v1");
    }

    #[test]
    fn test_register_and_read() {
        let mut store = DocumentStore::new();
        let key = DocKey::new(":1323", "/api/v1");
        store.register(key.clone(), document("v1")).unwrap();

        let json: serde_json::Value = serde_json::from_str(&store.read_doc(&key).unwrap()).unwrap();
        assert_eq!(json["info"]["title"], "v1");
        assert_eq!(json["swagger"], "2.0");
    }

    #[test]
    fn test_register_is_write_once() {
        let mut store = DocumentStore::new();
        let key = DocKey::new(":1323", "/api/v1");
        store.register(key.clone(), document("first")).unwrap();

        let err = store.register(key.clone(), document("second")).unwrap_err();
        assert!(matches!(err, Error::DuplicateDocument(ref k) if k == ":1323/api/v1"));
        assert_eq!(store.get(&key).unwrap().info.title, "first");
    }

    #[test]
    fn test_read_unknown_key() {
        let store = DocumentStore::new();
        let err = store.read_doc(&DocKey::new(":1", "/missing")).unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound(_)));
    }

    #[test]
    fn test_keys_are_distinct_per_address() {
        let mut store = DocumentStore::new();
        store.register(DocKey::new(":1323", "/api/v1"), document("a")).unwrap();
        store.register(DocKey::new(":1324", "/api/v1"), document("b")).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ui_config_fill() {
        let config = UiConfig::fill("doc.json", DocKey::new(":1323", "/api/v1"));
        assert_eq!(config.url, "doc.json");
        assert_eq!(config.name.base_path, "/api/v1");
    }
}
