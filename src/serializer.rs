//! Rendering of built documents, and saving them for the CLI.

use crate::openapi_builder::Document;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Document as YAML
pub fn serialize_yaml(doc: &Document) -> Result<String> {
    debug!("Rendering {} paths as YAML", doc.paths.len());
    serde_yaml::to_string(doc).context("Cannot render document as YAML")
}

/// Document as indented JSON, the form the docs endpoint serves
pub fn serialize_json(doc: &Document) -> Result<String> {
    debug!("Rendering {} paths as JSON", doc.paths.len());
    serde_json::to_string_pretty(doc).context("Cannot render document as JSON")
}

/// Replace `path` with `content`, creating missing parent directories
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Cannot create {}", dir.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Cannot write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::HttpMethod;
    use crate::method::{Method, MethodBuilder};
    use crate::openapi_builder::{ApiConfig, DocumentBuilder, Info};
    use crate::Describe;
    use tempfile::TempDir;

    #[derive(Describe, Default)]
    struct User {
        id: u32,
        name: String,
    }

    fn create_test_document() -> Document {
        let config = ApiConfig::new()
            .base_path("/api")
            .info(Info::new().title("Test API").version("1.0.0").description("A test API"));
        let mut builder = DocumentBuilder::new(config);

        let mut method = Method::new();
        MethodBuilder::new(&mut method)
            .summary("Get user")
            .path_parameter::<u32>("id", "User id")
            .response(200, "The user", &User::default());
        builder.add_method("/users/{id}", HttpMethod::Get, method);
        builder.build()
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&create_test_document()).unwrap();

        assert!(yaml.contains("swagger:"));
        assert!(yaml.contains("title: Test API"));
        assert!(yaml.contains("basePath: /api"));
        assert!(yaml.contains("/users/{id}"));
        assert!(yaml.contains("get:"));
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize_json(&create_test_document()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["swagger"], "2.0");
        assert_eq!(parsed["info"]["title"], "Test API");
        assert_eq!(
            parsed["paths"]["/users/{id}"]["get"]["responses"]["200"]["schema"]["$ref"],
            "#/definitions/User"
        );
        assert_eq!(parsed["definitions"]["User"]["properties"]["id"]["format"], "int32");
    }

    #[test]
    fn test_yaml_and_json_agree() {
        let document = create_test_document();
        let from_yaml: serde_json::Value = serde_yaml::from_str(&serialize_yaml(&document).unwrap()).unwrap();
        let from_json: serde_json::Value = serde_json::from_str(&serialize_json(&document).unwrap()).unwrap();

        pretty_assertions::assert_eq!(from_yaml, from_json);
    }

    #[test]
    fn test_write_to_file_replaces_nested_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("docs").join("v1").join("swagger.json");

        write_to_file("first", &file_path).unwrap();
        write_to_file("second", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "second");
    }

    #[test]
    fn test_write_to_file_reports_the_path() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = write_to_file("x", &blocker.join("swagger.json")).unwrap_err();
        assert!(err.to_string().contains("blocker"));
    }
}
