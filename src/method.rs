//! One documented endpoint: the [`Method`] model and its fluent builder.

use crate::describe::{Describe, Shape};
use crate::schema::Schema;
use crate::schema_generator::SchemaGenerator;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Description used until a handler sets its own.
pub const DEFAULT_DESCRIPTION: &str = "Unnamed handler";

fn is_false(value: &bool) -> bool {
    !*value
}

/// The location where a parameter is passed in an HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    /// Request body
    Body,
    /// Query string parameter (e.g., `?page=1`)
    Query,
    /// Path parameter embedded in the URL (e.g., `/users/{id}`)
    Path,
    /// HTTP header
    Header,
    /// Cookie
    Cookie,
    /// Multipart form field, used for file uploads
    FormData,
}

/// The shape-plus-metadata unit shared by parameters and responses.
///
/// Until the owning [`Method`] is resolved against a document the descriptor
/// only holds the example shape. Resolution turns it into either inline
/// `type`/`format`/`items` or a nested `schema`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Descriptor {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub description: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    /// Shape still waiting to be walked
    #[serde(skip)]
    example: Option<Shape>,
}

impl Descriptor {
    fn new(name: impl Into<String>, description: impl Into<String>, example: Option<Shape>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            example,
            ..Self::default()
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.example.is_none()
    }

    fn resolve_schema(&mut self, generator: &mut SchemaGenerator<'_>) {
        if let Some(shape) = self.example.take() {
            self.schema = Some(generator.generate_schema(&shape));
        }
    }

    fn resolve_inline(&mut self, generator: &mut SchemaGenerator<'_>) {
        if let Some(shape) = self.example.take() {
            let schema = generator.generate_inline_schema(&shape);
            if self.type_name.is_none() {
                self.type_name = schema.schema_type;
            }
            if self.format.is_none() {
                self.format = schema.format;
            }
            self.items = schema.items;
            self.enum_values = schema.enum_values;
        }
    }
}

/// Swagger Parameter object
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    #[serde(flatten)]
    pub descriptor: Descriptor,
    /// How the parameter is passed: in body, query, path, header, cookie or form
    #[serde(rename = "in")]
    pub location: ParameterLocation,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        location: ParameterLocation,
        required: bool,
        example: Shape,
    ) -> Self {
        let mut descriptor = Descriptor::new(name, description, Some(example));
        descriptor.required = required;
        Self {
            descriptor,
            location,
        }
    }

    /// A required multipart file upload.
    pub fn file(name: impl Into<String>, description: impl Into<String>) -> Self {
        let mut descriptor = Descriptor::new(name, description, None);
        descriptor.type_name = Some("file".to_string());
        descriptor.required = true;
        Self {
            descriptor,
            location: ParameterLocation::FormData,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn is_required(&self) -> bool {
        self.descriptor.required
    }

    /// Walk the example shape: body parameters get a schema, the rest inline types
    pub fn resolve(&mut self, generator: &mut SchemaGenerator<'_>) {
        match self.location {
            ParameterLocation::Body => self.descriptor.resolve_schema(generator),
            _ => self.descriptor.resolve_inline(generator),
        }
    }
}

/// Swagger Response object
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    #[serde(flatten)]
    pub descriptor: Descriptor,
}

impl Response {
    pub fn new(description: impl Into<String>, example: Option<Shape>) -> Self {
        Self {
            descriptor: Descriptor::new("", description, example),
        }
    }

    pub fn file(description: impl Into<String>) -> Self {
        let mut response = Self::new(description, None);
        response.descriptor.schema = Some(Schema::file());
        response
    }

    pub fn description(&self) -> &str {
        &self.descriptor.description
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.descriptor.schema.as_ref()
    }

    pub fn resolve(&mut self, generator: &mut SchemaGenerator<'_>) {
        self.descriptor.resolve_schema(generator);
    }
}

/// Counts how often each status code was documented on one method
#[derive(Debug, Clone, Default)]
pub struct ResponseCodes(HashMap<u16, usize>);

impl ResponseCodes {
    /// Key for the next response with `code`: `"402"`, then `"402(2)"`, `"402(3)"`...
    pub fn next_key(&mut self, code: u16) -> String {
        let count = self.0.entry(code).or_insert(0);
        *count += 1;
        if *count == 1 {
            code.to_string()
        } else {
            format!("{}({})", code, count)
        }
    }
}

/// Swagger Operation object for one HTTP method of a path
#[derive(Debug, Clone, Serialize)]
pub struct Method {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// MIME types the endpoint accepts
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    /// MIME types the endpoint returns
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(rename = "operationId", skip_serializing_if = "String::is_empty")]
    pub operation_id: String,
    /// Parameters in the order they were added
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Responses keyed by (possibly disambiguated) status code
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, Response>,
    #[serde(skip)]
    response_codes: ResponseCodes,
}

impl Default for Method {
    fn default() -> Self {
        Self::new()
    }
}

impl Method {
    pub fn new() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            consumes: Vec::new(),
            produces: Vec::new(),
            summary: String::new(),
            operation_id: String::new(),
            parameters: Vec::new(),
            responses: BTreeMap::new(),
            response_codes: ResponseCodes::default(),
        }
    }

    pub fn add_parameter(&mut self, parameter: Parameter) {
        debug!("Adding {:?} parameter {}", parameter.location, parameter.name());
        self.parameters.push(parameter);
    }

    /// Add a response and return the key it was stored under
    pub fn add_response(&mut self, code: u16, response: Response) -> String {
        let key = self.response_codes.next_key(code);
        debug!("Adding response {}", key);
        self.responses.insert(key.clone(), response);
        key
    }

    /// Walk every example shape into the document's definitions
    pub fn resolve(&mut self, generator: &mut SchemaGenerator<'_>) {
        for parameter in &mut self.parameters {
            parameter.resolve(generator);
        }
        for response in self.responses.values_mut() {
            response.resolve(generator);
        }
    }
}

/// Fluent, order-independent builder for a [`Method`].
///
/// An inert builder (documenting mode not active) accepts every call and
/// does nothing, so handlers can chain without checking first.
#[derive(Debug)]
pub struct MethodBuilder<'m> {
    method: Option<&'m mut Method>,
}

impl<'m> MethodBuilder<'m> {
    pub fn new(method: &'m mut Method) -> Self {
        Self {
            method: Some(method),
        }
    }

    pub fn inert() -> Self {
        Self { method: None }
    }

    pub fn is_active(&self) -> bool {
        self.method.is_some()
    }

    fn apply(mut self, update: impl FnOnce(&mut Method)) -> Self {
        if let Some(method) = self.method.as_deref_mut() {
            update(method);
        }
        self
    }

    /// Set the MIME types the endpoint accepts
    pub fn consumes<I, S>(self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply(|m| m.consumes = mime_types.into_iter().map(Into::into).collect())
    }

    /// Set the MIME types the endpoint returns
    pub fn produces<I, S>(self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply(|m| m.produces = mime_types.into_iter().map(Into::into).collect())
    }

    pub fn description(self, description: impl Into<String>) -> Self {
        self.apply(|m| m.description = description.into())
    }

    pub fn summary(self, summary: impl Into<String>) -> Self {
        self.apply(|m| m.summary = summary.into())
    }

    pub fn operation_id(self, operation_id: impl Into<String>) -> Self {
        self.apply(|m| m.operation_id = operation_id.into())
    }

    /// Add a path parameter of type `T`. Path parameters are always required.
    pub fn path_parameter<T: Describe + ?Sized>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.apply(|m| {
            m.add_parameter(Parameter::new(
                name,
                description,
                ParameterLocation::Path,
                true,
                T::shape(),
            ))
        })
    }

    pub fn query_parameter<T: Describe + ?Sized>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.apply(|m| {
            m.add_parameter(Parameter::new(
                name,
                description,
                ParameterLocation::Query,
                required,
                T::shape(),
            ))
        })
    }

    pub fn header_parameter<T: Describe + ?Sized>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.apply(|m| {
            m.add_parameter(Parameter::new(
                name,
                description,
                ParameterLocation::Header,
                required,
                T::shape(),
            ))
        })
    }

    pub fn cookie_parameter<T: Describe + ?Sized>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.apply(|m| {
            m.add_parameter(Parameter::new(
                name,
                description,
                ParameterLocation::Cookie,
                required,
                T::shape(),
            ))
        })
    }

    /// Add a body parameter described by an example value
    pub fn body_parameter<T: Describe + ?Sized>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        example: &T,
        required: bool,
    ) -> Self {
        self.apply(|m| {
            m.add_parameter(Parameter::new(
                name,
                description,
                ParameterLocation::Body,
                required,
                example.describe(),
            ))
        })
    }

    /// Add a multipart file upload parameter
    pub fn file_parameter(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.apply(|m| m.add_parameter(Parameter::file(name, description)))
    }

    /// Add a response whose body is described by an example value
    pub fn response<T: Describe + ?Sized>(
        self,
        code: u16,
        description: impl Into<String>,
        example: &T,
    ) -> Self {
        self.apply(|m| {
            m.add_response(code, Response::new(description, Some(example.describe())));
        })
    }

    /// Add a response without a body
    pub fn empty_response(self, code: u16, description: impl Into<String>) -> Self {
        self.apply(|m| {
            m.add_response(code, Response::new(description, None));
        })
    }

    /// Add a response returning a file
    pub fn file_response(self, code: u16, description: impl Into<String>) -> Self {
        self.apply(|m| {
            m.add_response(code, Response::file(description));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::DefinitionRegistry;
    use crate::Describe;

    #[derive(Describe, Default)]
    struct TestStruct {
        name: String,
        counter: i64,
    }

    #[test]
    fn test_new_method_defaults() {
        let method = Method::new();
        assert_eq!(method.description, DEFAULT_DESCRIPTION);
        assert!(method.parameters.is_empty());
        assert!(method.responses.is_empty());
    }

    #[test]
    fn test_repeated_response_codes_are_disambiguated() {
        let mut method = Method::new();
        MethodBuilder::new(&mut method)
            .response(402, "a", &TestStruct::default())
            .response(402, "b", &TestStruct::default())
            .empty_response(402, "c");

        let keys: Vec<_> = method.responses.keys().cloned().collect();
        assert_eq!(keys, vec!["402", "402(2)", "402(3)"]);
        assert_eq!(method.responses["402"].description(), "a");
        assert_eq!(method.responses["402(2)"].description(), "b");
        assert_eq!(method.responses["402(3)"].description(), "c");
    }

    #[test]
    fn test_response_codes_counter_is_per_code() {
        let mut codes = ResponseCodes::default();
        assert_eq!(codes.next_key(200), "200");
        assert_eq!(codes.next_key(201), "201");
        assert_eq!(codes.next_key(200), "200(2)");
    }

    #[test]
    fn test_inert_builder_is_a_no_op() {
        let builder = MethodBuilder::inert()
            .consumes(["application/json"])
            .produces(["application/json"])
            .description("ignored")
            .summary("ignored")
            .query_parameter::<String>("q", "ignored", true)
            .body_parameter("body", "ignored", &TestStruct::default(), true)
            .response(200, "ignored", &TestStruct::default())
            .file_response(200, "ignored");
        assert!(!builder.is_active());
    }

    #[test]
    fn test_builder_calls_are_order_independent() {
        let mut first = Method::new();
        MethodBuilder::new(&mut first)
            .summary("s")
            .produces(["text/plain"])
            .description("d");
        let mut second = Method::new();
        MethodBuilder::new(&mut second)
            .description("d")
            .summary("s")
            .produces(["text/plain"]);

        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn test_parameters_keep_insertion_order() {
        let mut method = Method::new();
        MethodBuilder::new(&mut method)
            .query_parameter::<String>("string_id", "Some string ID", true)
            .query_parameter::<i64>("int_id", "Some int ID", false)
            .header_parameter::<str>("Authorization", "Authorization header", true)
            .cookie_parameter::<String>("token-cookie", "token cookie", false)
            .path_parameter::<i16>("id", "Some id");

        let names: Vec<_> = method.parameters.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, vec!["string_id", "int_id", "Authorization", "token-cookie", "id"]);
        assert!(method.parameters[0].is_required());
        assert!(!method.parameters[1].is_required());
        assert_eq!(method.parameters[4].location, ParameterLocation::Path);
        assert!(method.parameters[4].is_required());
    }

    #[test]
    fn test_resolve_walks_examples() {
        let mut method = Method::new();
        MethodBuilder::new(&mut method)
            .query_parameter::<i64>("int_id", "Some int ID", false)
            .body_parameter("some_id", "Some ID", &TestStruct::default(), false)
            .response(200, "Test", &TestStruct::default())
            .response(203, "Array", &Vec::<TestStruct>::new());

        let mut definitions = DefinitionRegistry::new();
        method.resolve(&mut SchemaGenerator::new(&mut definitions));

        let query = &method.parameters[0].descriptor;
        assert!(query.is_resolved());
        assert_eq!(query.type_name.as_deref(), Some("integer"));
        assert_eq!(query.format.as_deref(), Some("int64"));
        assert!(query.schema.is_none());

        let body = &method.parameters[1].descriptor;
        assert_eq!(body.schema, Some(Schema::reference("TestStruct")));

        let array = method.responses["203"].schema().unwrap();
        assert_eq!(array.items.as_deref(), Some(&Schema::reference("TestStruct")));
        assert_eq!(definitions.len(), 1);
    }

    #[test]
    fn test_file_parameter_and_response() {
        let mut method = Method::new();
        MethodBuilder::new(&mut method)
            .file_parameter("upload", "File to store")
            .file_response(200, "Stored file");

        let value = serde_json::to_value(&method).unwrap();
        assert_eq!(
            value["parameters"][0],
            serde_json::json!({
                "name": "upload",
                "description": "File to store",
                "type": "file",
                "required": true,
                "in": "formData"
            })
        );
        assert_eq!(value["responses"]["200"]["schema"]["type"], "file");
    }

    #[test]
    fn test_optional_parameter_omits_required() {
        let mut method = Method::new();
        MethodBuilder::new(&mut method).query_parameter::<String>("q", "Query", false);
        let mut definitions = DefinitionRegistry::new();
        method.resolve(&mut SchemaGenerator::new(&mut definitions));

        let value = serde_json::to_value(&method).unwrap();
        let parameter = &value["parameters"][0];
        assert!(parameter.get("required").is_none());
        assert_eq!(parameter["in"], "query");
        assert_eq!(parameter["type"], "string");
    }
}
