//! A sample service whose handlers document themselves.
//!
//! Two API versions share one route table. Every handler checks the capture first:
//! in documenting mode it describes itself and returns, otherwise it serves
//! the request.

use crate::adapter::router::RouteTable;
use crate::adapter::{build_swagger, ExcludeFromDocs, Handler, HttpMethod, Request};
use crate::capture::Capture;
use crate::error::Result;
use crate::openapi_builder::{ApiConfig, Contact, Info, License};
use crate::store::{DocKey, DocumentStore};
use crate::Describe;
use chrono::{DateTime, Utc};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Where each API version serves its documentation, below its base path
pub const DOCS_PATH: &str = "/swagger/";

#[derive(Debug, Clone, Default, Serialize, Describe)]
pub struct TestHeader {
    pub header: String,
}

#[derive(Debug, Clone, Default, Serialize, Describe)]
pub struct TestCookie {
    pub cookie: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Describe)]
pub struct TestStruct {
    pub name: String,
    pub counter: i64,
    pub time: DateTime<Utc>,
}

/// A response whose second field can hold anything
#[derive(Debug, Clone, Default, Serialize, Describe)]
#[serde(rename_all = "camelCase")]
pub struct TestStructWithInterfaceField<T> {
    pub str: String,
    pub interface_field: T,
}

#[derive(Debug, Clone, Default, Serialize, Describe)]
#[serde(rename_all = "camelCase")]
pub struct TestStructWithAnyField {
    pub str: String,
    pub interface_field: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Describe)]
pub struct TestStructWithMap {
    #[serde(rename = "mapString")]
    pub test_map: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Describe)]
pub struct TestStructWithSlicePtr {
    #[serde(rename = "slicePtrStruct")]
    pub test_slice_struct: Vec<Box<TestStruct>>,
}

#[derive(Debug, Clone, Default, Serialize, Describe)]
pub struct TestStructWithPtrField {
    #[serde(rename = "ptrStructField")]
    pub struct_field: Option<Box<TestStruct>>,
    #[serde(skip)]
    pub test_skip: Option<i32>,
    pub test_no_rename: Option<i32>,
    #[serde(rename = "mapPtrString")]
    pub test_map_string: HashMap<String, Box<String>>,
    #[serde(rename = "mapPtrStruct")]
    pub test_map_struct: HashMap<String, Box<TestStruct>>,
    #[serde(rename = "slicePtrString")]
    pub test_slice_string: Vec<Box<String>>,
    #[serde(rename = "slicePtrStruct")]
    pub test_slice_struct: Vec<Box<TestStructWithSlicePtr>>,
    pub user_uuid: Option<Uuid>,
    pub expire_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Describe)]
pub struct TestStructWithAnonymousField {
    #[serde(flatten)]
    pub test_struct: TestStruct,
    #[serde(rename = "string1")]
    pub test_string1: String,
}

#[derive(Debug, Clone, Default, Serialize, Describe)]
pub struct TestStructWithAnonymousField2 {
    #[serde(flatten)]
    pub anonymous: TestStructWithAnonymousField,
    #[serde(rename = "string2")]
    pub test_string2: String,
    #[serde(rename = "testStringEnum")]
    #[swagger(values = "testEnum1,testEnum2,testEnum3")]
    pub test_string_enum: String,
}

#[derive(Debug, Clone, Default, Serialize, Describe)]
#[serde(rename_all = "camelCase")]
pub struct TestStructWithStructField {
    pub struct_field: TestStruct,
    #[serde(skip)]
    pub test_skip: i32,
    pub map_string: HashMap<String, String>,
    pub map_interface: HashMap<String, serde_json::Value>,
    #[swagger(kind = "string")]
    pub test_int_as_string: i32,
}

#[derive(Debug, Clone, Default, Serialize, Describe)]
#[serde(rename_all = "camelCase")]
pub struct TestStructWithArray {
    pub array_field: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Describe)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Active,
    Archived,
}

#[derive(Debug, Clone, Default, Serialize, Describe)]
pub struct TestItem {
    #[serde(rename = "Name")]
    pub name: String,
    pub counter: i64,
    pub status: ItemStatus,
}

#[derive(Debug, Clone, Default, Serialize, Describe)]
#[serde(rename_all = "camelCase")]
pub struct TestStructWithArrayOfStructs {
    pub array_field: Vec<TestItem>,
}


#[derive(Debug, Deserialize)]
struct GetQuery {
    string_id: String,
    int_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct SomeId {
    some_id: Option<String>,
}

pub fn test_get_handler(request: &Request, mut capture: Capture<'_>) -> Response {
    if capture.is_documenting() {
        capture
            .method()
            .produces(["application/json"])
            .description("Test GetHandler")
            .summary("Test simply GET handler")
            .query_parameter::<String>("string_id", "Some string ID", true)
            .query_parameter::<i64>("int_id", "Some int ID", false)
            .response(200, "Test", &TestStruct::default());
        return Response::default();
    }

    let query: GetQuery = match request.query() {
        Ok(query) => query,
        Err(rejection) => return rejection.into_response(),
    };
    Json(TestStruct {
        name: query.string_id,
        counter: query.int_id.unwrap_or_default(),
        time: Utc::now(),
    })
    .into_response()
}

pub fn test_get_header(request: &Request, mut capture: Capture<'_>) -> Response {
    if capture.is_documenting() {
        capture
            .method()
            .produces(["application/json"])
            .description("Test GetHeaderHandler")
            .summary("Test GET with header handler")
            .header_parameter::<String>("Authorization", "Authorization header", true)
            .response(200, "Test", &TestHeader::default());
        return Response::default();
    }

    Json(TestHeader {
        header: request.header("Authorization").unwrap_or_default().to_string(),
    })
    .into_response()
}

pub fn test_get_cookie(request: &Request, mut capture: Capture<'_>) -> Response {
    if capture.is_documenting() {
        capture
            .method()
            .produces(["application/json"])
            .description("Test GetCookieHandler")
            .summary("Test GET with cookie handler")
            .cookie_parameter::<String>("token-cookie", "token cookie", false)
            .response(200, "Test", &TestCookie::default());
        return Response::default();
    }

    Json(TestCookie {
        cookie: request.cookie("token-cookie").unwrap_or_default().to_string(),
    })
    .into_response()
}

pub fn test_post_handler(request: &Request, mut capture: Capture<'_>) -> Response {
    if capture.is_documenting() {
        let mut map_of_structs = HashMap::new();
        map_of_structs.insert(String::new(), TestStruct::default());

        capture
            .method()
            .consumes(["application/json"])
            .produces(["application/json"])
            .description("Test PostHandler")
            .summary("Test simply POST handler")
            .body_parameter("some_id", "Some ID", &TestStruct::default(), false)
            .response(
                200,
                "Test",
                &TestStructWithInterfaceField {
                    str: String::new(),
                    interface_field: TestStruct::default(),
                },
            )
            .response(
                201,
                "Test",
                &TestStructWithAnyField {
                    str: String::new(),
                    interface_field: serde_json::Value::from(0),
                },
            )
            .response(
                202,
                "Test",
                &TestStructWithInterfaceField {
                    str: String::new(),
                    interface_field: Vec::<TestStruct>::new(),
                },
            )
            .response(203, "Test", &Vec::<TestStruct>::new())
            .response(204, "Test", &TestStructWithMap::default())
            .response(205, "Test", &TestStructWithPtrField::default())
            .response(206, "Test", &map_of_structs)
            .response(207, "Test", &HashMap::<String, String>::new())
            .response(208, "Test", &TestStructWithAnonymousField2::default())
            .response(402, "Test", &TestStructWithStructField::default())
            .response(402, "Test 2", &TestStructWithStructField::default());
        return Response::default();
    }

    let test: TestStruct = match request.json() {
        Ok(test) => test,
        Err(rejection) => return rejection.into_response(),
    };
    Json(TestStructWithInterfaceField {
        str: test.name,
        interface_field: TestStruct::default(),
    })
    .into_response()
}

pub fn test_without_swagger_handler(_request: &Request, _capture: Capture<'_>) -> Json<TestStruct> {
    Json(TestStruct {
        name: "testWithoutSwaggerGetHandler".to_string(),
        ..TestStruct::default()
    })
}

pub fn test_with_middleware_handler(request: &Request, mut capture: Capture<'_>) -> Response {
    if capture.is_documenting() {
        capture
            .method()
            .produces(["application/json"])
            .description("Test WithMiddlewareGetHandler")
            .summary("Test Get handler with middleware")
            .query_parameter::<String>("some_id", "Some ID", true)
            .response(200, "Test", &TestStruct::default());
        return Response::default();
    }

    let query: SomeId = request.query().unwrap_or_default();
    Json(TestStruct {
        name: query.some_id.unwrap_or_default(),
        ..TestStruct::default()
    })
    .into_response()
}

/// Middleware rejecting `some_id=fail` with 405, and documenting that it does
pub struct RejectFailing<H> {
    inner: H,
}

impl<H: Handler> RejectFailing<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H: Handler> Handler for RejectFailing<H> {
    fn call(&self, request: &Request, mut capture: Capture<'_>) -> Response {
        capture.method().empty_response(405, "Test middleware response");

        let query: SomeId = request.query().unwrap_or_default();
        if query.some_id.as_deref() == Some("fail") {
            return StatusCode::METHOD_NOT_ALLOWED.into_response();
        }
        self.inner.call(request, capture)
    }

    fn name(&self) -> String {
        self.inner.name()
    }
}

pub fn test_array_handler(_request: &Request, mut capture: Capture<'_>) -> Response {
    if capture.is_documenting() {
        capture
            .method()
            .produces(["application/json"])
            .description("Test ArrayGetHandler")
            .summary("Get array")
            .response(200, "Test", &TestStructWithArray::default());
        return Response::default();
    }

    Json(TestStructWithArray {
        array_field: vec!["element1".into(), "element2".into(), "element3".into()],
    })
    .into_response()
}

pub fn test_array_of_struct_handler(_request: &Request, mut capture: Capture<'_>) -> Response {
    if capture.is_documenting() {
        capture
            .method()
            .produces(["application/json"])
            .description("Test ArrayOfStruct")
            .summary("Get array of structs")
            .response(200, "Test", &TestStructWithArrayOfStructs::default());
        return Response::default();
    }

    let array_field = (1..=3)
        .map(|i| TestItem {
            name: format!("element{}", i),
            counter: i,
            status: ItemStatus::Active,
        })
        .collect();
    Json(TestStructWithArrayOfStructs { array_field }).into_response()
}

pub fn test_param_path_handler(request: &Request, mut capture: Capture<'_>) -> Response {
    if capture.is_documenting() {
        capture
            .method()
            .produces(["text/plain"])
            .description("Test ParamPathGetHandler")
            .summary("Test Param in Path GET handler")
            .path_parameter::<i16>("id", "Some id")
            .path_parameter::<String>("name", "Some name")
            .response(200, "Test", &0i64);
        return Response::default();
    }

    request.path_param("id").unwrap_or_default().to_string().into_response()
}

pub fn test_upload_handler(request: &Request, mut capture: Capture<'_>) -> Response {
    if capture.is_documenting() {
        capture
            .method()
            .consumes(["multipart/form-data"])
            .produces(["text/plain"])
            .description("Test UploadHandler")
            .summary("Upload a file")
            .file_parameter("file", "File to upload")
            .response(200, "Stored bytes", &0u64);
        return Response::default();
    }

    request.body().len().to_string().into_response()
}

pub fn test_download_handler(_request: &Request, mut capture: Capture<'_>) -> Response {
    if capture.is_documenting() {
        capture
            .method()
            .produces(["application/octet-stream"])
            .description("Test DownloadHandler")
            .summary("Download a file")
            .file_response(200, "The file");
        return Response::default();
    }

    ([(CONTENT_TYPE, "application/octet-stream")], "file contents").into_response()
}

/// Routes of API version 1, relative to `/api/v1`
pub fn api_v1() -> RouteTable {
    RouteTable::new()
        .route("/test", HttpMethod::Get, test_get_handler)
        .route("/testHeader", HttpMethod::Get, test_get_header)
        .route("/testCookie", HttpMethod::Get, test_get_cookie)
        .route("/test", HttpMethod::Post, test_post_handler)
        .route("/testWithoutSwagger", HttpMethod::Get, test_without_swagger_handler)
        .route(
            "/testExcluded",
            HttpMethod::Get,
            ExcludeFromDocs::new(test_get_handler),
        )
        .route(
            "/testWithMiddleware",
            HttpMethod::Get,
            RejectFailing::new(test_with_middleware_handler),
        )
        .route("/testArray", HttpMethod::Get, test_array_handler)
        .route("/testArrayOfStruct", HttpMethod::Get, test_array_of_struct_handler)
        .route("/testParamPath/{id:[0-9]+}/{name}", HttpMethod::Get, test_param_path_handler)
        .route("/testFile", HttpMethod::Post, test_upload_handler)
        .route("/testFile", HttpMethod::Get, test_download_handler)
}

/// Routes of API version 2, relative to `/api/v2`
pub fn api_v2() -> RouteTable {
    RouteTable::new()
        .route("/test", HttpMethod::Get, test_get_handler)
        .route("/test", HttpMethod::Post, test_post_handler)
        .route("/testWithoutSwagger", HttpMethod::Get, test_without_swagger_handler)
        .route("/testArrayOfStruct", HttpMethod::Get, test_array_of_struct_handler)
}

/// Both API versions in one route table
pub fn routes() -> RouteTable {
    RouteTable::new().nest("/api/v1", api_v1()).nest("/api/v2", api_v2())
}

/// Document configuration for one API version
pub fn api_config(base_path: &str, title: &str) -> ApiConfig {
    ApiConfig::new().base_path(base_path).info(
        Info::new()
            .title(title)
            .description("This is a sample embedded Swagger-server.")
            .terms_of_service("http://swagger.io/terms/")
            .contact(Contact::new())
            .license(License::new()),
    )
}

/// Document both API versions for `address`, mount their documentation
/// endpoints and return the ready `axum::Router`.
pub fn build_service(address: &str) -> Result<(axum::Router, Arc<DocumentStore>)> {
    let table = routes();
    let mut store = DocumentStore::new();
    let mut keys: Vec<DocKey> = Vec::new();

    for (base_path, title) in [
        ("/api/v1/", "Swagger Example API v1"),
        ("/api/v2", "Swagger Example API v2"),
    ] {
        keys.push(build_swagger(&table, address, api_config(base_path, title), &mut store)?);
    }

    let store = Arc::new(store);
    let table = keys
        .iter()
        .fold(table, |table, key| table.mount_docs(&store, key, DOCS_PATH));
    info!("Service for {} documents {} APIs", address, keys.len());
    Ok((table.router()?, store))
}
