use openapi_from_handlers::definitions::DefinitionRegistry;
use openapi_from_handlers::schema::Schema;
use openapi_from_handlers::schema_generator::SchemaGenerator;
use openapi_from_handlers::{Describe, Shape};
use pretty_assertions::assert_eq;
use serde::Serialize;
use serde_json::{json, Value};

/// Walk `value` and return its definitions as JSON
fn definitions_of<T: Describe>(value: &T) -> (Schema, Value) {
    let mut registry = DefinitionRegistry::new();
    let schema = SchemaGenerator::new(&mut registry).generate_schema(&value.describe());
    let definitions: serde_json::Map<String, Value> = registry
        .iter()
        .map(|(name, schema)| {
            let json = serde_json::to_value(schema).expect("Schema should serialize");
            (name.to_string(), json)
        })
        .collect();
    (schema, Value::Object(definitions))
}

#[derive(Serialize, Describe, Default)]
#[serde(rename_all = "camelCase")]
struct Account {
    user_name: String,
    #[serde(rename = "mail")]
    email_address: String,
    #[serde(skip_serializing)]
    password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    nickname: Option<String>,
    r#type: String,
}

#[test]
fn test_serde_attributes_shape_properties() {
    let (schema, definitions) = definitions_of(&Account::default());

    assert_eq!(schema.referenced_name(), Some("Account"));
    let properties = definitions["Account"]["properties"]
        .as_object()
        .expect("Account should have properties");
    let names: Vec<&String> = properties.keys().collect();
    assert_eq!(names, vec!["mail", "nickname", "type", "userName"]);
}

#[derive(Describe, Default)]
struct Order {
    #[swagger(required, description = "Order number")]
    number: u32,
    #[swagger(kind = "string")]
    amount: i64,
    #[swagger(values = "open, closed")]
    state: String,
    #[swagger(skip)]
    internal: Vec<u8>,
    #[swagger(rename = "note")]
    comment: Option<String>,
}

#[test]
fn test_swagger_attributes() {
    let (_, definitions) = definitions_of(&Order::default());

    assert_eq!(
        definitions["Order"],
        json!({
            "type": "object",
            "properties": {
                "number": { "type": "integer", "format": "int32", "description": "Order number" },
                "amount": { "type": "string" },
                "state": { "type": "string", "enum": ["open", "closed"] },
                "note": { "type": "string" }
            },
            "required": ["number"]
        })
    );
}

#[derive(Describe, Default)]
struct Audit {
    created_by: String,
    version: i32,
}

#[derive(Describe, Default)]
struct Invoice {
    #[serde(flatten)]
    audit: Audit,
    total: f64,
}

#[test]
fn test_flattened_fields_merge_into_parent() {
    let (_, definitions) = definitions_of(&Invoice::default());

    let properties = definitions["Invoice"]["properties"].as_object().unwrap();
    let names: Vec<&String> = properties.keys().collect();
    assert_eq!(names, vec!["created_by", "total", "version"]);
    assert!(definitions.get("Audit").is_none(), "Flattened record got its own definition");
}

#[derive(Describe, Default, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum Priority {
    #[default]
    Low,
    VeryHigh,
    #[serde(skip)]
    Internal,
}

#[derive(Describe, Default)]
struct Ticket {
    priority: Priority,
    tags: Vec<Priority>,
}

#[test]
fn test_unit_enum_becomes_string_enum_definition() {
    let (_, definitions) = definitions_of(&Ticket::default());

    assert_eq!(
        definitions["Priority"],
        json!({ "type": "string", "enum": ["LOW", "VERY_HIGH"] })
    );
    assert_eq!(
        definitions["Ticket"]["properties"]["tags"],
        json!({ "type": "array", "items": { "$ref": "#/definitions/Priority" } })
    );
    let _ = Priority::Internal;
}

#[derive(Describe, Default)]
struct UserId(u64);

#[derive(Describe, Default)]
struct Session {
    user: UserId,
}

#[test]
fn test_newtype_is_transparent() {
    assert!(matches!(UserId::shape(), Shape::Scalar(_)));

    let (_, definitions) = definitions_of(&Session::default());
    assert_eq!(
        definitions["Session"]["properties"]["user"],
        json!({ "type": "integer", "format": "int64" })
    );
}

#[derive(Describe, Default)]
#[swagger(rename = "Page")]
struct Paginated<T> {
    items: Vec<T>,
    total: u32,
}

#[test]
fn test_generic_records_are_named_per_instantiation() {
    let (schema, definitions) = definitions_of(&Paginated::<Audit>::default());
    assert_eq!(schema.referenced_name(), Some("Page_Audit"));
    assert_eq!(
        definitions["Page_Audit"]["properties"]["items"]["items"],
        json!({ "$ref": "#/definitions/Audit" })
    );

    let (schema, _) = definitions_of(&Paginated::<String>::default());
    assert_eq!(schema.referenced_name(), Some("Page_string"));
}

#[derive(Describe)]
struct Envelope {
    payload: serde_json::Value,
}

#[test]
fn test_value_fields_follow_the_example() {
    let envelope = Envelope {
        payload: json!({ "id": 3, "ok": true }),
    };
    let (_, definitions) = definitions_of(&envelope);

    assert_eq!(
        definitions["Envelope"]["properties"]["payload"],
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "integer", "format": "int64" },
                "ok": { "type": "boolean" }
            }
        })
    );

    // without a value nothing is known about the payload
    let mut registry = DefinitionRegistry::new();
    SchemaGenerator::new(&mut registry).generate_schema(&Envelope::shape());
    let static_payload = serde_json::to_value(registry.get("Envelope").unwrap()).unwrap();
    assert_eq!(static_payload["properties"]["payload"], json!({}));
}
