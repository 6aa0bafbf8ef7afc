use crate::definitions::DefinitionRegistry;
use crate::describe::{Field, ObjectShape, Shape};
use crate::schema::Schema;
use log::{debug, warn};
use std::collections::BTreeMap;

/// Schema generator - converts described shapes to Swagger schemas
///
/// Named records and enums are expanded once into the borrowed
/// [`DefinitionRegistry`] and referenced by `$ref` everywhere else.
pub struct SchemaGenerator<'r> {
    /// Definitions of the document being built
    definitions: &'r mut DefinitionRegistry,
}

/// The winning declaration of a property while flattening a record
struct CollectedProperty {
    /// Embedding depth the property was declared at (0 = the record itself)
    depth: usize,
    field: Field,
}

impl<'r> SchemaGenerator<'r> {
    pub fn new(definitions: &'r mut DefinitionRegistry) -> Self {
        Self { definitions }
    }

    /// Generate a schema for a shape, registering named records on the way
    pub fn generate_schema(&mut self, shape: &Shape) -> Schema {
        match shape {
            Shape::Scalar(scalar) => Schema::primitive(scalar.type_name, scalar.format),
            Shape::Array(items) => Schema::array(self.generate_schema(items)),
            Shape::Map(values) => Schema::map(self.generate_schema(values)),
            Shape::Object(object) => self.object_schema(object),
            Shape::Enum(shape) => self
                .definitions
                .resolve(&shape.name, |_| enum_schema(&shape.variants)),
            Shape::Unknown => {
                debug!("Unknown shape, using empty schema");
                Schema::unknown()
            }
        }
    }

    /// Generate a schema that can stand outside a request body.
    ///
    /// Query, path, header and cookie parameters cannot point at definitions,
    /// so enums are inlined and records degrade to strings.
    pub fn generate_inline_schema(&mut self, shape: &Shape) -> Schema {
        match shape {
            Shape::Scalar(scalar) => Schema::primitive(scalar.type_name, scalar.format),
            Shape::Enum(shape) => enum_schema(&shape.variants),
            Shape::Array(items) => Schema::array(self.generate_inline_schema(items)),
            other => {
                warn!(
                    "Shape {} cannot be documented outside a request body, using string",
                    other.canonical_name()
                );
                Schema::primitive("string", None)
            }
        }
    }

    fn object_schema(&mut self, object: &ObjectShape) -> Schema {
        match object.name() {
            Some(name) => self.definitions.resolve(name, |definitions| {
                SchemaGenerator::new(definitions).expand_object(object)
            }),
            None => self.expand_object(object),
        }
    }

    /// Expand a record into an object schema, merging flattened fields.
    ///
    /// Shadowing is resolved before any schema is generated, so a record
    /// reachable only through a shadowed field never becomes a definition.
    fn expand_object(&mut self, object: &ObjectShape) -> Schema {
        let mut collected = BTreeMap::new();
        let mut additional = None;
        let mut embedding = Vec::new();
        if let Some(name) = object.name() {
            embedding.push(name.to_string());
        }
        collect_properties(object, 0, &mut collected, &mut additional, &mut embedding);

        let mut properties = BTreeMap::new();
        let mut required = Vec::new();
        for (name, property) in collected {
            if property.field.required {
                required.push(name.clone());
            }
            let schema = self.field_schema(&property.field);
            properties.insert(name, schema);
        }
        let additional = additional.map(|values| Box::new(self.generate_schema(&values)));

        Schema {
            schema_type: Some("object".to_string()),
            properties: if properties.is_empty() {
                None
            } else {
                Some(properties)
            },
            required: if required.is_empty() {
                None
            } else {
                Some(required)
            },
            additional_properties: additional,
            ..Schema::default()
        }
    }

    /// Schema of one property.
    ///
    /// A `$ref` cannot carry siblings, so attribute values and descriptions
    /// on a field pointing at a definition are dropped.
    fn field_schema(&mut self, field: &Field) -> Schema {
        let mut schema = match &field.type_override {
            Some(type_name) => Schema::primitive(type_name, None),
            None => self.generate_schema(&field.shape),
        };
        if schema.reference.is_some() {
            if field.enum_values.is_some() || field.description.is_some() {
                debug!("Property {} refers to a definition, dropping its values and description", field.name);
            }
            return schema;
        }
        if let Some(values) = &field.enum_values {
            schema.enum_values = Some(values.clone());
        }
        if let Some(description) = &field.description {
            schema.description = Some(description.clone());
        }
        schema
    }
}

/// Collect the properties of `object` and of everything it embeds.
///
/// A property declared at a shallower depth shadows deeper ones with the
/// same name; at equal depth the first declaration wins. The first flattened
/// map supplies `additionalProperties`.
fn collect_properties(
    object: &ObjectShape,
    depth: usize,
    collected: &mut BTreeMap<String, CollectedProperty>,
    additional: &mut Option<Shape>,
    embedding: &mut Vec<String>,
) {
    for field in object.fields().iter() {
        if field.flatten {
            collect_flattened(field, depth, collected, additional, embedding);
            continue;
        }

        if let Some(existing) = collected.get(&field.name) {
            if existing.depth <= depth {
                debug!("Property {} is shadowed by a shallower declaration", field.name);
                continue;
            }
        }
        collected.insert(
            field.name.clone(),
            CollectedProperty {
                depth,
                field: field.clone(),
            },
        );
    }
}

fn collect_flattened(
    field: &Field,
    depth: usize,
    collected: &mut BTreeMap<String, CollectedProperty>,
    additional: &mut Option<Shape>,
    embedding: &mut Vec<String>,
) {
    match &field.shape {
        Shape::Object(inner) => {
            let name = inner.name().map(str::to_string);
            if let Some(name) = &name {
                if embedding.contains(name) {
                    warn!("Record {} embeds itself, ignoring the inner copy", name);
                    return;
                }
                embedding.push(name.clone());
            }
            collect_properties(inner, depth + 1, collected, additional, embedding);
            if name.is_some() {
                embedding.pop();
            }
        }
        Shape::Map(values) => {
            if additional.is_none() {
                *additional = Some(values.as_ref().clone());
            }
        }
        other => {
            warn!(
                "Flattened field of shape {} has no properties, ignoring it",
                other.canonical_name()
            );
        }
    }
}

fn enum_schema(variants: &[String]) -> Schema {
    Schema {
        enum_values: Some(variants.to_vec()),
        ..Schema::primitive("string", None)
    }
}
