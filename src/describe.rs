//! Shape descriptions of documented types.
//!
//! Every type that appears as a parameter, response or property implements
//! [`Describe`]. The trait replaces runtime reflection: a type reports its own
//! [`Shape`], and a value may refine that shape from its contents (this is how
//! open-ended `serde_json::Value` fields are documented from the example value
//! handed to the builder).
//!
//! Records normally get their implementation from `#[derive(Describe)]`; the
//! impls below cover scalars, wrappers and collections from `std`, `chrono`,
//! `uuid` and `serde_json`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::time::SystemTime;

/// A type that can describe its own documentation shape.
pub trait Describe {
    /// Shape of the static type.
    fn shape() -> Shape;

    /// Shape of this particular value. Defaults to the static shape.
    fn describe(&self) -> Shape {
        Self::shape()
    }
}

/// Documentation shape of a type or value, before it is turned into a schema.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A primitive with an optional format
    Scalar(Scalar),
    /// A sequence of the inner shape
    Array(Box<Shape>),
    /// A string-keyed map whose values have the inner shape
    Map(Box<Shape>),
    /// A record with named properties
    Object(ObjectShape),
    /// A closed set of string values
    Enum(EnumShape),
    /// Nothing is known about the value
    Unknown,
}

/// OpenAPI primitive type name plus optional format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar {
    pub type_name: &'static str,
    pub format: Option<&'static str>,
}

impl Scalar {
    pub const BOOLEAN: Scalar = Scalar::new("boolean", None);
    pub const INT32: Scalar = Scalar::new("integer", Some("int32"));
    pub const INT64: Scalar = Scalar::new("integer", Some("int64"));
    pub const FLOAT: Scalar = Scalar::new("number", Some("float"));
    pub const DOUBLE: Scalar = Scalar::new("number", Some("double"));
    pub const STRING: Scalar = Scalar::new("string", None);
    pub const DATE_TIME: Scalar = Scalar::new("string", Some("date-time"));
    pub const DATE: Scalar = Scalar::new("string", Some("date"));
    pub const UUID: Scalar = Scalar::new("string", Some("uuid"));

    pub const fn new(type_name: &'static str, format: Option<&'static str>) -> Self {
        Self { type_name, format }
    }
}

/// Shape of a record.
///
/// Shapes built from a type are deferred: the field list is only produced
/// when the walker expands the object, which keeps self-referential types
/// finite. Shapes built from a value carry their fields already resolved.
#[derive(Debug, Clone)]
pub struct ObjectShape {
    name: Option<String>,
    fields: Fields,
}

#[derive(Debug, Clone)]
enum Fields {
    Deferred(fn() -> Vec<Field>),
    Resolved(Vec<Field>),
}

impl ObjectShape {
    /// A named record whose fields are produced on demand.
    pub fn deferred(name: impl Into<String>, fields: fn() -> Vec<Field>) -> Self {
        Self {
            name: Some(name.into()),
            fields: Fields::Deferred(fields),
        }
    }

    /// A named record with known fields.
    pub fn resolved(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: Some(name.into()),
            fields: Fields::Resolved(fields),
        }
    }

    /// A record without a canonical name. It is always emitted inline.
    pub fn anonymous(fields: Vec<Field>) -> Self {
        Self {
            name: None,
            fields: Fields::Resolved(fields),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        let mut fields = match self.fields {
            Fields::Deferred(produce) => produce(),
            Fields::Resolved(fields) => fields,
        };
        fields.push(field);
        self.fields = Fields::Resolved(fields);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> Cow<'_, [Field]> {
        match &self.fields {
            Fields::Deferred(produce) => Cow::Owned(produce()),
            Fields::Resolved(fields) => Cow::Borrowed(fields),
        }
    }
}

/// Shape of a unit-only enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumShape {
    pub name: String,
    pub variants: Vec<String>,
}

impl EnumShape {
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }
}

/// One property of a record, with the metadata carried by its attributes.
#[derive(Debug, Clone)]
pub struct Field {
    /// Emitted property name (empty for flattened fields)
    pub name: String,
    pub shape: Shape,
    pub description: Option<String>,
    /// Forces the emitted `type`, whatever the shape says
    pub type_override: Option<String>,
    /// Literal allowed values
    pub enum_values: Option<Vec<String>>,
    pub required: bool,
    /// Properties of the shape are merged into the enclosing record
    pub flatten: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            description: None,
            type_override: None,
            enum_values: None,
            required: false,
            flatten: false,
        }
    }

    /// An embedded field whose properties are merged into the parent.
    pub fn flattened(shape: Shape) -> Self {
        Self {
            flatten: true,
            ..Self::new(String::new(), shape)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_override = Some(type_name.into());
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl Shape {
    pub fn of<T: Describe + ?Sized>() -> Shape {
        T::shape()
    }

    /// Name used for generic definitions, e.g. `Page_TestStruct`.
    pub fn canonical_name(&self) -> String {
        match self {
            Shape::Scalar(scalar) => scalar.format.unwrap_or(scalar.type_name).to_string(),
            Shape::Array(items) => format!("Array_{}", items.canonical_name()),
            Shape::Map(values) => format!("Map_{}", values.canonical_name()),
            Shape::Object(object) => object.name().unwrap_or("Object").to_string(),
            Shape::Enum(shape) => shape.name.clone(),
            Shape::Unknown => "Any".to_string(),
        }
    }
}

macro_rules! describe_scalar {
    ($scalar:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn shape() -> Shape {
                    Shape::Scalar($scalar)
                }
            }
        )+
    };
}

describe_scalar!(Scalar::BOOLEAN => bool);
describe_scalar!(Scalar::INT32 => i8, i16, i32, u8, u16, u32);
describe_scalar!(Scalar::INT64 => i64, i128, isize, u64, u128, usize);
describe_scalar!(Scalar::FLOAT => f32);
describe_scalar!(Scalar::DOUBLE => f64);
describe_scalar!(Scalar::STRING => char, str, String);
describe_scalar!(Scalar::DATE_TIME => NaiveDateTime, SystemTime);
describe_scalar!(Scalar::DATE => NaiveDate);
describe_scalar!(Scalar::UUID => uuid::Uuid);

impl<Tz: TimeZone> Describe for DateTime<Tz> {
    fn shape() -> Shape {
        Shape::Scalar(Scalar::DATE_TIME)
    }
}

impl<T: Describe> Describe for Option<T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn describe(&self) -> Shape {
        match self {
            Some(value) => value.describe(),
            None => T::shape(),
        }
    }
}

macro_rules! describe_pointer {
    ($($ptr:ident),+) => {
        $(
            impl<T: Describe + ?Sized> Describe for $ptr<T> {
                fn shape() -> Shape {
                    T::shape()
                }

                fn describe(&self) -> Shape {
                    (**self).describe()
                }
            }
        )+
    };
}

describe_pointer!(Box, Rc, Arc);

impl<T: Describe + ?Sized> Describe for &T {
    fn shape() -> Shape {
        T::shape()
    }

    fn describe(&self) -> Shape {
        (**self).describe()
    }
}

impl<T: Describe + ?Sized> Describe for &mut T {
    fn shape() -> Shape {
        T::shape()
    }

    fn describe(&self) -> Shape {
        (**self).describe()
    }
}

impl<T: Describe + ToOwned + ?Sized> Describe for Cow<'_, T> {
    fn shape() -> Shape {
        T::shape()
    }

    fn describe(&self) -> Shape {
        (**self).describe()
    }
}

fn array_of<T: Describe + ?Sized>() -> Shape {
    Shape::Array(Box::new(T::shape()))
}

impl<T: Describe> Describe for [T] {
    fn shape() -> Shape {
        array_of::<T>()
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn shape() -> Shape {
        array_of::<T>()
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn shape() -> Shape {
        array_of::<T>()
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn shape() -> Shape {
        array_of::<T>()
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn shape() -> Shape {
        array_of::<T>()
    }
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn shape() -> Shape {
        array_of::<T>()
    }
}

// Map keys are not represented: Swagger maps are always string keyed.
impl<K, V: Describe, S> Describe for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::Map(Box::new(V::shape()))
    }
}

impl<K, V: Describe> Describe for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Map(Box::new(V::shape()))
    }
}

/// `serde_json::Value` is the open-ended "any value" placeholder. Without a
/// concrete value nothing is known; with one, the value decides.
impl Describe for serde_json::Value {
    fn shape() -> Shape {
        Shape::Unknown
    }

    fn describe(&self) -> Shape {
        use serde_json::Value;

        match self {
            Value::Null => Shape::Unknown,
            Value::Bool(_) => Shape::Scalar(Scalar::BOOLEAN),
            Value::Number(number) if number.is_f64() => Shape::Scalar(Scalar::DOUBLE),
            Value::Number(_) => Shape::Scalar(Scalar::INT64),
            Value::String(_) => Shape::Scalar(Scalar::STRING),
            Value::Array(items) => Shape::Array(Box::new(
                items.first().map(|item| item.describe()).unwrap_or(Shape::Unknown),
            )),
            Value::Object(entries) => Shape::Object(ObjectShape::anonymous(
                entries
                    .iter()
                    .map(|(name, value)| Field::new(name.clone(), value.describe()))
                    .collect(),
            )),
        }
    }
}
