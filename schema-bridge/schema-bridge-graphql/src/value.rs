//! Runtime values passed into and returned from resolvers.

use std::fmt::{self, Display};

use ::async_graphql::{Name, Number};
use indexmap::IndexMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// An enum value, by its GraphQL name
    Enum(String),
    List(Vec<Value>),
    Object(ObjectValue),
}

/// An object value produced by a resolver.
///
/// `typename` is the runtime type of the object. It is what selects the concrete
/// object type when the value is returned through an interface or a union.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectValue {
    pub typename: Option<String>,
    pub fields: IndexMap<String, Value>,
}

impl ObjectValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn typed(typename: impl Into<String>) -> Self {
        Self {
            typename: Some(typename.into()),
            fields: Default::default(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(string) => Some(string),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(int) => Some(*int),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(bool) => Some(*bool),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn enum_value(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }

    /// Convert into the execution engine's constant value.
    pub(crate) fn into_const(self) -> ::async_graphql::Value {
        match self {
            Self::Null => ::async_graphql::Value::Null,
            Self::Boolean(bool) => ::async_graphql::Value::Boolean(bool),
            Self::Int(int) => ::async_graphql::Value::Number(int.into()),
            Self::Float(float) => match Number::from_f64(float) {
                Some(number) => ::async_graphql::Value::Number(number),
                None => ::async_graphql::Value::Null,
            },
            Self::String(string) => ::async_graphql::Value::String(string),
            Self::Enum(name) => ::async_graphql::Value::Enum(Name::new(name)),
            Self::List(elements) => ::async_graphql::Value::List(
                elements.into_iter().map(Self::into_const).collect(),
            ),
            Self::Object(object) => ::async_graphql::Value::Object(
                object
                    .fields
                    .into_iter()
                    .map(|(key, value)| (Name::new(key), value.into_const()))
                    .collect(),
            ),
        }
    }

    pub fn into_json(self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Boolean(bool) => serde_json::Value::Bool(bool),
            Self::Int(int) => serde_json::Value::from(int),
            Self::Float(float) => serde_json::Number::from_f64(float)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(string) | Self::Enum(string) => serde_json::Value::String(string),
            Self::List(elements) => {
                serde_json::Value::Array(elements.into_iter().map(Self::into_json).collect())
            }
            Self::Object(object) => serde_json::Value::Object(
                object
                    .fields
                    .into_iter()
                    .map(|(key, value)| (key, value.into_json()))
                    .collect(),
            ),
        }
    }
}

impl From<::async_graphql::Value> for Value {
    fn from(value: ::async_graphql::Value) -> Self {
        match value {
            ::async_graphql::Value::Null => Self::Null,
            ::async_graphql::Value::Number(number) => match number.as_i64() {
                Some(int) => Self::Int(int),
                None => number.as_f64().map(Self::Float).unwrap_or(Self::Null),
            },
            ::async_graphql::Value::String(string) => Self::String(string),
            ::async_graphql::Value::Boolean(bool) => Self::Boolean(bool),
            ::async_graphql::Value::Binary(bytes) => {
                Self::String(String::from_utf8_lossy(&bytes).into_owned())
            }
            ::async_graphql::Value::Enum(name) => Self::Enum(name.to_string()),
            ::async_graphql::Value::List(elements) => {
                Self::List(elements.into_iter().map(Self::from).collect())
            }
            ::async_graphql::Value::Object(fields) => Self::Object(ObjectValue {
                typename: None,
                fields: fields
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), Self::from(value)))
                    .collect(),
            }),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(bool) => Self::Boolean(bool),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(int) => Self::Int(int),
                None => number.as_f64().map(Self::Float).unwrap_or(Self::Null),
            },
            serde_json::Value::String(string) => Self::String(string),
            serde_json::Value::Array(elements) => {
                Self::List(elements.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(fields) => Self::Object(ObjectValue {
                typename: None,
                fields: fields
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            }),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<ObjectValue> for Value {
    fn from(value: ObjectValue) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

/// Displays the value as a GraphQL literal.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(bool) => write!(f, "{bool}"),
            Self::Int(int) => write!(f, "{int}"),
            Self::Float(float) if float.is_finite() && float.fract() == 0.0 => {
                write!(f, "{float:.1}")
            }
            Self::Float(float) => write!(f, "{float}"),
            Self::String(string) => {
                write!(f, "{}", serde_json::Value::String(string.clone()))
            }
            Self::Enum(name) => write!(f, "{name}"),
            Self::List(elements) => {
                write!(f, "[")?;
                let mut iter = elements.iter().peekable();
                while let Some(element) = iter.next() {
                    write!(f, "{element}")?;
                    if iter.peek().is_some() {
                        write!(f, ", ")?;
                    }
                }
                write!(f, "]")
            }
            Self::Object(object) => {
                write!(f, "{{")?;
                let mut iter = object.fields.iter().peekable();
                while let Some((key, value)) = iter.next() {
                    write!(f, "{key}: {value}")?;
                    if iter.peek().is_some() {
                        write!(f, ", ")?;
                    }
                }
                write!(f, "}}")
            }
        }
    }
}
