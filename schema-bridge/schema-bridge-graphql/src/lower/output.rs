//! Output completion: resolver values into the engine's field values.

use std::sync::Arc;

use ::async_graphql::{Name, Value as ConstValue, dynamic::FieldValue};

use crate::{
    data::{ScalarData, TypeIndex, TypeKind, TypeRef},
    descriptor::BuiltinScalar,
    lower::propagation::ExecutionState,
    resolver::{ResolveTypeFn, ResolverError},
    schema::SchemaData,
    value::{ObjectValue, Value},
};

pub(crate) struct Completion<'s> {
    pub data: &'s SchemaData,
    pub state: Option<&'s ExecutionState>,
    pub parent_type: &'s str,
    pub field_name: &'s str,
}

impl Completion<'_> {
    /// Complete `value` as an instance of `type_ref`.
    ///
    /// `path` is the response path of the value, used to mark null list items.
    pub fn complete<'a>(
        &self,
        type_ref: &TypeRef,
        value: Value,
        path: Option<&str>,
    ) -> Result<Option<FieldValue<'a>>, ResolverError> {
        match type_ref {
            TypeRef::NonNull(inner) => match self.complete(inner, value, path)? {
                Some(completed) => Ok(Some(completed)),
                None => Err(ResolverError::new(format!(
                    "Cannot return null for non-nullable field {}.{}.",
                    self.parent_type, self.field_name
                ))),
            },
            _ if value.is_null() => Ok(None),
            TypeRef::List(inner) => {
                let Value::List(elements) = value else {
                    return Err(ResolverError::new(format!(
                        "Expected Iterable, but did not find one for field '{}.{}'.",
                        self.parent_type, self.field_name
                    )));
                };
                let mut items = Vec::with_capacity(elements.len());
                for (index, element) in elements.into_iter().enumerate() {
                    let item_path = path.map(|path| format!("{path}.{index}"));
                    match self.complete(inner, element, item_path.as_deref())? {
                        Some(item) => items.push(item),
                        None => {
                            if let (Some(state), Some(item_path)) = (self.state, item_path) {
                                state.mark_null(item_path);
                            }
                            items.push(FieldValue::NULL);
                        }
                    }
                }
                Ok(Some(FieldValue::list(items)))
            }
            TypeRef::Named(index) => self.complete_named(*index, value).map(Some),
        }
    }

    fn complete_named<'a>(
        &self,
        index: TypeIndex,
        value: Value,
    ) -> Result<FieldValue<'a>, ResolverError> {
        let type_data = self.data.arena.type_data(index);
        match &type_data.kind {
            TypeKind::Scalar(scalar) => {
                let serialized = serialize_scalar(&type_data.typename, scalar, value)?;
                Ok(FieldValue::value(serialized.into_const()))
            }
            TypeKind::Enum(enum_data) => {
                let name = match &value {
                    Value::Enum(name) if enum_data.values.contains_key(name) => Some(name.as_str()),
                    _ => enum_data
                        .values
                        .iter()
                        .find(|(_, enum_value)| enum_value.value == value)
                        .map(|(name, _)| name.as_str())
                        .or(match &value {
                            Value::String(name) if enum_data.values.contains_key(name) => {
                                Some(name.as_str())
                            }
                            _ => None,
                        }),
                };
                match name {
                    Some(name) => Ok(FieldValue::value(ConstValue::Enum(Name::new(name)))),
                    None => Err(ResolverError::new(format!(
                        "Enum \"{}\" cannot represent value: {value}",
                        type_data.typename
                    ))),
                }
            }
            TypeKind::Object(_) => {
                let object = self.expect_object(&type_data.typename, value)?;
                Ok(FieldValue::owned_any(Arc::new(object)))
            }
            TypeKind::Interface(interface) => {
                let object = self.expect_object(&type_data.typename, value)?;
                let runtime_type =
                    self.runtime_type(index, interface.resolve_type.as_ref(), &object)?;
                Ok(FieldValue::owned_any(Arc::new(object)).with_type(runtime_type))
            }
            TypeKind::Union(union) => {
                let object = self.expect_object(&type_data.typename, value)?;
                let runtime_type = self.runtime_type(index, union.resolve_type.as_ref(), &object)?;
                Ok(FieldValue::owned_any(Arc::new(object)).with_type(runtime_type))
            }
            TypeKind::InputObject(_) | TypeKind::Placeholder => {
                panic!(
                    "BUG: `{}` of kind {} used as output type",
                    type_data.typename,
                    type_data.kind.kind_name()
                )
            }
        }
    }

    fn expect_object(&self, typename: &str, value: Value) -> Result<ObjectValue, ResolverError> {
        match value {
            Value::Object(object) => Ok(object),
            other => Err(ResolverError::new(format!(
                "Expected value of type \"{typename}\" but got: {other}."
            ))),
        }
    }

    fn runtime_type(
        &self,
        abstract_type: TypeIndex,
        resolve_type: Option<&ResolveTypeFn>,
        object: &ObjectValue,
    ) -> Result<String, ResolverError> {
        let arena = &self.data.arena;
        let abstract_name = arena.typename(abstract_type);
        let possible_types = self.data.possible_types(abstract_type);

        let runtime_type = object
            .typename
            .clone()
            .or_else(|| resolve_type.and_then(|resolve_type| resolve_type(object)))
            .or_else(|| match possible_types {
                [single] => Some(arena.typename(*single).to_string()),
                _ => None,
            });

        let Some(runtime_type) = runtime_type else {
            return Err(ResolverError::new(format!(
                "Abstract type \"{abstract_name}\" must resolve to an Object type at runtime for field \"{}.{}\". Either the \"{abstract_name}\" type should provide a \"resolve_type\" function or each possible type should provide an \"is_type_of\" function.",
                self.parent_type, self.field_name
            )));
        };

        let Some(runtime_index) = self.data.type_index(&runtime_type) else {
            return Err(ResolverError::new(format!(
                "Abstract type \"{abstract_name}\" was resolved to a type \"{runtime_type}\" that does not exist inside the schema."
            )));
        };

        if !possible_types.contains(&runtime_index) {
            return Err(ResolverError::new(format!(
                "Runtime Object type \"{runtime_type}\" is not a possible type for \"{abstract_name}\"."
            )));
        }

        Ok(runtime_type)
    }
}

/// Serialize an output value of a scalar type.
pub(crate) fn serialize_scalar(
    typename: &str,
    scalar: &ScalarData,
    value: Value,
) -> Result<Value, ResolverError> {
    if let Some(serialize) = &scalar.serialize {
        return serialize(&value);
    }
    match scalar.builtin {
        Some(builtin) if builtin.name() == typename => serialize_builtin(builtin, value),
        _ => Ok(value),
    }
}

fn serialize_builtin(scalar: BuiltinScalar, value: Value) -> Result<Value, ResolverError> {
    match (scalar, value) {
        (BuiltinScalar::Int, Value::Int(int)) if i32::try_from(int).is_ok() => Ok(Value::Int(int)),
        (BuiltinScalar::Int, Value::Float(float))
            if float.fract() == 0.0 && float >= i32::MIN as f64 && float <= i32::MAX as f64 =>
        {
            Ok(Value::Int(float as i64))
        }
        (BuiltinScalar::Int, Value::Boolean(bool)) => Ok(Value::Int(bool.into())),
        (BuiltinScalar::Int, Value::String(string)) => match string.parse::<i32>() {
            Ok(int) => Ok(Value::Int(int.into())),
            Err(_) => Err(ResolverError::new(format!(
                "Int cannot represent non-integer value: {}",
                Value::String(string)
            ))),
        },
        (BuiltinScalar::Int, value @ (Value::Int(_) | Value::Float(_))) => Err(
            ResolverError::new(format!("Int cannot represent non 32-bit signed integer value: {value}")),
        ),
        (BuiltinScalar::Int, value) => Err(ResolverError::new(format!(
            "Int cannot represent non-integer value: {value}"
        ))),

        (BuiltinScalar::Float, Value::Float(float)) if float.is_finite() => Ok(Value::Float(float)),
        (BuiltinScalar::Float, Value::Int(int)) => Ok(Value::Float(int as f64)),
        (BuiltinScalar::Float, Value::Boolean(bool)) => Ok(Value::Float(if bool { 1.0 } else { 0.0 })),
        (BuiltinScalar::Float, Value::String(string)) => match string.parse::<f64>() {
            Ok(float) => Ok(Value::Float(float)),
            Err(_) => Err(ResolverError::new(format!(
                "Float cannot represent non numeric value: {}",
                Value::String(string)
            ))),
        },
        (BuiltinScalar::Float, value) => Err(ResolverError::new(format!(
            "Float cannot represent non numeric value: {value}"
        ))),

        (BuiltinScalar::String, value @ Value::String(_)) => Ok(value),
        (BuiltinScalar::String, Value::Enum(name)) => Ok(Value::String(name)),
        (BuiltinScalar::String, Value::Boolean(bool)) => Ok(Value::String(bool.to_string())),
        (BuiltinScalar::String, value @ (Value::Int(_) | Value::Float(_))) => {
            Ok(Value::String(value.to_string()))
        }
        (BuiltinScalar::String, value) => Err(ResolverError::new(format!(
            "String cannot represent value: {value}"
        ))),

        (BuiltinScalar::Boolean, value @ Value::Boolean(_)) => Ok(value),
        (BuiltinScalar::Boolean, Value::Int(int)) => Ok(Value::Boolean(int != 0)),
        (BuiltinScalar::Boolean, Value::Float(float)) if float.is_finite() => {
            Ok(Value::Boolean(float != 0.0))
        }
        (BuiltinScalar::Boolean, value) => Err(ResolverError::new(format!(
            "Boolean cannot represent a non boolean value: {value}"
        ))),

        (BuiltinScalar::ID, value @ Value::String(_)) => Ok(value),
        (BuiltinScalar::ID, Value::Int(int)) => Ok(Value::String(int.to_string())),
        (BuiltinScalar::ID, value) => Err(ResolverError::new(format!(
            "ID cannot represent value: {value}"
        ))),

        (BuiltinScalar::Decimal, value) => Ok(value),
    }
}
