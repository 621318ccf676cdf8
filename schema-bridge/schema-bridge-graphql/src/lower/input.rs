//! Input coercion: argument values from the engine into resolver values.

use ::async_graphql::{Name, Value as ConstValue};
use indexmap::IndexMap;

use crate::{
    data::{ArgumentData, TypeArena, TypeKind, TypeRef},
    resolver::ResolverError,
    value::{ObjectValue, Value},
};

/// Coerce the arguments of one field invocation.
///
/// The result is keyed by source name. Absent arguments get their default value,
/// or are left out when there is none.
pub fn coerce_arguments(
    arena: &TypeArena,
    arguments: &IndexMap<String, ArgumentData>,
    provided: &IndexMap<Name, ConstValue>,
) -> Result<IndexMap<String, Value>, ResolverError> {
    let mut coerced = IndexMap::with_capacity(arguments.len());
    for (name, argument) in arguments {
        match provided.get(name.as_str()) {
            Some(value) => {
                coerced.insert(
                    argument.source_name.clone(),
                    coerce_input(arena, &argument.arg_type, value)?,
                );
            }
            None => {
                if let Some(default_value) = &argument.default_value {
                    coerced.insert(argument.source_name.clone(), default_value.clone());
                }
            }
        }
    }
    Ok(coerced)
}

fn coerce_input(
    arena: &TypeArena,
    type_ref: &TypeRef,
    value: &ConstValue,
) -> Result<Value, ResolverError> {
    match (type_ref, value) {
        (TypeRef::NonNull(inner), _) => coerce_input(arena, inner, value),
        (_, ConstValue::Null) => Ok(Value::Null),
        (TypeRef::List(inner), ConstValue::List(elements)) => {
            let mut coerced = Vec::with_capacity(elements.len());
            for element in elements {
                coerced.push(coerce_input(arena, inner, element)?);
            }
            Ok(Value::List(coerced))
        }
        // a single value is accepted where a list is expected
        (TypeRef::List(inner), _) => Ok(Value::List(vec![coerce_input(arena, inner, value)?])),
        (TypeRef::Named(index), _) => {
            let type_data = arena.type_data(*index);
            match &type_data.kind {
                TypeKind::Scalar(scalar) => {
                    let value = Value::from(value.clone());
                    match &scalar.parse_value {
                        Some(parse_value) => parse_value(&value),
                        None => Ok(value),
                    }
                }
                TypeKind::Enum(enum_data) => {
                    let name = match value {
                        ConstValue::Enum(name) => name.as_str(),
                        ConstValue::String(name) => name.as_str(),
                        other => {
                            return Err(ResolverError::new(format!(
                                "Enum \"{}\" cannot represent non-enum value: {other}.",
                                type_data.typename
                            )));
                        }
                    };
                    match enum_data.values.get(name) {
                        Some(enum_value) => Ok(enum_value.value.clone()),
                        None => Err(ResolverError::new(format!(
                            "Value \"{name}\" does not exist in \"{}\" enum.",
                            type_data.typename
                        ))),
                    }
                }
                TypeKind::InputObject(input) => {
                    let ConstValue::Object(provided) = value else {
                        return Err(ResolverError::new(format!(
                            "Expected type \"{}\" to be an object.",
                            type_data.typename
                        )));
                    };
                    let fields = coerce_arguments(arena, &input.fields, provided)?;
                    Ok(Value::Object(ObjectValue {
                        typename: Some(type_data.typename.clone()),
                        fields,
                    }))
                }
                other => Err(ResolverError::new(format!(
                    "Type \"{}\" of kind {} cannot be used as input.",
                    type_data.typename,
                    other.kind_name()
                ))),
            }
        }
    }
}
