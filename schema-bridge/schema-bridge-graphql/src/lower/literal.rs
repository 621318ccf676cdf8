use ::async_graphql::{Name, Value as ConstValue};

use crate::{
    data::{TypeArena, TypeKind, TypeRef},
    value::Value,
};

/// The GraphQL literal of an internal input value, e.g. for default values.
///
/// Enum values are looked up by their internal value, input object fields are
/// renamed from their source names.
pub(crate) fn to_literal(arena: &TypeArena, type_ref: &TypeRef, value: &Value) -> ConstValue {
    match (type_ref, value) {
        (_, Value::Null) => ConstValue::Null,
        (TypeRef::NonNull(inner), _) => to_literal(arena, inner, value),
        (TypeRef::List(inner), Value::List(elements)) => ConstValue::List(
            elements
                .iter()
                .map(|element| to_literal(arena, inner, element))
                .collect(),
        ),
        (TypeRef::List(inner), _) => to_literal(arena, inner, value),
        (TypeRef::Named(index), _) => match (&arena.type_data(*index).kind, value) {
            (TypeKind::Enum(enum_data), _) => {
                let name = enum_data
                    .values
                    .iter()
                    .find(|(_, enum_value)| &enum_value.value == value)
                    .map(|(name, _)| name.as_str())
                    .or(match value {
                        Value::Enum(name) | Value::String(name) => Some(name.as_str()),
                        _ => None,
                    });
                match name {
                    Some(name) => ConstValue::Enum(Name::new(name)),
                    None => value.clone().into_const(),
                }
            }
            (TypeKind::InputObject(input), Value::Object(object)) => ConstValue::Object(
                input
                    .fields
                    .iter()
                    .filter_map(|(name, field)| {
                        object
                            .get(&field.source_name)
                            .or_else(|| object.get(name))
                            .map(|value| (Name::new(name), to_literal(arena, &field.arg_type, value)))
                    })
                    .collect(),
            ),
            (TypeKind::Scalar(scalar), _) => match &scalar.serialize {
                Some(serialize) => serialize(value)
                    .map(Value::into_const)
                    .unwrap_or_else(|_| value.clone().into_const()),
                None => value.clone().into_const(),
            },
            _ => value.clone().into_const(),
        },
    }
}
