use pretty_assertions::assert_eq;
use schema_bridge_graphql::{
    ObjectValue, Schema, Value,
    class::{self, Field, ObjectType},
    declared,
    descriptor::TypeDescriptor,
    execute::PathSegment,
    resolver::ResolverError,
};
use schema_bridge_test_utils::graphql_test_utils::{Exec, GraphqlTestResultExt};
use serde_json::json;
use test_log::test;

use crate::build_schema;

fn query() -> TypeDescriptor {
    let pet = ObjectType::new("Pet")
        .field("name", Field::new(class::string()).required())
        .field(
            "age",
            Field::new(class::int()).resolve(|_| Err(ResolverError::new("age is secret"))),
        )
        .build();

    ObjectType::new("Query")
        .field(
            "broken",
            Field::new(class::string()).resolve(|_| Err("no such thing".into())),
        )
        .field(
            "pet",
            Field::new(pet).resolve(|_| Ok(ObjectValue::new().with("name", Value::Null).into())),
        )
        .field(
            "names",
            Field::new(class::list(class::string()))
                .resolve(|_| Ok(vec![Some("a"), None, Some("c")].into())),
        )
        .field(
            "strict_names",
            Field::new(class::list(class::non_null(class::string())))
                .resolve(|_| Ok(vec![Some("a"), None].into())),
        )
        .field(
            "count",
            Field::new(class::int()).resolve(|_| Ok("many".into())),
        )
        .build()
}

#[test(tokio::test)]
async fn test_error_in_nullable_field() {
    let schema = build_schema(query());

    let result = schema.execute("{ broken names }").await;

    assert_eq!(
        result.data,
        Some(json!({ "broken": null, "names": ["a", null, "c"] }))
    );
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].message, "no such thing");
    assert_eq!(result.errors[0].path, vec![PathSegment::Field("broken".into())]);
    assert!(!result.errors[0].locations.is_empty());
}

#[test(tokio::test)]
async fn test_non_null_error_propagates_to_the_parent() {
    let schema = build_schema(query());

    let result = schema.execute("{ pet { name } names }").await;

    assert_eq!(
        result.data,
        Some(json!({ "pet": null, "names": ["a", null, "c"] }))
    );
    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].message,
        "Cannot return null for non-nullable field Pet.name."
    );
    assert_eq!(
        result.errors[0].path,
        vec![
            PathSegment::Field("pet".into()),
            PathSegment::Field("name".into()),
        ]
    );
}

#[test(tokio::test)]
async fn test_error_in_nested_nullable_field() {
    let schema = build_schema(query());

    let result = schema.execute("{ pet { age } }").await;

    assert_eq!(result.data, Some(json!({ "pet": { "age": null } })));
    assert_eq!(
        result.errors[0].path,
        vec![
            PathSegment::Field("pet".into()),
            PathSegment::Field("age".into()),
        ]
    );
}

#[test(tokio::test)]
async fn test_null_in_list_of_non_null() {
    let schema = build_schema(query());

    let result = schema.execute("{ strictNames }").await;

    assert_eq!(result.data, Some(json!({ "strictNames": null })));
    assert_eq!(
        result.errors[0].message,
        "Cannot return null for non-nullable field Query.strictNames."
    );
    assert_eq!(
        result.errors[0].path,
        vec![PathSegment::Field("strictNames".into())]
    );
}

#[test(tokio::test)]
async fn test_scalar_serialization_error() {
    let schema = build_schema(query());

    assert_eq!(
        "{ count }"
            .exec(json!({}), &schema)
            .await
            .unwrap_first_exec_error_msg(),
        "Int cannot represent non-integer value: \"many\""
    );
}

#[test(tokio::test)]
async fn test_error_in_non_null_root_field_nulls_the_data() {
    let query = declared::Object::new("Query")
        .field(
            declared::Field::new("name", declared::string())
                .resolve(|_| Err("no name".into())),
        )
        .build();
    let schema = build_schema(query);

    let result = schema.execute("{ name }").await;

    assert_eq!(result.data, None);
    assert_eq!(result.errors[0].message, "no name");
    assert_eq!(result.errors[0].path, vec![PathSegment::Field("name".into())]);
}

#[test(tokio::test)]
async fn test_runtime_type_must_be_a_possible_type() {
    let cat = declared::Object::new("Cat")
        .field(declared::Field::new("name", declared::string()))
        .build();
    let dog = declared::Object::new("Dog")
        .field(declared::Field::new("name", declared::string()))
        .build();
    let pet = declared::Union::new("Pet").member(cat).build();
    let query = declared::Object::new("Query")
        .field(
            declared::Field::new("pet", declared::optional(pet))
                .resolve(|_| Ok(ObjectValue::typed("Dog").with("name", "rex").into())),
        )
        .build();
    let schema = Schema::builder(query).types([dog]).build().unwrap();

    assert_eq!(
        "{ pet { __typename } }"
            .exec(json!({}), &schema)
            .await
            .unwrap_first_exec_error_msg(),
        "Runtime Object type \"Dog\" is not a possible type for \"Pet\"."
    );
}

#[test(tokio::test)]
async fn test_unknown_runtime_type() {
    let cat = declared::Object::new("Cat")
        .field(declared::Field::new("name", declared::string()))
        .build();
    let dog = declared::Object::new("Dog")
        .field(declared::Field::new("name", declared::string()))
        .build();
    let pet = declared::Union::new("Pet").member(cat).member(dog).build();
    let query = declared::Object::new("Query")
        .field(
            declared::Field::new("pet", declared::optional(pet))
                .resolve(|_| Ok(ObjectValue::new().with("name", "rex").into())),
        )
        .build();
    let schema = build_schema(query);

    let message = "{ pet { __typename } }"
        .exec(json!({}), &schema)
        .await
        .unwrap_first_exec_error_msg();

    assert!(
        message.starts_with("Abstract type \"Pet\" must resolve to an Object type at runtime"),
        "{message}"
    );
}
