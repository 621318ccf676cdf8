use std::sync::OnceLock;

use pretty_assertions::assert_eq;
use schema_bridge_graphql::{
    ObjectValue, Schema, Value,
    class::{self, Field, Interface, ObjectType},
    declared,
    descriptor::TypeDescriptor,
};
use schema_bridge_test_utils::{
    graphql_test_utils::{Exec, GraphqlValueResultExt},
    graphql_value_unordered,
};
use serde_json::json;
use test_log::test;

fn framework() -> TypeDescriptor {
    static FRAMEWORK: OnceLock<TypeDescriptor> = OnceLock::new();
    FRAMEWORK
        .get_or_init(|| {
            Interface::new("GraphQLFramework")
                .field("name", Field::new(class::string()).required())
                .field("language", Field::new(class::string()))
                .build()
        })
        .clone()
}

fn implementation(name: &str, extra_field: &str) -> TypeDescriptor {
    ObjectType::new(name)
        .interface(framework())
        .field(extra_field, Field::new(class::string()))
        .build()
}

fn framework_schema() -> Schema {
    let query = ObjectType::new("Query")
        .field(
            "frameworks",
            Field::new(class::list(class::non_null(framework()))).resolve(|_| {
                Ok(vec![
                    ObjectValue::typed("Strawberry")
                        .with("name", "strawberry")
                        .with("language", "python")
                        .with("graphql_core", "3.2"),
                    ObjectValue::typed("Juniper")
                        .with("name", "juniper")
                        .with("language", "rust")
                        .with("crate_name", "juniper"),
                    ObjectValue::typed("GraphqlJs")
                        .with("name", "graphql-js")
                        .with("package_name", "graphql"),
                ]
                .into())
            }),
        )
        .build();

    Schema::builder(query)
        .types([
            implementation("Strawberry", "graphql_core"),
            implementation("Juniper", "crate_name"),
            implementation("GraphqlJs", "package_name"),
        ])
        .build()
        .unwrap()
}

#[test]
fn test_interface_with_three_implementations() {
    let sdl = framework_schema().sdl();

    assert_eq!(sdl.matches(" implements GraphQLFramework").count(), 3, "{sdl}");
    assert!(sdl.contains(
        "type Strawberry implements GraphQLFramework {\n  name: String!\n  language: String\n  graphqlCore: String\n}"
    ));
}

#[test]
fn test_only_registered_types_are_in_the_schema() {
    // implements the interface, but is neither reachable nor registered
    let _unused = implementation("Unused", "nothing");
    let schema = framework_schema();

    assert!(schema.get_type_by_name("Unused").is_none());
    assert!(!schema.sdl().contains("Unused"));
    assert!(schema.get_type_by_name("Juniper").is_some());
}

#[test(tokio::test)]
async fn test_interface_values_resolve_by_typename() {
    let schema = framework_schema();

    assert_eq!(
        r#"{
            frameworks {
                __typename
                name
                ... on Strawberry { graphqlCore }
                ... on Juniper { crateName language }
            }
        }"#
        .exec(json!({}), &schema)
        .await
        .unordered(),
        Ok(graphql_value_unordered!({
            "frameworks": [
                { "__typename": "Strawberry", "name": "strawberry", "graphqlCore": "3.2" },
                { "__typename": "Juniper", "name": "juniper", "crateName": "juniper", "language": "rust" },
                { "__typename": "GraphqlJs", "name": "graphql-js" },
            ]
        }))
    );
}

#[test(tokio::test)]
async fn test_union_resolve_type_callback() {
    let user = declared::Object::new("User")
        .field(declared::Field::new("name", declared::string()))
        .build();
    let group = declared::Object::new("Group")
        .field(declared::Field::new("title", declared::string()))
        .build();
    let search_result = declared::Union::new("SearchResult")
        .member(user)
        .member(group)
        .resolve_type(|object| {
            object
                .get("kind")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .build();
    let query = declared::Object::new("Query")
        .field(
            declared::Field::new("search", declared::list(search_result)).resolve(|_| {
                Ok(vec![
                    ObjectValue::new().with("kind", "User").with("name", "ann"),
                    ObjectValue::new().with("kind", "Group").with("title", "admins"),
                ]
                .into())
            }),
        )
        .build();
    let schema = Schema::builder(query).build().unwrap();

    assert_eq!(
        r#"{
            search {
                __typename
                ... on User { name }
                ... on Group { title }
            }
        }"#
        .exec(json!({}), &schema)
        .await,
        Ok(json!({
            "search": [
                { "__typename": "User", "name": "ann" },
                { "__typename": "Group", "title": "admins" },
            ]
        }))
    );
}

#[test(tokio::test)]
async fn test_single_implementation_needs_no_typename() {
    let query = ObjectType::new("Query")
        .field(
            "framework",
            Field::new(framework())
                .resolve(|_| Ok(ObjectValue::new().with("name", "strawberry").into())),
        )
        .build();
    let schema = Schema::builder(query)
        .types([implementation("Strawberry", "graphql_core")])
        .build()
        .unwrap();

    assert_eq!(
        "{ framework { __typename name } }"
            .exec(json!({}), &schema)
            .await,
        Ok(json!({ "framework": { "__typename": "Strawberry", "name": "strawberry" } }))
    );
}

fn declared_juniper() -> TypeDescriptor {
    declared::Object::new("Juniper")
        .implements(framework())
        .field(declared::Field::new("name", declared::string()))
        .field(declared::Field::new("language", declared::optional(declared::string())))
        .field(declared::Field::new("crate", declared::optional(declared::string())))
        .build()
}

#[test(tokio::test)]
async fn test_implementations_from_both_systems() {
    let query = ObjectType::new("Query")
        .field(
            "frameworks",
            Field::new(class::list(class::non_null(framework()))).resolve(|_| {
                Ok(vec![
                    ObjectValue::typed("Strawberry").with("name", "strawberry"),
                    ObjectValue::typed("Juniper")
                        .with("name", "juniper")
                        .with("crate", "juniper"),
                ]
                .into())
            }),
        )
        .build();
    let schema = Schema::builder(query)
        .types([
            implementation("Strawberry", "graphql_core"),
            declared_juniper(),
            implementation("GraphqlJs", "package_name"),
        ])
        .build()
        .unwrap();

    let sdl = schema.sdl();
    assert_eq!(sdl.matches(" implements GraphQLFramework").count(), 3, "{sdl}");
    assert!(sdl.contains(
        "type Juniper implements GraphQLFramework {\n  name: String!\n  language: String\n  crate: String\n}"
    ));

    assert_eq!(
        r#"{
            frameworks {
                __typename
                name
                ... on Juniper { crate }
            }
        }"#
        .exec(json!({}), &schema)
        .await,
        Ok(json!({
            "frameworks": [
                { "__typename": "Strawberry", "name": "strawberry" },
                { "__typename": "Juniper", "name": "juniper", "crate": "juniper" },
            ]
        }))
    );
}

#[test(tokio::test)]
async fn test_class_object_implements_declared_interface() {
    let named = declared::Interface::new("Named")
        .field(declared::Field::new("name", declared::string()))
        .build();
    let tag = ObjectType::new("Tag")
        .interface(named.clone())
        .field("color", Field::new(class::string()))
        .build();
    let label = declared::Object::new("Label")
        .implements(named.clone())
        .field(declared::Field::new("name", declared::string()))
        .build();
    let query = declared::Object::new("Query")
        .field(
            declared::Field::new("named", declared::list(named)).resolve(|_| {
                Ok(vec![
                    ObjectValue::typed("Tag")
                        .with("name", "urgent")
                        .with("color", "red"),
                    ObjectValue::typed("Label").with("name", "draft"),
                ]
                .into())
            }),
        )
        .build();
    let schema = Schema::builder(query).types([tag, label]).build().unwrap();

    let sdl = schema.sdl();
    assert!(sdl.contains("type Tag implements Named {\n  name: String!\n  color: String\n}"));
    assert!(sdl.contains("type Label implements Named {\n  name: String!\n}"));

    assert_eq!(
        r#"{
            named {
                __typename
                name
                ... on Tag { color }
            }
        }"#
        .exec(json!({}), &schema)
        .await,
        Ok(json!({
            "named": [
                { "__typename": "Tag", "name": "urgent", "color": "red" },
                { "__typename": "Label", "name": "draft" },
            ]
        }))
    );
}
