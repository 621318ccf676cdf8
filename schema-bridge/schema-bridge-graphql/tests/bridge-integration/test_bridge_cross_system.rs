use std::sync::OnceLock;

use pretty_assertions::assert_eq;
use schema_bridge_graphql::{
    ObjectValue, Value,
    class::{self, Argument, Field, ObjectType},
    declared,
    descriptor::TypeDescriptor,
    resolver::ResolverError,
};
use schema_bridge_test_utils::graphql_test_utils::{Exec, GraphqlTestResultExt};
use serde_json::json;
use test_log::test;

use crate::build_schema;

#[test(tokio::test)]
async fn test_class_query_returns_declared_object() {
    let pet = declared::Object::new("Pet")
        .field(declared::Field::new("name", declared::string()))
        .field(declared::Field::new("pet_type", declared::string()))
        .build();
    let query = ObjectType::new("Query")
        .field(
            "pet",
            Field::new(pet).resolve(|_| {
                Ok(ObjectValue::new()
                    .with("name", "Patchy")
                    .with("pet_type", "cat")
                    .into())
            }),
        )
        .build();
    let schema = build_schema(query);

    assert!(schema.sdl().contains("type Pet {\n  name: String!\n  petType: String!\n}"));
    assert_eq!(
        "{ pet { name petType } }".exec(json!({}), &schema).await,
        Ok(json!({ "pet": { "name": "Patchy", "petType": "cat" } }))
    );
}

fn owner() -> TypeDescriptor {
    static OWNER: OnceLock<TypeDescriptor> = OnceLock::new();
    OWNER
        .get_or_init(|| {
            declared::Object::new("Owner")
                .field(declared::Field::new("name", declared::string()))
                .field(declared::Field::new(
                    "pets",
                    declared::list(declared::lazy(animal)),
                ))
                .build()
        })
        .clone()
}

fn animal() -> TypeDescriptor {
    static ANIMAL: OnceLock<TypeDescriptor> = OnceLock::new();
    ANIMAL
        .get_or_init(|| {
            ObjectType::new("Animal")
                .field("name", Field::new(class::string()).required())
                .field("owner", Field::new(class::lazy(owner)))
                .build()
        })
        .clone()
}

#[test(tokio::test)]
async fn test_mutually_recursive_types_across_systems() {
    let query = declared::Object::new("Query")
        .field(
            declared::Field::new("owner", declared::optional(owner())).resolve(|_| {
                let owner = ObjectValue::new().with("name", "ann");
                let animal = ObjectValue::new()
                    .with("name", "rex")
                    .with("owner", owner.clone());
                Ok(owner.with("pets", vec![animal]).into())
            }),
        )
        .build();
    let schema = build_schema(query);

    let sdl = schema.sdl();
    assert!(sdl.contains("type Animal {\n  name: String!\n  owner: Owner\n}"), "{sdl}");
    assert!(sdl.contains("type Owner {\n  name: String!\n  pets: [Animal!]!\n}"), "{sdl}");
    assert_eq!(
        "{ owner { name pets { name owner { name } } } }"
            .exec(json!({}), &schema)
            .await,
        Ok(json!({
            "owner": {
                "name": "ann",
                "pets": [{ "name": "rex", "owner": { "name": "ann" } }]
            }
        }))
    );
}

fn color_query() -> TypeDescriptor {
    let color = class::Enum::new("Color")
        .value("RED", "red")
        .value("GREEN", "green")
        .build();
    ObjectType::new("Query")
        .field(
            "echo",
            Field::new(color.clone())
                .argument("color", Argument::new(color.clone()).default_value("green"))
                .resolve(|params| Ok(params.try_arg("color")?.clone())),
        )
        .field(
            "internal",
            Field::new(class::string())
                .argument("color", Argument::new(color).required())
                .resolve(|params| Ok(params.try_arg("color")?.clone())),
        )
        .build()
}

#[test(tokio::test)]
async fn test_enum_values_are_internal_inside_resolvers() {
    let schema = build_schema(color_query());

    assert!(schema.sdl().contains("echo(color: Color = GREEN): Color"));
    assert_eq!(
        r#"{
            red: echo(color: RED)
            fallback: echo
            internal(color: RED)
        }"#
        .exec(json!({}), &schema)
        .await,
        Ok(json!({ "red": "RED", "fallback": "GREEN", "internal": "red" }))
    );
}

#[test(tokio::test)]
async fn test_enum_variables_use_names() {
    let schema = build_schema(color_query());

    assert_eq!(
        "query q($color: Color!) { internal(color: $color) }"
            .exec(json!({ "color": "GREEN" }), &schema)
            .await,
        Ok(json!({ "internal": "green" }))
    );
}

fn describe_query() -> TypeDescriptor {
    let pet_input = declared::Input::new("PetInput")
        .field(declared::Argument::new("name", declared::string()))
        .field(declared::Argument::new("pet_type", declared::string()).default("cat"))
        .build();
    ObjectType::new("Query")
        .field(
            "describe",
            Field::new(class::string())
                .argument("pet", Argument::new(pet_input).required())
                .resolve(|params| {
                    let pet = params
                        .try_arg("pet")?
                        .as_object()
                        .ok_or_else(|| ResolverError::new("pet is not an object"))?;
                    let field = |name: &str| pet.get(name).and_then(Value::as_str).unwrap_or("?");
                    Ok(format!("{} the {}", field("name"), field("pet_type")).into())
                }),
        )
        .build()
}

#[test(tokio::test)]
async fn test_declared_input_object_with_defaults() {
    let schema = build_schema(describe_query());

    assert!(schema.sdl().contains("input PetInput {\n  name: String!\n  petType: String! = \"cat\"\n}"));
    assert_eq!(
        r#"{
            patchy: describe(pet: { name: "Patchy" })
            rex: describe(pet: { name: "Rex", petType: "dog" })
        }"#
        .exec(json!({}), &schema)
        .await,
        Ok(json!({ "patchy": "Patchy the cat", "rex": "Rex the dog" }))
    );
}

#[test(tokio::test)]
async fn test_declared_input_object_from_variables() {
    let schema = build_schema(describe_query());

    assert_eq!(
        "query q($pet: PetInput!) { describe(pet: $pet) }"
            .exec(json!({ "pet": { "name": "Tom" } }), &schema)
            .await,
        Ok(json!({ "describe": "Tom the cat" }))
    );
}

#[test(tokio::test)]
async fn test_input_object_requires_its_fields() {
    let schema = build_schema(describe_query());

    let message = r#"{ describe(pet: { petType: "dog" }) }"#
        .exec(json!({}), &schema)
        .await
        .unwrap_first_graphql_error_msg();

    assert!(message.contains("name"), "{message}");
}
