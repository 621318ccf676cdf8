use pretty_assertions::assert_eq;
use schema_bridge_graphql::{
    ObjectValue, Request, Schema, SchemaConfig, SchemaError, TypeConversionError,
    class::{self, Argument, Field, ObjectType},
    declared,
    descriptor::{Origin, TypeDescriptor},
};
use schema_bridge_test_utils::graphql_test_utils::{Exec, GraphqlTestResultExt};
use serde_json::json;
use test_log::test;

use crate::build_schema;

fn hello_query() -> TypeDescriptor {
    ObjectType::new("Query")
        .field("hello", Field::new(class::string()).default_value("World"))
        .build()
}

#[test(tokio::test)]
async fn test_hello_world() {
    let schema = build_schema(hello_query());

    assert_eq!(schema.to_string(), "type Query {\n  hello: String\n}");
    assert_eq!(
        "{ hello }".exec(json!({}), &schema).await,
        Ok(json!({ "hello": "World" }))
    );
}

#[test]
fn test_hello_world_sync() {
    let schema = build_schema(hello_query());

    assert_eq!(
        "{ hello }".exec_sync(json!({}), &schema),
        Ok(json!({ "hello": "World" }))
    );
}

#[test(tokio::test)]
async fn test_unknown_field_is_rejected_before_execution() {
    let schema = build_schema(hello_query());

    let message = "{ nope }"
        .exec(json!({}), &schema)
        .await
        .unwrap_first_graphql_error_msg();

    assert!(
        message.starts_with("Unknown field \"nope\" on type \"Query\"."),
        "{message}"
    );
}

#[test(tokio::test)]
async fn test_decimal_is_one_scalar_for_both_systems() {
    let product = declared::Object::new("Product")
        .field(declared::Field::new(
            "price",
            declared::optional(declared::decimal()),
        ))
        .build();
    let query = ObjectType::new("Query")
        .field(
            "price",
            Field::new(class::decimal()).resolve(|_| Ok("3.50".into())),
        )
        .field(
            "product",
            Field::new(product).resolve(|_| Ok(ObjectValue::new().with("price", 1).into())),
        )
        .build();
    let schema = build_schema(query);

    let sdl = schema.sdl();
    assert_eq!(sdl.matches("scalar Decimal").count(), 1);
    assert_eq!(
        sdl,
        r#""""Decimal (fixed-point)"""
scalar Decimal

type Product {
  price: Decimal
}

type Query {
  price: Decimal
  product: Product
}"#
    );

    assert_eq!(
        "{ price product { price } }".exec(json!({}), &schema).await,
        Ok(json!({ "price": "3.50", "product": { "price": "1" } }))
    );
}

#[test]
fn test_printed_schema_parses() {
    let color = class::Enum::new("Color")
        .description("A color\nwith a long description")
        .value("RED", "red")
        .value("GREEN", "green")
        .build();
    let node = declared::Interface::new("Node")
        .field(declared::Field::new("id", declared::id()))
        .build();
    let user = declared::Object::new("User")
        .implements(node.clone())
        .field(declared::Field::new("id", declared::id()))
        .field(
            declared::Field::new("color", declared::optional(color.clone()))
                .argument(
                    declared::Argument::new("fallback", declared::optional(color))
                        .description("Used when the user has none")
                        .default("green"),
                )
                .deprecated("Use theme"),
        )
        .build();
    let query = declared::Object::new("Root")
        .field(declared::Field::new("node", declared::optional(node)))
        .field(declared::Field::new("users", declared::list(user)))
        .build();
    let schema = Schema::builder(query).build().unwrap();

    let sdl = schema.sdl();
    let document = graphql_parser::parse_schema::<String>(&sdl).unwrap();

    // schema block, Color, Node, Root, User
    assert_eq!(document.definitions.len(), 5, "{sdl}");
    assert!(sdl.contains("fallback: Color = GREEN"), "{sdl}");
    assert!(sdl.contains("@deprecated(reason: \"Use theme\")"), "{sdl}");
}

#[test]
fn test_unrecognized_descriptor_fails_the_build() {
    let query = ObjectType::new("Query")
        .field("thing", Field::new(TypeDescriptor::opaque::<u8>()))
        .build();

    let Err(error) = Schema::builder(query).build() else {
        panic!("schema was built");
    };

    assert!(matches!(
        error,
        SchemaError::Conversion(TypeConversionError::UnrecognizedType(ref name)) if name == "u8"
    ));
    assert_eq!(error.to_string(), "Expected a GraphQL type, but received: u8.");
}

#[test(tokio::test)]
async fn test_camel_case_can_be_disabled() {
    let query = || {
        ObjectType::new("Query")
            .field(
                "pet_type",
                Field::new(class::string())
                    .argument("max_len", Argument::new(class::int()).default_value(3))
                    .resolve(|params| {
                        let max_len = params.arg("max_len").and_then(|v| v.as_i64()).unwrap_or(0);
                        let pet_type = params
                            .parent
                            .get("pet_type")
                            .and_then(|v| v.as_str())
                            .unwrap_or_default();
                        Ok(pet_type.chars().take(max_len as usize).collect::<String>().into())
                    }),
            )
            .build()
    };
    let root = ObjectValue::new().with("pet_type", "doggo");

    let camel = build_schema(query());
    assert_eq!(
        camel.to_string(),
        "type Query {\n  petType(maxLen: Int = 3): String\n}"
    );
    let result = camel
        .execute(Request::new("{ petType }").root_value(root.clone()))
        .await;
    assert_eq!(result.data, Some(json!({ "petType": "dog" })));

    let verbatim = Schema::builder(query())
        .config(SchemaConfig {
            auto_camel_case: false,
            ..Default::default()
        })
        .build()
        .unwrap();
    assert_eq!(
        verbatim.to_string(),
        "type Query {\n  pet_type(max_len: Int = 3): String\n}"
    );
    let result = verbatim
        .execute(Request::new("{ pet_type(max_len: 5) }").root_value(root))
        .await;
    assert_eq!(result.data, Some(json!({ "pet_type": "doggo" })));
}

#[test]
fn test_type_lookup_knows_the_defining_system() {
    let pet = declared::Object::new("Pet")
        .field(declared::Field::new("name", declared::string()))
        .build();
    let query = ObjectType::new("Query")
        .field("pet", Field::new(pet))
        .build();
    let schema = build_schema(query);

    let origin = |name: &str| schema.get_type_by_name(name).map(|definition| definition.origin);

    assert_eq!(origin("Query"), Some(Origin::Class));
    assert_eq!(origin("Pet"), Some(Origin::Declared));
    assert_eq!(origin("Nope"), None);
    assert_eq!(schema.query_type().typename, "Query");
    assert!(schema.mutation_type().is_none());
    assert_eq!(schema.class_registry().get("Pet"), None);
    assert!(schema.class_registry().get("Query").is_some());
}
