use pretty_assertions::assert_eq;
use schema_bridge_graphql::{
    Schema, SchemaError,
    class::{self, Argument, Field, ObjectType},
    declared,
};
use test_log::test;

use crate::validation_errors;

#[test]
fn test_all_problems_are_reported_together() {
    let query = ObjectType::new("Query")
        .field("empty", Field::new(ObjectType::new("Empty").build()))
        .field("nothing", Field::new(class::Union::new("Nothing").build()))
        .field("mood", Field::new(class::Enum::new("Mood").build()))
        .build();

    let Err(error) = Schema::builder(query).build() else {
        panic!("schema is valid");
    };
    assert!(error.to_string().starts_with("Invalid Schema. Errors:"));

    let SchemaError::Validation(error) = error else {
        panic!("not a validation error");
    };
    assert_eq!(
        error.errors,
        vec![
            "Type Empty must define one or more fields.",
            "Union type Nothing must define one or more member types.",
            "Enum type Mood must define one or more values.",
        ]
    );
}

#[test]
fn test_same_name_in_both_systems() {
    let declared_pet = declared::Object::new("Pet")
        .field(declared::Field::new("name", declared::string()))
        .build();
    let class_pet = ObjectType::new("Pet")
        .field("name", Field::new(class::string()))
        .build();
    let query = declared::Object::new("Query")
        .field(declared::Field::new("pet", declared::optional(declared_pet)))
        .field(declared::Field::new("other_pet", declared::optional(class_pet)))
        .build();

    assert_eq!(
        validation_errors(Schema::builder(query)),
        vec![
            "Schema must contain uniquely named types but contains multiple types named \"Pet\"."
        ]
    );
}

#[test]
fn test_reusing_one_definition_is_fine() {
    let pet = ObjectType::new("Pet")
        .field("name", Field::new(class::string()))
        .build();
    let query = declared::Object::new("Query")
        .field(declared::Field::new("pet", declared::optional(pet.clone())))
        .field(declared::Field::new("pets", declared::list(pet)))
        .build();

    assert!(Schema::builder(query).build().is_ok());
}

#[test]
fn test_duplicate_fields_and_arguments() {
    let query = ObjectType::new("Query")
        .field("pet_name", Field::new(class::string()))
        .field(
            "petName",
            Field::new(class::string())
                .argument("first", Argument::new(class::int()))
                .argument("first", Argument::new(class::int())),
        )
        .build();

    assert_eq!(
        validation_errors(Schema::builder(query)),
        vec![
            "Argument \"Query.petName(first:)\" can only be defined once.",
            "Field \"Query.petName\" can only be defined once.",
        ]
    );
}

#[test]
fn test_interface_field_types_must_match() {
    let named = declared::Interface::new("Named")
        .field(declared::Field::new("name", declared::string()))
        .build();
    let pet = ObjectType::new("Pet")
        .interface(named)
        .field("name", Field::new(class::string()))
        .build();
    let query = ObjectType::new("Query")
        .field("pet", Field::new(pet))
        .build();

    assert_eq!(
        validation_errors(Schema::builder(query)),
        vec!["Interface field Named.name expects type String! but Pet.name is type String."]
    );
}

#[test]
fn test_query_root_must_be_an_object() {
    let mood = declared::Enum::new("Mood").value("HAPPY", "happy").build();

    assert_eq!(
        validation_errors(Schema::builder(mood)),
        vec!["Query root type must be Object type, it cannot be Mood."]
    );
}

#[test]
fn test_directive_needs_locations() {
    let query = declared::Object::new("Query")
        .field(declared::Field::new("version", declared::string()))
        .build();
    let directive = declared::Directive::new("auth").build();

    assert_eq!(
        validation_errors(Schema::builder(query).directive(directive)),
        vec!["Directive @auth must include 1 or more locations."]
    );
}
