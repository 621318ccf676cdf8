use schema_bridge_graphql::{Schema, SchemaBuilder, SchemaError, descriptor::TypeDescriptor};

mod test_bridge_abstract;
mod test_bridge_cross_system;
mod test_bridge_errors;
mod test_bridge_mutation;
mod test_bridge_schema;
mod test_bridge_subscription;
mod test_bridge_validation;

fn main() {}

#[track_caller]
fn build_schema(query: TypeDescriptor) -> Schema {
    Schema::builder(query).build().unwrap()
}

/// The messages of a schema that fails validation.
#[track_caller]
fn validation_errors(builder: SchemaBuilder) -> Vec<String> {
    match builder.build() {
        Err(SchemaError::Validation(error)) => error.errors,
        Err(SchemaError::Conversion(error)) => panic!("conversion failed: {error}"),
        Ok(schema) => panic!("schema is valid:\n{schema}"),
    }
}
