use std::sync::Arc;

use pretty_assertions::{assert_eq, assert_ne};
use schema_bridge_graphql::{
    Extension, ObjectValue, Schema, SchemaBuilder, SyncToAsync, Value,
    class::{self, Argument, Field, Mutation, ObjectType},
};
use schema_bridge_test_utils::{
    counting_store::CountingStore,
    graphql_test_utils::{Exec, GraphqlTestResultExt},
};
use serde_json::json;
use test_log::test;

fn pet_schema(store: Arc<CountingStore>, extension: SyncToAsync) -> Schema {
    pet_schema_with(store, |builder| builder.extension(extension))
}

fn pet_schema_with(
    store: Arc<CountingStore>,
    extend: impl FnOnce(SchemaBuilder) -> SchemaBuilder,
) -> Schema {
    let add_pet = Mutation::new("AddPet")
        .argument("name", Argument::new(class::string()).required())
        .field("ok", Field::new(class::boolean()).required())
        .field("pet_count", Field::new(class::int()))
        .field("name", Field::new(class::string()))
        .mutate(move |params| {
            let name = params.try_arg("name")?.clone();
            if name.as_str() == Some("boom") {
                panic!("boom");
            }
            let count = store.increment();
            Ok(ObjectValue::new()
                .with("ok", true)
                .with("pet_count", count)
                .with("name", name)
                .into())
        })
        .build();

    let query = ObjectType::new("Query")
        .field("version", Field::new(class::string()).default_value("1"))
        .build();
    let mutation = ObjectType::new("Mutation")
        .field("add_pet", add_pet.field())
        .build();

    extend(Schema::builder(query).mutation(mutation))
        .build()
        .unwrap()
}

#[test(tokio::test)]
async fn test_mutation_runs_on_the_resolver_thread() {
    const ADD_PET: &str = r#"mutation { addPet(name: "rex") { ok petCount name } }"#;

    let sync_store = Arc::new(CountingStore::default());
    let sync_schema = pet_schema(sync_store.clone(), SyncToAsync::new(true));
    let async_store = Arc::new(CountingStore::default());
    let async_schema = pet_schema(async_store.clone(), SyncToAsync::new(true));

    assert!(sync_schema.sdl().contains(
        "type Mutation {\n  addPet(name: String!): AddPet\n}"
    ));

    let sync_result = sync_schema.execute_sync(ADD_PET);
    let async_result = async_schema.execute(ADD_PET).await;

    assert_eq!(sync_result, async_result);
    assert_eq!(
        sync_result.data,
        Some(json!({ "addPet": { "ok": true, "petCount": 1, "name": "rex" } }))
    );

    for store in [&sync_store, &async_store] {
        assert_eq!(store.writer_thread_names(), vec![Some("sync-to-async".to_string())]);
        assert_ne!(store.writer_threads()[0], std::thread::current().id());
    }
}

#[test(tokio::test)]
async fn test_later_extensions_do_not_bypass_the_resolver_thread() {
    struct PassThrough;

    impl Extension for PassThrough {}

    let store = Arc::new(CountingStore::default());
    let schema = pet_schema_with(store.clone(), |builder| {
        builder
            .extension(SyncToAsync::new(true))
            .extension(PassThrough)
    });

    assert_eq!(
        r#"mutation { addPet(name: "rex") { petCount } }"#
            .exec(json!({}), &schema)
            .await,
        Ok(json!({ "addPet": { "petCount": 1 } }))
    );
    assert_eq!(store.writer_thread_names(), vec![Some("sync-to-async".to_string())]);
}

#[test]
fn test_without_thread_sensitivity_or_runtime_mutations_run_inline() {
    let store = Arc::new(CountingStore::default());
    let schema = pet_schema(store.clone(), SyncToAsync::new(false));

    assert_eq!(
        r#"mutation { addPet(name: "rex") { petCount } }"#.exec_sync(json!({}), &schema),
        Ok(json!({ "addPet": { "petCount": 1 } }))
    );
    assert_eq!(store.writer_threads(), vec![std::thread::current().id()]);
}

#[test(tokio::test)]
async fn test_mutation_variables() {
    let store = Arc::new(CountingStore::default());
    let schema = pet_schema(store, SyncToAsync::default());

    assert_eq!(
        "mutation add($name: String!) { addPet(name: $name) { name } }"
            .exec(json!({ "name": "tom" }), &schema)
            .await,
        Ok(json!({ "addPet": { "name": "tom" } }))
    );
}

#[test(tokio::test)]
async fn test_panicking_resolver_becomes_a_field_error() {
    let store = Arc::new(CountingStore::default());
    let schema = pet_schema(store.clone(), SyncToAsync::default());

    let message = r#"mutation { addPet(name: "boom") { ok } }"#
        .exec(json!({}), &schema)
        .await
        .unwrap_first_exec_error_msg();

    assert_eq!(message, "boom");
    assert_eq!(store.count(), 0);

    // the resolver thread survives
    assert_eq!(
        r#"mutation { addPet(name: "rex") { petCount } }"#
            .exec(json!({}), &schema)
            .await,
        Ok(json!({ "addPet": { "petCount": 1 } }))
    );
}

#[test(tokio::test)]
async fn test_async_mutation_is_not_offloaded() {
    let mutation = ObjectType::new("Mutation")
        .field(
            "touch",
            Field::new(class::string()).resolve_async(|_| async {
                Ok(Value::from(
                    std::thread::current().name().unwrap_or("unnamed").to_string(),
                ))
            }),
        )
        .build();
    let query = ObjectType::new("Query")
        .field("version", Field::new(class::string()))
        .build();
    let schema = Schema::builder(query)
        .mutation(mutation)
        .extension(SyncToAsync::default())
        .build()
        .unwrap();

    let result = "mutation { touch }".exec(json!({}), &schema).await.unwrap();

    assert_ne!(result["touch"], json!("sync-to-async"));
}
