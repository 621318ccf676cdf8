use futures_util::{StreamExt, stream};
use pretty_assertions::assert_eq;
use schema_bridge_graphql::{
    ExecutionResult, Request, Schema, Value,
    class::{self, Argument, Field, ObjectType},
    declared,
    resolver::ResolverError,
};
use serde_json::json;
use test_log::test;

fn counter_schema() -> Schema {
    let query = ObjectType::new("Query")
        .field("version", Field::new(class::string()).default_value("1"))
        .build();
    let subscription = ObjectType::new("Subscription")
        .field(
            "count_to",
            Field::new(class::int())
                .argument("limit", Argument::new(class::int()).required())
                .subscribe(|params| {
                    let limit = params.arg("limit").and_then(Value::as_i64).unwrap_or(0);
                    stream::iter((1..=limit).map(|count| Ok(Value::from(count))))
                }),
        )
        .field(
            "fragile",
            Field::new(class::string()).subscribe(|_| {
                stream::iter([Ok(Value::from("first")), Err(ResolverError::new("boom"))])
            }),
        )
        .build();

    Schema::builder(query)
        .subscription(subscription)
        .build()
        .unwrap()
}

fn data(results: &[ExecutionResult]) -> Vec<Option<serde_json::Value>> {
    results.iter().map(|result| result.data.clone()).collect()
}

#[test(tokio::test)]
async fn test_one_result_per_event() {
    let schema = counter_schema();

    assert!(
        schema
            .sdl()
            .contains("type Subscription {\n  countTo(limit: Int!): Int\n  fragile: String\n}")
    );

    let results: Vec<_> = schema
        .subscribe("subscription { countTo(limit: 3) }")
        .collect()
        .await;

    assert!(results.iter().all(ExecutionResult::is_ok));
    assert_eq!(
        data(&results),
        vec![
            Some(json!({ "countTo": 1 })),
            Some(json!({ "countTo": 2 })),
            Some(json!({ "countTo": 3 })),
        ]
    );
}

#[test(tokio::test)]
async fn test_subscription_variables() {
    let schema = counter_schema();

    let results: Vec<_> = schema
        .subscribe(
            Request::new("subscription count($limit: Int!) { countTo(limit: $limit) }")
                .variables(json!({ "limit": 2 })),
        )
        .collect()
        .await;

    assert_eq!(results.len(), 2);
}

#[test(tokio::test)]
async fn test_error_event() {
    let schema = counter_schema();

    let results: Vec<_> = schema.subscribe("subscription { fragile }").collect().await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].data, Some(json!({ "fragile": "first" })));
    assert_eq!(results[1].errors[0].message, "boom");
}

#[test(tokio::test)]
async fn test_declared_subscription_field() {
    let query = declared::Object::new("Query")
        .field(declared::Field::new("version", declared::string()).default("1"))
        .build();
    let subscription = declared::Object::new("Subscription")
        .field(
            declared::Field::new("greetings", declared::string()).subscribe(|_| {
                stream::iter(["hi", "bonjour"].map(|greeting| Ok(Value::from(greeting))))
            }),
        )
        .build();
    let schema = Schema::builder(query)
        .subscription(subscription)
        .build()
        .unwrap();

    let results: Vec<_> = schema
        .subscribe("subscription { greetings }")
        .collect()
        .await;

    assert_eq!(
        data(&results),
        vec![
            Some(json!({ "greetings": "hi" })),
            Some(json!({ "greetings": "bonjour" })),
        ]
    );
}

#[test(tokio::test)]
async fn test_query_through_subscribe_runs_once() {
    let schema = counter_schema();

    let results: Vec<_> = schema.subscribe("{ version }").collect().await;

    assert_eq!(data(&results), vec![Some(json!({ "version": "1" }))]);
}
