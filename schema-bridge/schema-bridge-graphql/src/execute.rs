//! The query execution boundary.

use std::sync::Arc;

use ::async_graphql::{ServerError, Variables, dynamic::DynamicRequestExt};
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use tracing::debug;

use crate::{
    lower::{self, propagation::ExecutionState},
    schema::Schema,
    value::ObjectValue,
};

#[derive(Clone, Debug, Default)]
pub struct Request {
    pub query: String,
    pub operation_name: Option<String>,
    /// A JSON object of variable values, or null
    pub variables: serde_json::Value,
    /// The parent value of the root fields
    pub root_value: ObjectValue,
}

impl Request {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    pub fn variables(mut self, variables: serde_json::Value) -> Self {
        self.variables = variables;
        self
    }

    pub fn root_value(mut self, root_value: ObjectValue) -> Self {
        self.root_value = root_value;
        self
    }
}

impl From<&str> for Request {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

impl From<String> for Request {
    fn from(query: String) -> Self {
        Self::new(query)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExecutionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphqlError>,
}

impl ExecutionResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn from_response(response: ::async_graphql::Response, field_errors: Vec<ServerError>) -> Self {
        let mut errors: Vec<GraphqlError> = field_errors.into_iter().map(GraphqlError::from).collect();
        errors.extend(response.errors.into_iter().map(GraphqlError::from));

        let data = match response.data {
            ::async_graphql::Value::Null if !errors.is_empty() => None,
            data => Some(data.into_json().unwrap_or(serde_json::Value::Null)),
        };

        Self { data, errors }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl From<ServerError> for GraphqlError {
    fn from(error: ServerError) -> Self {
        Self {
            message: error.message,
            locations: error
                .locations
                .into_iter()
                .map(|pos| Location {
                    line: pos.line,
                    column: pos.column,
                })
                .collect(),
            path: error
                .path
                .into_iter()
                .map(|segment| match segment {
                    ::async_graphql::PathSegment::Field(name) => PathSegment::Field(name),
                    ::async_graphql::PathSegment::Index(index) => PathSegment::Index(index),
                })
                .collect(),
        }
    }
}

impl Schema {
    pub async fn execute(&self, request: impl Into<Request>) -> ExecutionResult {
        let state = Arc::new(ExecutionState::default());
        let request = engine_request(request.into(), &state);

        let response = self.executable.execute(request).await;
        let result = ExecutionResult::from_response(response, state.take_errors());

        debug!("Executed request with {} errors", result.errors.len());
        result
    }

    /// Execute on the calling thread, blocking until the result is complete.
    pub fn execute_sync(&self, request: impl Into<Request>) -> ExecutionResult {
        futures_executor::block_on(self.execute(request))
    }

    /// One result per event of the subscription root field.
    pub fn subscribe(
        &self,
        request: impl Into<Request>,
    ) -> impl Stream<Item = ExecutionResult> + Send + '_ {
        let state = Arc::new(ExecutionState::default());
        let request = engine_request(request.into(), &state);

        self.executable
            .execute_stream(request)
            .map(move |response| ExecutionResult::from_response(response, state.take_errors()))
    }
}

fn engine_request(
    request: Request,
    state: &Arc<ExecutionState>,
) -> ::async_graphql::dynamic::DynamicRequest {
    let mut engine_request = ::async_graphql::Request::new(request.query)
        .variables(Variables::from_json(request.variables))
        .data(state.clone());
    if let Some(operation_name) = request.operation_name {
        engine_request = engine_request.operation_name(operation_name);
    }
    engine_request.root_value(lower::root_value(request.root_value))
}
