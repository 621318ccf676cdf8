use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{Debug, Display},
};

use ordered_float::NotNan;
use schema_bridge_graphql::{ExecutionResult, GraphqlError, Request, Schema};
use tracing::info;

#[derive(Debug, Eq, PartialEq)]
pub enum TestError {
    /// The request was rejected before execution started
    GraphQL(Vec<GraphqlError>),
    /// Field errors raised during execution
    Execution(Vec<GraphqlError>),
}

impl Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (kind, errors) = match self {
            Self::GraphQL(errors) => ("GraphQL", errors),
            Self::Execution(errors) => ("Execution", errors),
        };
        write!(f, "{kind}: ")?;
        let mut iter = errors.iter().peekable();
        while let Some(error) = iter.next() {
            write!(f, "{}", error.message)?;
            if let Some(location) = error.locations.first() {
                write!(
                    f,
                    " (field at line {} column {})",
                    location.line, location.column
                )?;
            }
            if iter.peek().is_some() {
                write!(f, ", ")?;
            }
        }
        Ok(())
    }
}

/// Errors without data were raised before execution started.
pub fn into_test_result(result: ExecutionResult) -> Result<serde_json::Value, TestError> {
    match result.data {
        _ if result.errors.is_empty() => Ok(result.data.unwrap_or_default()),
        Some(_) => Err(TestError::Execution(result.errors)),
        None => Err(TestError::GraphQL(result.errors)),
    }
}

#[async_trait::async_trait]
pub trait Exec {
    async fn exec(
        self,
        variables: serde_json::Value,
        schema: &Schema,
    ) -> Result<serde_json::Value, TestError>;

    /// Execute without an async runtime.
    fn exec_sync(
        self,
        variables: serde_json::Value,
        schema: &Schema,
    ) -> Result<serde_json::Value, TestError>;
}

#[async_trait::async_trait]
impl Exec for &str {
    async fn exec(
        self,
        variables: serde_json::Value,
        schema: &Schema,
    ) -> Result<serde_json::Value, TestError> {
        let result = schema
            .execute(Request::new(self).variables(variables))
            .await;
        if !result.is_ok() {
            info!("errors: {:?}", result.errors);
        }
        into_test_result(result)
    }

    fn exec_sync(
        self,
        variables: serde_json::Value,
        schema: &Schema,
    ) -> Result<serde_json::Value, TestError> {
        into_test_result(schema.execute_sync(Request::new(self).variables(variables)))
    }
}

pub trait GraphqlTestResultExt {
    fn unwrap_first_graphql_error_msg(self) -> String;
    fn unwrap_first_exec_error_msg(self) -> String;
}

impl<T: Debug> GraphqlTestResultExt for Result<T, TestError> {
    #[track_caller]
    fn unwrap_first_graphql_error_msg(self) -> String {
        match self.unwrap_err() {
            TestError::GraphQL(errors) => errors.into_iter().next().expect("No errors").message,
            TestError::Execution(_) => {
                panic!("Error was an Execution error");
            }
        }
    }

    #[track_caller]
    fn unwrap_first_exec_error_msg(self) -> String {
        match self.unwrap_err() {
            TestError::Execution(errors) => errors.into_iter().next().expect("No errors").message,
            TestError::GraphQL(_) => {
                panic!("Error was a GraphQL error");
            }
        }
    }
}

pub trait GraphqlValueResultExt {
    fn unordered(self) -> Result<UnorderedValue, TestError>;
}

impl GraphqlValueResultExt for Result<serde_json::Value, TestError> {
    fn unordered(self) -> Result<UnorderedValue, TestError> {
        self.map(|value| value.unordered())
    }
}

pub trait ValueExt {
    fn field(&self, name: &str) -> &serde_json::Value;
    fn opt_field(&self, name: &str) -> Option<&serde_json::Value>;
    fn element(&self, index: usize) -> &serde_json::Value;
    fn unordered(&self) -> UnorderedValue;
}

impl ValueExt for serde_json::Value {
    fn field(&self, name: &str) -> &serde_json::Value {
        self.opt_field(name)
            .unwrap_or_else(|| panic!("field `{name}` was not present"))
    }

    fn opt_field(&self, name: &str) -> Option<&serde_json::Value> {
        self.as_object().expect("not an object").get(name)
    }

    fn element(&self, index: usize) -> &serde_json::Value {
        &self.as_array().expect("not a list")[index]
    }

    fn unordered(&self) -> UnorderedValue {
        match self {
            serde_json::Value::Null => UnorderedValue::Null,
            serde_json::Value::Bool(bool) => UnorderedValue::Boolean(*bool),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(int) => UnorderedValue::Int(int),
                None => UnorderedValue::Float(
                    NotNan::new(number.as_f64().expect("not a number")).unwrap(),
                ),
            },
            serde_json::Value::String(string) => UnorderedValue::String(string.clone()),
            serde_json::Value::Array(elements) => {
                UnorderedValue::Set(elements.iter().map(Self::unordered).collect())
            }
            serde_json::Value::Object(object) => UnorderedValue::Object(
                object
                    .iter()
                    .map(|(key, val)| (key.clone(), val.unordered()))
                    .collect(),
            ),
        }
    }
}

/// A macro for creating an UnorderedValue
#[macro_export]
macro_rules! graphql_value_unordered {
    ($($input:tt)*) => {
        $crate::graphql_test_utils::ValueExt::unordered(&serde_json::json!($($input)*))
    }
}

/// Version of a JSON value that does not care about ordering of arrays
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub enum UnorderedValue {
    Null,
    Boolean(bool),
    Int(i64),
    Float(NotNan<f64>),
    String(String),
    Set(BTreeSet<UnorderedValue>),
    Object(BTreeMap<String, UnorderedValue>),
}
