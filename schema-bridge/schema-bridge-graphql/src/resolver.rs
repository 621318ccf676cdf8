use std::{fmt::Debug, future::Future, sync::Arc};

use futures_util::{
    FutureExt, Stream, StreamExt,
    future::BoxFuture,
    stream::BoxStream,
};
use indexmap::IndexMap;
use thiserror::Error;

use crate::value::{ObjectValue, Value};

pub type ResolverResult = Result<Value, ResolverError>;

pub type SyncResolverFn = Arc<dyn Fn(ResolveParams) -> ResolverResult + Send + Sync>;
pub type AsyncResolverFn =
    Arc<dyn Fn(ResolveParams) -> BoxFuture<'static, ResolverResult> + Send + Sync>;
pub type StreamResolverFn =
    Arc<dyn Fn(ResolveParams) -> BoxStream<'static, ResolverResult> + Send + Sync>;

/// Picks the concrete object type name for a value of an interface or union type.
pub type ResolveTypeFn = Arc<dyn Fn(&ObjectValue) -> Option<String> + Send + Sync>;

/// Serializer or parser of a custom scalar.
pub type ScalarFn = Arc<dyn Fn(&Value) -> ResolverResult + Send + Sync>;

/// A field resolver, as written by the user of either type system.
#[derive(Clone)]
pub enum Resolver {
    /// A blocking resolver
    Sync(SyncResolverFn),
    /// A suspension-capable resolver
    Async(AsyncResolverFn),
    /// Event source of a subscription field
    Stream(StreamResolverFn),
}

impl Resolver {
    pub fn sync(resolver: impl Fn(ResolveParams) -> ResolverResult + Send + Sync + 'static) -> Self {
        Self::Sync(Arc::new(resolver))
    }

    pub fn from_async<F, Fut>(resolver: F) -> Self
    where
        F: Fn(ResolveParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ResolverResult> + Send + 'static,
    {
        Self::Async(Arc::new(move |params| resolver(params).boxed()))
    }

    pub fn stream<F, S>(resolver: F) -> Self
    where
        F: Fn(ResolveParams) -> S + Send + Sync + 'static,
        S: Stream<Item = ResolverResult> + Send + 'static,
    {
        Self::Stream(Arc::new(move |params| resolver(params).boxed()))
    }

    pub fn is_async(&self) -> bool {
        !matches!(self, Self::Sync(_))
    }
}

impl Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sync(_) => write!(f, "Resolver::Sync"),
            Self::Async(_) => write!(f, "Resolver::Async"),
            Self::Stream(_) => write!(f, "Resolver::Stream"),
        }
    }
}

/// Everything a resolver gets to see about one field invocation.
#[derive(Clone, Debug)]
pub struct ResolveParams {
    pub parent: Arc<ObjectValue>,
    /// Arguments keyed by source name, defaults applied
    pub args: IndexMap<String, Value>,
    pub info: ResolveInfo,
}

impl ResolveParams {
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    pub fn try_arg(&self, name: &str) -> Result<&Value, ResolverError> {
        self.args
            .get(name)
            .ok_or_else(|| ResolverError::new(format!("missing argument `{name}`")))
    }
}

#[derive(Clone, Debug)]
pub struct ResolveInfo {
    pub parent_type: String,
    pub field_name: String,
    pub return_type: String,
}

impl ResolveInfo {
    pub fn is_introspection(&self) -> bool {
        self.field_name.starts_with("__") || self.parent_type.starts_with("__")
    }
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{message}")]
pub struct ResolverError {
    pub message: String,
}

impl ResolverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<&str> for ResolverError {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResolverError {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
