//! Field error handling on top of the execution engine.
//!
//! An error in a field resolves the closest nullable field on its path to `null`,
//! and is recorded together with the path of the field that raised it.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use ::async_graphql::{
    PathSegment, QueryPathNode, QueryPathSegment, ServerError, ServerResult, Value as ConstValue,
    extensions::{
        Extension as EngineExtension, ExtensionContext, ExtensionFactory, NextResolve, ResolveInfo,
    },
};
use async_trait::async_trait;
use tracing::trace;

/// Per-request state shared by the field resolvers and [NullPropagation].
#[derive(Default)]
pub(crate) struct ExecutionState {
    errors: Mutex<Vec<ServerError>>,
    /// Paths of list items and subscription events that completed to `null`
    null_values: Mutex<HashSet<String>>,
}

impl ExecutionState {
    pub fn mark_null(&self, path: String) {
        if let Ok(mut null_values) = self.null_values.lock() {
            null_values.insert(path);
        }
    }

    /// Each mark is consumed by the first lookup.
    fn take_null_mark(&self, path: &str) -> bool {
        self.null_values
            .lock()
            .map(|mut null_values| null_values.remove(path))
            .unwrap_or(false)
    }

    fn push_error(&self, error: ServerError) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(error);
        }
    }

    /// Take the errors recorded so far.
    pub fn take_errors(&self) -> Vec<ServerError> {
        self.errors
            .lock()
            .map(|mut errors| std::mem::take(&mut *errors))
            .unwrap_or_default()
    }
}

pub(crate) fn path_key(node: &QueryPathNode) -> String {
    node.to_string()
}

fn error_path(node: &QueryPathNode) -> Vec<PathSegment> {
    let mut path: Vec<PathSegment> = std::iter::once(node)
        .chain(node.parents())
        .map(|node| match node.segment {
            QueryPathSegment::Name(name) => PathSegment::Field(name.to_string()),
            QueryPathSegment::Index(index) => PathSegment::Index(index),
        })
        .collect();
    path.reverse();
    path
}

pub(crate) struct NullPropagation;

impl ExtensionFactory for NullPropagation {
    fn create(&self) -> Arc<dyn EngineExtension> {
        Arc::new(NullPropagation)
    }
}

#[async_trait]
impl EngineExtension for NullPropagation {
    async fn resolve(
        &self,
        ctx: &ExtensionContext<'_>,
        info: ResolveInfo<'_>,
        next: NextResolve<'_>,
    ) -> ServerResult<Option<ConstValue>> {
        let state = ctx.data_opt::<Arc<ExecutionState>>();
        let path_node = info.path_node;
        let nullable = !info.return_type.ends_with('!');

        if let Some(state) = state {
            if state.take_null_mark(&path_key(path_node)) {
                return Ok(None);
            }
        }

        match next.run(ctx, info).await {
            Ok(value) => Ok(value),
            Err(mut error) => {
                if error.path.is_empty() {
                    error.path = error_path(path_node);
                }
                match state {
                    Some(state) if nullable => {
                        trace!("`{path_node}` resolved to null: {}", error.message);
                        state.push_error(error);
                        Ok(None)
                    }
                    _ => Err(error),
                }
            }
        }
    }
}
