#![forbid(unsafe_code)]

//! One executable GraphQL schema out of two type definition systems.
//!
//! [declared] types are native to the host builder, [class] types are foreign to it
//! and enter the schema through the [converter::CrossSystemConverter].

pub mod class;
pub mod converter;
pub mod data;
pub mod declared;
pub mod descriptor;
pub mod error;
pub mod execute;
pub mod extension;
pub mod host;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod value;

mod fields;
mod lower;
mod naming;
mod sdl;
mod validate;

pub mod async_graphql {
    pub use ::async_graphql::*;
}

pub use error::{SchemaError, SchemaValidationError, TypeConversionError};
pub use execute::{ExecutionResult, GraphqlError, Request};
pub use extension::{Extension, SyncToAsync};
pub use schema::{Schema, SchemaBuilder, SchemaConfig};
pub use value::{ObjectValue, Value};
