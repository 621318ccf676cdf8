use std::fmt::{self, Display};

use thiserror::Error;

/// A descriptor could not be turned into a GraphQL type.
///
/// This is fatal for the schema build, and raised as soon as the descriptor is met.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum TypeConversionError {
    #[error("Expected a GraphQL type, but received: {0}.")]
    UnrecognizedType(String),
    #[error("Type {0} is defined by a foreign type system, but no converter for it was provided.")]
    NoForeignConverter(String),
    #[error("Expected a named GraphQL type, but received: {0}.")]
    ExpectedNamedType(String),
    #[error("Deferred type reference did not resolve to a type after {0} steps.")]
    UnresolvedDeferred(usize),
}

/// Every problem found in a fully converted schema.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub struct SchemaValidationError {
    pub errors: Vec<String>,
}

impl SchemaValidationError {
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(String::as_str)
    }
}

impl Display for SchemaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid Schema. Errors:\n\n")?;
        let mut iter = self.errors.iter().peekable();
        while let Some(error) = iter.next() {
            write!(f, "❌ {error}")?;
            if iter.peek().is_some() {
                write!(f, "\n\n")?;
            }
        }
        Ok(())
    }
}

#[derive(Error, Clone, Debug)]
pub enum SchemaError {
    #[error("{0}")]
    Conversion(#[from] TypeConversionError),
    #[error("{0}")]
    Validation(#[from] SchemaValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_message() {
        let error = SchemaValidationError {
            errors: vec![
                "Query root type must be provided.".into(),
                "Union type U must define one or more member types.".into(),
            ],
        };

        assert_eq!(
            error.to_string(),
            "Invalid Schema. Errors:\n\n\
            ❌ Query root type must be provided.\n\n\
            ❌ Union type U must define one or more member types."
        );
    }
}
