use std::{
    fmt::{self, Display},
    sync::Arc,
};

use fnv::FnvHashMap;
use indexmap::IndexMap;
use tracing::debug;

use crate::{
    converter::CrossSystemConverter,
    data::{DirectiveData, TypeArena, TypeData, TypeIndex, TypeKind},
    descriptor::{BuiltinScalar, DirectiveDef, ScalarDef, TypeDescriptor},
    error::{SchemaError, SchemaValidationError},
    extension::Extension,
    host::{ConcreteType, HostConverter, HostOutput, TypeDefinition, scalars},
    lower,
    registry::TypeRegistry,
    sdl, validate,
};

#[derive(Clone, Debug)]
pub struct SchemaConfig {
    /// Convert field and argument names to camelCase, default `true`
    pub auto_camel_case: bool,
    /// Description of the schema itself
    pub description: Option<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            auto_camel_case: true,
            description: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RootTypes {
    pub query: TypeIndex,
    pub mutation: Option<TypeIndex>,
    pub subscription: Option<TypeIndex>,
}

/// The validated type graph, shared by printing and execution.
pub(crate) struct SchemaData {
    pub arena: TypeArena,
    pub type_map: IndexMap<String, ConcreteType>,
    pub roots: RootTypes,
    pub directives: Vec<DirectiveData>,
    pub description: Option<String>,
    possible_types: FnvHashMap<TypeIndex, Vec<TypeIndex>>,
}

impl SchemaData {
    /// Object types that may stand in for an abstract type at runtime.
    pub fn possible_types(&self, abstract_type: TypeIndex) -> &[TypeIndex] {
        self.possible_types
            .get(&abstract_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn type_index(&self, name: &str) -> Option<TypeIndex> {
        self.type_map
            .get(name)
            .map(|concrete| concrete.implementation)
    }
}

/// Collect the implementations of every interface and the members of every union.
pub(crate) fn collect_possible_types(arena: &TypeArena) -> FnvHashMap<TypeIndex, Vec<TypeIndex>> {
    let mut possible_types: FnvHashMap<TypeIndex, Vec<TypeIndex>> = Default::default();
    for (index, type_data) in arena.iter() {
        match &type_data.kind {
            TypeKind::Object(object) => {
                for interface in &object.interfaces {
                    possible_types.entry(*interface).or_default().push(index);
                }
            }
            TypeKind::Union(union) => {
                possible_types
                    .entry(index)
                    .or_default()
                    .extend(union.members.iter().copied());
            }
            _ => {}
        }
    }
    possible_types
}

pub struct SchemaBuilder {
    query: TypeDescriptor,
    mutation: Option<TypeDescriptor>,
    subscription: Option<TypeDescriptor>,
    directives: Vec<Arc<DirectiveDef>>,
    types: Vec<TypeDescriptor>,
    extensions: Vec<Arc<dyn Extension>>,
    config: SchemaConfig,
    scalar_overrides: Vec<(BuiltinScalar, ScalarDef)>,
}

impl SchemaBuilder {
    pub fn mutation(mut self, mutation: impl Into<TypeDescriptor>) -> Self {
        self.mutation = Some(mutation.into());
        self
    }

    pub fn subscription(mut self, subscription: impl Into<TypeDescriptor>) -> Self {
        self.subscription = Some(subscription.into());
        self
    }

    pub fn directive(mut self, directive: Arc<DirectiveDef>) -> Self {
        self.directives.push(directive);
        self
    }

    /// Include a type even if nothing reachable from the root types refers to it.
    pub fn types(mut self, types: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        self.types.extend(types);
        self
    }

    pub fn extension(mut self, extension: impl Extension) -> Self {
        self.extensions.push(Arc::new(extension));
        self
    }

    pub fn config(mut self, config: SchemaConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the definition of a builtin scalar, e.g. to customize `Decimal`.
    pub fn scalar_override(mut self, scalar: BuiltinScalar, definition: ScalarDef) -> Self {
        self.scalar_overrides.push((scalar, definition));
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut scalar_registry = scalars::default_scalar_registry();
        for (scalar, definition) in self.scalar_overrides {
            scalar_registry.insert(scalar, Arc::new(definition));
        }

        let mut host = HostConverter::new(self.config.auto_camel_case, scalar_registry);
        let mut converter = CrossSystemConverter::new();

        let roots = RootTypes {
            query: host.from_object_type(&self.query, &mut converter)?,
            mutation: match &self.mutation {
                Some(mutation) => Some(host.from_object_type(mutation, &mut converter)?),
                None => None,
            },
            subscription: match &self.subscription {
                Some(subscription) => Some(host.from_object_type(subscription, &mut converter)?),
                None => None,
            },
        };

        let mut directives = host.builtin_directives();
        for directive in &self.directives {
            directives.push(host.from_directive(directive, &mut converter)?);
        }

        for ty in &self.types {
            host.from_object_type(ty, &mut converter)?;
        }

        let HostOutput {
            arena,
            type_map,
            deferred_errors,
        } = host.finish();

        let errors = validate::validate_schema(&arena, &roots, &directives, deferred_errors);
        if !errors.is_empty() {
            return Err(SchemaValidationError { errors }.into());
        }

        let possible_types = collect_possible_types(&arena);
        let data = Arc::new(SchemaData {
            arena,
            type_map,
            roots,
            directives,
            description: self.config.description,
            possible_types,
        });
        let extensions: Arc<[Arc<dyn Extension>]> = self.extensions.into();

        let executable = lower::lower_schema(&data, &extensions).map_err(|error| {
            SchemaValidationError {
                errors: vec![error],
            }
        })?;

        let schema = Schema {
            data,
            registry: converter.into_registry(),
            executable,
        };

        // Don't spam the log system if the schema is very large
        if schema.data.arena.len() < 100 {
            debug!("Created schema \n{schema}");
        } else {
            debug!("Created schema with {} types", schema.data.arena.len());
        }

        Ok(schema)
    }
}

/// An executable GraphQL schema merged from declared and class types.
pub struct Schema {
    pub(crate) data: Arc<SchemaData>,
    registry: TypeRegistry,
    pub(crate) executable: ::async_graphql::dynamic::Schema,
}

impl Schema {
    pub fn builder(query: impl Into<TypeDescriptor>) -> SchemaBuilder {
        SchemaBuilder {
            query: query.into(),
            mutation: None,
            subscription: None,
            directives: vec![],
            types: vec![],
            extensions: vec![],
            config: SchemaConfig::default(),
            scalar_overrides: vec![],
        }
    }

    pub fn arena(&self) -> &TypeArena {
        &self.data.arena
    }

    /// Where the named type was defined, and by which system.
    pub fn get_type_by_name(&self, name: &str) -> Option<&TypeDefinition> {
        self.data
            .type_map
            .get(name)
            .and_then(|concrete| concrete.definition.as_ref())
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeData> {
        self.data
            .type_index(name)
            .map(|index| self.data.arena.type_data(index))
    }

    pub fn type_map(&self) -> &IndexMap<String, ConcreteType> {
        &self.data.type_map
    }

    pub fn query_type(&self) -> &TypeData {
        self.data.arena.type_data(self.data.roots.query)
    }

    pub fn mutation_type(&self) -> Option<&TypeData> {
        self.data
            .roots
            .mutation
            .map(|index| self.data.arena.type_data(index))
    }

    pub fn subscription_type(&self) -> Option<&TypeData> {
        self.data
            .roots
            .subscription
            .map(|index| self.data.arena.type_data(index))
    }

    pub fn directives(&self) -> &[DirectiveData] {
        &self.data.directives
    }

    /// The memoized class types of this build.
    pub fn class_registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The underlying execution engine schema.
    pub fn executable(&self) -> &::async_graphql::dynamic::Schema {
        &self.executable
    }

    /// The schema in the GraphQL schema definition language.
    pub fn sdl(&self) -> String {
        self.to_string()
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        sdl::print_schema(f, &self.data)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("types", &self.data.type_map.keys().collect::<Vec<_>>())
            .field("roots", &self.data.roots)
            .finish()
    }
}
