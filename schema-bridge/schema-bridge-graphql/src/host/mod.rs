//! The host builder, the native converter of [Origin::Declared] types.
//!
//! It owns the type arena and its own name cache, the `type_map`.
//! Types from the foreign [Origin::Class] system enter through [ForeignTypes],
//! which in turn calls back into the host for declared types it meets.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    data::{
        ArgumentData, DirectiveData, ScalarData, TypeArena, TypeData, TypeIndex, TypeKind, TypeRef,
    },
    descriptor::{BuiltinScalar, DirectiveDef, DirectiveLocation, Origin, ScalarDef, TypeDescriptor},
    error::TypeConversionError,
    fields::MemberBuilder,
    value::Value,
};

pub mod scalars;

use scalars::ScalarRegistry;

const MAX_DEFERRED_CHAIN: usize = 32;

/// Where a named type in the schema came from.
#[derive(Clone, Debug)]
pub struct TypeDefinition {
    pub origin: Origin,
    pub descriptor: TypeDescriptor,
}

#[derive(Clone, Debug)]
pub struct ConcreteType {
    pub definition: Option<TypeDefinition>,
    pub implementation: TypeIndex,
}

/// Converter of descriptors the host does not understand itself.
pub trait ForeignTypes {
    fn convert_foreign(
        &mut self,
        host: &mut HostConverter,
        descriptor: &TypeDescriptor,
    ) -> Result<TypeRef, TypeConversionError>;
}

/// Used when the schema only contains declared types.
pub struct NoForeignTypes;

impl ForeignTypes for NoForeignTypes {
    fn convert_foreign(
        &mut self,
        _host: &mut HostConverter,
        descriptor: &TypeDescriptor,
    ) -> Result<TypeRef, TypeConversionError> {
        Err(TypeConversionError::NoForeignConverter(
            descriptor.to_string(),
        ))
    }
}

/// Follow a chain of deferred references to a concrete descriptor.
pub fn resolve_deferred(descriptor: &TypeDescriptor) -> Result<TypeDescriptor, TypeConversionError> {
    let mut current = descriptor.clone();
    for _ in 0..MAX_DEFERRED_CHAIN {
        match current {
            TypeDescriptor::Deferred(deferred) => current = deferred.resolve().clone(),
            concrete => return Ok(concrete),
        }
    }
    Err(TypeConversionError::UnresolvedDeferred(MAX_DEFERRED_CHAIN))
}

pub struct HostConverter {
    arena: TypeArena,
    type_map: IndexMap<String, ConcreteType>,
    scalars: ScalarRegistry,
    auto_camel_case: bool,
    /// Problems found during conversion that are reported by validation
    deferred_errors: Vec<String>,
}

pub(crate) struct HostOutput {
    pub arena: TypeArena,
    pub type_map: IndexMap<String, ConcreteType>,
    pub deferred_errors: Vec<String>,
}

impl HostConverter {
    pub fn new(auto_camel_case: bool, scalars: ScalarRegistry) -> Self {
        Self {
            arena: TypeArena::default(),
            type_map: Default::default(),
            scalars,
            auto_camel_case,
            deferred_errors: vec![],
        }
    }

    pub fn auto_camel_case(&self) -> bool {
        self.auto_camel_case
    }

    pub fn arena(&self) -> &TypeArena {
        &self.arena
    }

    pub fn type_map(&self) -> &IndexMap<String, ConcreteType> {
        &self.type_map
    }

    /// Convert a root operation type or an extra type, which must be named.
    pub fn from_object_type(
        &mut self,
        descriptor: &TypeDescriptor,
        ext: &mut dyn ForeignTypes,
    ) -> Result<TypeIndex, TypeConversionError> {
        match self.from_type(descriptor, ext)? {
            TypeRef::Named(index) => Ok(index),
            _ => Err(TypeConversionError::ExpectedNamedType(
                descriptor.to_string(),
            )),
        }
    }

    pub fn from_type(
        &mut self,
        descriptor: &TypeDescriptor,
        ext: &mut dyn ForeignTypes,
    ) -> Result<TypeRef, TypeConversionError> {
        match descriptor {
            TypeDescriptor::List(inner) => Ok(self.from_type(inner, ext)?.list()),
            TypeDescriptor::NonNull(inner) => Ok(self.from_type(inner, ext)?.non_null()),
            TypeDescriptor::Deferred(_) => {
                let resolved = resolve_deferred(descriptor)?;
                self.from_type(&resolved, ext)
            }
            TypeDescriptor::Opaque(type_name) => {
                Err(TypeConversionError::UnrecognizedType(type_name.clone()))
            }
            named => match named.origin() {
                Some(Origin::Class) => ext.convert_foreign(self, named),
                _ => self.from_declared(named, ext).map(TypeRef::Named),
            },
        }
    }

    /// The one instance of a builtin scalar, as found in the scalar registry.
    pub fn from_scalar(&mut self, scalar: BuiltinScalar) -> TypeIndex {
        let definition = self
            .scalars
            .get(&scalar)
            .cloned()
            .unwrap_or_else(|| Arc::new(ScalarDef::builtin(Origin::Declared, scalar)));
        let descriptor = TypeDescriptor::Scalar(definition.clone());

        if let Some(concrete) = self.type_map.get(&definition.name) {
            let index = concrete.implementation;
            self.check_identity(&definition.name, &descriptor);
            return index;
        }

        let index = self.alloc_type(&definition.name, definition.origin);
        self.type_map.insert(
            definition.name.clone(),
            ConcreteType {
                definition: Some(TypeDefinition {
                    origin: definition.origin,
                    descriptor,
                }),
                implementation: index,
            },
        );
        self.fill_type(
            index,
            TypeData {
                typename: definition.name.clone(),
                description: definition.description.clone(),
                origin: definition.origin,
                kind: TypeKind::Scalar(ScalarData {
                    builtin: Some(scalar),
                    specified_by_url: definition.specified_by_url.clone(),
                    serialize: definition.serialize.clone(),
                    parse_value: definition.parse_value.clone(),
                }),
            },
        );
        index
    }

    pub fn from_directive(
        &mut self,
        def: &DirectiveDef,
        ext: &mut dyn ForeignTypes,
    ) -> Result<DirectiveData, TypeConversionError> {
        let mut diagnostics = vec![];
        let mut builder = MemberBuilder {
            auto_camel_case: self.auto_camel_case,
            diagnostics: &mut diagnostics,
        };
        let arguments = builder.build_arguments(
            &def.arguments,
            |arg| format!("Argument \"@{}({arg}:)\" can only be defined once.", def.name),
            &mut |ty| self.from_type(ty, ext),
        )?;
        self.deferred_errors.extend(diagnostics);

        debug!("Created directive @{}", def.name);

        Ok(DirectiveData {
            name: def.name.clone(),
            description: def.description.clone(),
            locations: def.locations.clone(),
            arguments,
            repeatable: def.repeatable,
            builtin: false,
        })
    }

    /// The directives every GraphQL schema carries.
    pub fn builtin_directives(&mut self) -> Vec<DirectiveData> {
        let boolean = TypeRef::Named(self.from_scalar(BuiltinScalar::Boolean));
        let string = TypeRef::Named(self.from_scalar(BuiltinScalar::String));

        let argument = |name: &str, arg_type: TypeRef, description: &str| {
            (
                name.to_string(),
                ArgumentData {
                    source_name: name.to_string(),
                    arg_type,
                    description: Some(description.to_string()),
                    default_value: None,
                    deprecation_reason: None,
                },
            )
        };
        let directive = |name: &str,
                         description: &str,
                         locations: Vec<DirectiveLocation>,
                         arguments: Vec<(String, ArgumentData)>| DirectiveData {
            name: name.to_string(),
            description: Some(description.to_string()),
            locations,
            arguments: arguments.into_iter().collect(),
            repeatable: false,
            builtin: true,
        };

        let executable = vec![
            DirectiveLocation::Field,
            DirectiveLocation::FragmentSpread,
            DirectiveLocation::InlineFragment,
        ];

        let (reason_name, mut reason) = argument(
            "reason",
            string.clone(),
            "Explains why this element was deprecated, usually also including a suggestion for how to access supported similar data. Formatted using the Markdown syntax, as specified by [CommonMark](https://commonmark.org/).",
        );
        reason.default_value = Some(Value::from("No longer supported"));

        vec![
            directive(
                "include",
                "Directs the executor to include this field or fragment only when the `if` argument is true.",
                executable.clone(),
                vec![argument("if", boolean.clone().non_null(), "Included when true.")],
            ),
            directive(
                "skip",
                "Directs the executor to skip this field or fragment when the `if` argument is true.",
                executable,
                vec![argument("if", boolean.non_null(), "Skipped when true.")],
            ),
            directive(
                "deprecated",
                "Marks an element of a GraphQL schema as no longer supported.",
                vec![
                    DirectiveLocation::FieldDefinition,
                    DirectiveLocation::ArgumentDefinition,
                    DirectiveLocation::InputFieldDefinition,
                    DirectiveLocation::EnumValue,
                ],
                vec![(reason_name, reason)],
            ),
            directive(
                "specifiedBy",
                "Exposes a URL that specifies the behavior of this scalar.",
                vec![DirectiveLocation::Scalar],
                vec![argument(
                    "url",
                    string.non_null(),
                    "The URL that specifies the behavior of this scalar.",
                )],
            ),
        ]
    }

    /// Allocate an arena slot that is filled after its members are built.
    pub fn alloc_type(&mut self, typename: &str, origin: Origin) -> TypeIndex {
        self.arena.alloc_placeholder(typename, origin)
    }

    pub fn fill_type(&mut self, index: TypeIndex, type_data: TypeData) {
        self.arena.fill(index, type_data);
    }

    /// Make a type converted elsewhere known to the host under its name.
    pub fn register_foreign(&mut self, name: &str, index: TypeIndex, definition: TypeDefinition) {
        match self.type_map.get(name) {
            Some(existing) if existing.implementation == index => {}
            Some(_) => self.report_duplicate_type(name),
            None => {
                debug!("Registered foreign type `{name}` as {index:?}");
                self.type_map.insert(
                    name.to_string(),
                    ConcreteType {
                        definition: Some(definition),
                        implementation: index,
                    },
                );
            }
        }
    }

    /// Check that `descriptor` is the definition already known under `name`.
    ///
    /// A different definition is a naming conflict, which validation reports.
    pub fn check_identity(&mut self, name: &str, descriptor: &TypeDescriptor) -> bool {
        let same = match self
            .type_map
            .get(name)
            .and_then(|concrete| concrete.definition.as_ref())
        {
            Some(definition) => definition.descriptor.same_definition(descriptor),
            None => true,
        };
        if !same {
            self.report_duplicate_type(name);
        }
        same
    }

    /// Report problems to validation.
    pub fn report(&mut self, errors: impl IntoIterator<Item = String>) {
        for error in errors {
            if !self.deferred_errors.contains(&error) {
                self.deferred_errors.push(error);
            }
        }
    }

    pub(crate) fn finish(self) -> HostOutput {
        HostOutput {
            arena: self.arena,
            type_map: self.type_map,
            deferred_errors: self.deferred_errors,
        }
    }

    fn from_declared(
        &mut self,
        descriptor: &TypeDescriptor,
        ext: &mut dyn ForeignTypes,
    ) -> Result<TypeIndex, TypeConversionError> {
        if let TypeDescriptor::Scalar(def) = descriptor {
            if let Some(builtin) = def.builtin {
                return Ok(self.from_scalar(builtin));
            }
        }

        let Some(name) = descriptor.name() else {
            return Err(TypeConversionError::ExpectedNamedType(
                descriptor.to_string(),
            ));
        };

        if let Some(concrete) = self.type_map.get(name) {
            let index = concrete.implementation;
            self.check_identity(name, descriptor);
            return Ok(index);
        }

        let index = self.alloc_type(name, Origin::Declared);
        self.type_map.insert(
            name.to_string(),
            ConcreteType {
                definition: Some(TypeDefinition {
                    origin: Origin::Declared,
                    descriptor: descriptor.clone(),
                }),
                implementation: index,
            },
        );

        debug!("Creating declared type `{name}` at {index:?}");

        let mut diagnostics = vec![];
        let mut builder = MemberBuilder {
            auto_camel_case: self.auto_camel_case,
            diagnostics: &mut diagnostics,
        };
        let kind = builder.build_kind(descriptor, &mut |ty| self.from_type(ty, ext))?;
        self.report(diagnostics);

        self.fill_type(
            index,
            TypeData {
                typename: name.to_string(),
                description: descriptor.description().map(Into::into),
                origin: Origin::Declared,
                kind,
            },
        );

        Ok(index)
    }

    fn report_duplicate_type(&mut self, name: &str) {
        self.report([format!(
            "Schema must contain uniquely named types but contains multiple types named \"{name}\"."
        )]);
    }
}
