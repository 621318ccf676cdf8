//! Conversion of class types into the host's type representation.

use tracing::debug;

use crate::{
    data::{TypeData, TypeIndex, TypeRef},
    descriptor::{Origin, TypeDescriptor},
    error::TypeConversionError,
    fields::MemberBuilder,
    host::{ForeignTypes, HostConverter, TypeDefinition, resolve_deferred},
    registry::TypeRegistry,
};

/// Converts class types on first reference and memoizes them by name.
///
/// Declared types met inside class types are handed back to the host,
/// so arbitrarily nested and mutually recursive graphs from both systems work.
#[derive(Default)]
pub struct CrossSystemConverter {
    registry: TypeRegistry,
}

impl CrossSystemConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> TypeRegistry {
        self.registry
    }

    pub fn convert(
        &mut self,
        host: &mut HostConverter,
        descriptor: &TypeDescriptor,
    ) -> Result<TypeRef, TypeConversionError> {
        match descriptor {
            TypeDescriptor::List(inner) => Ok(self.convert(host, inner)?.list()),
            TypeDescriptor::NonNull(inner) => Ok(self.convert(host, inner)?.non_null()),
            TypeDescriptor::Deferred(_) => {
                let resolved = resolve_deferred(descriptor)?;
                self.convert(host, &resolved)
            }
            TypeDescriptor::Opaque(type_name) => {
                Err(TypeConversionError::UnrecognizedType(type_name.clone()))
            }
            named => match named.origin() {
                Some(Origin::Declared) => {
                    debug!("Delegating declared type `{named}` to the host");
                    host.from_type(named, self)
                }
                _ => self.convert_class_type(host, named).map(TypeRef::Named),
            },
        }
    }

    fn convert_class_type(
        &mut self,
        host: &mut HostConverter,
        descriptor: &TypeDescriptor,
    ) -> Result<TypeIndex, TypeConversionError> {
        if let TypeDescriptor::Scalar(def) = descriptor {
            if let Some(builtin) = def.builtin {
                return Ok(host.from_scalar(builtin));
            }
        }

        let Some(name) = descriptor.name() else {
            return Err(TypeConversionError::ExpectedNamedType(
                descriptor.to_string(),
            ));
        };

        if let Some(index) = self.registry.get(name) {
            host.check_identity(name, descriptor);
            return Ok(index);
        }

        // The placeholder is registered before members are built,
        // that is what terminates cycles.
        let index = host.alloc_type(name, Origin::Class);
        self.registry.put(name, index);
        host.register_foreign(
            name,
            index,
            TypeDefinition {
                origin: Origin::Class,
                descriptor: descriptor.clone(),
            },
        );

        debug!("Creating class type `{name}` at {index:?}");

        let mut diagnostics = vec![];
        let mut builder = MemberBuilder {
            auto_camel_case: host.auto_camel_case(),
            diagnostics: &mut diagnostics,
        };
        let kind = builder.build_kind(descriptor, &mut |ty| self.convert(host, ty))?;
        host.report(diagnostics);

        host.fill_type(
            index,
            TypeData {
                typename: name.to_string(),
                description: descriptor.description().map(Into::into),
                origin: Origin::Class,
                kind,
            },
        );

        Ok(index)
    }
}

impl ForeignTypes for CrossSystemConverter {
    fn convert_foreign(
        &mut self,
        host: &mut HostConverter,
        descriptor: &TypeDescriptor,
    ) -> Result<TypeRef, TypeConversionError> {
        self.convert(host, descriptor)
    }
}
