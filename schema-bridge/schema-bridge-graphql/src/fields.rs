//! Building the members of a named type, shared by both converters.
//!
//! The caller decides how nested descriptors are converted through `convert`,
//! so the same code serves declared types and class types.

use indexmap::IndexMap;

use crate::{
    data::{
        ArgumentData, EnumData, EnumValueData, FieldData, InputObjectData, InterfaceData,
        ObjectData, ScalarData, TypeIndex, TypeKind, TypeRef, UnionData,
    },
    descriptor::{ArgumentDef, EnumValueDef, FieldDef, TypeDescriptor},
    error::TypeConversionError,
    naming::graphql_name,
};

pub type ConvertFn<'c> = dyn FnMut(&TypeDescriptor) -> Result<TypeRef, TypeConversionError> + 'c;

pub struct MemberBuilder<'d> {
    pub auto_camel_case: bool,
    /// Problems that only validation reports
    pub diagnostics: &'d mut Vec<String>,
}

impl MemberBuilder<'_> {
    /// Build the kind-specific part of a named descriptor.
    pub fn build_kind(
        &mut self,
        descriptor: &TypeDescriptor,
        convert: &mut ConvertFn,
    ) -> Result<TypeKind, TypeConversionError> {
        match descriptor {
            TypeDescriptor::Object(def) => Ok(TypeKind::Object(ObjectData {
                fields: self.build_fields(&def.name, &def.fields, convert)?,
                interfaces: self.build_named_list(&def.interfaces, convert)?,
            })),
            TypeDescriptor::Interface(def) => Ok(TypeKind::Interface(InterfaceData {
                fields: self.build_fields(&def.name, &def.fields, convert)?,
                interfaces: self.build_named_list(&def.interfaces, convert)?,
                resolve_type: def.resolve_type.clone(),
            })),
            TypeDescriptor::InputObject(def) => Ok(TypeKind::InputObject(InputObjectData {
                fields: self.build_arguments(
                    &def.fields,
                    |name| format!("Field \"{}.{name}\" can only be defined once.", def.name),
                    convert,
                )?,
            })),
            TypeDescriptor::Union(def) => Ok(TypeKind::Union(UnionData {
                members: self.build_named_list(&def.members, convert)?,
                resolve_type: def.resolve_type.clone(),
            })),
            TypeDescriptor::Enum(def) => Ok(TypeKind::Enum(EnumData {
                values: self.build_enum_values(&def.name, &def.values),
            })),
            TypeDescriptor::Scalar(def) => Ok(TypeKind::Scalar(ScalarData {
                builtin: def.builtin,
                specified_by_url: def.specified_by_url.clone(),
                serialize: def.serialize.clone(),
                parse_value: def.parse_value.clone(),
            })),
            other => Err(TypeConversionError::ExpectedNamedType(other.to_string())),
        }
    }

    pub fn build_fields(
        &mut self,
        typename: &str,
        defs: &[FieldDef],
        convert: &mut ConvertFn,
    ) -> Result<IndexMap<String, FieldData>, TypeConversionError> {
        let mut fields = IndexMap::with_capacity(defs.len());

        // This is part of a big recursive algorithm, so iterator mapping is avoided
        for def in defs {
            let name = graphql_name(def.name.as_deref(), &def.source_name, self.auto_camel_case);
            let field_type = convert(&def.ty)?;
            let arguments = self.build_arguments(
                &def.arguments,
                |arg| format!("Argument \"{typename}.{name}({arg}:)\" can only be defined once."),
                convert,
            )?;

            if fields.contains_key(&name) {
                self.diagnostics.push(format!(
                    "Field \"{typename}.{name}\" can only be defined once."
                ));
                continue;
            }

            fields.insert(
                name,
                FieldData {
                    source_name: def.source_name.clone(),
                    field_type,
                    arguments,
                    description: def.description.clone(),
                    deprecation_reason: def.deprecation_reason.clone(),
                    default_value: def.default_value.clone(),
                    resolver: def.resolver.clone(),
                },
            );
        }

        Ok(fields)
    }

    pub fn build_arguments(
        &mut self,
        defs: &[ArgumentDef],
        duplicate_message: impl Fn(&str) -> String,
        convert: &mut ConvertFn,
    ) -> Result<IndexMap<String, ArgumentData>, TypeConversionError> {
        let mut arguments = IndexMap::with_capacity(defs.len());

        for def in defs {
            let name = graphql_name(def.name.as_deref(), &def.source_name, self.auto_camel_case);
            let arg_type = convert(&def.ty)?;

            if arguments.contains_key(&name) {
                self.diagnostics.push(duplicate_message(&name));
                continue;
            }

            arguments.insert(
                name,
                ArgumentData {
                    source_name: def.source_name.clone(),
                    arg_type,
                    description: def.description.clone(),
                    default_value: def.default_value.clone(),
                    deprecation_reason: def.deprecation_reason.clone(),
                },
            );
        }

        Ok(arguments)
    }

    fn build_enum_values(
        &mut self,
        typename: &str,
        defs: &[EnumValueDef],
    ) -> IndexMap<String, EnumValueData> {
        let mut values = IndexMap::with_capacity(defs.len());
        for def in defs {
            if values.contains_key(&def.name) {
                self.diagnostics.push(format!(
                    "Enum value \"{typename}.{}\" can only be defined once.",
                    def.name
                ));
                continue;
            }
            values.insert(
                def.name.clone(),
                EnumValueData {
                    value: def.value.clone(),
                    description: def.description.clone(),
                    deprecation_reason: def.deprecation_reason.clone(),
                },
            );
        }
        values
    }

    fn build_named_list(
        &mut self,
        descriptors: &[TypeDescriptor],
        convert: &mut ConvertFn,
    ) -> Result<Vec<TypeIndex>, TypeConversionError> {
        let mut indexes = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            match convert(descriptor)? {
                TypeRef::Named(index) => indexes.push(index),
                _ => {
                    return Err(TypeConversionError::ExpectedNamedType(
                        descriptor.to_string(),
                    ));
                }
            }
        }
        Ok(indexes)
    }
}
