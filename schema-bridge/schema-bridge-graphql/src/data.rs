//! The target type representation: an arena of named types addressed by [TypeIndex].
//!
//! Two field types referring to the same [TypeIndex] refer to the same type instance.

use std::fmt::{self, Display};

use indexmap::IndexMap;

use crate::{
    descriptor::{BuiltinScalar, DirectiveLocation, Origin},
    resolver::{ResolveTypeFn, Resolver, ScalarFn},
    value::Value,
};

#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TypeIndex(pub u32);

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeRef {
    Named(TypeIndex),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    pub fn non_null(self) -> Self {
        match self {
            Self::NonNull(_) => self,
            other => Self::NonNull(Box::new(other)),
        }
    }

    /// The named type at the bottom of all wrappers
    pub fn unit(&self) -> TypeIndex {
        match self {
            Self::Named(index) => *index,
            Self::List(inner) | Self::NonNull(inner) => inner.unit(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }
}

pub struct TypeData {
    pub typename: String,
    pub description: Option<String>,
    pub origin: Origin,
    pub kind: TypeKind,
}

impl TypeData {
    pub fn fields(&self) -> Option<&IndexMap<String, FieldData>> {
        match &self.kind {
            TypeKind::Object(object) => Some(&object.fields),
            TypeKind::Interface(interface) => Some(&interface.fields),
            _ => None,
        }
    }

    pub fn interfaces(&self) -> &[TypeIndex] {
        match &self.kind {
            TypeKind::Object(object) => &object.interfaces,
            TypeKind::Interface(interface) => &interface.interfaces,
            _ => &[],
        }
    }

    pub fn builtin_scalar(&self) -> Option<BuiltinScalar> {
        match &self.kind {
            TypeKind::Scalar(scalar) => scalar.builtin,
            _ => None,
        }
    }

    /// Scalars the GraphQL specification defines are never printed or registered
    pub fn is_specified_scalar(&self) -> bool {
        self.builtin_scalar()
            .is_some_and(|scalar| scalar.is_specified() && self.typename == scalar.name())
    }
}

pub enum TypeKind {
    /// A type currently being built
    Placeholder,
    Object(ObjectData),
    InputObject(InputObjectData),
    Interface(InterfaceData),
    Union(UnionData),
    Enum(EnumData),
    Scalar(ScalarData),
}

impl TypeKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Placeholder => "placeholder",
            Self::Object(_) => "object",
            Self::InputObject(_) => "input object",
            Self::Interface(_) => "interface",
            Self::Union(_) => "union",
            Self::Enum(_) => "enum",
            Self::Scalar(_) => "scalar",
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, Self::InputObject(_) | Self::Enum(_) | Self::Scalar(_))
    }

    pub fn is_output(&self) -> bool {
        !matches!(self, Self::InputObject(_) | Self::Placeholder)
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }
}

pub struct FieldData {
    pub source_name: String,
    pub field_type: TypeRef,
    pub arguments: IndexMap<String, ArgumentData>,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    pub default_value: Option<Value>,
    pub resolver: Option<Resolver>,
}

pub struct ArgumentData {
    pub source_name: String,
    pub arg_type: TypeRef,
    pub description: Option<String>,
    pub default_value: Option<Value>,
    pub deprecation_reason: Option<String>,
}

pub struct ObjectData {
    pub fields: IndexMap<String, FieldData>,
    pub interfaces: Vec<TypeIndex>,
}

pub struct InterfaceData {
    pub fields: IndexMap<String, FieldData>,
    pub interfaces: Vec<TypeIndex>,
    pub resolve_type: Option<ResolveTypeFn>,
}

pub struct InputObjectData {
    pub fields: IndexMap<String, ArgumentData>,
}

pub struct UnionData {
    pub members: Vec<TypeIndex>,
    pub resolve_type: Option<ResolveTypeFn>,
}

pub struct EnumData {
    pub values: IndexMap<String, EnumValueData>,
}

pub struct EnumValueData {
    pub value: Value,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

pub struct ScalarData {
    pub builtin: Option<BuiltinScalar>,
    pub specified_by_url: Option<String>,
    pub serialize: Option<ScalarFn>,
    pub parse_value: Option<ScalarFn>,
}

pub struct DirectiveData {
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<DirectiveLocation>,
    pub arguments: IndexMap<String, ArgumentData>,
    pub repeatable: bool,
    /// Directives every schema has, e.g. `@skip`
    pub builtin: bool,
}

#[derive(Default)]
pub struct TypeArena {
    types: Vec<TypeData>,
}

impl TypeArena {
    pub fn type_data(&self, index: TypeIndex) -> &TypeData {
        &self.types[index.0 as usize]
    }

    pub fn typename(&self, index: TypeIndex) -> &str {
        &self.type_data(index).typename
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeIndex, &TypeData)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, type_data)| (TypeIndex(index as u32), type_data))
    }

    pub fn display_type_ref<'a>(&'a self, type_ref: &'a TypeRef) -> TypeRefDisplay<'a> {
        TypeRefDisplay {
            arena: self,
            type_ref,
        }
    }

    pub(crate) fn alloc_placeholder(&mut self, typename: &str, origin: Origin) -> TypeIndex {
        let index = TypeIndex(self.types.len() as u32);
        // note: this will be overwritten later
        self.types.push(TypeData {
            typename: typename.into(),
            description: None,
            origin,
            kind: TypeKind::Placeholder,
        });
        index
    }

    pub(crate) fn fill(&mut self, index: TypeIndex, type_data: TypeData) {
        let slot = &mut self.types[index.0 as usize];
        if !matches!(slot.kind, TypeKind::Placeholder) {
            panic!("BUG: type `{}` was built twice", slot.typename);
        }
        *slot = type_data;
    }
}

pub struct TypeRefDisplay<'a> {
    arena: &'a TypeArena,
    type_ref: &'a TypeRef,
}

impl Display for TypeRefDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_ref {
            TypeRef::Named(index) => write!(f, "{}", self.arena.typename(*index)),
            TypeRef::List(inner) => write!(f, "[{}]", self.arena.display_type_ref(inner)),
            TypeRef::NonNull(inner) => write!(f, "{}!", self.arena.display_type_ref(inner)),
        }
    }
}
