//! Type descriptors, the common currency of both type definition systems.
//!
//! A descriptor is produced by the [crate::declared] or the [crate::class] front-end,
//! which stamps its [Origin] on every named definition.
//! The converters dispatch on that tag instead of probing for capabilities.

use std::{
    fmt::{self, Debug, Display},
    sync::{Arc, OnceLock},
};

use crate::{
    resolver::{ResolveTypeFn, Resolver, ScalarFn},
    value::Value,
};

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Origin {
    /// Decorator/dataclass style definitions, native to the host builder
    Declared,
    /// Class hierarchy definitions, foreign to the host builder
    Class,
}

#[derive(Clone)]
pub enum TypeDescriptor {
    Object(Arc<ObjectDef>),
    InputObject(Arc<InputObjectDef>),
    Interface(Arc<InterfaceDef>),
    Scalar(Arc<ScalarDef>),
    Enum(Arc<EnumDef>),
    Union(Arc<UnionDef>),
    List(Box<TypeDescriptor>),
    NonNull(Box<TypeDescriptor>),
    /// A forward reference to a type that may not be defined yet
    Deferred(Deferred),
    /// Something that is not a GraphQL type at all
    Opaque(String),
}

impl TypeDescriptor {
    /// Describe an arbitrary Rust type that has no GraphQL meaning.
    pub fn opaque<T: ?Sized>() -> Self {
        Self::Opaque(std::any::type_name::<T>().to_string())
    }

    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    pub fn non_null(self) -> Self {
        match self {
            Self::NonNull(_) => self,
            other => Self::NonNull(Box::new(other)),
        }
    }

    pub fn deferred(thunk: impl Fn() -> TypeDescriptor + Send + Sync + 'static) -> Self {
        Self::Deferred(Deferred::new(thunk))
    }

    pub fn origin(&self) -> Option<Origin> {
        match self {
            Self::Object(def) => Some(def.origin),
            Self::InputObject(def) => Some(def.origin),
            Self::Interface(def) => Some(def.origin),
            Self::Scalar(def) => Some(def.origin),
            Self::Enum(def) => Some(def.origin),
            Self::Union(def) => Some(def.origin),
            Self::List(_) | Self::NonNull(_) | Self::Deferred(_) | Self::Opaque(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Object(def) => Some(&def.name),
            Self::InputObject(def) => Some(&def.name),
            Self::Interface(def) => Some(&def.name),
            Self::Scalar(def) => Some(&def.name),
            Self::Enum(def) => Some(&def.name),
            Self::Union(def) => Some(&def.name),
            Self::List(_) | Self::NonNull(_) | Self::Deferred(_) | Self::Opaque(_) => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Object(def) => def.description.as_deref(),
            Self::InputObject(def) => def.description.as_deref(),
            Self::Interface(def) => def.description.as_deref(),
            Self::Scalar(def) => def.description.as_deref(),
            Self::Enum(def) => def.description.as_deref(),
            Self::Union(def) => def.description.as_deref(),
            Self::List(_) | Self::NonNull(_) | Self::Deferred(_) | Self::Opaque(_) => None,
        }
    }

    /// Whether both descriptors point at the very same named definition.
    pub fn same_definition(&self, other: &TypeDescriptor) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (Self::InputObject(a), Self::InputObject(b)) => Arc::ptr_eq(a, b),
            (Self::Interface(a), Self::Interface(b)) => Arc::ptr_eq(a, b),
            (Self::Scalar(a), Self::Scalar(b)) => Arc::ptr_eq(a, b),
            (Self::Enum(a), Self::Enum(b)) => Arc::ptr_eq(a, b),
            (Self::Union(a), Self::Union(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(def) => write!(f, "Object({}, {:?})", def.name, def.origin),
            Self::InputObject(def) => write!(f, "InputObject({}, {:?})", def.name, def.origin),
            Self::Interface(def) => write!(f, "Interface({}, {:?})", def.name, def.origin),
            Self::Scalar(def) => write!(f, "Scalar({}, {:?})", def.name, def.origin),
            Self::Enum(def) => write!(f, "Enum({}, {:?})", def.name, def.origin),
            Self::Union(def) => write!(f, "Union({}, {:?})", def.name, def.origin),
            Self::List(inner) => write!(f, "List({inner:?})"),
            Self::NonNull(inner) => write!(f, "NonNull({inner:?})"),
            Self::Deferred(_) => write!(f, "Deferred"),
            Self::Opaque(type_name) => write!(f, "Opaque({type_name})"),
        }
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
            Self::Deferred(_) => write!(f, "<deferred>"),
            Self::Opaque(type_name) => write!(f, "{type_name}"),
            named => write!(f, "{}", named.name().unwrap_or_default()),
        }
    }
}

/// A thunk producing a descriptor, evaluated at most once.
#[derive(Clone)]
pub struct Deferred(Arc<DeferredInner>);

struct DeferredInner {
    thunk: Box<dyn Fn() -> TypeDescriptor + Send + Sync>,
    resolved: OnceLock<TypeDescriptor>,
}

impl Deferred {
    pub fn new(thunk: impl Fn() -> TypeDescriptor + Send + Sync + 'static) -> Self {
        Self(Arc::new(DeferredInner {
            thunk: Box::new(thunk),
            resolved: OnceLock::new(),
        }))
    }

    pub fn resolve(&self) -> &TypeDescriptor {
        self.0.resolved.get_or_init(|| (self.0.thunk)())
    }

    pub fn is_resolved(&self) -> bool {
        self.0.resolved.get().is_some()
    }
}

/// Scalars every host knows about.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum BuiltinScalar {
    String,
    Int,
    Float,
    Boolean,
    ID,
    /// Fixed-point decimal, shared by both type systems
    Decimal,
}

impl BuiltinScalar {
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::ID => "ID",
            Self::Decimal => "Decimal",
        }
    }

    /// Scalars defined by the GraphQL specification itself
    pub const fn is_specified(self) -> bool {
        !matches!(self, Self::Decimal)
    }
}

#[derive(Clone)]
pub struct FieldDef {
    /// The name used by the defining system, e.g. `pet_type`
    pub source_name: String,
    /// Explicit GraphQL name, bypassing automatic camel casing
    pub name: Option<String>,
    pub ty: TypeDescriptor,
    pub arguments: Vec<ArgumentDef>,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    pub default_value: Option<Value>,
    pub resolver: Option<Resolver>,
}

impl FieldDef {
    pub fn new(source_name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            source_name: source_name.into(),
            name: None,
            ty,
            arguments: vec![],
            description: None,
            deprecation_reason: None,
            default_value: None,
            resolver: None,
        }
    }
}

/// A field argument, or a field of an input object.
#[derive(Clone)]
pub struct ArgumentDef {
    pub source_name: String,
    pub name: Option<String>,
    pub ty: TypeDescriptor,
    pub description: Option<String>,
    pub default_value: Option<Value>,
    pub deprecation_reason: Option<String>,
}

impl ArgumentDef {
    pub fn new(source_name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            source_name: source_name.into(),
            name: None,
            ty,
            description: None,
            default_value: None,
            deprecation_reason: None,
        }
    }
}

pub struct ObjectDef {
    pub origin: Origin,
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDef>,
    pub interfaces: Vec<TypeDescriptor>,
}

pub struct InputObjectDef {
    pub origin: Origin,
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<ArgumentDef>,
}

pub struct InterfaceDef {
    pub origin: Origin,
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDef>,
    pub interfaces: Vec<TypeDescriptor>,
    pub resolve_type: Option<ResolveTypeFn>,
}

pub struct UnionDef {
    pub origin: Origin,
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<TypeDescriptor>,
    pub resolve_type: Option<ResolveTypeFn>,
}

pub struct EnumDef {
    pub origin: Origin,
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValueDef>,
}

#[derive(Clone)]
pub struct EnumValueDef {
    pub name: String,
    /// The internal value resolvers may return instead of the name
    pub value: Value,
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
}

pub struct ScalarDef {
    pub origin: Origin,
    pub name: String,
    pub description: Option<String>,
    pub specified_by_url: Option<String>,
    pub builtin: Option<BuiltinScalar>,
    pub serialize: Option<ScalarFn>,
    pub parse_value: Option<ScalarFn>,
}

impl ScalarDef {
    pub fn builtin(origin: Origin, scalar: BuiltinScalar) -> Self {
        Self {
            origin,
            name: scalar.name().into(),
            description: None,
            specified_by_url: None,
            builtin: Some(scalar),
            serialize: None,
            parse_value: None,
        }
    }
}

pub struct DirectiveDef {
    pub origin: Origin,
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<DirectiveLocation>,
    pub arguments: Vec<ArgumentDef>,
    pub repeatable: bool,
}

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = match self {
            Self::Query => "QUERY",
            Self::Mutation => "MUTATION",
            Self::Subscription => "SUBSCRIPTION",
            Self::Field => "FIELD",
            Self::FragmentDefinition => "FRAGMENT_DEFINITION",
            Self::FragmentSpread => "FRAGMENT_SPREAD",
            Self::InlineFragment => "INLINE_FRAGMENT",
            Self::VariableDefinition => "VARIABLE_DEFINITION",
            Self::Schema => "SCHEMA",
            Self::Scalar => "SCALAR",
            Self::Object => "OBJECT",
            Self::FieldDefinition => "FIELD_DEFINITION",
            Self::ArgumentDefinition => "ARGUMENT_DEFINITION",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::EnumValue => "ENUM_VALUE",
            Self::InputObject => "INPUT_OBJECT",
            Self::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
        };
        write!(f, "{location}")
    }
}
