//! Class style type definitions.
//!
//! Fields are nullable unless marked [Field::required].
//! Every definition made here carries [Origin::Class], and is converted by the
//! [crate::converter::CrossSystemConverter].
//!
//! ```ignore
//! let query = ObjectType::new("Query")
//!     .field("hello", Field::new(string()).default_value("World"))
//!     .build();
//! ```

use std::{future::Future, sync::Arc};

use futures_util::Stream;

use crate::{
    descriptor::{
        ArgumentDef, BuiltinScalar, EnumDef, EnumValueDef, FieldDef, InputObjectDef, InterfaceDef,
        ObjectDef, Origin, ScalarDef, TypeDescriptor, UnionDef,
    },
    resolver::{ResolveParams, Resolver, ResolverResult},
    value::{ObjectValue, Value},
};

pub fn string() -> TypeDescriptor {
    builtin(BuiltinScalar::String)
}

pub fn int() -> TypeDescriptor {
    builtin(BuiltinScalar::Int)
}

pub fn float() -> TypeDescriptor {
    builtin(BuiltinScalar::Float)
}

pub fn boolean() -> TypeDescriptor {
    builtin(BuiltinScalar::Boolean)
}

pub fn id() -> TypeDescriptor {
    builtin(BuiltinScalar::ID)
}

pub fn decimal() -> TypeDescriptor {
    builtin(BuiltinScalar::Decimal)
}

fn builtin(scalar: BuiltinScalar) -> TypeDescriptor {
    TypeDescriptor::Scalar(Arc::new(ScalarDef::builtin(Origin::Class, scalar)))
}

pub fn list(of: impl Into<TypeDescriptor>) -> TypeDescriptor {
    of.into().list()
}

pub fn non_null(of: impl Into<TypeDescriptor>) -> TypeDescriptor {
    of.into().non_null()
}

/// Refer to a type that may be defined later, or that refers back to the current one.
pub fn lazy(thunk: impl Fn() -> TypeDescriptor + Send + Sync + 'static) -> TypeDescriptor {
    TypeDescriptor::deferred(thunk)
}

pub struct Field {
    ty: TypeDescriptor,
    name: Option<String>,
    arguments: Vec<ArgumentDef>,
    description: Option<String>,
    deprecation_reason: Option<String>,
    default_value: Option<Value>,
    resolver: Option<Resolver>,
}

impl Field {
    pub fn new(ty: impl Into<TypeDescriptor>) -> Self {
        Self {
            ty: ty.into(),
            name: None,
            arguments: vec![],
            description: None,
            deprecation_reason: None,
            default_value: None,
            resolver: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.ty = self.ty.non_null();
        self
    }

    /// Use this GraphQL name instead of the camel cased attribute name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecation_reason(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    /// Value used when the parent object has no value for this field.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn argument(mut self, name: impl Into<String>, argument: Argument) -> Self {
        self.arguments.push(argument.into_def(name.into()));
        self
    }

    pub fn resolve(
        mut self,
        resolver: impl Fn(ResolveParams) -> ResolverResult + Send + Sync + 'static,
    ) -> Self {
        self.resolver = Some(Resolver::sync(resolver));
        self
    }

    pub fn resolve_async<F, Fut>(mut self, resolver: F) -> Self
    where
        F: Fn(ResolveParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ResolverResult> + Send + 'static,
    {
        self.resolver = Some(Resolver::from_async(resolver));
        self
    }

    /// Event source of a subscription field.
    pub fn subscribe<F, S>(mut self, source: F) -> Self
    where
        F: Fn(ResolveParams) -> S + Send + Sync + 'static,
        S: Stream<Item = ResolverResult> + Send + 'static,
    {
        self.resolver = Some(Resolver::stream(source));
        self
    }

    fn into_def(self, source_name: String) -> FieldDef {
        FieldDef {
            source_name,
            name: self.name,
            ty: self.ty,
            arguments: self.arguments,
            description: self.description,
            deprecation_reason: self.deprecation_reason,
            default_value: self.default_value,
            resolver: self.resolver,
        }
    }
}

/// An argument of a field, or a field of an input object type.
pub struct Argument {
    ty: TypeDescriptor,
    name: Option<String>,
    description: Option<String>,
    default_value: Option<Value>,
    deprecation_reason: Option<String>,
}

impl Argument {
    pub fn new(ty: impl Into<TypeDescriptor>) -> Self {
        Self {
            ty: ty.into(),
            name: None,
            description: None,
            default_value: None,
            deprecation_reason: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.ty = self.ty.non_null();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn deprecation_reason(mut self, reason: impl Into<String>) -> Self {
        self.deprecation_reason = Some(reason.into());
        self
    }

    fn into_def(self, source_name: String) -> ArgumentDef {
        ArgumentDef {
            source_name,
            name: self.name,
            ty: self.ty,
            description: self.description,
            default_value: self.default_value,
            deprecation_reason: self.deprecation_reason,
        }
    }
}

pub struct ObjectType {
    name: String,
    description: Option<String>,
    fields: Vec<FieldDef>,
    interfaces: Vec<TypeDescriptor>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: vec![],
            interfaces: vec![],
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.push(field.into_def(name.into()));
        self
    }

    /// Implement an interface. Its fields are inherited unless redefined here.
    ///
    /// A lazy interface is resolved when the object is built.
    pub fn interface(mut self, interface: impl Into<TypeDescriptor>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn build(self) -> TypeDescriptor {
        let mut fields = vec![];
        for interface in &self.interfaces {
            if let TypeDescriptor::Interface(def) = resolve_deferred(interface) {
                inherit_fields(&mut fields, &def.fields, &self.fields);
            }
        }
        fields.extend(self.fields);

        TypeDescriptor::Object(Arc::new(ObjectDef {
            origin: Origin::Class,
            name: self.name,
            description: self.description,
            fields,
            interfaces: self.interfaces,
        }))
    }
}

fn resolve_deferred(descriptor: &TypeDescriptor) -> &TypeDescriptor {
    match descriptor {
        TypeDescriptor::Deferred(deferred) => resolve_deferred(deferred.resolve()),
        descriptor => descriptor,
    }
}

/// Interface fields come first, as if declared on a base class.
fn inherit_fields(target: &mut Vec<FieldDef>, inherited: &[FieldDef], own: &[FieldDef]) {
    for field in inherited {
        let shadowed = own
            .iter()
            .chain(target.iter())
            .any(|other| other.source_name == field.source_name);
        if !shadowed {
            target.push(field.clone());
        }
    }
}

pub struct InputObjectType {
    name: String,
    description: Option<String>,
    fields: Vec<ArgumentDef>,
}

impl InputObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: vec![],
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: Argument) -> Self {
        self.fields.push(field.into_def(name.into()));
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::InputObject(Arc::new(InputObjectDef {
            origin: Origin::Class,
            name: self.name,
            description: self.description,
            fields: self.fields,
        }))
    }
}

pub struct Interface {
    name: String,
    description: Option<String>,
    fields: Vec<FieldDef>,
    interfaces: Vec<TypeDescriptor>,
    resolve_type: Option<crate::resolver::ResolveTypeFn>,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: vec![],
            interfaces: vec![],
            resolve_type: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.push(field.into_def(name.into()));
        self
    }

    pub fn interface(mut self, interface: impl Into<TypeDescriptor>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Pick the concrete object type of a value that carries no typename.
    pub fn resolve_type(
        mut self,
        resolve_type: impl Fn(&ObjectValue) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.resolve_type = Some(Arc::new(resolve_type));
        self
    }

    pub fn build(self) -> TypeDescriptor {
        let mut fields = vec![];
        for interface in &self.interfaces {
            if let TypeDescriptor::Interface(def) = resolve_deferred(interface) {
                inherit_fields(&mut fields, &def.fields, &self.fields);
            }
        }
        fields.extend(self.fields);

        TypeDescriptor::Interface(Arc::new(InterfaceDef {
            origin: Origin::Class,
            name: self.name,
            description: self.description,
            fields,
            interfaces: self.interfaces,
            resolve_type: self.resolve_type,
        }))
    }
}

pub struct Enum {
    name: String,
    description: Option<String>,
    values: Vec<EnumValueDef>,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values: vec![],
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a member, `DOG = "dog"` is `.value("DOG", "dog")`.
    pub fn value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.push(EnumValueDef {
            name: name.into(),
            value: value.into(),
            description: None,
            deprecation_reason: None,
        });
        self
    }

    pub fn item(mut self, item: EnumValueDef) -> Self {
        self.values.push(item);
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::Enum(Arc::new(EnumDef {
            origin: Origin::Class,
            name: self.name,
            description: self.description,
            values: self.values,
        }))
    }
}

pub struct Union {
    name: String,
    description: Option<String>,
    members: Vec<TypeDescriptor>,
    resolve_type: Option<crate::resolver::ResolveTypeFn>,
}

impl Union {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            members: vec![],
            resolve_type: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn member(mut self, member: impl Into<TypeDescriptor>) -> Self {
        self.members.push(member.into());
        self
    }

    pub fn resolve_type(
        mut self,
        resolve_type: impl Fn(&ObjectValue) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.resolve_type = Some(Arc::new(resolve_type));
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::Union(Arc::new(UnionDef {
            origin: Origin::Class,
            name: self.name,
            description: self.description,
            members: self.members,
            resolve_type: self.resolve_type,
        }))
    }
}

pub struct Scalar {
    def: ScalarDef,
}

impl Scalar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            def: ScalarDef {
                origin: Origin::Class,
                name: name.into(),
                description: None,
                specified_by_url: None,
                builtin: None,
                serialize: None,
                parse_value: None,
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.def.description = Some(description.into());
        self
    }

    pub fn specified_by_url(mut self, url: impl Into<String>) -> Self {
        self.def.specified_by_url = Some(url.into());
        self
    }

    pub fn serialize(
        mut self,
        serialize: impl Fn(&Value) -> ResolverResult + Send + Sync + 'static,
    ) -> Self {
        self.def.serialize = Some(Arc::new(serialize));
        self
    }

    pub fn parse_value(
        mut self,
        parse_value: impl Fn(&Value) -> ResolverResult + Send + Sync + 'static,
    ) -> Self {
        self.def.parse_value = Some(Arc::new(parse_value));
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::Scalar(Arc::new(self.def))
    }
}

/// A mutation: an output payload type, the arguments it takes and the code it runs.
pub struct Mutation {
    payload: ObjectType,
    arguments: Vec<ArgumentDef>,
    description: Option<String>,
    mutate: Option<Resolver>,
}

impl Mutation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            payload: ObjectType::new(name),
            arguments: vec![],
            description: None,
            mutate: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn argument(mut self, name: impl Into<String>, argument: Argument) -> Self {
        self.arguments.push(argument.into_def(name.into()));
        self
    }

    /// A field of the payload type.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.payload = self.payload.field(name, field);
        self
    }

    pub fn mutate(
        mut self,
        mutate: impl Fn(ResolveParams) -> ResolverResult + Send + Sync + 'static,
    ) -> Self {
        self.mutate = Some(Resolver::sync(mutate));
        self
    }

    pub fn mutate_async<F, Fut>(mut self, mutate: F) -> Self
    where
        F: Fn(ResolveParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ResolverResult> + Send + 'static,
    {
        self.mutate = Some(Resolver::from_async(mutate));
        self
    }

    pub fn build(self) -> MutationType {
        MutationType {
            payload: self.payload.build(),
            arguments: self.arguments,
            description: self.description,
            mutate: self.mutate,
        }
    }
}

#[derive(Clone)]
pub struct MutationType {
    payload: TypeDescriptor,
    arguments: Vec<ArgumentDef>,
    description: Option<String>,
    mutate: Option<Resolver>,
}

impl MutationType {
    pub fn payload(&self) -> &TypeDescriptor {
        &self.payload
    }

    /// The field that exposes this mutation on the mutation root type.
    pub fn field(&self) -> Field {
        Field {
            ty: self.payload.clone(),
            name: None,
            arguments: self.arguments.clone(),
            description: self.description.clone(),
            deprecation_reason: None,
            default_value: None,
            resolver: self.mutate.clone(),
        }
    }
}
