//! Declared style type definitions, native to the host builder.
//!
//! Fields and arguments are non-null unless wrapped in [optional],
//! and a [list] is a non-null list of non-null items by default.

use std::{future::Future, sync::Arc};

use futures_util::Stream;

use crate::{
    descriptor::{
        ArgumentDef, BuiltinScalar, DirectiveDef, DirectiveLocation, EnumDef, EnumValueDef,
        FieldDef, InputObjectDef, InterfaceDef, ObjectDef, Origin, ScalarDef, TypeDescriptor,
        UnionDef,
    },
    resolver::{ResolveParams, ResolveTypeFn, Resolver, ResolverResult},
    value::{ObjectValue, Value},
};

/// A type annotation: a descriptor and whether it was declared optional.
#[derive(Clone, Debug)]
pub struct Annotation {
    descriptor: TypeDescriptor,
    optional: bool,
}

impl Annotation {
    /// The descriptor with the declared nullability applied.
    pub fn into_descriptor(self) -> TypeDescriptor {
        if self.optional {
            self.descriptor
        } else {
            self.descriptor.non_null()
        }
    }
}

impl From<TypeDescriptor> for Annotation {
    fn from(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            optional: false,
        }
    }
}

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
    TypeDescriptor::Scalar(Arc::new(ScalarDef::builtin(Origin::Declared, scalar)))
}

pub fn optional(of: impl Into<Annotation>) -> Annotation {
    Annotation {
        descriptor: of.into().descriptor,
        optional: true,
    }
}

pub fn list(of: impl Into<Annotation>) -> Annotation {
    Annotation {
        descriptor: of.into().into_descriptor().list(),
        optional: false,
    }
}

pub fn lazy(thunk: impl Fn() -> TypeDescriptor + Send + Sync + 'static) -> TypeDescriptor {
    TypeDescriptor::deferred(thunk)
}

pub struct Field {
    def: FieldDef,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<Annotation>) -> Self {
        Self {
            def: FieldDef::new(name, ty.into().into_descriptor()),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.def.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.def.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.def.deprecation_reason = Some(reason.into());
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.def.default_value = Some(value.into());
        self
    }

    pub fn argument(mut self, argument: Argument) -> Self {
        self.def.arguments.push(argument.def);
        self
    }

    pub fn resolve(
        mut self,
        resolver: impl Fn(ResolveParams) -> ResolverResult + Send + Sync + 'static,
    ) -> Self {
        self.def.resolver = Some(Resolver::sync(resolver));
        self
    }

    pub fn resolve_async<F, Fut>(mut self, resolver: F) -> Self
    where
        F: Fn(ResolveParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ResolverResult> + Send + 'static,
    {
        self.def.resolver = Some(Resolver::from_async(resolver));
        self
    }

    pub fn subscribe<F, S>(mut self, source: F) -> Self
    where
        F: Fn(ResolveParams) -> S + Send + Sync + 'static,
        S: Stream<Item = ResolverResult> + Send + 'static,
    {
        self.def.resolver = Some(Resolver::stream(source));
        self
    }
}

/// A field argument, a directive argument or an input object field.
pub struct Argument {
    def: ArgumentDef,
}

impl Argument {
    pub fn new(name: impl Into<String>, ty: impl Into<Annotation>) -> Self {
        Self {
            def: ArgumentDef::new(name, ty.into().into_descriptor()),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.def.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.def.description = Some(description.into());
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.def.default_value = Some(value.into());
        self
    }

    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.def.deprecation_reason = Some(reason.into());
        self
    }
}

pub struct Object {
    name: String,
    description: Option<String>,
    fields: Vec<FieldDef>,
    interfaces: Vec<TypeDescriptor>,
}

impl Object {
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

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field.def);
        self
    }

    pub fn implements(mut self, interface: TypeDescriptor) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::Object(Arc::new(ObjectDef {
            origin: Origin::Declared,
            name: self.name,
            description: self.description,
            fields: self.fields,
            interfaces: self.interfaces,
        }))
    }
}

pub struct Input {
    name: String,
    description: Option<String>,
    fields: Vec<ArgumentDef>,
}

impl Input {
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

    pub fn field(mut self, field: Argument) -> Self {
        self.fields.push(field.def);
        self
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::InputObject(Arc::new(InputObjectDef {
            origin: Origin::Declared,
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
    resolve_type: Option<ResolveTypeFn>,
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

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field.def);
        self
    }

    pub fn implements(mut self, interface: TypeDescriptor) -> Self {
        self.interfaces.push(interface);
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
        TypeDescriptor::Interface(Arc::new(InterfaceDef {
            origin: Origin::Declared,
            name: self.name,
            description: self.description,
            fields: self.fields,
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
            origin: Origin::Declared,
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
    resolve_type: Option<ResolveTypeFn>,
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

    pub fn member(mut self, member: TypeDescriptor) -> Self {
        self.members.push(member);
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
            origin: Origin::Declared,
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
                origin: Origin::Declared,
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

    pub fn specified_by(mut self, url: impl Into<String>) -> Self {
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

    /// A scalar definition, e.g. for overriding a builtin scalar.
    pub fn into_def(self) -> ScalarDef {
        self.def
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::Scalar(Arc::new(self.def))
    }
}

pub struct Directive {
    def: DirectiveDef,
}

impl Directive {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            def: DirectiveDef {
                origin: Origin::Declared,
                name: name.into(),
                description: None,
                locations: vec![],
                arguments: vec![],
                repeatable: false,
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.def.description = Some(description.into());
        self
    }

    pub fn location(mut self, location: DirectiveLocation) -> Self {
        self.def.locations.push(location);
        self
    }

    pub fn argument(mut self, argument: Argument) -> Self {
        self.def.arguments.push(argument.def);
        self
    }

    pub fn repeatable(mut self) -> Self {
        self.def.repeatable = true;
        self
    }

    pub fn build(self) -> Arc<DirectiveDef> {
        Arc::new(self.def)
    }
}
