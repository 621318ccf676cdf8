//! Lowering of the validated type graph into an executable `async-graphql` dynamic schema.
//!
//! Every field gets a resolver that runs the user resolver through the extension chain,
//! or the default resolver, and completes the result against the field type.

use std::sync::Arc;

use ::async_graphql::dynamic::{
    self, Enum, EnumItem, Field, FieldFuture, FieldValue, InputObject, InputValue, Interface,
    InterfaceField, Object, ResolverContext, Scalar, Subscription, SubscriptionField,
    SubscriptionFieldFuture, Union,
};
use futures_util::StreamExt;
use tracing::{debug, trace};

use crate::{
    data::{ArgumentData, FieldData, TypeArena, TypeIndex, TypeKind, TypeRef},
    extension::{self, Extension},
    resolver::{ResolveInfo, ResolveParams, Resolver, ResolverError},
    schema::SchemaData,
    value::{ObjectValue, Value},
};

mod input;
pub(crate) mod literal;
mod output;
pub(crate) mod propagation;

use output::Completion;
use propagation::{ExecutionState, NullPropagation, path_key};

type Extensions = Arc<[Arc<dyn Extension>]>;

pub(crate) fn lower_schema(
    data: &Arc<SchemaData>,
    extensions: &Extensions,
) -> Result<dynamic::Schema, String> {
    let arena = &data.arena;
    let roots = data.roots;

    let mut builder = dynamic::Schema::build(
        arena.typename(roots.query),
        roots.mutation.map(|index| arena.typename(index)),
        roots.subscription.map(|index| arena.typename(index)),
    )
    .extension(NullPropagation);

    for (index, type_data) in arena.iter() {
        if type_data.is_specified_scalar() {
            continue;
        }
        let typename = type_data.typename.as_str();

        builder = match &type_data.kind {
            TypeKind::Object(object) if Some(index) == roots.subscription => {
                let mut subscription = Subscription::new(typename);
                for (name, field) in &object.fields {
                    subscription =
                        subscription.field(lower_subscription_field(data, extensions, index, name, field));
                }
                builder.register(with_description(subscription, &type_data.description))
            }
            TypeKind::Object(object) => {
                let mut lowered = Object::new(typename);
                for (name, field) in &object.fields {
                    lowered = lowered.field(lower_field(data, extensions, index, name, field));
                }
                for interface in &object.interfaces {
                    lowered = lowered.implement(arena.typename(*interface));
                }
                builder.register(with_description(lowered, &type_data.description))
            }
            TypeKind::Interface(interface) => {
                let mut lowered = Interface::new(typename);
                for (name, field) in &interface.fields {
                    let mut interface_field =
                        InterfaceField::new(name, lower_type_ref(arena, &field.field_type))
                            .deprecation(field.deprecation_reason.as_deref());
                    if let Some(description) = &field.description {
                        interface_field = interface_field.description(description);
                    }
                    for (arg_name, argument) in &field.arguments {
                        interface_field =
                            interface_field.argument(lower_input_value(arena, arg_name, argument));
                    }
                    lowered = lowered.field(interface_field);
                }
                for parent in &interface.interfaces {
                    lowered = lowered.implement(arena.typename(*parent));
                }
                builder.register(with_description(lowered, &type_data.description))
            }
            TypeKind::Union(union) => {
                let mut lowered = Union::new(typename);
                for member in &union.members {
                    lowered = lowered.possible_type(arena.typename(*member));
                }
                builder.register(with_description(lowered, &type_data.description))
            }
            TypeKind::Enum(enum_data) => {
                let mut lowered = Enum::new(typename);
                for (name, value) in &enum_data.values {
                    let mut item = EnumItem::new(name).deprecation(value.deprecation_reason.as_deref());
                    if let Some(description) = &value.description {
                        item = item.description(description);
                    }
                    lowered = lowered.item(item);
                }
                builder.register(with_description(lowered, &type_data.description))
            }
            TypeKind::InputObject(input) => {
                let mut lowered = InputObject::new(typename);
                for (name, field) in &input.fields {
                    lowered = lowered.field(lower_input_value(arena, name, field));
                }
                builder.register(with_description(lowered, &type_data.description))
            }
            TypeKind::Scalar(scalar) => {
                let mut lowered = Scalar::new(typename);
                if let Some(url) = &scalar.specified_by_url {
                    lowered = lowered.specified_by_url(url);
                }
                builder.register(with_description(lowered, &type_data.description))
            }
            TypeKind::Placeholder => panic!("BUG: type `{typename}` was never built"),
        };
    }

    debug!("Lowered {} types into the executable schema", arena.len());

    builder.finish().map_err(|error| error.0)
}

trait Describe: Sized {
    fn describe(self, description: &str) -> Self;
}

macro_rules! impl_describe {
    ($($ty:ty),*) => {
        $(
            impl Describe for $ty {
                fn describe(self, description: &str) -> Self {
                    self.description(description)
                }
            }
        )*
    };
}

impl_describe!(Object, Interface, Union, Enum, InputObject, Scalar, Subscription);

fn with_description<T: Describe>(lowered: T, description: &Option<String>) -> T {
    match description {
        Some(description) => lowered.describe(description),
        None => lowered,
    }
}

fn lower_type_ref(arena: &TypeArena, type_ref: &TypeRef) -> dynamic::TypeRef {
    match type_ref {
        TypeRef::Named(index) => dynamic::TypeRef::named(arena.typename(*index)),
        TypeRef::List(inner) => dynamic::TypeRef::List(Box::new(lower_type_ref(arena, inner))),
        TypeRef::NonNull(inner) => {
            dynamic::TypeRef::NonNull(Box::new(lower_type_ref(arena, inner)))
        }
    }
}

fn lower_input_value(arena: &TypeArena, name: &str, argument: &ArgumentData) -> InputValue {
    let mut lowered = InputValue::new(name, lower_type_ref(arena, &argument.arg_type))
        .deprecation(argument.deprecation_reason.as_deref());
    if let Some(description) = &argument.description {
        lowered = lowered.description(description);
    }
    if let Some(default_value) = &argument.default_value {
        lowered = lowered.default_value(literal::to_literal(
            arena,
            &argument.arg_type,
            default_value,
        ));
    }
    lowered
}

fn lower_field(
    data: &Arc<SchemaData>,
    extensions: &Extensions,
    parent_type: TypeIndex,
    name: &str,
    field: &FieldData,
) -> Field {
    let arena = &data.arena;
    let resolver_data = data.clone();
    let resolver_extensions = extensions.clone();
    let field_name: Arc<str> = name.into();

    let mut lowered = Field::new(name, lower_type_ref(arena, &field.field_type), move |ctx| {
        let data = resolver_data.clone();
        let extensions = resolver_extensions.clone();
        let field_name = field_name.clone();
        FieldFuture::new(async move {
            resolve_field(&data, &extensions, parent_type, &field_name, &ctx)
                .await
                .map_err(|error| ::async_graphql::Error::new(error.message))
        })
    })
    .deprecation(field.deprecation_reason.as_deref());

    if let Some(description) = &field.description {
        lowered = lowered.description(description);
    }
    for (arg_name, argument) in &field.arguments {
        lowered = lowered.argument(lower_input_value(arena, arg_name, argument));
    }
    lowered
}

fn lower_subscription_field(
    data: &Arc<SchemaData>,
    extensions: &Extensions,
    parent_type: TypeIndex,
    name: &str,
    field: &FieldData,
) -> SubscriptionField {
    let arena = &data.arena;
    let resolver_data = data.clone();
    let resolver_extensions = extensions.clone();
    let field_name: Arc<str> = name.into();

    let mut lowered = SubscriptionField::new(
        name,
        lower_type_ref(arena, &field.field_type),
        move |ctx| {
            let data = resolver_data.clone();
            let extensions = resolver_extensions.clone();
            let field_name = field_name.clone();
            SubscriptionFieldFuture::new(async move {
                subscribe_field(data, extensions, parent_type, field_name, ctx)
                    .await
                    .map_err(|error| ::async_graphql::Error::new(error.message))
            })
        },
    )
    .deprecation(field.deprecation_reason.as_deref());

    if let Some(description) = &field.description {
        lowered = lowered.description(description);
    }
    for (arg_name, argument) in &field.arguments {
        lowered = lowered.argument(lower_input_value(arena, arg_name, argument));
    }
    lowered
}

fn field_data<'d>(data: &'d SchemaData, parent_type: TypeIndex, field_name: &str) -> &'d FieldData {
    let type_data = data.arena.type_data(parent_type);
    match type_data.fields().and_then(|fields| fields.get(field_name)) {
        Some(field) => field,
        None => panic!(
            "BUG: field `{}.{field_name}` was lowered but does not exist",
            type_data.typename
        ),
    }
}

fn resolve_params(
    data: &SchemaData,
    parent_type: TypeIndex,
    field_name: &str,
    field: &FieldData,
    ctx: &ResolverContext<'_>,
) -> Result<ResolveParams, ResolverError> {
    let parent = ctx
        .parent_value
        .downcast_ref::<Arc<ObjectValue>>()
        .cloned()
        .unwrap_or_default();
    let args = input::coerce_arguments(&data.arena, &field.arguments, ctx.args.as_index_map())?;

    Ok(ResolveParams {
        parent,
        args,
        info: ResolveInfo {
            parent_type: data.arena.typename(parent_type).to_string(),
            field_name: field_name.to_string(),
            return_type: data.arena.display_type_ref(&field.field_type).to_string(),
        },
    })
}

async fn resolve_field<'a>(
    data: &SchemaData,
    extensions: &[Arc<dyn Extension>],
    parent_type: TypeIndex,
    field_name: &str,
    ctx: &ResolverContext<'a>,
) -> Result<Option<FieldValue<'a>>, ResolverError> {
    let field = field_data(data, parent_type, field_name);
    let params = resolve_params(data, parent_type, field_name, field, ctx)?;

    let value = match &field.resolver {
        Some(resolver) => {
            trace!("resolving `{}.{field_name}`", params.info.parent_type);
            extension::resolve_with(extensions, resolver, params).await?
        }
        None => default_resolve(field_name, field, &params.parent),
    };

    let state = ctx.data_opt::<Arc<ExecutionState>>().map(Arc::as_ref);
    let path = ctx.path_node.as_ref().map(path_key);
    Completion {
        data,
        state,
        parent_type: data.arena.typename(parent_type),
        field_name,
    }
    .complete(&field.field_type, value, path.as_deref())
}

/// The value of a field without resolver: the parent's value under the source name,
/// then under the GraphQL name, falling back to the field's default value.
fn default_resolve(field_name: &str, field: &FieldData, parent: &ObjectValue) -> Value {
    let value = parent
        .get(&field.source_name)
        .or_else(|| parent.get(field_name))
        .filter(|value| !value.is_null());
    match (value, &field.default_value) {
        (Some(value), _) => value.clone(),
        (None, Some(default_value)) => default_value.clone(),
        (None, None) => Value::Null,
    }
}

async fn subscribe_field<'a>(
    data: Arc<SchemaData>,
    extensions: Extensions,
    parent_type: TypeIndex,
    field_name: Arc<str>,
    ctx: ResolverContext<'a>,
) -> Result<futures_util::stream::BoxStream<'a, ::async_graphql::Result<FieldValue<'a>>>, ResolverError>
{
    let field = field_data(&data, parent_type, &field_name);
    let params = resolve_params(&data, parent_type, &field_name, field, &ctx)?;

    let events = match &field.resolver {
        Some(Resolver::Stream(resolver)) => resolver(params),
        Some(resolver) => {
            // a single event
            let value = extension::resolve_with(&extensions, resolver, params).await;
            futures_util::stream::once(async move { value }).boxed()
        }
        None => {
            let value = default_resolve(&field_name, field, &params.parent);
            futures_util::stream::once(async move { Ok(value) }).boxed()
        }
    };

    let state = ctx.data_opt::<Arc<ExecutionState>>().cloned();
    let path = ctx.path_node.as_ref().map(path_key);

    Ok(events
        .map(move |event| {
            let field = field_data(&data, parent_type, &field_name);
            let completion = Completion {
                data: &data,
                state: state.as_deref(),
                parent_type: data.arena.typename(parent_type),
                field_name: &field_name,
            };
            let completed = event.and_then(|value| {
                completion.complete(&field.field_type, value, path.as_deref())
            });
            match completed {
                Ok(Some(value)) => Ok(value),
                Ok(None) => {
                    if let (Some(state), Some(path)) = (&state, &path) {
                        state.mark_null(path.clone());
                    }
                    Ok(FieldValue::NULL)
                }
                Err(error) => Err(::async_graphql::Error::new(error.message)),
            }
        })
        .boxed())
}

/// The parent value of the root fields of a request.
pub(crate) fn root_value(root: ObjectValue) -> FieldValue<'static> {
    FieldValue::owned_any(Arc::new(root))
}
