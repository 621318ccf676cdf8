//! Validation of the merged type graph, run once before the schema is handed out.
//!
//! All problems are collected, none of them stops validation.

use indexmap::{IndexMap, IndexSet};

use crate::{
    data::{
        ArgumentData, DirectiveData, FieldData, InputObjectData, TypeArena, TypeData, TypeIndex,
        TypeKind, TypeRef,
    },
    naming::is_valid_name,
    schema::RootTypes,
};

pub(crate) fn validate_schema(
    arena: &TypeArena,
    roots: &RootTypes,
    directives: &[DirectiveData],
    deferred_errors: Vec<String>,
) -> Vec<String> {
    let mut validator = SchemaValidator {
        arena,
        errors: IndexSet::new(),
        visited_inputs: Default::default(),
    };

    validator.validate_root_types(roots);
    for error in deferred_errors {
        validator.report(error);
    }
    validator.validate_directives(directives);
    for (index, type_data) in arena.iter() {
        validator.validate_type(index, type_data);
    }

    validator.errors.into_iter().collect()
}

struct SchemaValidator<'a> {
    arena: &'a TypeArena,
    errors: IndexSet<String>,
    visited_inputs: IndexSet<TypeIndex>,
}

impl SchemaValidator<'_> {
    fn report(&mut self, error: String) {
        self.errors.insert(error);
    }

    fn display(&self, type_ref: &TypeRef) -> String {
        self.arena.display_type_ref(type_ref).to_string()
    }

    fn kind(&self, type_ref: &TypeRef) -> &TypeKind {
        &self.arena.type_data(type_ref.unit()).kind
    }

    fn validate_root_types(&mut self, roots: &RootTypes) {
        let query = self.arena.type_data(roots.query);
        if !matches!(query.kind, TypeKind::Object(_)) {
            self.report(format!(
                "Query root type must be Object type, it cannot be {}.",
                query.typename
            ));
        }
        for (operation, root) in [("Mutation", roots.mutation), ("Subscription", roots.subscription)] {
            let Some(root) = root else {
                continue;
            };
            let root = self.arena.type_data(root);
            if !matches!(root.kind, TypeKind::Object(_)) {
                self.report(format!(
                    "{operation} root type must be Object type if provided, it cannot be {}.",
                    root.typename
                ));
            }
        }
    }

    fn validate_name(&mut self, name: &str) {
        if name.starts_with("__") {
            self.report(format!(
                "Name \"{name}\" must not begin with \"__\", which is reserved by GraphQL introspection."
            ));
        } else if !is_valid_name(name) {
            self.report(format!(
                "Names must only contain [_a-zA-Z0-9] but \"{name}\" does not."
            ));
        }
    }

    fn validate_directives(&mut self, directives: &[DirectiveData]) {
        let mut seen = IndexSet::new();
        for directive in directives {
            let name = &directive.name;
            if !seen.insert(name.as_str()) {
                self.report(format!("There can be only one directive named \"@{name}\"."));
                continue;
            }
            if directive.builtin {
                continue;
            }

            self.validate_name(name);
            if directive.locations.is_empty() {
                self.report(format!("Directive @{name} must include 1 or more locations."));
            }
            for (arg_name, argument) in &directive.arguments {
                self.validate_name(arg_name);
                if !self.kind(&argument.arg_type).is_input() {
                    self.report(format!(
                        "The type of @{name}({arg_name}:) must be Input Type but got: {}.",
                        self.display(&argument.arg_type)
                    ));
                }
                if is_required_argument(argument) && argument.deprecation_reason.is_some() {
                    self.report(format!(
                        "Required argument @{name}({arg_name}:) cannot be deprecated."
                    ));
                }
            }
        }
    }

    fn validate_type(&mut self, index: TypeIndex, type_data: &TypeData) {
        if type_data.is_specified_scalar() {
            return;
        }
        self.validate_name(&type_data.typename);

        let typename = &type_data.typename;
        match &type_data.kind {
            TypeKind::Object(object) => {
                self.validate_fields(typename, &object.fields);
                self.validate_interfaces(index, type_data);
            }
            TypeKind::Interface(interface) => {
                self.validate_fields(typename, &interface.fields);
                self.validate_interfaces(index, type_data);
            }
            TypeKind::Union(union) => {
                if union.members.is_empty() {
                    self.report(format!(
                        "Union type {typename} must define one or more member types."
                    ));
                }
                let mut included = IndexSet::new();
                for member in &union.members {
                    let member_data = self.arena.type_data(*member);
                    if !included.insert(*member) {
                        self.report(format!(
                            "Union type {typename} can only include type {} once.",
                            member_data.typename
                        ));
                        continue;
                    }
                    if !matches!(member_data.kind, TypeKind::Object(_)) {
                        self.report(format!(
                            "Union type {typename} can only include Object types, it cannot include {}.",
                            member_data.typename
                        ));
                    }
                }
            }
            TypeKind::Enum(enum_data) => {
                if enum_data.values.is_empty() {
                    self.report(format!("Enum type {typename} must define one or more values."));
                }
                for value_name in enum_data.values.keys() {
                    if matches!(value_name.as_str(), "true" | "false" | "null") {
                        self.report(format!(
                            "Enum type {typename} cannot include value: {value_name}."
                        ));
                    } else {
                        self.validate_name(value_name);
                    }
                }
            }
            TypeKind::InputObject(input) => {
                if input.fields.is_empty() {
                    self.report(format!(
                        "Input Object type {typename} must define one or more fields."
                    ));
                }
                for (field_name, field) in &input.fields {
                    self.validate_name(field_name);
                    if !self.kind(&field.arg_type).is_input() {
                        self.report(format!(
                            "The type of {typename}.{field_name} must be Input Type but got: {}.",
                            self.display(&field.arg_type)
                        ));
                    }
                    if is_required_argument(field) && field.deprecation_reason.is_some() {
                        self.report(format!(
                            "Required input field {typename}.{field_name} cannot be deprecated."
                        ));
                    }
                }
                let mut field_path = vec![];
                let mut path_index_by_type = IndexMap::new();
                self.detect_input_cycle(index, input, &mut field_path, &mut path_index_by_type);
            }
            TypeKind::Scalar(_) => {}
            TypeKind::Placeholder => {
                panic!("BUG: type `{typename}` was never built")
            }
        }
    }

    fn validate_fields(&mut self, typename: &str, fields: &IndexMap<String, FieldData>) {
        if fields.is_empty() {
            self.report(format!("Type {typename} must define one or more fields."));
        }
        for (field_name, field) in fields {
            self.validate_name(field_name);
            if !self.kind(&field.field_type).is_output() {
                self.report(format!(
                    "The type of {typename}.{field_name} must be Output Type but got: {}.",
                    self.display(&field.field_type)
                ));
            }
            for (arg_name, argument) in &field.arguments {
                self.validate_name(arg_name);
                if !self.kind(&argument.arg_type).is_input() {
                    self.report(format!(
                        "The type of {typename}.{field_name}({arg_name}:) must be Input Type but got: {}.",
                        self.display(&argument.arg_type)
                    ));
                }
                if is_required_argument(argument) && argument.deprecation_reason.is_some() {
                    self.report(format!(
                        "Required argument {typename}.{field_name}({arg_name}:) cannot be deprecated."
                    ));
                }
            }
        }
    }

    fn validate_interfaces(&mut self, index: TypeIndex, type_data: &TypeData) {
        let typename = &type_data.typename;
        let mut implemented = IndexSet::new();

        for interface in type_data.interfaces() {
            let interface_data = self.arena.type_data(*interface);
            if !matches!(interface_data.kind, TypeKind::Interface(_)) {
                self.report(format!(
                    "Type {typename} must only implement Interface types, it cannot implement {}.",
                    interface_data.typename
                ));
                continue;
            }
            if *interface == index {
                self.report(format!(
                    "Type {typename} cannot implement itself because it would create a circular reference."
                ));
                continue;
            }
            if !implemented.insert(*interface) {
                self.report(format!(
                    "Type {typename} can only implement {} once.",
                    interface_data.typename
                ));
                continue;
            }

            self.validate_type_implements_ancestors(index, type_data, interface_data);
            self.validate_type_implements_interface(type_data, interface_data);
        }
    }

    fn validate_type_implements_ancestors(
        &mut self,
        index: TypeIndex,
        type_data: &TypeData,
        interface_data: &TypeData,
    ) {
        let interfaces = type_data.interfaces();
        for transitive in interface_data.interfaces() {
            if interfaces.contains(transitive) {
                continue;
            }
            if *transitive == index {
                self.report(format!(
                    "Type {} cannot implement {} because it would create a circular reference.",
                    type_data.typename, interface_data.typename
                ));
            } else {
                self.report(format!(
                    "Type {} must implement {} because it is implemented by {}.",
                    type_data.typename,
                    self.arena.typename(*transitive),
                    interface_data.typename
                ));
            }
        }
    }

    fn validate_type_implements_interface(
        &mut self,
        type_data: &TypeData,
        interface_data: &TypeData,
    ) {
        let typename = &type_data.typename;
        let interface_name = &interface_data.typename;
        let (Some(type_fields), Some(interface_fields)) = (type_data.fields(), interface_data.fields())
        else {
            return;
        };

        for (field_name, interface_field) in interface_fields {
            let Some(type_field) = type_fields.get(field_name) else {
                self.report(format!(
                    "Interface field {interface_name}.{field_name} expected but {typename} does not provide it."
                ));
                continue;
            };

            if !self.is_subtype(&type_field.field_type, &interface_field.field_type) {
                self.report(format!(
                    "Interface field {interface_name}.{field_name} expects type {} but {typename}.{field_name} is type {}.",
                    self.display(&interface_field.field_type),
                    self.display(&type_field.field_type)
                ));
            }

            for (arg_name, interface_arg) in &interface_field.arguments {
                let Some(type_arg) = type_field.arguments.get(arg_name) else {
                    self.report(format!(
                        "Interface field argument {interface_name}.{field_name}({arg_name}:) expected but {typename}.{field_name} does not provide it."
                    ));
                    continue;
                };
                if type_arg.arg_type != interface_arg.arg_type {
                    self.report(format!(
                        "Interface field argument {interface_name}.{field_name}({arg_name}:) expects type {} but {typename}.{field_name}({arg_name}:) is type {}.",
                        self.display(&interface_arg.arg_type),
                        self.display(&type_arg.arg_type)
                    ));
                }
            }

            for (arg_name, type_arg) in &type_field.arguments {
                if !interface_field.arguments.contains_key(arg_name)
                    && is_required_argument(type_arg)
                {
                    self.report(format!(
                        "Object field {typename}.{field_name} includes required argument {arg_name} that is missing from the Interface field {interface_name}.{field_name}."
                    ));
                }
            }
        }
    }

    /// Whether a value of `maybe_subtype` may be used where `supertype` is expected.
    fn is_subtype(&self, maybe_subtype: &TypeRef, supertype: &TypeRef) -> bool {
        if maybe_subtype == supertype {
            return true;
        }
        match (maybe_subtype, supertype) {
            (TypeRef::NonNull(sub), TypeRef::NonNull(sup)) => self.is_subtype(sub, sup),
            (_, TypeRef::NonNull(_)) => false,
            (TypeRef::NonNull(sub), _) => self.is_subtype(sub, supertype),
            (TypeRef::List(sub), TypeRef::List(sup)) => self.is_subtype(sub, sup),
            (_, TypeRef::List(_)) | (TypeRef::List(_), _) => false,
            (TypeRef::Named(sub), TypeRef::Named(sup)) => {
                let sub_data = self.arena.type_data(*sub);
                match &self.arena.type_data(*sup).kind {
                    TypeKind::Interface(_) => {
                        matches!(sub_data.kind, TypeKind::Object(_) | TypeKind::Interface(_))
                            && sub_data.interfaces().contains(sup)
                    }
                    TypeKind::Union(union) => {
                        matches!(sub_data.kind, TypeKind::Object(_)) && union.members.contains(sub)
                    }
                    _ => false,
                }
            }
        }
    }

    fn detect_input_cycle(
        &mut self,
        index: TypeIndex,
        input: &InputObjectData,
        field_path: &mut Vec<String>,
        path_index_by_type: &mut IndexMap<TypeIndex, usize>,
    ) {
        if !self.visited_inputs.insert(index) {
            return;
        }
        path_index_by_type.insert(index, field_path.len());

        for (field_name, field) in &input.fields {
            let TypeRef::NonNull(inner) = &field.arg_type else {
                continue;
            };
            let TypeRef::Named(field_type) = inner.as_ref() else {
                continue;
            };
            let TypeKind::InputObject(field_input) = &self.arena.type_data(*field_type).kind else {
                continue;
            };

            field_path.push(field_name.clone());
            match path_index_by_type.get(field_type) {
                None => {
                    self.detect_input_cycle(*field_type, field_input, field_path, path_index_by_type)
                }
                Some(cycle_index) => {
                    let cycle_path = field_path[*cycle_index..].join(".");
                    self.report(format!(
                        "Cannot reference Input Object '{}' within itself through a series of non-null fields: '{cycle_path}'.",
                        self.arena.typename(*field_type)
                    ));
                }
            }
            field_path.pop();
        }

        path_index_by_type.shift_remove(&index);
    }
}

fn is_required_argument(argument: &ArgumentData) -> bool {
    argument.arg_type.is_non_null() && argument.default_value.is_none()
}
