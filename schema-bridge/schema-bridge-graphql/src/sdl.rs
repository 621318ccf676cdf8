//! Printing the schema definition language.

use std::fmt::{self, Write};

use ::async_graphql::Value as ConstValue;
use indexmap::IndexMap;
use itertools::Itertools;

use crate::{
    data::{ArgumentData, DirectiveData, FieldData, TypeArena, TypeData, TypeKind},
    lower::literal::to_literal,
    schema::SchemaData,
};

const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

pub(crate) fn print_schema(f: &mut fmt::Formatter, data: &SchemaData) -> fmt::Result {
    let printer = Printer { arena: &data.arena };
    let mut blocks = vec![];

    if let Some(schema_block) = printer.schema_definition(data)? {
        blocks.push(schema_block);
    }
    for directive in data.directives.iter().filter(|directive| !directive.builtin) {
        blocks.push(printer.directive(directive)?);
    }

    let types = data
        .arena
        .iter()
        .map(|(_, type_data)| type_data)
        .filter(|type_data| !type_data.is_specified_scalar())
        .sorted_by(|a, b| a.typename.cmp(&b.typename));
    for type_data in types {
        blocks.push(printer.type_definition(type_data)?);
    }

    write!(f, "{}", blocks.join("\n\n"))
}

struct Printer<'a> {
    arena: &'a TypeArena,
}

impl Printer<'_> {
    fn schema_definition(&self, data: &SchemaData) -> Result<Option<String>, fmt::Error> {
        let roots = &data.roots;
        let standard_names = self.arena.typename(roots.query) == "Query"
            && roots
                .mutation
                .is_none_or(|mutation| self.arena.typename(mutation) == "Mutation")
            && roots
                .subscription
                .is_none_or(|subscription| self.arena.typename(subscription) == "Subscription");
        if data.description.is_none() && standard_names {
            return Ok(None);
        }

        let mut out = description(data.description.as_deref(), "", true);
        out.push_str("schema {\n");
        writeln!(out, "  query: {}", self.arena.typename(roots.query))?;
        if let Some(mutation) = roots.mutation {
            writeln!(out, "  mutation: {}", self.arena.typename(mutation))?;
        }
        if let Some(subscription) = roots.subscription {
            writeln!(out, "  subscription: {}", self.arena.typename(subscription))?;
        }
        out.push('}');
        Ok(Some(out))
    }

    fn directive(&self, directive: &DirectiveData) -> Result<String, fmt::Error> {
        let mut out = description(directive.description.as_deref(), "", true);
        write!(
            out,
            "directive @{}{}",
            directive.name,
            self.arguments(&directive.arguments, "")
        )?;
        if directive.repeatable {
            out.push_str(" repeatable");
        }
        write!(out, " on {}", directive.locations.iter().join(" | "))?;
        Ok(out)
    }

    fn type_definition(&self, type_data: &TypeData) -> Result<String, fmt::Error> {
        let mut out = description(type_data.description.as_deref(), "", true);
        let typename = &type_data.typename;

        match &type_data.kind {
            TypeKind::Scalar(scalar) => {
                write!(out, "scalar {typename}")?;
                if let Some(url) = &scalar.specified_by_url {
                    write!(
                        out,
                        " @specifiedBy(url: {})",
                        ConstValue::String(url.clone())
                    )?;
                }
            }
            TypeKind::Object(object) => {
                write!(out, "type {typename}{}", self.implements(type_data))?;
                out.push_str(&self.fields(&object.fields));
            }
            TypeKind::Interface(interface) => {
                write!(out, "interface {typename}{}", self.implements(type_data))?;
                out.push_str(&self.fields(&interface.fields));
            }
            TypeKind::Union(union) => {
                write!(out, "union {typename}")?;
                if !union.members.is_empty() {
                    write!(
                        out,
                        " = {}",
                        union
                            .members
                            .iter()
                            .map(|member| self.arena.typename(*member))
                            .join(" | ")
                    )?;
                }
            }
            TypeKind::Enum(enum_data) => {
                write!(out, "enum {typename}")?;
                let values = enum_data.values.iter().enumerate().map(|(i, (name, value))| {
                    format!(
                        "{}  {name}{}",
                        description(value.description.as_deref(), "  ", i == 0),
                        deprecated(value.deprecation_reason.as_deref())
                    )
                });
                out.push_str(&block(values));
            }
            TypeKind::InputObject(input) => {
                write!(out, "input {typename}")?;
                let fields = input.fields.iter().enumerate().map(|(i, (name, field))| {
                    format!(
                        "{}  {}",
                        description(field.description.as_deref(), "  ", i == 0),
                        self.input_value(name, field)
                    )
                });
                out.push_str(&block(fields));
            }
            TypeKind::Placeholder => panic!("BUG: type `{typename}` was never built"),
        }

        Ok(out)
    }

    fn implements(&self, type_data: &TypeData) -> String {
        let interfaces = type_data.interfaces();
        if interfaces.is_empty() {
            return String::new();
        }
        format!(
            " implements {}",
            interfaces
                .iter()
                .map(|interface| self.arena.typename(*interface))
                .join(" & ")
        )
    }

    fn fields(&self, fields: &IndexMap<String, FieldData>) -> String {
        block(fields.iter().enumerate().map(|(i, (name, field))| {
            format!(
                "{}  {name}{}: {}{}",
                description(field.description.as_deref(), "  ", i == 0),
                self.arguments(&field.arguments, "  "),
                self.arena.display_type_ref(&field.field_type),
                deprecated(field.deprecation_reason.as_deref())
            )
        }))
    }

    fn arguments(&self, arguments: &IndexMap<String, ArgumentData>, indentation: &str) -> String {
        if arguments.is_empty() {
            return String::new();
        }

        if arguments
            .values()
            .all(|argument| argument.description.is_none())
        {
            return format!(
                "({})",
                arguments
                    .iter()
                    .map(|(name, argument)| self.input_value(name, argument))
                    .join(", ")
            );
        }

        let lines = arguments.iter().enumerate().map(|(i, (name, argument))| {
            format!(
                "{}  {indentation}{}",
                description(
                    argument.description.as_deref(),
                    &format!("  {indentation}"),
                    i == 0
                ),
                self.input_value(name, argument)
            )
        });
        format!("(\n{}\n{indentation})", lines.format("\n"))
    }

    fn input_value(&self, name: &str, argument: &ArgumentData) -> String {
        let default_value = argument
            .default_value
            .as_ref()
            .map(|default_value| {
                format!(
                    " = {}",
                    to_literal(self.arena, &argument.arg_type, default_value)
                )
            })
            .unwrap_or_default();
        format!(
            "{name}: {}{default_value}{}",
            self.arena.display_type_ref(&argument.arg_type),
            deprecated(argument.deprecation_reason.as_deref())
        )
    }
}

fn block(mut items: impl Iterator<Item = String>) -> String {
    let items = items.join("\n");
    if items.is_empty() {
        String::new()
    } else {
        format!(" {{\n{items}\n}}")
    }
}

fn deprecated(reason: Option<&str>) -> String {
    match reason {
        None => String::new(),
        Some(DEFAULT_DEPRECATION_REASON) => " @deprecated".to_string(),
        Some(reason) => format!(
            " @deprecated(reason: {})",
            ConstValue::String(reason.to_string())
        ),
    }
}

fn description(description: Option<&str>, indentation: &str, first_in_block: bool) -> String {
    let Some(description) = description else {
        return String::new();
    };
    let prefix = if !indentation.is_empty() && !first_in_block {
        format!("\n{indentation}")
    } else {
        indentation.to_string()
    };
    format!(
        "{prefix}{}\n",
        block_string(description).replace('\n', &format!("\n{indentation}"))
    )
}

/// Print a string as a `"""` block string.
fn block_string(value: &str) -> String {
    let escaped = value.replace("\"\"\"", "\\\"\"\"");
    let lines: Vec<&str> = escaped.lines().collect();
    let single_line = lines.len() <= 1;

    let force_leading_newline = lines.len() > 1
        && lines[1..]
            .iter()
            .all(|line| line.is_empty() || line.starts_with([' ', '\t']));
    let trailing_triple_quotes = escaped.ends_with("\\\"\"\"");
    let trailing_quote = value.ends_with('"') && !trailing_triple_quotes;
    let trailing_slash = value.ends_with('\\');
    let force_trailing_newline = trailing_quote || trailing_slash;

    let multiple_lines = !single_line
        || value.len() > 70
        || force_trailing_newline
        || force_leading_newline
        || trailing_triple_quotes;
    let skip_leading_newline = single_line && value.starts_with([' ', '\t']);

    let mut out = String::from("\"\"\"");
    if (multiple_lines && !skip_leading_newline) || force_leading_newline {
        out.push('\n');
    }
    out.push_str(&escaped);
    if multiple_lines || force_trailing_newline {
        out.push('\n');
    }
    out.push_str("\"\"\"");
    out
}
