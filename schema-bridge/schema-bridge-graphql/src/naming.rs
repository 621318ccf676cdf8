use heck::ToLowerCamelCase;

/// The GraphQL name of a field or argument, given the name its defining system uses.
pub fn graphql_name(explicit: Option<&str>, source_name: &str, auto_camel_case: bool) -> String {
    match explicit {
        Some(name) => name.to_string(),
        None if auto_camel_case => to_camel_case(source_name),
        None => source_name.to_string(),
    }
}

/// `pet_type` becomes `petType`, leading underscores are kept.
pub fn to_camel_case(source_name: &str) -> String {
    let trimmed = source_name.trim_start_matches('_');
    if trimmed.is_empty() {
        return source_name.to_string();
    }
    let prefix = &source_name[..source_name.len() - trimmed.len()];
    format!("{prefix}{}", trimmed.to_lower_camel_case())
}

/// Whether `name` matches `/^[_a-zA-Z][_a-zA-Z0-9]*$/`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|char| char == '_' || char.is_ascii_alphanumeric())
}
