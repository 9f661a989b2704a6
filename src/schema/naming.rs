//! Column-to-field naming convention.

/// Convert a snake_case column name to a camelCase field name
///
/// The first segment is kept as-is; every later underscore-delimited segment
/// has its first character upper-cased. Underscores are removed.
#[must_use]
pub fn to_camel_case(snake_case: &str) -> String {
    let mut camel = String::with_capacity(snake_case.len());
    for (i, part) in snake_case.split('_').enumerate() {
        if i == 0 {
            camel.push_str(part);
        } else {
            camel.push_str(&capitalize(part));
        }
    }
    camel
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
