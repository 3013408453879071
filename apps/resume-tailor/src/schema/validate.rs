use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{FieldSpec, FieldType, ObjectSchema};

/// A single constraint failure, addressed by a dotted/indexed path like `work_experience[0].description`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Checks `value` against `schema`, collecting every violation rather than stopping at the first.
///
/// Rules:
/// - required fields must be present and not `null`; optional fields may be either
/// - strings marked `non_empty` must contain a non-whitespace character
/// - `OneOf` strings must match one of the allowed values exactly
/// - list bounds apply to the list itself; every item is checked recursively
/// - unknown extra fields are ignored
pub fn validate(schema: &ObjectSchema, value: &Value) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();
    check_object(schema, value, "", &mut violations);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_object(schema: &ObjectSchema, value: &Value, path: &str, out: &mut Vec<Violation>) {
    let Some(map) = value.as_object() else {
        out.push(violation(
            path_or_root(path),
            format!("expected object {}, got {}", schema.name, kind(value)),
        ));
        return;
    };
    for field in &schema.fields {
        check_field(field, map, &join(path, field.name), out);
    }
}

fn check_field(field: &FieldSpec, map: &Map<String, Value>, path: &str, out: &mut Vec<Violation>) {
    let value = match map.get(field.name) {
        None | Some(Value::Null) => {
            if field.required {
                out.push(violation(path, "required field is missing"));
            }
            return;
        }
        Some(v) => v,
    };

    if let FieldType::List(_) = field.ty {
        if let Some(items) = value.as_array() {
            if let Some(min) = field.min_items {
                if items.len() < min {
                    out.push(violation(
                        path,
                        format!("expected at least {min} items, got {}", items.len()),
                    ));
                }
            }
            if let Some(max) = field.max_items {
                if items.len() > max {
                    out.push(violation(
                        path,
                        format!("expected at most {max} items, got {}", items.len()),
                    ));
                }
            }
        }
    }

    check_value(&field.ty, field.non_empty, value, path, out);
}

fn check_value(ty: &FieldType, non_empty: bool, value: &Value, path: &str, out: &mut Vec<Violation>) {
    match ty {
        FieldType::Text => match value.as_str() {
            Some(s) if non_empty && s.trim().is_empty() => {
                out.push(violation(path, "must not be empty"));
            }
            Some(_) => {}
            None => out.push(violation(
                path,
                format!("expected string, got {}", kind(value)),
            )),
        },
        FieldType::OneOf(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => {}
            Some(s) => out.push(violation(
                path,
                format!("'{s}' is not one of: {}", allowed.join(", ")),
            )),
            None => out.push(violation(
                path,
                format!("expected string, got {}", kind(value)),
            )),
        },
        FieldType::List(item_ty) => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    check_value(item_ty, non_empty, item, &format!("{path}[{i}]"), out);
                }
            }
            None => out.push(violation(
                path,
                format!("expected list, got {}", kind(value)),
            )),
        },
        FieldType::Object(schema) => check_object(schema, value, path, out),
    }
}

fn violation(path: &str, message: impl Into<String>) -> Violation {
    Violation {
        path: path.to_string(),
        message: message.into(),
    }
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn path_or_root(path: &str) -> &str {
    if path.is_empty() {
        "$"
    } else {
        path
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Joins violations into a single human-readable line list.
pub fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
