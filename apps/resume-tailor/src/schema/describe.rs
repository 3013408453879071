use super::{FieldSpec, FieldType, ObjectSchema};

/// Renders a schema as an indented field outline for inclusion in a prompt.
///
/// ```text
/// JobDescription: Schema defining the job description.
/// - job_title (string, required, non-empty): The title of the job.
/// - keywords (list of string, required): ...
/// ```
pub fn describe(schema: &ObjectSchema) -> String {
    let mut out = format!("{}: {}\n", schema.name, schema.description);
    describe_fields(schema, 0, &mut out);
    out
}

fn describe_fields(schema: &ObjectSchema, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for field in &schema.fields {
        out.push_str(&format!(
            "{indent}- {} ({}): {}\n",
            field.name,
            constraints(field),
            field.guidance
        ));
        if let Some(nested) = nested_object(&field.ty) {
            describe_fields(nested, depth + 1, out);
        }
    }
}

fn constraints(field: &FieldSpec) -> String {
    let mut parts = vec![field.ty.label()];
    parts.push(if field.required { "required" } else { "optional" }.to_string());
    if field.non_empty {
        parts.push("non-empty".to_string());
    }
    match (field.min_items, field.max_items) {
        (Some(min), Some(max)) if min == max => parts.push(format!("exactly {min} items")),
        (Some(min), Some(max)) => parts.push(format!("{min}-{max} items")),
        (Some(min), None) => parts.push(format!("at least {min} items")),
        (None, Some(max)) => parts.push(format!("at most {max} items")),
        (None, None) => {}
    }
    parts.join(", ")
}

fn nested_object(ty: &FieldType) -> Option<&ObjectSchema> {
    match ty {
        FieldType::Object(schema) => Some(schema),
        FieldType::List(item) => nested_object(item),
        _ => None,
    }
}
