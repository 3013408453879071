use serde_json::{json, Map, Value};

use super::{FieldSpec, FieldType, ObjectSchema};

/// Converts a schema description into a JSON Schema document for backends with native
/// structured output (OpenAI `response_format`, Anthropic tool `input_schema`, Ollama `format`).
pub fn to_json_schema(schema: &ObjectSchema) -> Value {
    let mut root = object_schema(schema);
    if let Some(obj) = root.as_object_mut() {
        obj.insert("title".to_string(), json!(schema.name));
        obj.insert("description".to_string(), json!(schema.description));
    }
    root
}

fn object_schema(schema: &ObjectSchema) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in &schema.fields {
        properties.insert(field.name.to_string(), field_schema(field));
        if field.required {
            required.push(json!(field.name));
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn field_schema(field: &FieldSpec) -> Value {
    let mut node = type_schema(&field.ty);
    let Some(obj) = node.as_object_mut() else {
        return node;
    };

    obj.insert("description".to_string(), json!(field.guidance));

    if let FieldType::List(_) = field.ty {
        if let Some(min) = field.min_items {
            obj.insert("minItems".to_string(), json!(min));
        }
        if let Some(max) = field.max_items {
            obj.insert("maxItems".to_string(), json!(max));
        }
    }

    if field.non_empty {
        if let FieldType::Text = field.ty {
            obj.insert("minLength".to_string(), json!(1));
        }
    }

    if !field.required {
        make_nullable(obj);
    }

    node
}

fn type_schema(ty: &FieldType) -> Value {
    match ty {
        FieldType::Text => json!({"type": "string"}),
        FieldType::OneOf(values) => json!({"type": "string", "enum": values}),
        FieldType::List(item) => json!({"type": "array", "items": type_schema(item)}),
        FieldType::Object(schema) => object_schema(schema),
    }
}

fn make_nullable(obj: &mut Map<String, Value>) {
    if let Some(Value::String(t)) = obj.get("type").cloned() {
        obj.insert("type".to_string(), json!([t, "null"]));
    }
    if let Some(Value::Array(values)) = obj.get_mut("enum") {
        values.push(Value::Null);
    }
}
