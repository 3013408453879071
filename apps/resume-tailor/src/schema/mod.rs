//! Schema Registry: declarative descriptions of the records a model must populate.
//!
//! A single `ObjectSchema` drives three things, none of them tied to a particular backend:
//! - the prompt outline sent to the model (`describe`)
//! - the JSON Schema handed to the backend's native structured-output mechanism (`to_json_schema`)
//! - the validator applied to every completion (`validate`)

use serde::{de::DeserializeOwned, Serialize};

pub mod describe;
pub mod json_schema;
pub mod validate;

pub use describe::describe;
pub use json_schema::to_json_schema;
pub use validate::{validate, Violation};

/// The value type of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Text,
    /// Text restricted to a fixed set of values.
    OneOf(&'static [&'static str]),
    List(Box<FieldType>),
    Object(ObjectSchema),
}

impl FieldType {
    pub fn list_of(item: FieldType) -> Self {
        FieldType::List(Box::new(item))
    }

    /// Short type label used in prompts and violation messages.
    pub fn label(&self) -> String {
        match self {
            FieldType::Text => "string".to_string(),
            FieldType::OneOf(values) => format!("one of {}", values.join(" | ")),
            FieldType::List(item) => format!("list of {}", item.label()),
            FieldType::Object(schema) => format!("object {}", schema.name),
        }
    }
}

/// One named field with its natural-language guidance and constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub guidance: &'static str,
    pub required: bool,
    /// Strings only: reject empty or whitespace-only values.
    pub non_empty: bool,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

impl FieldSpec {
    pub fn new(name: &'static str, ty: FieldType, guidance: &'static str) -> Self {
        Self {
            name,
            ty,
            guidance,
            required: true,
            non_empty: false,
            min_items: None,
            max_items: None,
        }
    }

    pub fn text(name: &'static str, guidance: &'static str) -> Self {
        Self::new(name, FieldType::Text, guidance)
    }

    pub fn text_list(name: &'static str, guidance: &'static str) -> Self {
        Self::new(name, FieldType::list_of(FieldType::Text), guidance)
    }

    pub fn object(name: &'static str, schema: ObjectSchema, guidance: &'static str) -> Self {
        Self::new(name, FieldType::Object(schema), guidance)
    }

    pub fn object_list(name: &'static str, schema: ObjectSchema, guidance: &'static str) -> Self {
        Self::new(
            name,
            FieldType::list_of(FieldType::Object(schema)),
            guidance,
        )
    }

    /// May be omitted or `null`.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn exactly(self, count: usize) -> Self {
        self.min_items(count).max_items(count)
    }
}

/// A named record shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl ObjectSchema {
    pub fn new(name: &'static str, description: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self {
            name,
            description,
            fields,
        }
    }

    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A record type with a statically defined schema.
///
/// Implemented by every record the pipeline asks a model to produce or reads back from disk.
pub trait StructuredRecord: Serialize + DeserializeOwned + Send {
    fn schema() -> ObjectSchema;
}
