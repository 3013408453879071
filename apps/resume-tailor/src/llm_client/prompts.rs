// Cross-cutting prompt fragments used by every backend.
// Stage-specific prompts live next to their stage (extraction/prompts.rs, tailoring/prompts.rs).

use crate::schema::{describe, ObjectSchema, Violation};

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Schema instruction appended to the system turn. Replace `{schema_outline}` before sending.
pub const SCHEMA_INSTRUCTION_TEMPLATE: &str = r#"Return a single JSON object conforming to the schema below.
Every required field must be present. Optional fields may be null.
Respect every list-length bound exactly.

SCHEMA:
{schema_outline}"#;

/// Corrective turn sent after a validation failure.
/// Replace `{schema_name}` and `{violations}` before sending.
pub const CORRECTION_TEMPLATE: &str = r#"Your previous response did not conform to the {schema_name} schema.

VIOLATIONS:
{violations}

Return the corrected, complete JSON object. Fix every violation listed above and keep all other content unchanged."#;

pub fn schema_instruction(schema: &ObjectSchema) -> String {
    format!(
        "{JSON_ONLY_SYSTEM}\n\n{}",
        SCHEMA_INSTRUCTION_TEMPLATE.replace("{schema_outline}", &describe(schema))
    )
}

pub fn correction_prompt(schema: &ObjectSchema, violations: &[Violation]) -> String {
    let listed = violations
        .iter()
        .map(|v| format!("- {v}"))
        .collect::<Vec<_>>()
        .join("\n");
    CORRECTION_TEMPLATE
        .replace("{schema_name}", schema.name)
        .replace("{violations}", &listed)
}
