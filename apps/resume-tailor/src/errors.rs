use std::path::PathBuf;

use thiserror::Error;

use crate::llm_client::Provider;

/// Pipeline-level error type.
/// Every variant is fatal for the current run; the caller decides whether to re-run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Provider {provider} does not support model '{model}': {reason}")]
    ProviderUnsupported {
        provider: Provider,
        model: String,
        reason: String,
    },

    #[error("Model output failed schema '{schema}' after {attempts} attempts: {violations}")]
    SchemaValidationFailed {
        schema: String,
        attempts: u32,
        violations: String,
        /// Last payload the model returned, kept for diagnosis.
        last_payload: String,
    },

    #[error("Upstream model backend unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Rendering failed: {message}")]
    RenderFailed {
        message: String,
        /// Directory holding the auxiliary files left for inspection.
        artifacts_dir: PathBuf,
    },

    #[error("Text extraction failed for {path}: {reason}")]
    ExtractionFailed { path: PathBuf, reason: String },

    #[error("Invalid stored record at {path}: {reason}")]
    InvalidStoredRecord { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code for logs and exit reporting.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AppError::ProviderUnsupported { .. } => "PROVIDER_UNSUPPORTED",
            AppError::SchemaValidationFailed { .. } => "SCHEMA_VALIDATION_FAILED",
            AppError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            AppError::RenderFailed { .. } => "RENDER_FAILED",
            AppError::ExtractionFailed { .. } => "EXTRACTION_FAILED",
            AppError::InvalidStoredRecord { .. } => "INVALID_STORED_RECORD",
            AppError::Io(_) => "IO_ERROR",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether re-running the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::UpstreamUnavailable(_) | AppError::SchemaValidationFailed { .. }
        )
    }

    /// Logs the error at a level matching its severity and returns the code.
    pub fn report(&self) -> &'static str {
        match self {
            AppError::SchemaValidationFailed { last_payload, .. } => {
                tracing::error!("{self}");
                tracing::error!(
                    "Last invalid payload: {}",
                    truncate_for_log(last_payload, PAYLOAD_LOG_LIMIT)
                );
            }
            AppError::RenderFailed { artifacts_dir, .. } => {
                tracing::error!("{self}");
                tracing::error!(
                    "Auxiliary files kept for inspection in {}",
                    artifacts_dir.display()
                );
            }
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            _ => tracing::error!("{self}"),
        }
        self.code()
    }
}

/// Characters of a rejected model payload shown in the error log.
const PAYLOAD_LOG_LIMIT: usize = 2000;

fn truncate_for_log(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!(
            "{}... [{} more bytes]",
            &text[..cut],
            text.len() - cut
        ),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_per_taxonomy_variant() {
        let errors = [
            AppError::UnsupportedFormat(".docx".to_string()),
            AppError::ProviderUnsupported {
                provider: Provider::OpenAi,
                model: "claude-3".to_string(),
                reason: "prefix".to_string(),
            },
            AppError::SchemaValidationFailed {
                schema: "Resume".to_string(),
                attempts: 3,
                violations: "x".to_string(),
                last_payload: "{}".to_string(),
            },
            AppError::UpstreamUnavailable("timeout".to_string()),
            AppError::RenderFailed {
                message: "exit 1".to_string(),
                artifacts_dir: PathBuf::from("out"),
            },
            AppError::InvalidStoredRecord {
                path: PathBuf::from("a.json"),
                reason: "eof".to_string(),
            },
            AppError::ExtractionFailed {
                path: PathBuf::from("cv.pdf"),
                reason: "decoder panicked".to_string(),
            },
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_only_upstream_and_validation_are_retryable() {
        assert!(AppError::UpstreamUnavailable("down".to_string()).is_retryable());
        assert!(!AppError::UnsupportedFormat(".txt".to_string()).is_retryable());
        assert!(!AppError::InvalidStoredRecord {
            path: PathBuf::from("x.json"),
            reason: "bad".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_provider_unsupported_message_names_model() {
        let err = AppError::ProviderUnsupported {
            provider: Provider::OpenAi,
            model: "llama3".to_string(),
            reason: "model must start with 'gpt'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("openai"));
        assert!(msg.contains("llama3"));
    }

    #[test]
    fn test_short_payload_logged_whole() {
        assert_eq!(truncate_for_log(r#"{"a": 1}"#, 2000), r#"{"a": 1}"#);
    }

    #[test]
    fn test_long_payload_truncated_on_char_boundary() {
        let payload = "é".repeat(10);
        let shown = truncate_for_log(&payload, 4);
        assert_eq!(shown, "éééé... [12 more bytes]");
    }
}
