//! Resume extraction: source document → `Resume` → `resume_<model>_<date>.json`.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::prompts::RESUME_SYSTEM;
use crate::extraction::text::{extract_text, SourceFormat};
use crate::llm_client::{ChatMessage, LlmClient, Provider};
use crate::models::Resume;
use crate::storage::{self, Storage};

#[derive(Debug, Clone)]
pub struct ExtractedResume {
    pub record: Resume,
    pub path: PathBuf,
}

/// Parses a résumé and saves it in the resumes directory.
///
/// A `.json` source is validated and used in place.
pub async fn extract_resume(
    llm: &LlmClient,
    storage: &Storage,
    source: &Path,
    provider: Provider,
    model: &str,
) -> Result<ExtractedResume, AppError> {
    info!("Processing resume: {}", source.display());

    if SourceFormat::from_path(source)? == SourceFormat::Json {
        let record = storage::read_record::<Resume>(source)?;
        return Ok(ExtractedResume {
            record,
            path: source.to_path_buf(),
        });
    }

    provider.check_model(model)?;
    let text = extract_text(source).await?;
    let completion = llm
        .complete::<Resume>(
            provider,
            model,
            vec![ChatMessage::system(RESUME_SYSTEM), ChatMessage::user(text)],
        )
        .await?;

    info!(
        "Resume parsed: {} ({} experience entries)",
        completion.record.contact_info.name,
        completion.record.work_experience.len()
    );

    let path = storage.resume_path(model, Local::now().date_naive());
    storage::write_record(&path, &completion.record)?;

    Ok(ExtractedResume {
        record: completion.record,
        path,
    })
}
