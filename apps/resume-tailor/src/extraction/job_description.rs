//! Job description extraction: source document → `JobDescription` → `job_description.json`.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::prompts::JOB_DESCRIPTION_SYSTEM;
use crate::extraction::text::{extract_text, SourceFormat};
use crate::llm_client::{ChatMessage, LlmClient, Provider};
use crate::models::JobDescription;
use crate::storage::{self, Storage, JOB_DESCRIPTION_FILE, JOB_MARKDOWN_FILE};

/// A persisted job description and where it was written.
#[derive(Debug, Clone)]
pub struct ExtractedJob {
    pub record: JobDescription,
    pub path: PathBuf,
}

impl ExtractedJob {
    /// Directory shared by every later artifact for this job.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Parses a job posting and saves it under its company/title/date directory.
///
/// A `.json` source is treated as an already-parsed record: it is validated and re-saved
/// without calling a model.
pub async fn extract_job_description(
    llm: &LlmClient,
    storage: &Storage,
    source: &Path,
    provider: Provider,
    model: &str,
) -> Result<ExtractedJob, AppError> {
    info!("Processing job description: {}", source.display());
    let format = SourceFormat::from_path(source)?;

    let record = match format {
        SourceFormat::Json => storage::read_record::<JobDescription>(source)?,
        SourceFormat::Pdf | SourceFormat::Markdown => {
            provider.check_model(model)?;
            let text = extract_text(source).await?;
            let completion = llm
                .complete::<JobDescription>(
                    provider,
                    model,
                    vec![
                        ChatMessage::system(JOB_DESCRIPTION_SYSTEM),
                        ChatMessage::user(text),
                    ],
                )
                .await?;
            completion.record
        }
    };

    info!(
        "Job description parsed: {} at {}",
        record.job_title, record.company_name
    );

    let dir = storage.job_dir(
        &record.company_name,
        &record.job_title,
        Local::now().date_naive(),
    );
    let path = dir.join(JOB_DESCRIPTION_FILE);
    storage::write_record(&path, &record)?;

    if format == SourceFormat::Markdown {
        std::fs::copy(source, dir.join(JOB_MARKDOWN_FILE))?;
    }

    Ok(ExtractedJob { record, path })
}
