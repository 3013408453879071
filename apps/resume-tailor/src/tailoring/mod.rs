//! Resume tailoring: rewrites a `Resume` for one `JobDescription`.
//!
//! Flow: precondition check → build prompt from both records → schema-validated
//! completion (exactly 3 STAR bullets per experience, retried on violation) →
//! persist `tailored_resume.json` next to the job description.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::ExtractedJob;
use crate::llm_client::{ChatMessage, LlmClient, Provider};
use crate::models::tailored_resume::{MAX_NICE_TO_ADD, STAR_BULLETS_PER_EXPERIENCE};
use crate::models::{JobDescription, Resume, TailoredResume};
use crate::storage::{self, TAILORED_RESUME_FILE};

pub mod prompts;

use prompts::{
    GROUNDING_INSTRUCTION, RENDERING_INSTRUCTION, TAILORING_PROMPT_TEMPLATE, TAILORING_SYSTEM,
};

#[derive(Debug, Clone)]
pub struct TailoredOutput {
    pub record: TailoredResume,
    pub path: PathBuf,
}

/// Tailors `resume` to `job` and saves the result in the job's directory.
///
/// Fails with `ProviderUnsupported` before any network call if `model` is not accepted by
/// `provider`.
pub async fn tailor_resume(
    llm: &LlmClient,
    resume: &Resume,
    job: &ExtractedJob,
    provider: Provider,
    model: &str,
) -> Result<TailoredOutput, AppError> {
    provider.check_model(model)?;

    info!(
        "Tailoring resume for {} at {} ({provider}/{model})",
        job.record.job_title, job.record.company_name
    );

    let prompt = build_tailoring_prompt(resume, &job.record)?;
    let completion = llm
        .complete::<TailoredResume>(
            provider,
            model,
            vec![ChatMessage::system(TAILORING_SYSTEM), ChatMessage::user(prompt)],
        )
        .await?;

    debug!("Raw tailoring completion: {} bytes", completion.raw.len());
    let record = completion.record;
    info!(
        "Tailored resume '{}' produced in {} attempt(s): {} experiences, {} nice-to-add items",
        record.resume_title,
        completion.attempts,
        record.work_experience.len(),
        record.nice_to_add.as_ref().map_or(0, Vec::len)
    );

    let path = job.dir().join(TAILORED_RESUME_FILE);
    storage::write_record(&path, &record)?;

    Ok(TailoredOutput { record, path })
}

/// Fills the tailoring template with both records serialized verbatim.
fn build_tailoring_prompt(resume: &Resume, job: &JobDescription) -> Result<String, AppError> {
    let resume_json = serde_json::to_string_pretty(resume)?;
    let job_description_json = serde_json::to_string_pretty(job)?;
    let bullets = STAR_BULLETS_PER_EXPERIENCE.to_string();
    let max_nice_to_add = MAX_NICE_TO_ADD.to_string();

    Ok(fill_placeholders(
        TAILORING_PROMPT_TEMPLATE,
        &[
            ("{grounding_instruction}", GROUNDING_INSTRUCTION),
            ("{rendering_instruction}", RENDERING_INSTRUCTION),
            ("{bullets_per_experience}", &bullets),
            ("{max_nice_to_add}", &max_nice_to_add),
            ("{resume_json}", &resume_json),
            ("{job_description_json}", &job_description_json),
        ],
    ))
}

/// Substitutes placeholders in one left-to-right pass.
/// Inserted values are never searched again, so record text that happens to contain a
/// placeholder name reaches the model unchanged.
fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = values
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|at| (at, *key, *value)))
            .min_by_key(|(at, _, _)| *at);
        match next {
            Some((at, key, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(value);
                rest = &rest[at + key.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}
