//! Results layout on disk.
//!
//! ```text
//! <results_dir>/<Company>_<Title>_<YYYYMMDD>/
//!     job_description.json
//!     job_description_markdown_file.md   (markdown sources only)
//!     tailored_resume.json
//!     tailored_resume.tex / .pdf
//! <resumes_dir>/resume_<model>_<YYYY-MM-DD>.json
//! ```
//!
//! Path derivation is pure. The only side effects are whole-file writes made after a record
//! has passed validation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::schema::{self, validate::summarize, StructuredRecord};

pub const JOB_DESCRIPTION_FILE: &str = "job_description.json";
pub const JOB_MARKDOWN_FILE: &str = "job_description_markdown_file.md";
pub const TAILORED_RESUME_FILE: &str = "tailored_resume.json";

#[derive(Debug, Clone)]
pub struct Storage {
    results_dir: PathBuf,
    resumes_dir: PathBuf,
}

impl Storage {
    pub fn new(results_dir: impl Into<PathBuf>, resumes_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
            resumes_dir: resumes_dir.into(),
        }
    }

    /// Directory for one job posting, keyed by company, title and date.
    pub fn job_dir(&self, company: &str, title: &str, date: NaiveDate) -> PathBuf {
        self.results_dir.join(format!(
            "{}_{}_{}",
            path_token(company),
            path_token(title),
            date.format("%Y%m%d")
        ))
    }

    pub fn resume_path(&self, model: &str, date: NaiveDate) -> PathBuf {
        self.resumes_dir.join(format!(
            "resume_{}_{}.json",
            path_token(model),
            date.format("%Y-%m-%d")
        ))
    }
}

/// Collapses whitespace runs to `_` and replaces characters unsafe in a path component.
/// An empty result becomes `unknown`.
pub fn path_token(raw: &str) -> String {
    let token = raw
        .split_whitespace()
        .map(|word| {
            word.chars()
                .map(|c| match c {
                    '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                    c if c.is_control() => '_',
                    c => c,
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("_");

    let token = token.trim_matches('.').to_string();
    if token.is_empty() {
        "unknown".to_string()
    } else {
        token
    }
}

/// Writes `record` as pretty JSON. The file is written to a temp file in the same directory
/// and renamed into place, so a reader never sees a partial record.
pub fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(record)?;
    write_whole(path, text.as_bytes())?;
    info!("Saved {}", path.display());
    Ok(())
}

pub fn write_whole(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| AppError::Io(e.error))?;
    Ok(())
}

/// Reads a previously saved record and re-checks it against its schema.
pub fn read_record<T: StructuredRecord>(path: &Path) -> Result<T, AppError> {
    let invalid = |reason: String| AppError::InvalidStoredRecord {
        path: path.to_path_buf(),
        reason,
    };

    let text = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| invalid(format!("not valid JSON: {e}")))?;
    schema::validate(&T::schema(), &value).map_err(|v| invalid(summarize(&v)))?;
    serde_json::from_value(value).map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job_description::sample_job_description;
    use crate::models::JobDescription;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 28).unwrap()
    }

    #[test]
    fn test_job_dir_normalizes_whitespace() {
        let storage = Storage::new("job_results", "resumes");
        let dir = storage.job_dir("Acme  Corp", " Staff ML Engineer ", date());
        assert_eq!(
            dir,
            PathBuf::from("job_results/Acme_Corp_Staff_ML_Engineer_20241028")
        );
    }

    #[test]
    fn test_job_dir_is_pure() {
        let storage = Storage::new("r", "s");
        assert_eq!(
            storage.job_dir("Acme", "Dev", date()),
            storage.job_dir("Acme", "Dev", date())
        );
    }

    #[test]
    fn test_path_token_strips_separators() {
        assert_eq!(path_token("R&D / Platform"), "R&D___Platform");
        assert_eq!(path_token("a:b"), "a_b");
        assert_eq!(path_token("   "), "unknown");
        assert_eq!(path_token(".."), "unknown");
    }

    #[test]
    fn test_resume_path_uses_model_and_date() {
        let storage = Storage::new("r", "resumes");
        assert_eq!(
            storage.resume_path("gpt-4o-mini", date()),
            PathBuf::from("resumes/resume_gpt-4o-mini_2024-10-28.json")
        );
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper").join(JOB_DESCRIPTION_FILE);
        let jd = sample_job_description();

        write_record(&path, &jd).unwrap();
        let recovered: JobDescription = read_record(&path).unwrap();
        assert_eq!(recovered, jd);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"job_title\""), "expected pretty JSON");
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(JOB_DESCRIPTION_FILE);
        fs::write(&path, "partial garbage from an interrupted run").unwrap();

        write_record(&path, &sample_job_description()).unwrap();
        let recovered: JobDescription = read_record(&path).unwrap();
        assert_eq!(recovered.company_name, "Acme");
    }

    #[test]
    fn test_read_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"job_title\": ").unwrap();

        let err = read_record::<JobDescription>(&path).unwrap_err();
        assert!(matches!(err, AppError::InvalidStoredRecord { .. }));
    }

    #[test]
    fn test_read_rejects_schema_violation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jd.json");
        let mut value = serde_json::to_value(sample_job_description()).unwrap();
        value["job_title"] = serde_json::json!("");
        fs::write(&path, value.to_string()).unwrap();

        match read_record::<JobDescription>(&path).unwrap_err() {
            AppError::InvalidStoredRecord { reason, .. } => assert!(reason.contains("job_title")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_missing_file_is_invalid_stored_record() {
        let err = read_record::<JobDescription>(Path::new("/nonexistent/jd.json")).unwrap_err();
        assert_eq!(err.code(), "INVALID_STORED_RECORD");
    }
}
