use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{extract_job_description, extract_resume, ExtractedJob};
use crate::llm_client::Provider;
use crate::models::{JobDescription, Resume, TailoredResume};
use crate::render::render;
use crate::state::AppState;
use crate::storage;
use crate::tailoring::tailor_resume;

pub const DEFAULT_PARSING_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TAILORING_MODEL: &str = "claude-3-5-sonnet-20240620";

#[derive(Parser)]
#[command(name = "resume-tailor")]
#[command(about = "Tailor a resume to a job description and render it to PDF.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

/// Model used to turn the job posting into a record.
#[derive(Args, Debug, Clone)]
pub struct ParsingModel {
    #[arg(id = "parse_provider", long = "parse-provider", value_enum, default_value_t = Provider::OpenAi)]
    pub provider: Provider,
    #[arg(id = "parse_model", long = "parse-model", default_value = DEFAULT_PARSING_MODEL)]
    pub model: String,
}

/// Model used to turn the resume into a record. Falls back to the parsing model.
#[derive(Args, Debug, Clone)]
pub struct ResumeModel {
    #[arg(id = "resume_provider", long = "resume-provider", value_enum)]
    pub provider: Option<Provider>,
    #[arg(id = "resume_model", long = "resume-model")]
    pub model: Option<String>,
}

impl ResumeModel {
    pub fn resolve(self, parsing: &ParsingModel) -> (Provider, String) {
        (
            self.provider.unwrap_or(parsing.provider),
            self.model.unwrap_or_else(|| parsing.model.clone()),
        )
    }
}

/// Model used to rewrite the resume.
#[derive(Args, Debug, Clone)]
pub struct TailoringModel {
    #[arg(id = "tailor_provider", long = "tailor-provider", value_enum, default_value_t = Provider::Anthropic)]
    pub provider: Provider,
    #[arg(id = "tailor_model", long = "tailor-model", default_value = DEFAULT_TAILORING_MODEL)]
    pub model: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a job posting (PDF, Markdown or JSON) into job_description.json
    #[command(alias = "j")]
    ExtractJob {
        source: PathBuf,
        #[arg(long, value_enum, default_value_t = Provider::OpenAi)]
        provider: Provider,
        #[arg(long, default_value = DEFAULT_PARSING_MODEL)]
        model: String,
    },
    /// Parse a resume (PDF, Markdown or JSON) into the resumes directory
    #[command(alias = "r")]
    ExtractResume {
        source: PathBuf,
        #[arg(long, value_enum, default_value_t = Provider::OpenAi)]
        provider: Provider,
        #[arg(long, default_value = DEFAULT_PARSING_MODEL)]
        model: String,
    },
    /// Tailor a parsed resume to a parsed job description
    #[command(alias = "t")]
    Tailor {
        /// Parsed resume JSON
        #[arg(long)]
        resume: PathBuf,
        /// job_description.json produced by extract-job
        #[arg(long)]
        job: PathBuf,
        #[arg(long, value_enum, default_value_t = Provider::Anthropic)]
        provider: Provider,
        #[arg(long, default_value = DEFAULT_TAILORING_MODEL)]
        model: String,
    },
    /// Render a tailored_resume.json to PDF in the same directory
    Render {
        tailored: PathBuf,
        /// Base name of the .tex/.pdf files (defaults to the resume title)
        #[arg(long)]
        output_name: Option<String>,
    },
    /// Full pipeline: job → resume → tailor → render
    Run {
        #[arg(long)]
        job: PathBuf,
        #[arg(long)]
        resume: PathBuf,
        #[command(flatten)]
        parsing: ParsingModel,
        #[command(flatten)]
        resume_model: ResumeModel,
        #[command(flatten)]
        tailoring: TailoringModel,
        #[arg(long)]
        output_name: Option<String>,
        /// Stop after tailored_resume.json is written
        #[arg(long)]
        skip_render: bool,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Runs one command to completion. The first error aborts the remaining stages.
pub async fn execute(command: Commands, state: &AppState) -> Result<(), AppError> {
    match command {
        Commands::ExtractJob {
            source,
            provider,
            model,
        } => {
            let job =
                extract_job_description(&state.llm, &state.storage, &source, provider, &model)
                    .await?;
            println!("{}", job.path.display());
        }
        Commands::ExtractResume {
            source,
            provider,
            model,
        } => {
            let resume = extract_resume(&state.llm, &state.storage, &source, provider, &model)
                .await?;
            println!("{}", resume.path.display());
        }
        Commands::Tailor {
            resume,
            job,
            provider,
            model,
        } => {
            let resume: Resume = storage::read_record(&resume)?;
            let job = load_job(&job)?;
            let tailored = tailor_resume(&state.llm, &resume, &job, provider, &model).await?;
            println!("{}", tailored.path.display());
        }
        Commands::Render {
            tailored,
            output_name,
        } => {
            let record: TailoredResume = storage::read_record(&tailored)?;
            let dir = parent_dir(&tailored);
            let pdf = render_to(state, &record, &dir, output_name).await?;
            println!("{}", pdf.display());
        }
        Commands::Run {
            job,
            resume,
            parsing,
            resume_model,
            tailoring,
            output_name,
            skip_render,
        } => {
            let (resume_provider, resume_model) = resume_model.resolve(&parsing);

            info!("Stage 1/4: job description");
            let job = extract_job_description(
                &state.llm,
                &state.storage,
                &job,
                parsing.provider,
                &parsing.model,
            )
            .await?;

            info!("Stage 2/4: resume");
            let resume = extract_resume(
                &state.llm,
                &state.storage,
                &resume,
                resume_provider,
                &resume_model,
            )
            .await?;

            info!("Stage 3/4: tailoring");
            let tailored = tailor_resume(
                &state.llm,
                &resume.record,
                &job,
                tailoring.provider,
                &tailoring.model,
            )
            .await?;

            if skip_render {
                info!("Rendering skipped");
                println!("{}", tailored.path.display());
                return Ok(());
            }

            info!("Stage 4/4: rendering");
            let pdf = render_to(state, &tailored.record, job.dir(), output_name).await?;
            println!("{}", pdf.display());
        }
    }
    Ok(())
}

fn load_job(path: &Path) -> Result<ExtractedJob, AppError> {
    let record: JobDescription = storage::read_record(path)?;
    Ok(ExtractedJob {
        record,
        path: path.to_path_buf(),
    })
}

async fn render_to(
    state: &AppState,
    record: &TailoredResume,
    dir: &Path,
    output_name: Option<String>,
) -> Result<PathBuf, AppError> {
    let name = output_name.unwrap_or_else(|| record.resume_title.clone());
    render(&state.compiler, record, dir, &name).await
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_line_is_well_formed() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn test_run_defaults_to_documented_models() {
        let cli = CommandLine::try_parse_from([
            "resume-tailor",
            "run",
            "--job",
            "posting.md",
            "--resume",
            "cv.pdf",
        ])
        .unwrap();

        match cli.command {
            Commands::Run {
                parsing,
                resume_model,
                tailoring,
                skip_render,
                ..
            } => {
                assert_eq!(parsing.provider, Provider::OpenAi);
                assert_eq!(parsing.model, "gpt-4o-mini");
                assert_eq!(
                    resume_model.resolve(&parsing),
                    (Provider::OpenAi, "gpt-4o-mini".to_string())
                );
                assert_eq!(tailoring.provider, Provider::Anthropic);
                assert_eq!(tailoring.model, "claude-3-5-sonnet-20240620");
                assert!(!skip_render);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_run_keeps_each_stage_model_separate() {
        let cli = CommandLine::try_parse_from([
            "resume-tailor",
            "run",
            "--job",
            "posting.md",
            "--resume",
            "cv.pdf",
            "--parse-provider",
            "ollama",
            "--parse-model",
            "llama3.1",
            "--resume-model",
            "qwen2.5",
            "--tailor-provider",
            "anthropic",
            "--tailor-model",
            "claude-3-haiku-20240307",
            "--skip-render",
        ])
        .unwrap();

        match cli.command {
            Commands::Run {
                parsing,
                resume_model,
                tailoring,
                skip_render,
                ..
            } => {
                assert_eq!(parsing.provider, Provider::Ollama);
                assert_eq!(parsing.model, "llama3.1");
                assert_eq!(
                    resume_model.resolve(&parsing),
                    (Provider::Ollama, "qwen2.5".to_string())
                );
                assert_eq!(tailoring.provider, Provider::Anthropic);
                assert_eq!(tailoring.model, "claude-3-haiku-20240307");
                assert!(skip_render);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_provider_flag_accepts_lowercase_names() {
        let cli = CommandLine::try_parse_from([
            "resume-tailor",
            "extract-job",
            "posting.pdf",
            "--provider",
            "ollama",
            "--model",
            "llama3.1",
        ])
        .unwrap();

        match cli.command {
            Commands::ExtractJob {
                source,
                provider,
                model,
            } => {
                assert_eq!(source, PathBuf::from("posting.pdf"));
                assert_eq!(provider, Provider::Ollama);
                assert_eq!(model, "llama3.1");
            }
            _ => panic!("expected extract-job"),
        }
    }

    #[test]
    fn test_parent_dir_of_bare_file_is_current_dir() {
        assert_eq!(parent_dir(Path::new("tailored_resume.json")), PathBuf::from("."));
        assert_eq!(
            parent_dir(Path::new("job_results/Acme/tailored_resume.json")),
            PathBuf::from("job_results/Acme")
        );
    }
}
