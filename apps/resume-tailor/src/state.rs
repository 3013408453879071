use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::render::LatexCompiler;
use crate::storage::Storage;

/// Everything a pipeline command needs, built once from the configuration.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub storage: Storage,
    pub compiler: LatexCompiler,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            llm: LlmClient::from_config(config)?,
            storage: Storage::new(config.results_dir.clone(), config.resumes_dir.clone()),
            compiler: LatexCompiler::new(config.latex_compiler.clone()),
        })
    }
}
