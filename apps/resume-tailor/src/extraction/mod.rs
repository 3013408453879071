// Extraction stage: source document → validated record → JSON on disk.
// All model calls go through llm_client.

pub mod job_description;
pub mod prompts;
pub mod resume;
pub mod text;

pub use job_description::{extract_job_description, ExtractedJob};
pub use resume::extract_resume;
