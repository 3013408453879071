pub mod job_description;
pub mod resume;
pub mod tailored_resume;

pub use job_description::JobDescription;
pub use resume::Resume;
pub use tailored_resume::TailoredResume;
