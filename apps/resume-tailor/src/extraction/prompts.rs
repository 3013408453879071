/// System prompt for job description parsing.
pub const JOB_DESCRIPTION_SYSTEM: &str = "You are a job description parser. \
    Parse the job description and extract the data according to the schema. \
    Use an empty list for any list field the posting does not mention.";

/// System prompt for resume parsing.
pub const RESUME_SYSTEM: &str = "You are a resume parser. \
    Parse the resume and extract the data according to the schema. \
    Copy facts exactly as written; do not summarize away numbers, dates or names.";
