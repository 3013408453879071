use serde::{Deserialize, Serialize};

use crate::schema::{FieldSpec, ObjectSchema, StructuredRecord};

/// A job posting parsed into structured form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub job_title: String,
    pub company_name: String,
    pub job_location: String,
    pub job_type: String,
    pub job_duties_and_responsibilities: Vec<String>,
    pub required_qualifications: Vec<String>,
    pub preferred_qualifications: Vec<String>,
    pub job_benefits: Vec<String>,
    pub keywords: Vec<String>,
}

impl StructuredRecord for JobDescription {
    fn schema() -> ObjectSchema {
        ObjectSchema::new(
            "JobDescription",
            "Schema defining the job description.",
            vec![
                FieldSpec::text("job_title", "The title of the job.").non_empty(),
                FieldSpec::text("company_name", "The name of the company.").non_empty(),
                FieldSpec::text(
                    "job_location",
                    "The location of the job. eg. Remote, New York, London, etc.",
                ),
                FieldSpec::text(
                    "job_type",
                    "The type of the job. eg. Full-time, Part-time, Internship, etc.",
                ),
                FieldSpec::text_list(
                    "job_duties_and_responsibilities",
                    "The purpose of the job and company, and the main duties and responsibilities. \
                     Empty list if none are stated.",
                ),
                FieldSpec::text_list(
                    "required_qualifications",
                    "Including education, minimum experience, specific knowledge, skills, abilities, \
                     and any required licenses or certifications. Empty list if none are stated.",
                ),
                FieldSpec::text_list(
                    "preferred_qualifications",
                    "Additional qualifications that could set a candidate apart. Empty list if none.",
                ),
                FieldSpec::text_list("job_benefits", "The benefits of the job. Empty list if none."),
                FieldSpec::text_list(
                    "keywords",
                    "The keywords of the job that might be useful for the resume search.",
                ),
            ],
        )
    }
}

#[cfg(test)]
pub(crate) fn sample_job_description() -> JobDescription {
    JobDescription {
        job_title: "Backend Engineer".to_string(),
        company_name: "Acme".to_string(),
        job_location: "Remote".to_string(),
        job_type: "Full-time".to_string(),
        job_duties_and_responsibilities: vec!["Build and operate payment APIs".to_string()],
        required_qualifications: vec!["3+ years Rust".to_string(), "PostgreSQL".to_string()],
        preferred_qualifications: vec!["Kubernetes".to_string()],
        job_benefits: vec![],
        keywords: vec!["Rust".to_string(), "APIs".to_string(), "PostgreSQL".to_string()],
    }
}
