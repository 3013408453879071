use serde::{Deserialize, Serialize};

use crate::models::resume::{education_schema, media_schema, Education, Media, INFORMATION_SOURCES};
use crate::schema::{FieldSpec, FieldType, ObjectSchema, StructuredRecord};

/// Bullets per tailored experience entry. Enforced by schema validation, never by truncation.
pub const STAR_BULLETS_PER_EXPERIENCE: usize = 3;
/// Upper bound on `nice_to_add` suggestions at the top level and per experience.
pub const MAX_NICE_TO_ADD: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredContactInfo {
    pub name: String,
    pub email: String,
    pub location: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredExperience {
    pub role: String,
    pub company: String,
    pub location: String,
    pub from_date: String,
    pub to_date: String,
    pub description: Vec<String>,
    pub nice_to_add: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredProject {
    pub name: String,
    pub date: String,
    pub link: Option<String>,
    pub purpose: Option<String>,
    pub key_technologies_concepts: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredCertification {
    pub name: String,
    pub organization: String,
    pub date: String,
    pub certificate_link: Option<String>,
    pub description: Option<String>,
    pub key_technologies_concepts: Option<String>,
    pub project: Option<TailoredProject>,
    pub information_source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredSkillSection {
    pub name: String,
    pub skills: Vec<String>,
    pub nice_to_add: Option<Vec<String>>,
}

/// A résumé rewritten for one specific job description. Sole input to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredResume {
    pub resume_title: String,
    pub contact_info: TailoredContactInfo,
    pub summary: String,
    pub media: Media,
    pub work_experience: Vec<TailoredExperience>,
    pub education: Vec<Education>,
    pub certifications_trainings: Vec<TailoredCertification>,
    pub projects: Vec<TailoredProject>,
    pub skill_sections: Vec<TailoredSkillSection>,
    pub nice_to_add: Option<Vec<String>>,
}

fn contact_info_schema() -> ObjectSchema {
    ObjectSchema::new(
        "ContactInfo",
        "Contact information of the person.",
        vec![
            FieldSpec::text("name", "The name of the person.").non_empty(),
            FieldSpec::text("email", "The email address of the person."),
            FieldSpec::text_list(
                "location",
                "Matching work locations from resume that align with job requirements with work \
                 authorization status.",
            )
            .optional(),
        ],
    )
}

fn experience_schema() -> ObjectSchema {
    ObjectSchema::new(
        "Experience",
        "A work experience entry tailored to the job description.",
        vec![
            FieldSpec::text(
                "role",
                "The job title or position held tailored to the job description.",
            )
            .non_empty(),
            FieldSpec::text("company", "The name of the company or organization.").non_empty(),
            FieldSpec::text(
                "location",
                "The location of the company or organization. e.g. San Francisco, USA.",
            ),
            FieldSpec::text("from_date", "The start date of the employment period. e.g., Aug 2023"),
            FieldSpec::text("to_date", "The end date of the employment period. e.g., Nov 2025"),
            FieldSpec::text_list(
                "description",
                "Bullet points describing work experience, using STAR format (Situation, Task, \
                 Action, Result). Each point should include quantified results and specific \
                 technical details if possible. Example: 'Led ML pipeline development reducing \
                 processing time 40% and improving accuracy 15%'",
            )
            .non_empty()
            .exactly(STAR_BULLETS_PER_EXPERIENCE),
            FieldSpec::text_list(
                "nice_to_add",
                "Additional relevant skills, experiences or achievements that would strengthen \
                 alignment with the job requirements but are not currently in the resume.",
            )
            .optional()
            .max_items(MAX_NICE_TO_ADD),
        ],
    )
}

fn project_schema() -> ObjectSchema {
    ObjectSchema::new(
        "Project",
        "A project tailored to the job description.",
        vec![
            FieldSpec::text("name", "The name of the project.").non_empty(),
            FieldSpec::text("date", "The date of the project. e.g Aug 2023"),
            FieldSpec::text("link", "The link to the project.").optional(),
            FieldSpec::text(
                "purpose",
                "A concise 1-2 sentence description of what the project does and aims to \
                 achieve, derived from analyzing its key technologies and technical concepts.",
            )
            .optional(),
            FieldSpec::text(
                "key_technologies_concepts",
                "Comma-separated key technologies and concepts used in the project tailored to \
                 the job description.",
            )
            .optional(),
        ],
    )
}

fn certification_schema() -> ObjectSchema {
    ObjectSchema::new(
        "Certification",
        "A certification or training tailored to the job description.",
        vec![
            FieldSpec::text(
                "name",
                "The name of the certification or training (course, bootcamp etc.)",
            )
            .non_empty(),
            FieldSpec::text(
                "organization",
                "The organization that awarded the certification or training.",
            ),
            FieldSpec::text("date", "The date of the certification or training."),
            FieldSpec::text(
                "certificate_link",
                "The link to the certificate of the certification or training.",
            )
            .optional(),
            FieldSpec::text(
                "description",
                "A description summarizing the certification or training tailored to the job \
                 description.",
            )
            .optional(),
            FieldSpec::text(
                "key_technologies_concepts",
                "Comma-separated key technologies and concepts used in the certification or \
                 training tailored to the job description.",
            )
            .optional(),
            FieldSpec::object(
                "project",
                project_schema(),
                "The project related to the certification or training.",
            )
            .optional(),
            FieldSpec::new(
                "information_source",
                FieldType::OneOf(INFORMATION_SOURCES),
                "The source of the information about the certification.",
            )
            .optional(),
        ],
    )
}

fn skill_section_schema() -> ObjectSchema {
    ObjectSchema::new(
        "SkillSection",
        "A named group of skills tailored to the job description.",
        vec![
            FieldSpec::text(
                "name",
                "Name or title of the skills group such as programming languages, data science, \
                 tools & technologies, cloud & DevOps, full stack, or soft skills found in the \
                 resume tailored to the job description.",
            )
            .non_empty(),
            FieldSpec::text_list(
                "skills",
                "Specific skills or competencies within the skill group found in the resume \
                 tailored to the job description.",
            ),
            FieldSpec::text_list(
                "nice_to_add",
                "Something that is not present in the resume but will be good to add to make it \
                 more relevant to the job description.",
            )
            .optional(),
        ],
    )
}

impl StructuredRecord for TailoredResume {
    fn schema() -> ObjectSchema {
        ObjectSchema::new(
            "TailoredResume",
            "A resume optimized for a specific job description.",
            vec![
                FieldSpec::text(
                    "resume_title",
                    "Short title starting with company name _ position name.",
                )
                .non_empty(),
                FieldSpec::object("contact_info", contact_info_schema(), "Contact information of the person."),
                FieldSpec::text(
                    "summary",
                    "A concise professional summary highlighting relevant qualifications, \
                     experience, and achievements that align with the target role.",
                ),
                FieldSpec::object("media", media_schema(), "Media links of the person."),
                FieldSpec::object_list(
                    "work_experience",
                    experience_schema(),
                    "Work experiences of the person tailored to the job description.",
                ),
                FieldSpec::object_list(
                    "education",
                    education_schema("An education entry tailored to the job description."),
                    "Educations, including degree, university, dates, and special achievements.",
                )
                .min_items(1)
                .max_items(3),
                FieldSpec::object_list(
                    "certifications_trainings",
                    certification_schema(),
                    "Certifications or trainings of the person tailored to the job description.",
                ),
                FieldSpec::object_list(
                    "projects",
                    project_schema(),
                    "Projects of the person tailored to the job description.",
                ),
                FieldSpec::object_list(
                    "skill_sections",
                    skill_section_schema(),
                    "Skill sections of the person tailored to the job description.",
                ),
                FieldSpec::text_list(
                    "nice_to_add",
                    "Something that is not present in the resume but will be good to add to make \
                     it more relevant to the job description.",
                )
                .optional()
                .max_items(MAX_NICE_TO_ADD),
            ],
        )
    }
}

#[cfg(test)]
pub(crate) fn sample_tailored_resume() -> TailoredResume {
    TailoredResume {
        resume_title: "Acme_Backend Engineer".to_string(),
        contact_info: TailoredContactInfo {
            name: "Jordan Lee".to_string(),
            email: "jordan@example.com".to_string(),
            location: Some(vec!["United States: remote".to_string()]),
        },
        summary: "Rust backend engineer focused on payment APIs & reliability.".to_string(),
        media: Media {
            github_url: Some("https://github.com/jlee".to_string()),
            ..Media::default()
        },
        work_experience: vec![TailoredExperience {
            role: "Software Engineer".to_string(),
            company: "Initech".to_string(),
            location: "Austin, USA".to_string(),
            from_date: "Aug 2021".to_string(),
            to_date: "Present".to_string(),
            description: vec![
                "Built a Rust billing service processing $2M/day".to_string(),
                "Reduced p99 latency by 40% via connection pooling".to_string(),
                "Led migration of 12 endpoints to PostgreSQL".to_string(),
            ],
            nice_to_add: Some(vec!["Kubernetes operations".to_string()]),
        }],
        education: vec![Education {
            degree: "BSc Computer Science".to_string(),
            university: "State University, Austin, USA".to_string(),
            from_date: "Aug 2015".to_string(),
            to_date: "May 2019".to_string(),
            special_achievements: Some(vec!["Dean's List".to_string()]),
        }],
        certifications_trainings: vec![TailoredCertification {
            name: "CKA".to_string(),
            organization: "CNCF".to_string(),
            date: "Jan 2023".to_string(),
            certificate_link: None,
            description: Some("Kubernetes administration".to_string()),
            key_technologies_concepts: Some("Kubernetes, Helm".to_string()),
            project: None,
            information_source: Some("resume".to_string()),
        }],
        projects: vec![TailoredProject {
            name: "tinykv".to_string(),
            date: "Mar 2022".to_string(),
            link: Some("https://github.com/jlee/tinykv".to_string()),
            purpose: Some("A Raft-replicated key-value store.".to_string()),
            key_technologies_concepts: Some("Rust, Raft, gRPC".to_string()),
        }],
        skill_sections: vec![TailoredSkillSection {
            name: "Languages".to_string(),
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            nice_to_add: None,
        }],
        nice_to_add: Some(vec!["Payments domain experience".to_string()]),
    }
}
