use serde::{Deserialize, Serialize};

use crate::schema::{FieldSpec, FieldType, ObjectSchema, StructuredRecord};

/// Where a certification fact came from.
pub const INFORMATION_SOURCES: &[&str] = &["resume", "knowledge base", "both"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub possible_work_locations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub medium_url: Option<String>,
    pub website_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub role: String,
    pub company: String,
    pub location: String,
    pub from_date: String,
    pub to_date: String,
    pub description: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub university: String,
    pub from_date: String,
    pub to_date: String,
    pub special_achievements: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub link: Option<String>,
    pub date: String,
    pub key_technologies_concepts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub link: Option<String>,
    pub organization: String,
    pub date: String,
    pub key_technologies_concepts: Vec<String>,
    pub project: Option<Project>,
    pub information_source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSection {
    pub name: String,
    pub skills: Vec<String>,
}

/// A candidate's résumé parsed into structured form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub contact_info: ContactInfo,
    pub summary: String,
    pub media: Media,
    pub work_experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub certifications_trainings: Vec<Certification>,
    pub projects: Vec<Project>,
    pub skill_sections: Vec<SkillSection>,
}

pub(crate) fn media_schema() -> ObjectSchema {
    ObjectSchema::new(
        "Media",
        "Media links of the person.",
        vec![
            FieldSpec::text("linkedin_url", "The LinkedIn URL of the person.").optional(),
            FieldSpec::text("github_url", "The GitHub URL of the person.").optional(),
            FieldSpec::text("medium_url", "The Medium URL of the person.").optional(),
            FieldSpec::text("website_url", "The website URL of the person.").optional(),
        ],
    )
}

fn contact_info_schema() -> ObjectSchema {
    ObjectSchema::new(
        "ContactInfo",
        "Contact information of the person.",
        vec![
            FieldSpec::text("name", "The name of the person.").non_empty(),
            FieldSpec::text("email", "The email address of the person."),
            FieldSpec::text_list(
                "possible_work_locations",
                "The possible work locations of the person relevant to the job requirements. \
                 e.g. United States(citizen): remote, Atlanta(GA), EU(work permit): remote, Berlin(Germany)",
            ),
        ],
    )
}

fn experience_schema() -> ObjectSchema {
    ObjectSchema::new(
        "Experience",
        "A work experience entry.",
        vec![
            FieldSpec::text(
                "role",
                "The job title or position held. e.g. Software Engineer, Machine Learning Engineer.",
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
                "A list of bullet points describing the work experience.",
            )
            .min_items(1),
        ],
    )
}

pub(crate) fn education_schema(guidance_suffix: &'static str) -> ObjectSchema {
    ObjectSchema::new(
        "Education",
        guidance_suffix,
        vec![
            FieldSpec::text(
                "degree",
                "The degree or qualification obtained and the major or field of study. \
                 e.g., Bachelor of Science in Computer Science.",
            ),
            FieldSpec::text(
                "university",
                "The name of the institution where the degree was obtained with location. \
                 e.g. Arizona State University, Tempe, USA",
            ),
            FieldSpec::text("from_date", "The start date of the education period. e.g., Aug 2023"),
            FieldSpec::text("to_date", "The end date of the education period. e.g., May 2025"),
            FieldSpec::text_list(
                "special_achievements",
                "Special achievements or honors received during the education period. \
                 e.g., Dean's List, Honor Roll, GPA 4/4 etc.",
            )
            .optional(),
        ],
    )
}

fn project_schema() -> ObjectSchema {
    ObjectSchema::new(
        "Project",
        "A project the person built or contributed to.",
        vec![
            FieldSpec::text("name", "The name of the project.").non_empty(),
            FieldSpec::text("link", "The link to the project.").optional(),
            FieldSpec::text("date", "The date of the project. e.g Aug 2023"),
            FieldSpec::text_list(
                "key_technologies_concepts",
                "Key technologies and concepts used in the project.",
            ),
        ],
    )
}

fn certification_schema() -> ObjectSchema {
    ObjectSchema::new(
        "Certification",
        "A certification or training (course, bootcamp etc.).",
        vec![
            FieldSpec::text(
                "name",
                "The name of the certification or training (course, bootcamp etc.)",
            )
            .non_empty(),
            FieldSpec::text("link", "The link to the certification or training.").optional(),
            FieldSpec::text(
                "organization",
                "The organization that awarded the certification or training.",
            ),
            FieldSpec::text("date", "The date of the certification or training."),
            FieldSpec::text_list(
                "key_technologies_concepts",
                "Key technologies and concepts used in the certification or training.",
            ),
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
        "A named group of skills.",
        vec![
            FieldSpec::text(
                "name",
                "Name or title of the skills group such as programming languages, data science, \
                 tools & technologies, cloud & DevOps, full stack, or soft skills found in the resume.",
            )
            .non_empty(),
            FieldSpec::text_list(
                "skills",
                "Specific skills or competencies within the skill group, such as Python, \
                 JavaScript, C#, SQL in programming languages found in the resume.",
            ),
        ],
    )
}

impl StructuredRecord for Resume {
    fn schema() -> ObjectSchema {
        ObjectSchema::new(
            "Resume",
            "A candidate's resume.",
            vec![
                FieldSpec::object("contact_info", contact_info_schema(), "Contact information of the person."),
                FieldSpec::text(
                    "summary",
                    "A short summary of the person's professional background and skills.",
                ),
                FieldSpec::object("media", media_schema(), "Media links of the person."),
                FieldSpec::object_list(
                    "work_experience",
                    experience_schema(),
                    "Work experiences, including job title, company, location, dates, and description.",
                ),
                FieldSpec::object_list(
                    "education",
                    education_schema("An education entry."),
                    "Educations, including degree, university, dates, and special achievements.",
                ),
                FieldSpec::object_list(
                    "certifications_trainings",
                    certification_schema(),
                    "Certifications or trainings, including name, organization, date, and information source.",
                ),
                FieldSpec::object_list(
                    "projects",
                    project_schema(),
                    "Projects, including name, date, link, and key technologies.",
                ),
                FieldSpec::object_list(
                    "skill_sections",
                    skill_section_schema(),
                    "Skill sections, each containing a group of skills.",
                ),
            ],
        )
    }
}

#[cfg(test)]
pub(crate) fn sample_resume() -> Resume {
    Resume {
        contact_info: ContactInfo {
            name: "Jordan Lee".to_string(),
            email: "jordan@example.com".to_string(),
            possible_work_locations: vec!["United States(citizen): remote".to_string()],
        },
        summary: "Backend engineer with 5 years of Rust & Go experience.".to_string(),
        media: Media {
            github_url: Some("https://github.com/jlee".to_string()),
            ..Media::default()
        },
        work_experience: vec![Experience {
            role: "Software Engineer".to_string(),
            company: "Initech".to_string(),
            location: "Austin, USA".to_string(),
            from_date: "Aug 2021".to_string(),
            to_date: "Present".to_string(),
            description: vec![
                "Built billing service in Rust".to_string(),
                "Cut p99 latency by 40%".to_string(),
            ],
        }],
        education: vec![Education {
            degree: "BSc Computer Science".to_string(),
            university: "State University, Austin, USA".to_string(),
            from_date: "Aug 2015".to_string(),
            to_date: "May 2019".to_string(),
            special_achievements: None,
        }],
        certifications_trainings: vec![Certification {
            name: "CKA".to_string(),
            link: None,
            organization: "CNCF".to_string(),
            date: "Jan 2023".to_string(),
            key_technologies_concepts: vec!["Kubernetes".to_string()],
            project: None,
            information_source: Some("resume".to_string()),
        }],
        projects: vec![Project {
            name: "tinykv".to_string(),
            link: Some("https://github.com/jlee/tinykv".to_string()),
            date: "Mar 2022".to_string(),
            key_technologies_concepts: vec!["Raft".to_string(), "Rust".to_string()],
        }],
        skill_sections: vec![SkillSection {
            name: "Languages".to_string(),
            skills: vec!["Rust".to_string(), "Go".to_string(), "SQL".to_string()],
        }],
    }
}
