// Prompt constants for the tailoring stage.

/// System prompt for tailoring.
pub const TAILORING_SYSTEM: &str = "You are an experienced resume expert specializing in \
    Software Engineering and Data Science. You optimize a candidate's resume for a specific job \
    description so that it passes ATS scans while engaging human readers. \
    You never invent facts that are not present in the candidate's resume.";

/// Instruction against inventing facts; missing facts go to `nice_to_add`.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Only use information provided in the original resume. Do NOT invent or assume \
    any additional details, metrics, employers, dates, or skills. If something relevant to the \
    job description is missing from the resume, list it under the matching `nice_to_add` field \
    instead of writing it into any other field.";

/// Instruction to keep output safe for LaTeX rendering.
pub const RENDERING_INSTRUCTION: &str = "\
    Avoid anything that could cause LaTeX rendering issues: no math notation, no emoji, no \
    unusual symbols or decorative unicode. Plain words, digits and ordinary punctuation only.";

/// Tailoring prompt template.
/// Replace: {grounding_instruction}, {rendering_instruction}, {resume_json},
///          {job_description_json}, {bullets_per_experience}, {max_nice_to_add}
pub const TAILORING_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

{rendering_instruction}

Here is the candidate's resume:
<resume>
{resume_json}
</resume>

Here is the job description:
<job_description>
{job_description_json}
</job_description>

Follow these steps to optimize the resume:

1. Understand the job description and its requirements.
2. Identify the skills and experiences in the resume that match those requirements.
3. Tailor the resume content to the job description by:
   - Highlighting relevant quantifiable achievements. Do not invent any achievements.
   - Incorporating the job's keywords strategically where the resume supports them.
   - Using active voice and strong action verbs.
   - Keeping phrasing ATS-compatible while maintaining readability.
4. Identify missing information that would be useful for this application and record it in
   `nice_to_add` (at most {max_nice_to_add} items at the top level and per experience).

HARD RULES:
1. Every work experience entry has EXACTLY {bullets_per_experience} description bullets in STAR form
   (Situation, Task, Action, Result); never fewer, never more, regardless of how many the
   original entry had
2. Keep every experience, education, certification and project from the resume; do not add new ones
3. `resume_title` starts with the company name, then an underscore, then the position name
4. Use ONLY facts from the resume"#;
