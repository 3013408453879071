// LaTeX document template for a tailored résumé.
// Every string reaching these builders has already been escaped.

use crate::errors::AppError;
use crate::models::TailoredResume;
use crate::render::escape::escape_tree;

/// Full document. Self-contained: only packages shipped with every TeX distribution.
/// Replace: {{name}}, {{contact_line}}, {{body}}
pub const RESUME_TEMPLATE: &str = r"\documentclass[10pt,letterpaper]{article}
\usepackage[margin=0.6in]{geometry}
\usepackage[T1]{fontenc}
\usepackage[utf8]{inputenc}
\usepackage{enumitem}
\usepackage{titlesec}

\pagestyle{empty}
\setlength{\parindent}{0pt}
\titleformat{\section}{\large\bfseries}{}{0pt}{\MakeUppercase}[\titlerule]
\titlespacing*{\section}{0pt}{8pt}{4pt}
\setlist[itemize]{leftmargin=*,itemsep=1pt,topsep=2pt}
\newcommand{\entry}[4]{\textbf{#1} \hfill #2\\ \textit{#3} \hfill \textit{#4}\par}

\begin{document}
\begin{center}
{\LARGE\bfseries {{name}}}\\[2pt]
{{contact_line}}
\end{center}

{{body}}
\end{document}
";

const SEPARATOR: &str = r" \textbar{} ";

/// Escapes every string in `tailored` and fills the template.
pub fn render_tex(tailored: &TailoredResume) -> Result<String, AppError> {
    let mut value = serde_json::to_value(tailored)?;
    escape_tree(&mut value);
    let escaped: TailoredResume = serde_json::from_value(value)?;

    Ok(RESUME_TEMPLATE
        .replace("{{name}}", &escaped.contact_info.name)
        .replace("{{contact_line}}", &contact_line(&escaped))
        .replace("{{body}}", &body(&escaped)))
}

fn contact_line(r: &TailoredResume) -> String {
    let mut parts = vec![r.contact_info.email.clone()];
    if let Some(locations) = &r.contact_info.location {
        if !locations.is_empty() {
            parts.push(locations.join("; "));
        }
    }
    parts.extend(
        [
            &r.media.linkedin_url,
            &r.media.github_url,
            &r.media.medium_url,
            &r.media.website_url,
        ]
        .into_iter()
        .flatten()
        .cloned(),
    );
    parts.retain(|p| !p.is_empty());
    parts.join(SEPARATOR)
}

fn body(r: &TailoredResume) -> String {
    let mut out = String::new();

    if !r.summary.is_empty() {
        out.push_str(&section("Summary", &format!("{}\n", r.summary)));
    }

    if !r.work_experience.is_empty() {
        let mut content = String::new();
        for exp in &r.work_experience {
            content.push_str(&entry(
                &exp.role,
                &date_range(&exp.from_date, &exp.to_date),
                &exp.company,
                &exp.location,
            ));
            content.push_str(&itemize(&exp.description));
        }
        out.push_str(&section("Experience", &content));
    }

    if !r.education.is_empty() {
        let mut content = String::new();
        for edu in &r.education {
            content.push_str(&entry(
                &edu.degree,
                &date_range(&edu.from_date, &edu.to_date),
                &edu.university,
                "",
            ));
            if let Some(achievements) = &edu.special_achievements {
                content.push_str(&itemize(achievements));
            }
        }
        out.push_str(&section("Education", &content));
    }

    if !r.projects.is_empty() {
        let mut content = String::new();
        for project in &r.projects {
            content.push_str(&entry(
                &project.name,
                &project.date,
                project.key_technologies_concepts.as_deref().unwrap_or(""),
                project.link.as_deref().unwrap_or(""),
            ));
            if let Some(purpose) = project.purpose.as_deref().filter(|p| !p.is_empty()) {
                content.push_str(&format!("{purpose}\\par\n"));
            }
        }
        out.push_str(&section("Projects", &content));
    }

    if !r.certifications_trainings.is_empty() {
        let mut content = String::new();
        for cert in &r.certifications_trainings {
            content.push_str(&entry(
                &cert.name,
                &cert.date,
                &cert.organization,
                cert.certificate_link.as_deref().unwrap_or(""),
            ));
            let details: Vec<String> = [&cert.description, &cert.key_technologies_concepts]
                .into_iter()
                .flatten()
                .filter(|d| !d.is_empty())
                .cloned()
                .collect();
            content.push_str(&itemize(&details));
        }
        out.push_str(&section("Certifications", &content));
    }

    if !r.skill_sections.is_empty() {
        let content: String = r
            .skill_sections
            .iter()
            .map(|s| format!("\\textbf{{{}}}: {}\\par\n", s.name, s.skills.join(", ")))
            .collect();
        out.push_str(&section("Skills", &content));
    }

    out
}

fn section(title: &str, content: &str) -> String {
    format!("\\section{{{title}}}\n{content}\n")
}

fn entry(title: &str, right: &str, subtitle: &str, subright: &str) -> String {
    format!("\\entry{{{title}}}{{{right}}}{{{subtitle}}}{{{subright}}}\n")
}

fn itemize(items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut out = String::from("\\begin{itemize}\n");
    for item in items {
        out.push_str(&format!("  \\item {item}\n"));
    }
    out.push_str("\\end{itemize}\n");
    out
}

// `--` is the typographic en-dash; the dates themselves are already escaped.
fn date_range(from: &str, to: &str) -> String {
    match (from.is_empty(), to.is_empty()) {
        (false, false) => format!("{from} -- {to}"),
        (false, true) => from.to_string(),
        (true, _) => to.to_string(),
    }
}
