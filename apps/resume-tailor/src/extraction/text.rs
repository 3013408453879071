//! Plain-text extraction from source documents.

use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::errors::AppError;

/// Upper bound on decoding one PDF. Some malformed font tables make pdf-extract spin.
const PDF_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(60);

/// Input formats the extractor understands, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Markdown,
    /// A record that was already parsed; handled by the caller, never sent to a model.
    Json,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(SourceFormat::Pdf),
            "md" | "markdown" => Ok(SourceFormat::Markdown),
            "json" => Ok(SourceFormat::Json),
            _ => Err(AppError::UnsupportedFormat(if ext.is_empty() {
                format!("{} (no extension)", path.display())
            } else {
                format!(".{ext}")
            })),
        }
    }
}

/// Reads `path` and returns its text.
///
/// - PDF: each page is decoded, characters outside printable ASCII are dropped line by line,
///   and pages are concatenated in order. Decoding runs on the blocking pool, so a panic or
///   hang inside the PDF decoder comes back as `ExtractionFailed`.
/// - Markdown: returned verbatim; the model parses structure from the raw markup.
pub async fn extract_text(path: &Path) -> Result<String, AppError> {
    match SourceFormat::from_path(path)? {
        SourceFormat::Pdf => extract_pdf_text(path).await,
        SourceFormat::Markdown => Ok(tokio::fs::read_to_string(path).await?),
        SourceFormat::Json => Err(AppError::UnsupportedFormat(
            ".json (already structured; load it as a record instead)".to_string(),
        )),
    }
}

async fn extract_pdf_text(path: &Path) -> Result<String, AppError> {
    let owned = path.to_path_buf();
    let pages = run_isolated(path, PDF_EXTRACTION_TIMEOUT, move || {
        pdf_extract::extract_text_by_pages(&owned).map_err(|e| e.to_string())
    })
    .await?;

    info!("PDF text extraction complete: {} pages", pages.len());

    Ok(pages
        .iter()
        .map(|page| to_printable_ascii(page))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Runs a blocking extractor on the blocking pool with a timeout.
async fn run_isolated<T, F>(path: &Path, timeout: Duration, extract: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, String> + Send + 'static,
{
    let failed = |reason: String| AppError::ExtractionFailed {
        path: path.to_path_buf(),
        reason,
    };

    tokio::time::timeout(timeout, tokio::task::spawn_blocking(extract))
        .await
        .map_err(|_| failed(format!("timed out after {}s", timeout.as_secs())))?
        .map_err(|e| {
            failed(if e.is_panic() {
                "decoder panicked".to_string()
            } else {
                format!("task join error: {e}")
            })
        })?
        .map_err(failed)
}

/// Drops every character outside printable ASCII, keeping line breaks and tabs.
pub fn to_printable_ascii(text: &str) -> String {
    text.lines()
        .map(|line| {
            line.chars()
                .filter(|c| matches!(c, ' '..='~' | '\t'))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension_is_case_insensitive() {
        assert_eq!(
            SourceFormat::from_path(Path::new("cv.PDF")).unwrap(),
            SourceFormat::Pdf
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("jd.markdown")).unwrap(),
            SourceFormat::Markdown
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("jd.json")).unwrap(),
            SourceFormat::Json
        );
    }

    #[tokio::test]
    async fn test_unknown_extension_is_unsupported() {
        let err = SourceFormat::from_path(Path::new("resume.docx")).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(ref ext) if ext == ".docx"));
        let err = extract_text(&PathBuf::from("README")).await.unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_markdown_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jd.md");
        let content = "# Backend Engineer — Acme\n\n* Rust\n* Café ☕\n";
        std::fs::write(&path, content).unwrap();
        assert_eq!(extract_text(&path).await.unwrap(), content);
    }

    #[test]
    fn test_printable_ascii_strips_non_ascii_but_keeps_lines() {
        let page = "Jürgen Müller — Engineer\n• Rust\tGo\n\u{0007}bell";
        assert_eq!(
            to_printable_ascii(page),
            "Jrgen Mller  Engineer\n Rust\tGo\nbell"
        );
    }

    #[tokio::test]
    async fn test_json_is_not_text_extracted() {
        let err = extract_text(Path::new("jd.json")).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    /// Single-page PDF whose content stream selects `/F1` while `/Resources` is empty.
    fn pdf_with_undeclared_font() -> Vec<u8> {
        let content = "BT /F1 12 Tf 72 720 Td (Hello) Tj ET";
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << >> \
             /Contents 4 0 R >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
        ];

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
        }
        let xref_at = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.into_bytes()
    }

    #[tokio::test]
    async fn test_malformed_pdf_is_an_error_not_a_crash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, pdf_with_undeclared_font()).unwrap();

        let err = extract_text(&path).await.unwrap_err();

        assert!(matches!(err, AppError::ExtractionFailed { ref path, .. } if path.ends_with("broken.pdf")));
        assert_eq!(err.code(), "EXTRACTION_FAILED");
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_extraction_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = extract_text(&path).await.unwrap_err();

        assert!(matches!(err, AppError::ExtractionFailed { .. }));
    }

    #[tokio::test]
    async fn test_panicking_extractor_is_contained() {
        let err = run_isolated::<String, _>(Path::new("x.pdf"), Duration::from_secs(5), || {
            panic!("bad font table")
        })
        .await
        .unwrap_err();

        match err {
            AppError::ExtractionFailed { reason, .. } => assert_eq!(reason, "decoder panicked"),
            other => panic!("expected ExtractionFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_extractor_times_out() {
        let err = run_isolated::<String, _>(Path::new("x.pdf"), Duration::from_millis(20), || {
            std::thread::sleep(Duration::from_millis(500));
            Ok(String::new())
        })
        .await
        .unwrap_err();

        match err {
            AppError::ExtractionFailed { reason, .. } => assert!(reason.starts_with("timed out")),
            other => panic!("expected ExtractionFailed, got {other:?}"),
        }
    }
}
