//! Document rendering: `TailoredResume` → escaped LaTeX → PDF.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::AppError;
use crate::models::TailoredResume;
use crate::storage::{self, path_token};

pub mod compiler;
pub mod escape;
pub mod template;

pub use compiler::LatexCompiler;

/// Writes `<output_dir>/<output_name>.tex` and compiles it. Returns the PDF path.
pub async fn render(
    compiler: &LatexCompiler,
    tailored: &TailoredResume,
    output_dir: &Path,
    output_name: &str,
) -> Result<PathBuf, AppError> {
    let tex = template::render_tex(tailored)?;
    let tex_path = output_dir.join(format!("{}.tex", path_token(output_name)));
    storage::write_whole(&tex_path, tex.as_bytes())?;
    info!("Wrote {}", tex_path.display());

    compiler.compile(&tex_path).await
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::models::tailored_resume::sample_tailored_resume;

    #[tokio::test]
    async fn test_failed_compile_leaves_tex_for_inspection() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("Acme_Backend_Engineer_20241028");

        let err = render(
            &LatexCompiler::new("false"),
            &sample_tailored_resume(),
            &out,
            "Acme Backend Engineer",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::RenderFailed { .. }));
        let tex = std::fs::read_to_string(out.join("Acme_Backend_Engineer.tex")).unwrap();
        assert!(tex.contains(r"\$2M/day"));
    }
}
