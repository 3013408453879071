use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::AppError;

/// Extensions removed after a successful build.
pub const AUX_EXTENSIONS: [&str; 3] = ["aux", "log", "out"];

/// Compiler passes. The second resolves references laid out by the first.
const PASSES: u32 = 2;

/// Lines of compiler output kept in the error message.
const OUTPUT_TAIL_LINES: usize = 20;

#[derive(Debug, Clone)]
pub struct LatexCompiler {
    program: String,
}

impl LatexCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Builds `tex_path` into a PDF next to it.
    ///
    /// Runs in the file's directory. On success the auxiliary files are deleted; on failure
    /// they are left in place and `RenderFailed` names the directory.
    pub async fn compile(&self, tex_path: &Path) -> Result<PathBuf, AppError> {
        let dir = tex_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let file_name = tex_path
            .file_name()
            .ok_or_else(|| AppError::RenderFailed {
                message: format!("not a file path: {}", tex_path.display()),
                artifacts_dir: dir.clone(),
            })?
            .to_os_string();

        for pass in 1..=PASSES {
            debug!("{} pass {pass}/{PASSES} on {}", self.program, tex_path.display());
            let output = Command::new(&self.program)
                .arg("-interaction=nonstopmode")
                .arg("-halt-on-error")
                .arg(&file_name)
                .current_dir(&dir)
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|e| AppError::RenderFailed {
                    message: format!("failed to run '{}': {e}", self.program),
                    artifacts_dir: dir.clone(),
                })?;

            if !output.status.success() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                warn!(
                    "{} exited with {} on pass {pass}",
                    self.program, output.status
                );
                return Err(AppError::RenderFailed {
                    message: format!(
                        "{} exited with {} on pass {pass}: {}",
                        self.program,
                        output.status,
                        tail(&stdout, OUTPUT_TAIL_LINES)
                    ),
                    artifacts_dir: dir,
                });
            }
        }

        let pdf_path = tex_path.with_extension("pdf");
        if !pdf_path.exists() {
            return Err(AppError::RenderFailed {
                message: format!("{} produced no {}", self.program, pdf_path.display()),
                artifacts_dir: dir,
            });
        }

        for ext in AUX_EXTENSIONS {
            let aux = tex_path.with_extension(ext);
            match std::fs::remove_file(&aux) {
                Ok(()) => debug!("Removed {}", aux.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Could not remove {}: {e}", aux.display()),
            }
        }

        info!("PDF generated: {}", pdf_path.display());
        Ok(pdf_path)
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Writes an executable script standing in for the TeX compiler.
    /// It receives the `.tex` file name as its third argument.
    fn fake_compiler(dir: &Path, script: &str) -> String {
        let path = dir.join("fake-latex");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_success_cleans_aux_files() {
        let root = tempfile::tempdir().unwrap();
        let tex = root.path().join("cv.tex");
        std::fs::write(&tex, "\\documentclass{article}").unwrap();
        let program = fake_compiler(
            root.path(),
            r#"base="${3%.tex}"; touch "$base.pdf" "$base.aux" "$base.log" "$base.out""#,
        );

        let pdf = LatexCompiler::new(program).compile(&tex).await.unwrap();

        assert_eq!(pdf, root.path().join("cv.pdf"));
        assert!(pdf.exists());
        for ext in AUX_EXTENSIONS {
            assert!(!tex.with_extension(ext).exists(), "{ext} left behind");
        }
    }

    #[tokio::test]
    async fn test_failure_keeps_aux_files() {
        let root = tempfile::tempdir().unwrap();
        let tex = root.path().join("cv.tex");
        std::fs::write(&tex, "\\broken").unwrap();
        let program = fake_compiler(
            root.path(),
            r#"base="${3%.tex}"; touch "$base.aux" "$base.log"; echo "! Undefined control sequence."; exit 1"#,
        );

        let err = LatexCompiler::new(program).compile(&tex).await.unwrap_err();

        match err {
            AppError::RenderFailed {
                message,
                artifacts_dir,
            } => {
                assert!(message.contains("Undefined control sequence"));
                assert!(message.contains("pass 1"));
                assert_eq!(artifacts_dir, root.path());
            }
            other => panic!("expected RenderFailed, got {other:?}"),
        }
        assert!(tex.with_extension("aux").exists());
        assert!(tex.with_extension("log").exists());
    }

    fn passes_recorded(dir: &Path) -> usize {
        std::fs::read_to_string(dir.join("passes.txt"))
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_compiler_runs_exactly_twice_on_success() {
        let root = tempfile::tempdir().unwrap();
        let tex = root.path().join("cv.tex");
        std::fs::write(&tex, "\\documentclass{article}").unwrap();
        let program = fake_compiler(
            root.path(),
            r#"echo "$3" >> passes.txt; touch "${3%.tex}.pdf""#,
        );

        LatexCompiler::new(program).compile(&tex).await.unwrap();

        assert_eq!(passes_recorded(root.path()), 2);
    }

    #[tokio::test]
    async fn test_failure_on_first_pass_stops_there() {
        let root = tempfile::tempdir().unwrap();
        let tex = root.path().join("cv.tex");
        std::fs::write(&tex, "\\broken").unwrap();
        let program = fake_compiler(root.path(), r#"echo "$3" >> passes.txt; exit 1"#);

        let err = LatexCompiler::new(program).compile(&tex).await.unwrap_err();

        assert!(matches!(err, AppError::RenderFailed { .. }));
        assert_eq!(passes_recorded(root.path()), 1);
    }

    #[tokio::test]
    async fn test_missing_compiler_is_render_failure() {
        let root = tempfile::tempdir().unwrap();
        let tex = root.path().join("cv.tex");
        std::fs::write(&tex, "").unwrap();

        let err = LatexCompiler::new("definitely-not-a-latex-binary")
            .compile(&tex)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RenderFailed { .. }));
    }

    #[test]
    fn test_tail_keeps_last_lines() {
        assert_eq!(tail("a\nb\nc", 2), "b\nc");
        assert_eq!(tail("a", 5), "a");
    }
}
