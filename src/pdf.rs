//! HTML to PDF rendering through an external layout engine.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ConvertError, Result};

/// Default wkhtmltopdf executable, looked up on `PATH`.
pub const DEFAULT_ENGINE: &str = "wkhtmltopdf";

const INSTALL_HINT: &str = "Install wkhtmltopdf first:\n  \
    Ubuntu/Debian: sudo apt-get install wkhtmltopdf\n  \
    macOS: brew install wkhtmltopdf\n  \
    Windows: https://wkhtmltopdf.org/downloads.html";

/// Page size and margin passed to the rendering engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    /// Paper size name such as `A4` or `Letter`.
    pub page_size: String,
    /// Margin applied to all four sides, with unit (`10mm`).
    pub margin: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_size: "A4".to_string(),
            margin: "10mm".to_string(),
        }
    }
}

/// Renders a complete HTML document file to a PDF file.
pub trait PdfEngine {
    /// Renders `html` into `pdf` using `layout`.
    ///
    /// Relative references in the document resolve against the directory
    /// containing `html`.
    ///
    /// # Errors
    ///
    /// Returns `Render` if the engine is unavailable or reports failure
    fn render(&self, html: &Path, pdf: &Path, layout: &PageLayout) -> Result<()>;
}

/// wkhtmltopdf invoked as a child process.
#[derive(Debug, Clone)]
pub struct Wkhtmltopdf {
    program: PathBuf,
}

impl Wkhtmltopdf {
    /// Uses the executable at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the executable this engine runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Builds the command line arguments for one rendering.
    pub fn args(html: &Path, pdf: &Path, layout: &PageLayout) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--quiet".into(),
            "--encoding".into(),
            "UTF-8".into(),
            "--page-size".into(),
            layout.page_size.clone().into(),
        ];

        for side in ["top", "right", "bottom", "left"] {
            args.push(format!("--margin-{}", side).into());
            args.push(layout.margin.clone().into());
        }

        args.push("--no-outline".into());
        args.push("--enable-local-file-access".into());
        args.push(html.into());
        args.push(pdf.into());
        args
    }
}

impl Default for Wkhtmltopdf {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE)
    }
}

impl PdfEngine for Wkhtmltopdf {
    fn render(&self, html: &Path, pdf: &Path, layout: &PageLayout) -> Result<()> {
        log::debug!(
            "Running {} for {} ({}, margin {})",
            self.program.display(),
            html.display(),
            layout.page_size,
            layout.margin
        );

        let output = Command::new(&self.program)
            .args(Self::args(html, pdf, layout))
            .output()
            .map_err(|e| {
                let reason = if e.kind() == io::ErrorKind::NotFound {
                    format!("{} is not installed. {}", self.program.display(), INSTALL_HINT)
                } else {
                    format!("cannot run {}: {}", self.program.display(), e)
                };
                ConvertError::Render {
                    path: html.to_path_buf(),
                    reason,
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("{} exited with {}", self.program.display(), output.status),
                detail => format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    detail
                ),
            };
            return Err(ConvertError::Render {
                path: html.to_path_buf(),
                reason,
            });
        }

        Ok(())
    }
}
