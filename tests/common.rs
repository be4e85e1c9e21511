//! Shared test utilities for integration tests.
//!
//! Provides helpers for laying out input documents with images and a PDF
//! engine double that records what it was asked to render.

#![allow(dead_code)]

use anyhow::Result;
use md2pdf::{ConvertError, PageLayout, PdfEngine};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Bytes written by [`FakeEngine`] in place of a real PDF.
pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n% fake\n";

/// Small PNG-like payload used for image fixtures.
pub const IMAGE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake image";

/// Writes file under `root`, creating parent directories as needed.
///
/// # Errors
///
/// Returns error if directory creation or file write fails
pub fn write_file(root: &Path, path: &str, content: impl AsRef<[u8]>) -> Result<PathBuf> {
    let file_path = root.join(path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Lists file names directly inside `dir`, sorted.
pub fn list_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// One recorded engine invocation.
#[derive(Debug, Clone)]
pub struct Rendering {
    pub html_path: PathBuf,
    pub html: String,
    pub layout: PageLayout,
}

/// PDF engine double writing [`FAKE_PDF`] and recording each call.
#[derive(Default)]
pub struct FakeEngine {
    pub renderings: RefCell<Vec<Rendering>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the single recorded rendering.
    pub fn only_rendering(&self) -> Rendering {
        let renderings = self.renderings.borrow();
        assert_eq!(renderings.len(), 1, "Expected exactly one rendering");
        renderings[0].clone()
    }
}

impl PdfEngine for FakeEngine {
    fn render(&self, html: &Path, pdf: &Path, layout: &PageLayout) -> md2pdf::Result<()> {
        let content = fs::read_to_string(html).map_err(|e| ConvertError::Render {
            path: html.to_path_buf(),
            reason: e.to_string(),
        })?;

        self.renderings.borrow_mut().push(Rendering {
            html_path: html.to_path_buf(),
            html: content,
            layout: layout.clone(),
        });

        fs::write(pdf, FAKE_PDF).map_err(|e| ConvertError::Render {
            path: pdf.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// PDF engine double that always fails.
pub struct FailingEngine;

impl PdfEngine for FailingEngine {
    fn render(&self, html: &Path, _pdf: &Path, _layout: &PageLayout) -> md2pdf::Result<()> {
        Err(ConvertError::Render {
            path: html.to_path_buf(),
            reason: "unsupported CSS".to_string(),
        })
    }
}
