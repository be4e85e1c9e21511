//! Conversion pipelines: Markdown to HTML, Markdown to PDF, HTML to PDF.
//!
//! Each pipeline runs its stages in order and stops at the first error.
//! The input is read before anything is created on disk, so a missing
//! input leaves the output location untouched, and a later failure removes
//! every file and directory the pipeline created.

use std::fs;
use std::path::{Path, PathBuf};

use crate::assets::{ImageRef, ImageResolver, mirror};
use crate::error::{ConvertError, Result};
use crate::markdown::MarkdownRenderer;
use crate::pdf::{PageLayout, PdfEngine};
use crate::template::{is_complete_document, render_document};
use crate::theme::Theme;
use crate::util::{CreatedPaths, TEMP_PREFIX, parent_dir};

const BOM: &str = "\u{feff}";

/// Everything one invocation needs; immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub theme: Theme,
    pub layout: PageLayout,
    /// Mirror referenced images next to the output and rewrite their paths.
    pub copy_images: bool,
    /// Also keep the intermediate HTML of a PDF conversion.
    pub keep_html: bool,
}

impl ConversionRequest {
    /// Creates request with default theme and layout, copying images.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            theme: Theme::default(),
            layout: PageLayout::default(),
            copy_images: true,
            keep_html: false,
        }
    }

    /// Directory the output is written into and images are mirrored under.
    pub fn output_dir(&self) -> PathBuf {
        parent_dir(&self.output)
    }

    /// Path of the intermediate HTML kept by `--keep-html`.
    pub fn kept_html_path(&self) -> PathBuf {
        self.output.with_extension("html")
    }
}

/// Reads `path` as UTF-8 text, dropping a leading byte order mark.
///
/// # Arguments
///
/// * `path` - Markdown or HTML input file
///
/// # Errors
///
/// Returns `InputNotFound` if the file is absent or unreadable and
/// `Parse` if it is not valid UTF-8
pub fn read_input(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(ConvertError::InputNotFound {
            path: path.to_path_buf(),
            source: None,
        });
    }

    let bytes = fs::read(path).map_err(|e| ConvertError::InputNotFound {
        path: path.to_path_buf(),
        source: Some(e),
    })?;

    let text = String::from_utf8(bytes).map_err(|e| ConvertError::Parse {
        path: path.to_path_buf(),
        reason: format!("not valid UTF-8 text ({})", e.utf8_error()),
    })?;

    Ok(match text.strip_prefix(BOM) {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Converts markdown text to an HTML fragment.
///
/// # Errors
///
/// Returns `Parse` naming `path` if rendering fails
pub fn markdown_to_fragment(path: &Path, markdown: &str) -> Result<String> {
    MarkdownRenderer::new()
        .render(markdown)
        .map_err(|e| ConvertError::Parse {
            path: path.to_path_buf(),
            reason: format!("{:#}", e),
        })
}

/// Themed document ready to be written, with the images it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub html: String,
    /// Images to mirror next to the output; empty when copying is off.
    pub images: Vec<ImageRef>,
}

/// Rewrites image references and checks they exist when the request asks
/// for it, otherwise returns `html` unchanged.
fn prepare_images(request: &ConversionRequest, html: String) -> Result<(String, Vec<ImageRef>)> {
    if !request.copy_images {
        return Ok((html, Vec::new()));
    }

    let resolver = ImageResolver::new(&request.input, request.output_dir())?;
    resolver.prepare(&html)
}

/// Runs the markdown stages and returns the complete themed document.
///
/// Nothing is written; shared by the HTML and PDF pipelines, so both
/// produce the same bytes for the same request.
///
/// # Arguments
///
/// * `request` - Conversion to perform
///
/// # Errors
///
/// Returns the first stage error encountered
pub fn build_markdown_document(request: &ConversionRequest) -> Result<Document> {
    let markdown = read_input(&request.input)?;
    let fragment = markdown_to_fragment(&request.input, &markdown)?;
    let (fragment, images) = prepare_images(request, fragment)?;

    Ok(Document {
        html: render_document(&fragment, &request.theme),
        images,
    })
}

/// Reads an HTML input, resolves its images and wraps it in the theme when
/// it is only a fragment.
///
/// # Errors
///
/// Returns the first stage error encountered
pub fn build_html_document(request: &ConversionRequest) -> Result<Document> {
    let html = read_input(&request.input)?;
    let (html, images) = prepare_images(request, html)?;

    let html = if is_complete_document(&html) {
        html
    } else {
        log::debug!("{} is a fragment, applying theme", request.input.display());
        render_document(&html, &request.theme)
    };

    Ok(Document { html, images })
}

/// Converts a markdown file to a themed HTML file.
///
/// Images are mirrored before the HTML is written. On failure every file
/// and directory this call created is removed again.
///
/// # Arguments
///
/// * `request` - Conversion to perform
///
/// # Returns
///
/// Path of the written HTML file
///
/// # Errors
///
/// Returns the first stage error encountered
pub fn md_to_html(request: &ConversionRequest) -> Result<PathBuf> {
    let document = build_markdown_document(request)?;

    let mut created = CreatedPaths::default();
    let result = write_html(request, &document, &mut created);
    created.settle(result)
}

fn write_html(
    request: &ConversionRequest,
    document: &Document,
    created: &mut CreatedPaths,
) -> Result<PathBuf> {
    created.create_dir_all(&request.output_dir())?;
    mirror(&document.images, created)?;

    created.write(&request.output, document.html.as_bytes())?;
    log::info!("Wrote {}", request.output.display());

    Ok(request.output.clone())
}

/// Converts a markdown file to PDF through `engine`.
///
/// # Arguments
///
/// * `request` - Conversion to perform
/// * `engine` - Renderer turning the themed HTML into PDF
///
/// # Returns
///
/// Path of the written PDF file
///
/// # Errors
///
/// Returns the first stage error encountered
pub fn md_to_pdf(request: &ConversionRequest, engine: &dyn PdfEngine) -> Result<PathBuf> {
    let document = build_markdown_document(request)?;

    let mut created = CreatedPaths::default();
    let result = render_pdf(request, &document, engine, &mut created);
    created.settle(result)
}

/// Converts an HTML file to PDF through `engine`.
///
/// # Errors
///
/// Returns the first stage error encountered
pub fn html_to_pdf(request: &ConversionRequest, engine: &dyn PdfEngine) -> Result<PathBuf> {
    let document = build_html_document(request)?;

    let mut created = CreatedPaths::default();
    let result = render_pdf(request, &document, engine, &mut created);
    created.settle(result)
}

/// Mirrors images, writes `document` to a temporary file in the output
/// directory, where its rewritten image paths resolve, and renders it to
/// the output path.
fn render_pdf(
    request: &ConversionRequest,
    document: &Document,
    engine: &dyn PdfEngine,
    created: &mut CreatedPaths,
) -> Result<PathBuf> {
    let dir = request.output_dir();
    created.create_dir_all(&dir)?;
    mirror(&document.images, created)?;

    let html = temp_path(&dir, ".html")?;
    fs::write(&html, &document.html).map_err(|e| ConvertError::write(&*html, e))?;

    let pdf = temp_path(&dir, ".pdf")?;
    engine
        .render(&html, &pdf, &request.layout)
        .map_err(|e| match e {
            ConvertError::Render { reason, .. } => ConvertError::Render {
                path: request.output.clone(),
                reason,
            },
            other => other,
        })?;

    if request.keep_html {
        let kept = request.kept_html_path();
        created.write(&kept, document.html.as_bytes())?;
        log::info!("Wrote {}", kept.display());
    }

    pdf.persist(&request.output)
        .map_err(|e| ConvertError::write(&request.output, e.error))?;
    log::info!("Wrote {}", request.output.display());

    Ok(request.output.clone())
}

/// Reserves a uniquely named file in `dir`, removed again when dropped.
fn temp_path(dir: &Path, suffix: &str) -> Result<tempfile::TempPath> {
    tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(suffix)
        .tempfile_in(dir)
        .map(|file| file.into_temp_path())
        .map_err(|e| ConvertError::write(dir, e))
}
