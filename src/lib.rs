//! Markdown to GitHub dark themed HTML and PDF conversion.

mod assets;
mod config;
mod convert;
mod error;
mod highlight;
mod markdown;
mod pdf;
mod template;
mod theme;
mod util;

pub use assets::{ImageRef, ImageResolver};
pub use config::{
    Command, CommonArgs, Config, DEFAULT_HTML_OUTPUT, DEFAULT_PDF_OUTPUT, PageArgs, ThemeArgs,
};
pub use convert::{
    ConversionRequest, Document, build_html_document, build_markdown_document, html_to_pdf,
    markdown_to_fragment, md_to_html, md_to_pdf, read_input,
};
pub use error::{ConvertError, Result, Stage};
pub use highlight::{is_known_theme, theme_names};
pub use markdown::MarkdownRenderer;
pub use pdf::{DEFAULT_ENGINE, PageLayout, PdfEngine, Wkhtmltopdf};
pub use template::{is_complete_document, render_document, stylesheet};
pub use theme::{DEFAULT_SYNTAX_THEME, Theme};
