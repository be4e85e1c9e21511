//! Markdown rendering with GitHub Flavored Markdown support.
//!
//! Renders markdown using comrak with GFM extensions (tables,
//! strikethrough, autolinks, task lists, footnotes) and highlights fenced
//! code blocks with syntect.

mod renderer;

pub use renderer::MarkdownRenderer;
