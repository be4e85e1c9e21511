//! Markdown to HTML fragment conversion.

use anyhow::{Context, Result};
use comrak::Options;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::highlight::CLASS_PREFIX;

const CODE_OPEN: &str = "<code class=\"language-";
const CODE_CLOSE: &str = "</code>";

/// Renders markdown to an HTML fragment with GitHub Flavored Markdown
/// extensions.
///
/// Fenced code blocks carrying a language tag are highlighted with syntect
/// using CSS classes, so the colors come from the stylesheet embedded by
/// the document template rather than from inline styles.
pub struct MarkdownRenderer<'a> {
    options: Options<'a>,
    syntax_set: SyntaxSet,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates renderer with GitHub Flavored Markdown options.
    ///
    /// Raw HTML in the source is passed through unchanged, matching how
    /// GitHub displays a README the author controls.
    pub fn new() -> Self {
        let mut options = Options::default();

        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;

        options.render.unsafe_ = true;

        Self {
            options,
            syntax_set: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Renders markdown content to an HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns error if syntax highlighting of a code block fails
    pub fn render(&self, content: &str) -> Result<String> {
        let html = comrak::markdown_to_html(content, &self.options);
        self.highlight_code_blocks(&html)
    }

    /// Replaces the body of every `<code class="language-X">` element with
    /// syntect highlighted markup.
    ///
    /// Elements whose tag or closing tag cannot be located are copied
    /// through untouched.
    fn highlight_code_blocks(&self, html: &str) -> Result<String> {
        let mut result = String::with_capacity(html.len());
        let mut last_end = 0;
        let mut search_pos = 0;

        while let Some(offset) = html[search_pos..].find(CODE_OPEN) {
            let code_start = search_pos + offset;
            let lang_start = code_start + CODE_OPEN.len();

            let Some(lang_len) = html[lang_start..].find('"') else {
                search_pos = lang_start;
                continue;
            };
            let lang_end = lang_start + lang_len;
            let language = &html[lang_start..lang_end];

            let Some(tag_len) = html[lang_end..].find('>') else {
                search_pos = lang_start;
                continue;
            };
            let content_start = lang_end + tag_len + 1;

            let Some(content_len) = html[content_start..].find(CODE_CLOSE) else {
                search_pos = lang_start;
                continue;
            };
            let content_end = content_start + content_len;

            let code = html_decode(&html[content_start..content_end]);
            let highlighted = self
                .highlight_code(&code, language)
                .with_context(|| format!("Failed to highlight {} code block", language))?;

            result.push_str(&html[last_end..code_start]);
            result.push_str(CODE_OPEN);
            result.push_str(language);
            result.push_str("\">");
            result.push_str(&highlighted);
            result.push_str(CODE_CLOSE);

            last_end = content_end + CODE_CLOSE.len();
            search_pos = last_end;
        }

        result.push_str(&html[last_end..]);

        Ok(result)
    }

    /// Highlights code for `language` with `hljs-` prefixed CSS classes.
    ///
    /// Unknown languages fall back to escaped plain text.
    fn highlight_code(&self, code: &str, language: &str) -> Result<String> {
        if code.is_empty() {
            return Ok(String::new());
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_extension(language));

        let Some(syntax) = syntax else {
            return Ok(html_escape(code));
        };

        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntax_set,
            ClassStyle::SpacedPrefixed {
                prefix: CLASS_PREFIX,
            },
        );

        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .context("Failed to parse line for syntax highlighting")?;
        }

        Ok(generator.finalize())
    }
}

impl<'a> Default for MarkdownRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reverses the entity escaping comrak applies inside code blocks.
fn html_decode(html: &str) -> String {
    html.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
