//! Themed HTML document template.

use maud::{DOCTYPE, PreEscaped, html};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::highlight;
use crate::theme::Theme;

static RE_DOCUMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(?:!doctype\s+html|html)\b").expect("pattern is valid"));

/// Wraps an HTML fragment in a complete document styled with `theme`.
///
/// Pure and deterministic: the same fragment and theme always produce the
/// same bytes.
///
/// # Arguments
///
/// * `fragment` - Body markup, inserted as is
/// * `theme` - Palette and syntax theme for the embedded stylesheet
///
/// # Returns
///
/// HTML5 document with the fragment inside `article.markdown-body`
pub fn render_document(fragment: &str, theme: &Theme) -> String {
    let css = stylesheet(theme);

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                style { (PreEscaped(css)) }
            }
            body {
                article class="markdown-body" {
                    (PreEscaped(fragment))
                }
            }
        }
    }
    .into_string()
}

/// Checks whether `html` already is a complete document rather than a
/// fragment.
pub fn is_complete_document(html: &str) -> bool {
    RE_DOCUMENT.is_match(html)
}

/// Builds the embedded stylesheet for `theme`, colors emitted verbatim.
pub fn stylesheet(theme: &Theme) -> String {
    let Theme {
        background,
        text,
        heading,
        link,
        code_background,
        border,
        syntax_theme,
    } = theme;

    let mut css = format!(
        r#"html {{
    background-color: {background};
}}
body {{
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    max-width: 800px;
    margin: 0 auto;
    padding: 20px;
    background-color: {background};
    color: {text};
}}
h1, h2, h3, h4, h5, h6 {{
    color: {heading};
    margin-top: 24px;
    margin-bottom: 16px;
    font-weight: 600;
    line-height: 1.25;
}}
h1, h2 {{
    padding-bottom: 0.3em;
    border-bottom: 1px solid {border};
}}
a {{
    color: {link};
    text-decoration: none;
}}
a:hover {{
    text-decoration: underline;
}}
code {{
    background-color: {code_background};
    padding: 0.2em 0.4em;
    border-radius: 3px;
    font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, monospace;
}}
pre {{
    background-color: {code_background};
    padding: 16px;
    border-radius: 6px;
    overflow: auto;
}}
pre code {{
    background-color: transparent;
    padding: 0;
}}
img {{
    max-width: 100%;
    height: auto;
    display: block;
    margin: 0 auto;
}}
table {{
    border-collapse: collapse;
    width: 100%;
    margin-bottom: 16px;
}}
th, td {{
    border: 1px solid {border};
    padding: 6px 13px;
}}
th {{
    background-color: {code_background};
}}
blockquote {{
    padding: 0 1em;
    color: {text};
    border-left: 0.25em solid {border};
    margin: 0 0 16px 0;
}}
hr {{
    height: 0.25em;
    padding: 0;
    margin: 24px 0;
    background-color: {border};
    border: 0;
}}
"#
    );

    css.push_str(&highlight::stylesheet(syntax_theme));
    css
}
