//! Stylesheets for syntax highlighted code blocks.

use once_cell::sync::Lazy;
use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, css_for_theme_with_class_style};

use crate::theme::DEFAULT_SYNTAX_THEME;

/// CSS class prefix shared by the renderer and the generated stylesheet.
pub const CLASS_PREFIX: &str = "hljs-";

static THEMES: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Returns the names of the bundled syntax themes, sorted.
pub fn theme_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = THEMES.themes.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}

/// Checks whether `name` is a bundled syntax theme.
pub fn is_known_theme(name: &str) -> bool {
    THEMES.themes.contains_key(name)
}

/// Generates the CSS rules for highlighted code using syntax theme `name`.
///
/// Unknown names fall back to the default dark theme. Returns an empty
/// stylesheet if syntect cannot produce CSS for the theme, leaving code
/// blocks in the document text color.
pub fn stylesheet(name: &str) -> String {
    let theme = match THEMES.themes.get(name) {
        Some(theme) => theme,
        None => {
            log::warn!(
                "Unknown syntax theme '{}', using {}",
                name,
                DEFAULT_SYNTAX_THEME
            );
            match THEMES.themes.get(DEFAULT_SYNTAX_THEME) {
                Some(theme) => theme,
                None => return String::new(),
            }
        }
    };

    let style = ClassStyle::SpacedPrefixed {
        prefix: CLASS_PREFIX,
    };

    css_for_theme_with_class_style(theme, style).unwrap_or_else(|e| {
        log::warn!("Failed to generate CSS for syntax theme '{}': {}", name, e);
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_bundled() {
        assert!(is_known_theme(DEFAULT_SYNTAX_THEME));
        assert!(theme_names().contains(&DEFAULT_SYNTAX_THEME));
    }

    #[test]
    fn test_stylesheet_uses_class_prefix() {
        // Arrange & Act
        let css = stylesheet(DEFAULT_SYNTAX_THEME);

        // Assert
        assert!(
            css.contains(".hljs-"),
            "Stylesheet should target prefixed classes: {}",
            css
        );
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        // Arrange & Act
        let fallback = stylesheet("no-such-theme");

        // Assert
        assert_eq!(fallback, stylesheet(DEFAULT_SYNTAX_THEME));
    }

    #[test]
    fn test_theme_names_sorted() {
        let names = theme_names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
