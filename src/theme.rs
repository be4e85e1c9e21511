//! Color theme applied to generated documents.

use anyhow::{Result, bail};

/// Default syntax highlighting theme for fenced code blocks.
pub const DEFAULT_SYNTAX_THEME: &str = "base16-ocean.dark";

/// Named color slots of the GitHub dark look.
///
/// Values are CSS color expressions and are emitted verbatim into the
/// document stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: String,
    pub text: String,
    pub heading: String,
    pub link: String,
    pub code_background: String,
    pub border: String,
    pub syntax_theme: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#0d1117".to_string(),
            text: "#c9d1d9".to_string(),
            heading: "#e6f1ff".to_string(),
            link: "#58a6ff".to_string(),
            code_background: "#161b22".to_string(),
            border: "#30363d".to_string(),
            syntax_theme: DEFAULT_SYNTAX_THEME.to_string(),
        }
    }
}

impl Theme {
    /// Validates every color slot.
    ///
    /// # Errors
    ///
    /// Returns error naming the first slot whose value is empty or could
    /// break out of a CSS declaration.
    pub fn validate(&self) -> Result<()> {
        let slots = [
            ("background", &self.background),
            ("text", &self.text),
            ("heading", &self.heading),
            ("link", &self.link),
            ("code background", &self.code_background),
            ("border", &self.border),
        ];

        for (name, value) in slots {
            validate_color(name, value)?;
        }

        Ok(())
    }
}

fn validate_color(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!("Empty {} color", name);
    }

    if let Some(c) = value.chars().find(|c| matches!(c, ';' | '{' | '}' | '<' | '>')) {
        bail!("Invalid {} color '{}': unexpected '{}'", name, value, c);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_github_dark() {
        // Arrange & Act
        let theme = Theme::default();

        // Assert
        assert_eq!(theme.background, "#0d1117");
        assert_eq!(theme.text, "#c9d1d9");
        assert_eq!(theme.heading, "#e6f1ff");
        assert_eq!(theme.link, "#58a6ff");
        assert_eq!(theme.code_background, "#161b22");
        assert_eq!(theme.border, "#30363d");
        assert_eq!(theme.syntax_theme, DEFAULT_SYNTAX_THEME);
    }

    #[test]
    fn test_validate_accepts_css_color_forms() {
        // Arrange
        let theme = Theme {
            background: "#000".to_string(),
            text: "rgb(201, 209, 217)".to_string(),
            heading: "white".to_string(),
            link: "hsl(210 100% 67%)".to_string(),
            ..Theme::default()
        };

        // Act
        let result = theme.validate();

        // Assert
        assert!(result.is_ok(), "Should accept CSS colors: {:?}", result);
    }

    #[test]
    fn test_validate_rejects_declaration_breakout() {
        // Arrange
        let theme = Theme {
            link: "red; } body { display: none".to_string(),
            ..Theme::default()
        };

        // Act
        let result = theme.validate();

        // Assert
        let err = result.expect_err("Should reject injected CSS");
        assert!(err.to_string().contains("link"), "Error: {}", err);
    }

    #[test]
    fn test_validate_rejects_empty() {
        // Arrange
        let theme = Theme {
            border: "  ".to_string(),
            ..Theme::default()
        };

        // Act & Assert
        assert!(theme.validate().is_err(), "Empty color should be rejected");
    }
}
