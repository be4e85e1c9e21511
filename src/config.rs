//! Command line configuration.

use anyhow::{Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::convert::ConversionRequest;
use crate::error::ConvertError;
use crate::highlight;
use crate::pdf::{DEFAULT_ENGINE, PageLayout};
use crate::theme::{DEFAULT_SYNTAX_THEME, Theme};
use crate::util::same_file;

/// Default output file of the PDF commands.
pub const DEFAULT_PDF_OUTPUT: &str = "output.pdf";

/// Default output file of `md-to-html`.
pub const DEFAULT_HTML_OUTPUT: &str = "output.html";

/// Command line configuration for md2pdf.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "md2pdf",
    version,
    about = "Convert Markdown to PDF with GitHub dark theme",
    long_about = None
)]
pub struct Config {
    /// Log more details (-v for progress, -vv for debugging)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Conversion to run.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Convert a Markdown file to PDF
    MdToPdf {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        page: PageArgs,

        /// Also write the intermediate HTML next to the PDF
        #[arg(long)]
        keep_html: bool,
    },

    /// Convert a Markdown file to HTML
    MdToHtml {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Convert an HTML file to PDF
    HtmlToPdf {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        page: PageArgs,
    },
}

/// Arguments shared by every command.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Input file path
    pub input: PathBuf,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub theme: ThemeArgs,

    /// Skip copying images and keep their paths as written
    #[arg(long)]
    pub no_images: bool,
}

/// Theme colors.
#[derive(Debug, Clone, Args)]
pub struct ThemeArgs {
    /// Background color
    #[arg(long, default_value = "#0d1117")]
    pub bg_color: String,

    /// Text color
    #[arg(long, default_value = "#c9d1d9")]
    pub text_color: String,

    /// Heading color
    #[arg(long, default_value = "#e6f1ff")]
    pub heading_color: String,

    /// Link color
    #[arg(long, default_value = "#58a6ff")]
    pub link_color: String,

    /// Code block background color
    #[arg(long, default_value = "#161b22")]
    pub code_bg: String,

    /// Border color
    #[arg(long, default_value = "#30363d")]
    pub border_color: String,

    /// Syntax highlighting theme for code blocks
    #[arg(long, default_value = DEFAULT_SYNTAX_THEME)]
    pub syntax_theme: String,
}

/// Page layout and rendering engine.
#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    /// Page size
    #[arg(long, default_value = "A4")]
    pub page_size: String,

    /// Page margin
    #[arg(long, default_value = "10mm")]
    pub margin: String,

    /// wkhtmltopdf executable
    #[arg(long, default_value = DEFAULT_ENGINE)]
    pub engine: PathBuf,
}

impl From<&ThemeArgs> for Theme {
    fn from(args: &ThemeArgs) -> Self {
        Theme {
            background: args.bg_color.clone(),
            text: args.text_color.clone(),
            heading: args.heading_color.clone(),
            link: args.link_color.clone(),
            code_background: args.code_bg.clone(),
            border: args.border_color.clone(),
            syntax_theme: args.syntax_theme.clone(),
        }
    }
}

impl From<&PageArgs> for PageLayout {
    fn from(args: &PageArgs) -> Self {
        PageLayout {
            page_size: args.page_size.clone(),
            margin: args.margin.clone(),
        }
    }
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the input file does not exist, the output (or the
    /// kept HTML) would overwrite the input, a theme color is malformed, the syntax theme
    /// is unknown or the page layout is empty.
    pub fn validate(&self) -> Result<()> {
        let common = self.command.common();

        if !common.input.is_file() {
            return Err(ConvertError::InputNotFound {
                path: common.input.clone(),
                source: None,
            }
            .into());
        }

        let output = self.command.output();
        if same_file(&output, &common.input) {
            bail!(
                "Output would overwrite input file: {}",
                common.input.display()
            );
        }

        if let Command::MdToPdf {
            keep_html: true, ..
        } = &self.command
            && same_file(&output.with_extension("html"), &common.input)
        {
            bail!(
                "Kept HTML would overwrite input file: {}",
                common.input.display()
            );
        }

        Theme::from(&common.theme).validate()?;

        if !highlight::is_known_theme(&common.theme.syntax_theme) {
            bail!(
                "Unknown syntax theme '{}'. Available: {}",
                common.theme.syntax_theme,
                highlight::theme_names().join(", ")
            );
        }

        if let Some(page) = self.command.page() {
            if page.page_size.trim().is_empty() {
                bail!("Page size must not be empty");
            }
            if page.margin.trim().is_empty() {
                bail!("Margin must not be empty");
            }
        }

        Ok(())
    }
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::MdToPdf { .. } => "md-to-pdf",
            Command::MdToHtml { .. } => "md-to-html",
            Command::HtmlToPdf { .. } => "html-to-pdf",
        }
    }

    /// Returns the arguments shared by every command.
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::MdToPdf { common, .. }
            | Command::MdToHtml { common }
            | Command::HtmlToPdf { common, .. } => common,
        }
    }

    /// Returns page arguments for the PDF commands.
    pub fn page(&self) -> Option<&PageArgs> {
        match self {
            Command::MdToPdf { page, .. } | Command::HtmlToPdf { page, .. } => Some(page),
            Command::MdToHtml { .. } => None,
        }
    }

    /// Returns the output path, falling back to the command's default.
    pub fn output(&self) -> PathBuf {
        let default = match self {
            Command::MdToHtml { .. } => DEFAULT_HTML_OUTPUT,
            Command::MdToPdf { .. } | Command::HtmlToPdf { .. } => DEFAULT_PDF_OUTPUT,
        };

        self.common()
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(default))
    }

    /// Builds the conversion request for this command.
    pub fn request(&self) -> ConversionRequest {
        let common = self.common();

        ConversionRequest {
            input: common.input.clone(),
            output: self.output(),
            theme: Theme::from(&common.theme),
            layout: self.page().map(PageLayout::from).unwrap_or_default(),
            copy_images: !common.no_images,
            keep_html: matches!(self, Command::MdToPdf { keep_html: true, .. }),
        }
    }
}
