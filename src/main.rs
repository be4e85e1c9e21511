use anyhow::{Context, Result};
use env_logger::Env;
use md2pdf::{Command, Config, ConvertError, Wkhtmltopdf};

/// Maps `-v` occurrences to the default log filter; `RUST_LOG` wins.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.verbose);

    config.validate().context("Invalid configuration")?;

    let command = &config.command;
    let request = command.request();

    let result = match command {
        Command::MdToHtml { .. } => md2pdf::md_to_html(&request),
        Command::MdToPdf { page, .. } => {
            md2pdf::md_to_pdf(&request, &Wkhtmltopdf::new(&page.engine))
        }
        Command::HtmlToPdf { page, .. } => {
            md2pdf::html_to_pdf(&request, &Wkhtmltopdf::new(&page.engine))
        }
    };

    let written = result.map_err(|e: ConvertError| {
        let stage = e.stage();
        anyhow::Error::new(e).context(format!(
            "{} failed at {} stage for {}",
            command.name(),
            stage,
            request.input.display()
        ))
    })?;

    if request.keep_html {
        println!("Created {}", request.kept_html_path().display());
    }
    println!("Created {}", written.display());

    Ok(())
}
