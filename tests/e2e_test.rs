//! End-to-end tests for the md2pdf binary.

mod common;

use anyhow::Result;
use common::{IMAGE_BYTES, list_names, write_file};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_md2pdf(args: &[&str], cwd: &Path) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_md2pdf"))
        .args(args)
        .current_dir(cwd)
        .output()?)
}

/// Tests md-to-html through the binary with images and a custom color.
#[test]
fn test_md_to_html_e2e() -> Result<()> {
    // Arrange
    let work = TempDir::new()?;
    write_file(work.path(), "docs/README.md", "# E2E\n\n![x](./img/x.png)\n")?;
    write_file(work.path(), "docs/img/x.png", IMAGE_BYTES)?;

    // Act
    let output = run_md2pdf(
        &[
            "md-to-html",
            "docs/README.md",
            "-o",
            "dist/index.html",
            "--bg-color=#000000",
        ],
        work.path(),
    )?;

    // Assert
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let html = fs::read_to_string(work.path().join("dist/index.html"))?;
    assert!(html.contains("E2E"));
    assert!(html.contains("background-color: #000000;"));
    assert!(html.contains("src=\"img/x.png\""));
    assert_eq!(fs::read(work.path().join("dist/img/x.png"))?, IMAGE_BYTES);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Created dist/index.html"));
    Ok(())
}

/// Tests that md-to-html writes `output.html` in the working directory by
/// default.
#[test]
fn test_md_to_html_default_output_e2e() -> Result<()> {
    // Arrange
    let work = TempDir::new()?;
    write_file(work.path(), "notes.md", "plain text\n")?;

    // Act
    let output = run_md2pdf(&["md-to-html", "notes.md", "--no-images"], work.path())?;

    // Assert
    assert!(output.status.success());
    assert_eq!(list_names(work.path())?, ["notes.md", "output.html"]);
    Ok(())
}

/// Tests that a missing input exits non-zero and creates no files.
#[test]
fn test_missing_input_e2e() -> Result<()> {
    // Arrange
    let work = TempDir::new()?;

    for command in ["md-to-pdf", "md-to-html", "html-to-pdf"] {
        // Act
        let output = run_md2pdf(&[command, "missing.md", "-o", "out/result"], work.path())?;

        // Assert
        assert!(!output.status.success(), "{} should fail", command);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("missing.md"), "stderr: {}", stderr);
        assert!(list_names(work.path())?.is_empty(), "{} created files", command);
    }
    Ok(())
}

/// Tests that an unavailable engine fails the PDF conversion cleanly.
#[test]
fn test_missing_engine_e2e() -> Result<()> {
    // Arrange
    let work = TempDir::new()?;
    write_file(work.path(), "README.md", "# Doc\n")?;

    // Act
    let output = run_md2pdf(
        &[
            "md-to-pdf",
            "README.md",
            "-o",
            "out/doc.pdf",
            "--engine",
            "/nonexistent/md2pdf-e2e/wkhtmltopdf",
        ],
        work.path(),
    )?;

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("render stage"), "stderr: {}", stderr);
    assert!(stderr.contains("not installed"), "stderr: {}", stderr);
    assert_eq!(list_names(work.path())?, ["README.md"], "Output directory removed");
    Ok(())
}

/// Tests that a missing image exits non-zero naming the image.
#[test]
fn test_missing_image_e2e() -> Result<()> {
    // Arrange
    let work = TempDir::new()?;
    write_file(work.path(), "README.md", "![x](img/none.png)\n")?;

    // Act
    let output = run_md2pdf(&["md-to-html", "README.md", "-o", "out.html"], work.path())?;

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("img/none.png"), "stderr: {}", stderr);
    assert!(!work.path().join("out.html").exists());
    Ok(())
}

/// Tests that a malformed color is rejected before converting.
#[test]
fn test_invalid_color_e2e() -> Result<()> {
    // Arrange
    let work = TempDir::new()?;
    write_file(work.path(), "README.md", "# Doc\n")?;

    // Act
    let output = run_md2pdf(
        &["md-to-html", "README.md", "--link-color", "red;}"],
        work.path(),
    )?;

    // Assert
    assert!(!output.status.success());
    assert!(!work.path().join("output.html").exists());
    Ok(())
}
