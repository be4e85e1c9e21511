//! Image reference rewriting and mirroring into the output directory.

use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::util::{CreatedPaths, normalize_absolute, same_file};

/// `src` attribute of an `<img>` tag, with the value in group 1, 2 or 3
/// depending on its quoting, or a whole `<!-- -->` comment with no groups.
static RE_IMG_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<!--.*?-->|<img\b[^>]*?\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#,
    )
    .expect("image source pattern is valid")
});

/// URL scheme prefix such as `https:` or `data:`.
static RE_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("scheme pattern is valid"));

/// Characters escaped when an absolute file path is written into `src`.
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'#')
    .add(b'?')
    .add(b'%');

/// Image discovered in a document together with where it is copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// `src` value as written in the source document.
    pub original: String,
    /// Absolute location of the image file.
    pub source: PathBuf,
    /// Mirrored location under the output directory, `None` when the
    /// reference climbs above the input directory and is not copied.
    pub destination: Option<PathBuf>,
    /// `src` value written into the output document.
    pub rewritten: String,
}

/// Rewrites relative image references so they resolve from the output
/// directory, mirroring the referenced files there.
///
/// Remote URLs (`http://`, `https://`, `//host`), other schemes such as
/// `data:`, absolute paths and anchors are left unchanged and nothing is
/// copied for them.
pub struct ImageResolver {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl ImageResolver {
    /// Creates resolver for images referenced by `input_file`, mirrored
    /// under `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if the current directory is needed to make either
    /// path absolute and cannot be determined
    pub fn new(input_file: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<Self> {
        let input_file = input_file.as_ref();
        let input = std::path::absolute(input_file).map_err(|e| ConvertError::InputNotFound {
            path: input_file.to_path_buf(),
            source: Some(e),
        })?;
        let output_dir = std::path::absolute(output_dir.as_ref())
            .map_err(|e| ConvertError::write(output_dir.as_ref(), e))?;

        Ok(Self::from_dirs(
            input.parent().unwrap_or_else(|| Path::new("/")),
            output_dir,
        ))
    }

    /// Creates resolver from already absolute directories.
    pub fn from_dirs(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Resolves a single `src` value.
    ///
    /// The rewritten reference and the mirrored file come from the same
    /// folded segments. A reference whose escapes decode into extra
    /// separators or dot segments is treated like one outside the input
    /// directory.
    ///
    /// # Arguments
    ///
    /// * `src` - Attribute value as it appears in the HTML
    ///
    /// # Returns
    ///
    /// The resolved reference, or `None` for references left unchanged
    pub fn resolve(&self, src: &str) -> Option<ImageRef> {
        if !is_relative_reference(src) {
            return None;
        }

        let (path_part, suffix) = split_suffix(src);

        if let Some(relative) = fold_segments(path_part) {
            if relative.is_empty() {
                return None;
            }

            let on_disk = decode_path(&relative);
            if keeps_segments(&relative, &on_disk) {
                return Some(ImageRef {
                    original: src.to_string(),
                    source: self.input_dir.join(&on_disk),
                    destination: Some(self.output_dir.join(&on_disk)),
                    rewritten: format!("{}{}", relative, suffix),
                });
            }
        }

        let source = normalize_absolute(&self.input_dir.join(decode_path(path_part)));
        let encoded = utf8_percent_encode(&source.to_string_lossy(), PATH_ESCAPE).to_string();
        Some(ImageRef {
            original: src.to_string(),
            source,
            destination: None,
            rewritten: format!("{}{}", encoded, suffix),
        })
    }

    /// Rewrites image references in `html` without touching the file
    /// system.
    ///
    /// Returns the rewritten markup and every resolved reference in
    /// document order.
    pub fn rewrite(&self, html: &str) -> (String, Vec<ImageRef>) {
        let mut result = String::with_capacity(html.len());
        let mut images = Vec::new();
        let mut last_end = 0;

        for caps in RE_IMG_SRC.captures_iter(html) {
            // Comments capture nothing and are copied through verbatim.
            let Some(value) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
                continue;
            };

            if let Some(image) = self.resolve(value.as_str()) {
                result.push_str(&html[last_end..value.start()]);
                result.push_str(&image.rewritten);
                last_end = value.end();
                images.push(image);
            }
        }

        result.push_str(&html[last_end..]);
        (result, images)
    }

    /// Rewrites image references in `html` and checks that every
    /// referenced file exists, without copying anything yet.
    ///
    /// # Errors
    ///
    /// Returns `MissingAsset` for the first referenced image that does not
    /// exist
    pub fn prepare(&self, html: &str) -> Result<(String, Vec<ImageRef>)> {
        let (rewritten, images) = self.rewrite(html);

        for image in &images {
            if !image.source.is_file() {
                return Err(ConvertError::MissingAsset {
                    reference: image.original.clone(),
                    path: image.source.clone(),
                });
            }
        }

        Ok((rewritten, images))
    }
}

/// Copies each image into its mirrored location once, preserving the
/// relative layout. Copying again overwrites destinations with identical
/// bytes.
pub(crate) fn mirror(images: &[ImageRef], created: &mut CreatedPaths) -> Result<()> {
    let mut copied: Vec<&Path> = Vec::new();

    for image in images {
        match &image.destination {
            Some(destination) if !copied.contains(&destination.as_path()) => {
                copy_image(&image.source, destination, created)?;
                copied.push(destination.as_path());
            }
            Some(_) => {}
            None => log::warn!(
                "Image '{}' is outside the input directory, referencing {} directly",
                image.original,
                image.source.display()
            ),
        }
    }

    Ok(())
}

/// Copies `source` to `destination` unless both name the same file.
fn copy_image(source: &Path, destination: &Path, created: &mut CreatedPaths) -> Result<()> {
    if destination.exists() && same_file(source, destination) {
        log::debug!("Image {} already in place", source.display());
        return Ok(());
    }

    created.copy(source, destination)?;
    log::debug!(
        "Copied image {} -> {}",
        source.display(),
        destination.display()
    );

    Ok(())
}

/// Checks whether `src` is a relative path that should be mirrored.
fn is_relative_reference(src: &str) -> bool {
    !(src.is_empty()
        || src.starts_with('#')
        || src.starts_with('/')
        || src.starts_with('\\')
        || RE_SCHEME.is_match(src))
}

/// Splits `src` into its path and any `?query` or `#fragment` suffix.
///
/// A `#` opening a numeric character reference (`&#39;`) is not a
/// fragment.
fn split_suffix(src: &str) -> (&str, &str) {
    let pos = src
        .char_indices()
        .find(|&(i, c)| c == '?' || (c == '#' && !src[..i].ends_with('&')))
        .map(|(i, _)| i);

    match pos {
        Some(pos) => src.split_at(pos),
        None => (src, ""),
    }
}

/// Decodes HTML entities and percent escapes to obtain the file name on
/// disk.
fn decode_path(raw: &str) -> String {
    let unescaped = raw
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    percent_decode_str(&unescaped)
        .decode_utf8_lossy()
        .into_owned()
}

/// Folds `.` and `..` segments of a relative `/`-separated path.
///
/// Returns `None` if the path climbs above its starting directory.
fn fold_segments(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    Some(segments.join("/"))
}

/// Checks that decoding left the segments of `relative` intact.
fn keeps_segments(relative: &str, on_disk: &str) -> bool {
    !on_disk.contains('\\')
        && relative.split('/').count() == on_disk.split('/').count()
        && fold_segments(on_disk).as_deref() == Some(on_disk)
}
