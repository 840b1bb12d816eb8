//! Path and URI conversion utilities.
//!
//! The IDE speaks `file://` URIs; the workspace speaks [`Utf8PathBuf`].
//! Conversion handles percent-encoding, Windows drive prefixes and the
//! occasional accidentally doubled drive prefix from bad client-side
//! concatenation.

use camino::Utf8Path;
use camino::Utf8PathBuf;

/// The distinguished extension of source files.
pub const SOURCE_EXTENSION: &str = "xcs";
/// The host language's ordinary extension, used for derived files.
pub const DERIVED_EXTENSION: &str = "cs";
/// Reserved directory segment for derived files; ignored by the scanner
/// and the locator.
pub const GENERATED_DIR: &str = "Generated";

/// Whether `path` is a transformable source file: carries the
/// distinguished extension and is not under `Generated/`.
#[must_use]
pub fn is_source_path(path: &Utf8Path) -> bool {
    path.extension() == Some(SOURCE_EXTENSION)
        && !path.components().any(|c| c.as_str() == GENERATED_DIR)
}

/// Derived counterpart of a source file:
/// `<root>/Generated/<relative>.cs`. `None` when the source does not
/// live under `root`.
#[must_use]
pub fn derived_path(root: &Utf8Path, source: &Utf8Path) -> Option<Utf8PathBuf> {
    let relative = source.strip_prefix(root).ok()?;
    Some(
        root.join(GENERATED_DIR)
            .join(relative)
            .with_extension(DERIVED_EXTENSION),
    )
}

/// Convert a `file://` URI into a local path.
#[must_use]
pub fn uri_to_path(uri: &str) -> Option<Utf8PathBuf> {
    let raw = uri
        .strip_prefix("file://")
        .or_else(|| uri.strip_prefix("file:"))?;

    let decoded = percent_encoding::percent_decode_str(raw)
        .decode_utf8()
        .ok()?;
    let mut path = decoded.into_owned();

    // `/C:/…` is a Windows drive path with a spurious leading slash.
    if is_slashed_drive(&path) {
        path.remove(0);
    }

    // Keep the substring starting at the last drive prefix; doubled
    // prefixes come from careless client-side joins.
    if let Some(idx) = last_drive_prefix(&path) {
        if idx > 0 {
            path = path.split_off(idx);
        }
    }

    Some(Utf8PathBuf::from(path))
}

/// Convert a local path into a `file://` URI.
#[must_use]
pub fn path_to_uri(path: &Utf8Path) -> String {
    let mut normalized = path.as_str().replace('\\', "/");
    if !normalized.starts_with('/') {
        normalized.insert(0, '/');
    }
    format!("file://{normalized}")
}

fn is_slashed_drive(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3
        && bytes[0] == b'/'
        && bytes[1].is_ascii_alphabetic()
        && bytes[2] == b':'
}

fn last_drive_prefix(path: &str) -> Option<usize> {
    let bytes = path.as_bytes();
    let mut last = None;
    for i in 1..bytes.len().saturating_sub(1) {
        if bytes[i] == b':'
            && (bytes[i + 1] == b'\\' || bytes[i + 1] == b'/')
            && bytes[i - 1].is_ascii_alphabetic()
            && (i == 1 || !bytes[i - 2].is_ascii_alphanumeric())
        {
            last = Some(i - 1);
        }
    }
    last
}
