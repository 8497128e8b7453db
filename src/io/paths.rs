use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{FaviconError, FaviconResult};

/// Source extensions the pipeline accepts, lowercase, without the dot.
pub const SUPPORTED_SOURCE_EXTENSIONS: &[&str] = &["svg", "jpeg", "jpg", "png", "tiff", "tif"];

/// The one vector extension; sources carrying it are rasterized before rendering.
pub const VECTOR_EXTENSION: &str = "svg";

/// Resolve `path`, optionally creating it as a directory (with parents) when absent.
///
/// Directory creation is the only filesystem mutation performed here, and re-running with an
/// existing directory is a no-op. With `must_exist`, an absent path after the creation attempt is
/// reported as [`FaviconError::PathNotFound`].
pub fn validate_path(
    path: impl AsRef<Path>,
    must_exist: bool,
    create_dir: bool,
) -> FaviconResult<PathBuf> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(FaviconError::invalid_path(path, "path must be non-empty"));
    }

    if create_dir && !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "created directory");
    }

    if must_exist && !path.exists() {
        return Err(FaviconError::PathNotFound(path.to_path_buf()));
    }

    Ok(path.to_path_buf())
}

/// Validate a source image: it must exist, be a file, and carry a supported extension.
pub fn validate_source(path: impl AsRef<Path>) -> FaviconResult<PathBuf> {
    let path = validate_path(path, true, false)?;
    if path.is_dir() {
        return Err(FaviconError::invalid_path(
            &path,
            "source must be a file, not a directory",
        ));
    }
    if !is_supported_source(&path) {
        return Err(FaviconError::UnsupportedFormat(path));
    }
    Ok(path)
}

/// Validate the output directory, creating it when absent.
pub fn validate_output_dir(path: impl AsRef<Path>) -> FaviconResult<PathBuf> {
    let path = validate_path(path, true, true)?;
    if !path.is_dir() {
        return Err(FaviconError::invalid_path(
            &path,
            "output location exists but is not a directory",
        ));
    }
    Ok(path)
}

/// Lowercased extension of `path`, if any.
pub fn source_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// `true` when the extension is in [`SUPPORTED_SOURCE_EXTENSIONS`].
pub fn is_supported_source(path: &Path) -> bool {
    source_extension(path).is_some_and(|ext| SUPPORTED_SOURCE_EXTENSIONS.contains(&ext.as_str()))
}

/// `true` when the source has to be rasterized first.
pub fn is_vector_source(path: &Path) -> bool {
    source_extension(path).is_some_and(|ext| ext == VECTOR_EXTENSION)
}

#[cfg(test)]
#[path = "../../tests/unit/io/paths.rs"]
mod tests;
