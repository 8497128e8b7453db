use std::path::{Path, PathBuf};

/// Convenience result type used across the crate.
pub type FaviconResult<T> = Result<T, FaviconError>;

/// Top-level error taxonomy used by the generation pipeline.
#[derive(thiserror::Error, Debug)]
pub enum FaviconError {
    /// A required path is absent (after any directory creation attempt).
    #[error("path not found: '{}'", .0.display())]
    PathNotFound(PathBuf),

    /// A path is present but cannot be used for its role.
    #[error("invalid path: '{}': {reason}", .path.display())]
    InvalidPath {
        /// Offending path.
        path: PathBuf,
        /// Why the path was rejected.
        reason: String,
    },

    /// Source extension is not in the supported input set.
    #[error("unsupported format: '{}'", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Malformed color value.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Vector-to-bitmap conversion failed.
    #[error("rasterization error: {0}")]
    Rasterization(String),

    /// The source bitmap could not be opened or decoded.
    #[error("image read error: '{}': {source}", .path.display())]
    ImageRead {
        /// Source path that failed to load.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: image::ImageError,
    },

    /// The rendered variant could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The encoded variant could not be written.
    #[error("write error: '{}': {source}", .path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid options or configuration file contents.
    #[error("invalid config: {0}")]
    Config(String),

    /// Aggregated per-variant failures from a concurrent run.
    #[error("{} variant(s) failed: {}", .0.len(), summarize(.0))]
    Batch(Vec<FaviconError>),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FaviconError {
    /// Build a [`FaviconError::InvalidPath`] value.
    pub fn invalid_path(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Build a [`FaviconError::InvalidColor`] value.
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }

    /// Build a [`FaviconError::Rasterization`] value.
    pub fn rasterization(msg: impl Into<String>) -> Self {
        Self::Rasterization(msg.into())
    }

    /// Build a [`FaviconError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`FaviconError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Individual failures carried by this error.
    ///
    /// A [`FaviconError::Batch`] yields its members, any other error yields itself.
    pub fn failures(&self) -> &[FaviconError] {
        match self {
            Self::Batch(errs) => errs,
            other => std::slice::from_ref(other),
        }
    }
}

fn summarize(errs: &[FaviconError]) -> String {
    errs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
