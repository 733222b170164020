//! Error types for the assembler module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the assembly of one archive.
#[derive(Debug, Error)]
pub enum AssemblerError {
    /// Template root does not exist or is not a directory.
    #[error("Template not found: {path}")]
    TemplateNotFound { path: PathBuf },

    /// Failed to walk the template tree.
    #[error("Failed to read template tree under {path}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Failed to read a template entry or write the output.
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text entry is not valid UTF-8.
    #[error("Template entry is not UTF-8: {path}")]
    NotUtf8 { path: PathBuf },

    /// Archive writer failure.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl AssemblerError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
