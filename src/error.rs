use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::page_range::PageSpecError;

/// Everything that can go wrong while assembling pages.
///
/// Engines never let these escape; they are folded into result records
/// together with their [`ErrorKind`].
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid PDF file {}: {reason}", path.display())]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("No valid pages to extract")]
    NoValidPages,

    #[error(transparent)]
    Parse(#[from] PageSpecError),

    #[error("Failed to copy pages: {0}")]
    Copy(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No input files provided")]
    NoInputs,

    #[error("No content was added to the merged document")]
    NoContent,

    #[error("Output file {} is also one of the inputs", .0.display())]
    DestinationIsSource(PathBuf),
}

impl AssemblyError {
    pub fn invalid_format(path: &Path, reason: impl ToString) -> Self {
        AssemblyError::InvalidFormat {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        AssemblyError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn copy(reason: impl ToString) -> Self {
        AssemblyError::Copy(reason.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AssemblyError::NotFound(_) => ErrorKind::NotFound,
            AssemblyError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            AssemblyError::NoValidPages => ErrorKind::NoValidPages,
            AssemblyError::Parse(_) => ErrorKind::Parse,
            AssemblyError::Copy(_) => ErrorKind::Copy,
            AssemblyError::Io { .. } => ErrorKind::Io,
            AssemblyError::NoInputs => ErrorKind::NoInputs,
            AssemblyError::NoContent => ErrorKind::NoContent,
            AssemblyError::DestinationIsSource(_) => ErrorKind::DestinationIsSource,
        }
    }
}

/// Machine-readable category of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidFormat,
    NoValidPages,
    Parse,
    Copy,
    Io,
    NoInputs,
    NoContent,
    DestinationIsSource,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind as IoErrorKind};

    #[test]
    fn test_display_is_single_line() {
        let errors = [
            AssemblyError::NotFound(PathBuf::from("missing.pdf")),
            AssemblyError::invalid_format(Path::new("a.txt"), "not a PDF"),
            AssemblyError::NoValidPages,
            AssemblyError::copy("page 4 not found"),
            AssemblyError::io(
                Path::new("out/a.pdf"),
                IoError::new(IoErrorKind::PermissionDenied, "denied"),
            ),
            AssemblyError::NoInputs,
            AssemblyError::NoContent,
            AssemblyError::DestinationIsSource(PathBuf::from("a.pdf")),
        ];
        for error in errors {
            assert!(!error.to_string().contains('\n'), "{error}");
        }
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            AssemblyError::NotFound(PathBuf::from("x.pdf")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(AssemblyError::NoValidPages.kind(), ErrorKind::NoValidPages);
        assert_eq!(
            AssemblyError::from(PageSpecError::Empty).kind(),
            ErrorKind::Parse
        );
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NoValidPages).unwrap();
        assert_eq!(json, "\"no_valid_pages\"");
    }

    #[test]
    fn test_not_found_message() {
        let error = AssemblyError::NotFound(PathBuf::from("docs/report.pdf"));
        assert_eq!(error.to_string(), "File not found: docs/report.pdf");
    }
}
