use serde::Serialize;
use std::path::PathBuf;

use crate::error::{AssemblyError, ErrorKind};

/// Outcome of an extraction or a concatenation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub message: String,
    pub output_path: Option<PathBuf>,
    pub page_count: usize,
    pub error: Option<ErrorKind>,
    /// Sources left out of a concatenation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<PathBuf>,
}

impl ExtractionResult {
    pub(crate) fn succeeded(
        message: impl Into<String>,
        output: PathBuf,
        page_count: usize,
    ) -> Self {
        ExtractionResult {
            success: true,
            message: message.into(),
            output_path: Some(output),
            page_count,
            error: None,
            skipped: Vec::new(),
        }
    }

    pub(crate) fn failed(error: &AssemblyError) -> Self {
        ExtractionResult {
            success: false,
            message: error.to_string(),
            output_path: None,
            page_count: 0,
            error: Some(error.kind()),
            skipped: Vec::new(),
        }
    }

    pub(crate) fn with_skipped(mut self, skipped: Vec<PathBuf>) -> Self {
        self.skipped = skipped;
        self
    }
}

/// Outcome of a split into one file per page.
///
/// Files created before a failure are kept and listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub success: bool,
    pub message: String,
    pub output_folder: PathBuf,
    pub files_created: usize,
    pub created_files: Vec<PathBuf>,
    pub error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_pages: Vec<u32>,
}

impl BatchResult {
    pub(crate) fn failed(output_folder: PathBuf, error: &AssemblyError) -> Self {
        BatchResult {
            success: false,
            message: error.to_string(),
            output_folder,
            files_created: 0,
            created_files: Vec::new(),
            error: Some(error.kind()),
            failed_pages: Vec::new(),
        }
    }
}
