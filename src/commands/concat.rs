use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use super::{has_extension, parent_dir, report_extraction};
use crate::engine::{concatenate, same_file, ConcatenationRequest};
use crate::pdf::{LopdfCodec, PageCodec};

/// Where the list of files to concatenate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatenationMode {
    FromFolder,
    IndividualFiles,
}

impl ConcatenationMode {
    pub fn default_file_name(self) -> &'static str {
        match self {
            ConcatenationMode::FromFolder => "concatenated_folder_pdfs.pdf",
            ConcatenationMode::IndividualFiles => "concatenated_files.pdf",
        }
    }
}

/// Default output: a mode-specific name next to the first input.
pub fn default_concatenation_path(first_input: &Path, mode: ConcatenationMode) -> PathBuf {
    parent_dir(first_input).join(mode.default_file_name())
}

/// Files directly inside `folder` with the given extension, sorted by name.
pub fn folder_sources(folder: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        bail!("Folder not found: {}", folder.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry =
            entry.with_context(|| format!("Failed to read directory: {}", folder.display()))?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Drop `destination` from a folder listing so a rerun does not read its
/// own previous output. Returns whether anything was removed.
pub fn exclude_destination(sources: &mut Vec<PathBuf>, destination: &Path) -> bool {
    let before = sources.len();
    sources.retain(|source| !same_file(source, destination));
    sources.len() != before
}

pub fn run(
    inputs: Vec<PathBuf>,
    folder: Option<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let codec = LopdfCodec;

    let (mut sources, mode) = match folder {
        Some(folder) => (
            folder_sources(&folder, codec.extension())?,
            ConcatenationMode::FromFolder,
        ),
        None => (inputs, ConcatenationMode::IndividualFiles),
    };

    let Some(first) = sources.first() else {
        bail!("No PDF files found");
    };
    let destination = output.unwrap_or_else(|| default_concatenation_path(first, mode));
    if mode == ConcatenationMode::FromFolder && exclude_destination(&mut sources, &destination) {
        warn!(path = %destination.display(), "leaving the output file out of the inputs");
        if sources.is_empty() {
            bail!("No PDF files found besides {}", destination.display());
        }
    }

    let result = concatenate(
        &codec,
        ConcatenationRequest {
            sources,
            destination,
        },
    );
    report_extraction(&result, json, "Total pages")
}
