use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::result::BatchResult;
use super::select::select_pages;
use super::{discard_empty_artifact, remove_existing, write_pages};
use crate::error::AssemblyError;
use crate::page_range::PageSet;
use crate::pdf::{DocumentInfo, PageCodec};

/// What a split does when one page cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failed page.
    #[default]
    Abort,
    /// Attempt every page and report the ones that failed.
    Continue,
}

#[derive(Debug, Clone)]
pub struct SplitRequest {
    pub source: PathBuf,
    pub destination_folder: PathBuf,
    pub pages: PageSet,
    /// Prefix for output names; the source's file stem when `None` or blank.
    pub base_name: Option<String>,
    pub policy: FailurePolicy,
}

impl SplitRequest {
    pub fn base_name(&self) -> String {
        match self.base_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string()),
        }
    }
}

/// Output path for one page of a split.
pub fn page_file_name(folder: &Path, base_name: &str, page: u32, extension: &str) -> PathBuf {
    folder.join(format!("{}_page_{}.{}", base_name, page, extension))
}

/// Write each requested page of a document into its own file.
///
/// Files written before a failure stay on disk and are listed in the result.
pub fn split<C: PageCodec>(codec: &C, request: SplitRequest) -> BatchResult {
    let folder = request.destination_folder.clone();
    debug!(
        source = %request.source.display(),
        folder = %folder.display(),
        pages = %request.pages,
        "starting split"
    );

    let (source, pages) = match open_and_select(codec, &request) {
        Ok(opened) => opened,
        Err(e) => {
            debug!(error = %e, "split failed before writing");
            return BatchResult::failed(folder, &e);
        }
    };

    let base_name = request.base_name();
    let mut created = Vec::with_capacity(pages.len());
    let mut failed_pages = Vec::new();
    let mut first_error: Option<AssemblyError> = None;

    for page in pages.iter() {
        let output = page_file_name(&folder, &base_name, page, codec.extension());
        match write_single_page(codec, &source, page, &output, &base_name) {
            Ok(()) => {
                debug!(path = %output.display(), "created file");
                created.push(output);
            }
            Err(e) => {
                warn!(page, path = %output.display(), error = %e, "failed to write page");
                failed_pages.push(page);
                let stop = request.policy == FailurePolicy::Abort;
                first_error.get_or_insert(e);
                if stop {
                    break;
                }
            }
        }
    }

    let files_created = created.len();
    match first_error {
        None => {
            info!(folder = %folder.display(), files = files_created, "split pages");
            BatchResult {
                success: true,
                message: format!("Successfully extracted {} files.", files_created),
                output_folder: folder,
                files_created,
                created_files: created,
                error: None,
                failed_pages,
            }
        }
        Some(e) => BatchResult {
            success: false,
            message: format!(
                "Split extraction failed after {} file(s): {}",
                files_created, e
            ),
            output_folder: folder,
            files_created,
            created_files: created,
            error: Some(e.kind()),
            failed_pages,
        },
    }
}

fn open_and_select<C: PageCodec>(
    codec: &C,
    request: &SplitRequest,
) -> Result<(C::Source, PageSet), AssemblyError> {
    let source = codec.open(&request.source)?;
    let pages = select_pages(&request.pages, codec.page_count(&source))?;
    if !request.destination_folder.is_dir() {
        fs::create_dir_all(&request.destination_folder)
            .map_err(|e| AssemblyError::io(&request.destination_folder, e))?;
    }
    Ok((source, pages))
}

fn write_single_page<C: PageCodec>(
    codec: &C,
    source: &C::Source,
    page: u32,
    output: &Path,
    base_name: &str,
) -> Result<(), AssemblyError> {
    remove_existing(output)?;
    let sink = codec.create_writer(output)?;
    let info = DocumentInfo::titled(format!("{} - Page {}", base_name, page));
    write_pages(codec, source, &[page], sink, &info).inspect_err(|_| {
        discard_empty_artifact(output);
    })
}
