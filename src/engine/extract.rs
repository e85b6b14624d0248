use std::path::PathBuf;
use tracing::{debug, info};

use super::result::ExtractionResult;
use super::select::select_pages;
use super::{discard_empty_artifact, prepare_destination, write_pages};
use crate::error::AssemblyError;
use crate::page_range::PageSet;
use crate::pdf::{DocumentInfo, PageCodec};

#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub pages: PageSet,
}

/// Copy the requested pages of one document into a new document.
///
/// Pages always land in ascending order. An existing file at the
/// destination is replaced.
pub fn extract<C: PageCodec>(codec: &C, request: ExtractionRequest) -> ExtractionResult {
    debug!(
        source = %request.source.display(),
        destination = %request.destination.display(),
        pages = %request.pages,
        "starting extraction"
    );

    match run(codec, &request) {
        Ok(count) => {
            info!(destination = %request.destination.display(), pages = count, "extracted pages");
            ExtractionResult::succeeded(
                "Pages extracted successfully!",
                request.destination,
                count,
            )
        }
        Err(e) => {
            debug!(error = %e, "extraction failed");
            ExtractionResult::failed(&e)
        }
    }
}

fn run<C: PageCodec>(codec: &C, request: &ExtractionRequest) -> Result<usize, AssemblyError> {
    let source = codec.open(&request.source)?;
    let pages = select_pages(&request.pages, codec.page_count(&source))?;

    prepare_destination(&request.destination)?;
    let sink = codec.create_writer(&request.destination)?;
    let info = DocumentInfo::titled("Extracted Pages");
    if let Err(e) = write_pages(codec, &source, pages.as_slice(), sink, &info) {
        discard_empty_artifact(&request.destination);
        return Err(e);
    }
    Ok(pages.len())
}
