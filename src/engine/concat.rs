use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::result::ExtractionResult;
use super::validate::inspect;
use super::{discard_empty_artifact, prepare_destination, same_file};
use crate::error::AssemblyError;
use crate::pdf::{DocumentInfo, PageCodec};

#[derive(Debug, Clone)]
pub struct ConcatenationRequest {
    /// Sources in output order.
    pub sources: Vec<PathBuf>,
    pub destination: PathBuf,
}

/// Append every page of every usable source, in order, to one document.
///
/// Sources that fail validation, opening, or copying are skipped and listed
/// in the result; the run only fails when nothing could be added.
pub fn concatenate<C: PageCodec>(codec: &C, request: ConcatenationRequest) -> ExtractionResult {
    debug!(
        destination = %request.destination.display(),
        sources = request.sources.len(),
        "starting concatenation"
    );

    if request.sources.is_empty() {
        return ExtractionResult::failed(&AssemblyError::NoInputs);
    }

    // the destination is about to be replaced, so it cannot also be read from
    if let Some(source) = request
        .sources
        .iter()
        .find(|source| same_file(source, &request.destination))
    {
        return ExtractionResult::failed(&AssemblyError::DestinationIsSource(source.clone()));
    }

    if let Err(e) = prepare_destination(&request.destination) {
        return ExtractionResult::failed(&e);
    }
    let mut sink = match codec.create_writer(&request.destination) {
        Ok(sink) => sink,
        Err(e) => {
            discard_empty_artifact(&request.destination);
            return ExtractionResult::failed(&e);
        }
    };

    let mut total_pages = 0usize;
    let mut skipped = Vec::new();
    for path in &request.sources {
        match append_source(codec, path, &mut sink) {
            Ok(pages) => {
                debug!(source = %path.display(), pages, "merged");
                total_pages += pages as usize;
            }
            Err(e) => {
                warn!(source = %path.display(), error = %e, "skipping file");
                skipped.push(path.clone());
            }
        }
    }
    debug!(total_pages, "all sources processed");

    if total_pages == 0 {
        drop(sink);
        discard_empty_artifact(&request.destination);
        return ExtractionResult::failed(&AssemblyError::NoContent).with_skipped(skipped);
    }

    codec.set_info(&mut sink, &DocumentInfo::titled("Concatenated PDF"));
    if let Err(e) = codec.finish(sink) {
        discard_empty_artifact(&request.destination);
        return ExtractionResult::failed(&e).with_skipped(skipped);
    }

    info!(
        destination = %request.destination.display(),
        pages = total_pages,
        skipped = skipped.len(),
        "concatenated files"
    );
    ExtractionResult::succeeded(
        "PDF files concatenated successfully!",
        request.destination,
        total_pages,
    )
    .with_skipped(skipped)
}

fn append_source<C: PageCodec>(
    codec: &C,
    path: &std::path::Path,
    sink: &mut C::Sink,
) -> Result<u32, AssemblyError> {
    let (source, pages) = inspect(codec, path)?;
    let all: Vec<u32> = (1..=pages).collect();
    codec.copy_pages(&source, &all, sink)?;
    Ok(pages)
}
