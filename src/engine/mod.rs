//! Page assembly: extract, split, and concatenate.
//!
//! Every operation takes the codec explicitly, runs to completion
//! synchronously, and reports through a result record instead of an error.

pub mod concat;
pub mod extract;
pub mod result;
pub mod select;
pub mod split;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use concat::{concatenate, ConcatenationRequest};
pub use extract::{extract, ExtractionRequest};
pub use result::{BatchResult, ExtractionResult};
pub use split::{split, FailurePolicy, SplitRequest};
pub use validate::{inspect, validate};

/// Whether `a` and `b` resolve to the same existing file.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::AssemblyError;
use crate::pdf::{DocumentInfo, PageCodec};

/// Make room for a new file at `path`: create its parent directory and
/// remove whatever file is already there.
fn prepare_destination(path: &Path) -> Result<(), AssemblyError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            debug!(dir = %parent.display(), "creating output directory");
            fs::create_dir_all(parent).map_err(|e| AssemblyError::io(parent, e))?;
        }
    }
    remove_existing(path)
}

fn remove_existing(path: &Path) -> Result<(), AssemblyError> {
    if path.exists() {
        debug!(path = %path.display(), "deleting existing output file");
        fs::remove_file(path).map_err(|e| AssemblyError::io(path, e))?;
    }
    Ok(())
}

/// Delete the file at `path` if a failed write left it empty.
fn discard_empty_artifact(path: &Path) {
    if let Ok(meta) = fs::metadata(path) {
        if meta.is_file() && meta.len() == 0 {
            debug!(path = %path.display(), "output file is empty, deleting it");
            let _ = fs::remove_file(path);
        }
    }
}

/// Copy `pages` into a fresh sink, tag it, and write it out.
fn write_pages<C: PageCodec>(
    codec: &C,
    source: &C::Source,
    pages: &[u32],
    mut sink: C::Sink,
    info: &DocumentInfo,
) -> Result<(), AssemblyError> {
    codec.copy_pages(source, pages, &mut sink)?;
    codec.set_info(&mut sink, info);
    codec.finish(sink)
}
