use tracing::warn;

use crate::error::AssemblyError;
use crate::page_range::PageSet;

/// Clip `requested` to the pages a document actually has.
///
/// This runs against the page count of the document opened for the
/// operation, which may differ from the count the set was parsed against.
pub fn select_pages(requested: &PageSet, total_pages: u32) -> Result<PageSet, AssemblyError> {
    let selected = requested.clip(total_pages);
    if selected.len() < requested.len() {
        let dropped: Vec<u32> = requested
            .iter()
            .filter(|p| !selected.as_slice().contains(p))
            .collect();
        warn!(?dropped, total_pages, "ignoring pages outside the document");
    }
    if selected.is_empty() {
        return Err(AssemblyError::NoValidPages);
    }
    Ok(selected)
}
