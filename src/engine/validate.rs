use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::AssemblyError;
use crate::pdf::PageCodec;

/// Check that `path` is a usable container and hand back the open handle
/// together with its page count.
pub fn inspect<C: PageCodec>(codec: &C, path: &Path) -> Result<(C::Source, u32), AssemblyError> {
    let meta = match fs::metadata(path) {
        Ok(meta) if meta.is_file() => meta,
        _ => return Err(AssemblyError::NotFound(path.to_path_buf())),
    };

    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(codec.extension()));
    if !has_extension {
        return Err(AssemblyError::invalid_format(
            path,
            format!("expected a .{} file", codec.extension()),
        ));
    }

    if meta.len() == 0 {
        return Err(AssemblyError::invalid_format(path, "file is empty"));
    }

    let source = codec.open(path)?;
    let pages = codec.page_count(&source);
    if pages == 0 {
        return Err(AssemblyError::invalid_format(path, "document has no pages"));
    }
    Ok((source, pages))
}

/// Whether `path` names a non-empty container that opens and has pages.
pub fn validate<C: PageCodec>(codec: &C, path: &Path) -> bool {
    match inspect(codec, path) {
        Ok((_, pages)) => {
            debug!(path = %path.display(), pages, "valid");
            true
        }
        Err(e) => {
            debug!(path = %path.display(), reason = %e, "invalid");
            false
        }
    }
}
