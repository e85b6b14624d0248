use std::path::Path;

use crate::error::AssemblyError;

/// Document-level metadata written into produced files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: String,
    pub producer: String,
}

impl DocumentInfo {
    pub fn titled(title: impl Into<String>) -> Self {
        DocumentInfo {
            title: title.into(),
            producer: producer_tag().to_string(),
        }
    }
}

pub fn producer_tag() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}

/// Capability the assembly engines need from a document format.
///
/// Handles are released when dropped, so every exit path of an engine
/// closes what it opened. Writers create their file eagerly; nothing is
/// serialized until [`PageCodec::finish`].
pub trait PageCodec {
    type Source;
    type Sink;

    /// File extension of the container format, without the dot.
    fn extension(&self) -> &'static str;

    fn open(&self, path: &Path) -> Result<Self::Source, AssemblyError>;

    fn page_count(&self, source: &Self::Source) -> u32;

    fn create_writer(&self, path: &Path) -> Result<Self::Sink, AssemblyError>;

    /// Append `pages` (1-based) of `source` to `sink` in the given order.
    ///
    /// Either every page is appended or none is.
    fn copy_pages(
        &self,
        source: &Self::Source,
        pages: &[u32],
        sink: &mut Self::Sink,
    ) -> Result<(), AssemblyError>;

    fn set_info(&self, sink: &mut Self::Sink, info: &DocumentInfo);

    /// Serialize the sink to its file and release it.
    fn finish(&self, sink: Self::Sink) -> Result<(), AssemblyError>;
}
