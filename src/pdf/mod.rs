pub mod codec;
pub mod document;
pub mod writer;

#[cfg(test)]
pub(crate) mod fixtures;

pub use codec::{DocumentInfo, PageCodec};
pub use document::{LopdfCodec, PdfDocument};
