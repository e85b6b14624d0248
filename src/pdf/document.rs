use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::codec::{DocumentInfo, PageCodec};
use super::writer::PdfWriter;
use crate::error::AssemblyError;

/// A PDF opened for reading.
pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AssemblyError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AssemblyError::NotFound(path.to_path_buf()));
        }
        let doc = Document::load(path).map_err(|e| AssemblyError::invalid_format(path, e))?;
        debug!(path = %path.display(), pages = doc.get_pages().len(), "opened PDF");
        Ok(PdfDocument {
            doc,
            path: path.to_path_buf(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        self.doc.get_pages().into_iter().collect()
    }

    /// Read the document information dictionary
    pub fn get_info(&self) -> PdfInfo {
        let mut info = PdfInfo {
            page_count: self.page_count(),
            version: self.doc.version.clone(),
            ..Default::default()
        };

        let dict = match self.doc.trailer.get(b"Info") {
            Ok(Object::Reference(id)) => self.doc.get_dictionary(*id).ok(),
            Ok(Object::Dictionary(dict)) => Some(dict),
            _ => None,
        };

        if let Some(dict) = dict {
            info.title = get_string_from_dict(dict, b"Title");
            info.author = get_string_from_dict(dict, b"Author");
            info.subject = get_string_from_dict(dict, b"Subject");
            info.creator = get_string_from_dict(dict, b"Creator");
            info.producer = get_string_from_dict(dict, b"Producer");
        }

        info
    }
}

#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct PdfInfo {
    pub page_count: u32,
    pub version: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
}

fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key) {
        Ok(Object::String(bytes, _)) => Some(decode_text_string(bytes)),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE when it carries a BOM, otherwise
/// treated as Latin-1.
pub(crate) fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// [`PageCodec`] backed by lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfCodec;

impl PageCodec for LopdfCodec {
    type Source = PdfDocument;
    type Sink = PdfWriter;

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn open(&self, path: &Path) -> Result<PdfDocument, AssemblyError> {
        PdfDocument::open(path)
    }

    fn page_count(&self, source: &PdfDocument) -> u32 {
        source.page_count()
    }

    fn create_writer(&self, path: &Path) -> Result<PdfWriter, AssemblyError> {
        PdfWriter::create(path)
    }

    fn copy_pages(
        &self,
        source: &PdfDocument,
        pages: &[u32],
        sink: &mut PdfWriter,
    ) -> Result<(), AssemblyError> {
        sink.append_pages(source, pages)
    }

    fn set_info(&self, sink: &mut PdfWriter, info: &DocumentInfo) {
        sink.set_info(info);
    }

    fn finish(&self, sink: PdfWriter) -> Result<(), AssemblyError> {
        sink.finish().map(|_| ())
    }
}
