//! A file-backed stand-in for the PDF codec.
//!
//! Documents are text files: a header line, optional `%key value` lines,
//! then one line per page holding that page's label.

use std::cell::Cell;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::AssemblyError;
use crate::pdf::{DocumentInfo, PageCodec};

const HEADER: &str = "%TEXTDOC";

#[derive(Default)]
pub struct TextCodec {
    fail_copy_from: Option<PathBuf>,
    live: Rc<Cell<usize>>,
}

impl TextCodec {
    /// A codec whose copies out of `path` always fail.
    pub fn failing_copies_from(path: &Path) -> Self {
        TextCodec {
            fail_copy_from: Some(path.to_path_buf()),
            ..Default::default()
        }
    }

    /// Handles opened or created and not yet dropped.
    pub fn live_handles(&self) -> usize {
        self.live.get()
    }

    fn guard(&self) -> HandleGuard {
        self.live.set(self.live.get() + 1);
        HandleGuard(Rc::clone(&self.live))
    }
}

struct HandleGuard(Rc<Cell<usize>>);

impl Drop for HandleGuard {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

pub struct TextSource {
    path: PathBuf,
    pages: Vec<String>,
    _guard: HandleGuard,
}

pub struct TextSink {
    file: File,
    path: PathBuf,
    pages: Vec<String>,
    title: Option<String>,
    _guard: HandleGuard,
}

impl PageCodec for TextCodec {
    type Source = TextSource;
    type Sink = TextSink;

    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn open(&self, path: &Path) -> Result<TextSource, AssemblyError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AssemblyError::NotFound(path.to_path_buf()),
            _ => AssemblyError::invalid_format(path, e),
        })?;
        let mut lines = content.lines();
        if lines.next() != Some(HEADER) {
            return Err(AssemblyError::invalid_format(path, "missing header"));
        }
        Ok(TextSource {
            path: path.to_path_buf(),
            pages: lines
                .filter(|l| !l.starts_with('%'))
                .map(str::to_string)
                .collect(),
            _guard: self.guard(),
        })
    }

    fn page_count(&self, source: &TextSource) -> u32 {
        source.pages.len() as u32
    }

    fn create_writer(&self, path: &Path) -> Result<TextSink, AssemblyError> {
        let file = File::create(path).map_err(|e| AssemblyError::io(path, e))?;
        Ok(TextSink {
            file,
            path: path.to_path_buf(),
            pages: Vec::new(),
            title: None,
            _guard: self.guard(),
        })
    }

    fn copy_pages(
        &self,
        source: &TextSource,
        pages: &[u32],
        sink: &mut TextSink,
    ) -> Result<(), AssemblyError> {
        if self.fail_copy_from.as_deref() == Some(source.path.as_path()) {
            return Err(AssemblyError::copy("injected failure"));
        }
        let mut copied = Vec::with_capacity(pages.len());
        for &page in pages {
            let label = source
                .pages
                .get((page as usize).wrapping_sub(1))
                .ok_or_else(|| AssemblyError::copy(format!("page {} not found", page)))?;
            copied.push(label.clone());
        }
        sink.pages.extend(copied);
        Ok(())
    }

    fn set_info(&self, sink: &mut TextSink, info: &DocumentInfo) {
        sink.title = Some(info.title.clone());
    }

    fn finish(&self, mut sink: TextSink) -> Result<(), AssemblyError> {
        let mut text = format!("{}\n", HEADER);
        if let Some(title) = &sink.title {
            text.push_str(&format!("%title {}\n", title));
        }
        for page in &sink.pages {
            text.push_str(page);
            text.push('\n');
        }
        sink.file
            .write_all(text.as_bytes())
            .map_err(|e| AssemblyError::io(&sink.path, e))
    }
}

/// Write a document named `name` in `dir` with pages labelled `{stem}-{n}`.
pub fn write_doc(dir: &Path, name: &str, pages: u32) -> PathBuf {
    let path = dir.join(name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("doc")
        .to_string();
    let mut text = format!("{}\n", HEADER);
    for n in 1..=pages {
        text.push_str(&format!("{}-{}\n", stem, n));
    }
    fs::write(&path, text).expect("test document written");
    path
}

/// Page labels of a document written by [`TextCodec`].
pub fn read_pages(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("document readable")
        .lines()
        .skip(1)
        .filter(|l| !l.starts_with('%'))
        .map(str::to_string)
        .collect()
}

pub fn read_title(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .expect("document readable")
        .lines()
        .find_map(|l| l.strip_prefix("%title ").map(str::to_string))
}
