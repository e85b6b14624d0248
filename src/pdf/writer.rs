use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::codec::DocumentInfo;
use super::document::PdfDocument;
use crate::error::AssemblyError;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

const MAX_TREE_DEPTH: usize = 64;

/// A PDF under construction, backed by a file created up front.
///
/// Pages are accumulated in memory and serialized by [`PdfWriter::finish`].
/// Dropping an unfinished writer leaves an empty file behind.
pub struct PdfWriter {
    file: File,
    path: PathBuf,
    doc: Document,
    pages: Vec<ObjectId>,
    info: Option<DocumentInfo>,
}

impl PdfWriter {
    pub fn create(path: &Path) -> Result<Self, AssemblyError> {
        let file = File::create(path).map_err(|e| AssemblyError::io(path, e))?;
        Ok(PdfWriter {
            file,
            path: path.to_path_buf(),
            doc: Document::with_version("1.5"),
            pages: Vec::new(),
            info: None,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn set_info(&mut self, info: &DocumentInfo) {
        self.info = Some(info.clone());
    }

    /// Import `pages` of `source`, with everything they reference, in order.
    ///
    /// All lookups happen before the writer is touched, so a failure leaves
    /// it as it was.
    pub fn append_pages(
        &mut self,
        source: &PdfDocument,
        pages: &[u32],
    ) -> Result<(), AssemblyError> {
        let page_map: BTreeMap<u32, ObjectId> = source.page_ids().into_iter().collect();

        let mut staged = Vec::with_capacity(pages.len());
        for &page in pages {
            let page_id = *page_map.get(&page).ok_or_else(|| {
                AssemblyError::copy(format!(
                    "page {} not found in {}",
                    page,
                    source.path.display()
                ))
            })?;
            staged.push((page_id, resolve_page(&source.doc, page_id)?));
        }

        let mut next_id = self.doc.max_id;
        let mut id_map: BTreeMap<ObjectId, ObjectId> = BTreeMap::new();
        for (page_id, _) in &staged {
            next_id += 1;
            id_map.insert(*page_id, (next_id, 0));
        }

        let mut visited: HashSet<ObjectId> = id_map.keys().copied().collect();
        let roots = staged
            .iter()
            .flat_map(|(_, dict)| dict.iter().map(|(_, value)| value))
            .collect();
        let referenced = collect_references(&source.doc, roots, &mut visited);
        for &id in &referenced {
            next_id += 1;
            id_map.insert(id, (next_id, 0));
        }

        for id in referenced {
            if let Ok(object) = source.doc.get_object(id) {
                let mut object = object.clone();
                remap_references(&mut object, &id_map);
                self.doc.objects.insert(id_map[&id], object);
            }
        }
        for (page_id, dict) in staged {
            let mut page = Object::Dictionary(dict);
            remap_references(&mut page, &id_map);
            let new_id = id_map[&page_id];
            self.doc.objects.insert(new_id, page);
            self.pages.push(new_id);
        }
        self.doc.max_id = next_id;

        debug!(
            source = %source.path.display(),
            pages = pages.len(),
            objects = id_map.len(),
            total = self.page_count(),
            "appended pages"
        );
        Ok(())
    }

    /// Build the page tree and catalog, then write the file.
    pub fn finish(mut self) -> Result<usize, AssemblyError> {
        let pages_id = self.doc.new_object_id();
        for page_id in &self.pages {
            if let Some(Object::Dictionary(page)) = self.doc.objects.get_mut(page_id) {
                page.set("Parent", Object::Reference(pages_id));
            }
        }

        let kids: Vec<Object> = self.pages.iter().map(|&id| Object::Reference(id)).collect();
        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(self.pages.len() as i64)),
        ]);
        self.doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        self.doc.trailer.set("Root", Object::Reference(catalog_id));

        if let Some(info) = &self.info {
            let info_id = self.doc.add_object(Dictionary::from_iter(vec![
                ("Title", text_string(&info.title)),
                ("Producer", text_string(&info.producer)),
            ]));
            self.doc.trailer.set("Info", Object::Reference(info_id));
        }

        let write_error = |e: &dyn std::fmt::Display| {
            AssemblyError::io(&self.path, std::io::Error::other(e.to_string()))
        };
        let mut out = BufWriter::new(&self.file);
        self.doc.save_to(&mut out).map_err(|e| write_error(&e))?;
        out.flush().map_err(|e| write_error(&e))?;

        debug!(path = %self.path.display(), pages = self.pages.len(), "wrote PDF");
        Ok(self.pages.len())
    }
}

/// Clone a page dictionary with inherited attributes made explicit and
/// its link to the source page tree removed.
fn resolve_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary, AssemblyError> {
    let mut page = doc
        .get_dictionary(page_id)
        .map_err(|e| AssemblyError::copy(format!("unreadable page object {:?}: {}", page_id, e)))?
        .clone();

    let mut parent = parent_of(&page);
    let mut depth = 0;
    while let Some(parent_id) = parent {
        if depth == MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE_KEYS {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = parent_of(node);
        depth += 1;
    }

    page.remove(b"Parent");
    Ok(page)
}

fn parent_of(dict: &Dictionary) -> Option<ObjectId> {
    dict.get(b"Parent").and_then(Object::as_reference).ok()
}

/// Walk the object graph reachable from `roots`, skipping page tree nodes
/// so other pages of the source are not dragged along.
fn collect_references<'a>(
    doc: &'a Document,
    roots: Vec<&'a Object>,
    visited: &mut HashSet<ObjectId>,
) -> Vec<ObjectId> {
    let mut pending = roots;
    let mut found = Vec::new();

    while let Some(object) = pending.pop() {
        match object {
            Object::Reference(id) => {
                if !visited.insert(*id) {
                    continue;
                }
                let Ok(target) = doc.get_object(*id) else {
                    continue;
                };
                if is_page_tree_node(target) {
                    continue;
                }
                found.push(*id);
                pending.push(target);
            }
            Object::Array(items) => pending.extend(items.iter()),
            Object::Dictionary(dict) => pending.extend(dict.iter().map(|(_, v)| v)),
            Object::Stream(stream) => pending.extend(stream.dict.iter().map(|(_, v)| v)),
            _ => {}
        }
    }

    found
}

fn is_page_tree_node(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => matches!(
            dict.get(b"Type"),
            Ok(Object::Name(name)) if name.as_slice() == b"Page" || name.as_slice() == b"Pages"
        ),
        _ => false,
    }
}

/// Point references at their imported copies; anything not imported
/// becomes null.
fn remap_references(object: &mut Object, id_map: &BTreeMap<ObjectId, ObjectId>) {
    match object {
        Object::Reference(id) => {
            let replacement = id_map
                .get(id)
                .map_or(Object::Null, |&new_id| Object::Reference(new_id));
            *object = replacement;
        }
        Object::Array(items) => {
            for item in items.iter_mut() {
                remap_references(item, id_map);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                remap_references(value, id_map);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                remap_references(value, id_map);
            }
        }
        _ => {}
    }
}

fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
