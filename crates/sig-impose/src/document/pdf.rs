//! PDF backend
//!
//! Reordering a PDF only touches the page tree: the root `Pages` node gets a
//! new flat `Kids` array in slot order, with fresh blank pages for padding.
//! Page content is never rewritten.

use super::{PageStream, check_page};
use crate::constants::{DEFAULT_PAGE_DIMENSIONS, INHERITABLE_PAGE_KEYS, MAX_PAGE_TREE_DEPTH};
use crate::slots::PageIndex;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;

/// PDF document reader/writer
pub struct PdfDocument<W: Write> {
    source: Vec<u8>,
    output: W,
    state: Option<PdfState>,
}

struct PdfState {
    doc: Document,
    page_ids: Vec<ObjectId>,
    pages_root: ObjectId,
    /// MediaBox given to blank pages
    blank_media_box: Vec<Object>,
    kids: Vec<Object>,
    expected_slots: usize,
}

impl<W: Write> PdfDocument<W> {
    pub fn new(source: Vec<u8>, output: W) -> Self {
        Self {
            source,
            output,
            state: None,
        }
    }

    /// Give back the output writer
    pub fn into_output(self) -> W {
        self.output
    }

    fn state(&mut self) -> Result<&mut PdfState> {
        self.state.as_mut().ok_or(ImposeError::NotScanned)
    }
}

impl<W: Write> PageStream for PdfDocument<W> {
    fn scan_pages(&mut self) -> Result<usize> {
        let doc = Document::load_mem(&self.source)?;
        let pages_root = root_pages_id(&doc)?;
        let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();

        let blank_media_box = page_ids
            .first()
            .and_then(|&id| inherited_attribute(&doc, id, b"MediaBox"))
            .and_then(|obj| obj.as_array().ok().cloned())
            .unwrap_or_else(default_media_box);

        log::debug!("PDF scan: {} pages, version {}", page_ids.len(), doc.version);

        let pages = page_ids.len();
        self.state = Some(PdfState {
            doc,
            page_ids,
            pages_root,
            blank_media_box,
            kids: Vec::new(),
            expected_slots: 0,
        });
        Ok(pages)
    }

    fn write_header(&mut self, total_slots: usize) -> Result<()> {
        let state = self.state()?;
        state.expected_slots = total_slots;
        state.kids = Vec::with_capacity(total_slots);
        Ok(())
    }

    // PDF has no prolog or setup sections; resources live on the pages
    fn write_prolog(&mut self) -> Result<()> {
        self.state().map(|_| ())
    }

    fn write_setup(&mut self) -> Result<()> {
        self.state().map(|_| ())
    }

    fn write_page(&mut self, page: PageIndex) -> Result<()> {
        let state = self.state()?;
        check_page(page, state.page_ids.len())?;
        let page_id = state.page_ids[page];

        // The page leaves its parent, so it must carry what it inherited
        for key in INHERITABLE_PAGE_KEYS {
            let has_key = state.doc.get_dictionary(page_id)?.has(key);
            if has_key {
                continue;
            }
            if let Some(value) = inherited_attribute(&state.doc, page_id, key) {
                state
                    .doc
                    .get_object_mut(page_id)?
                    .as_dict_mut()?
                    .set(*key, value);
            }
        }

        state.kids.push(Object::Reference(page_id));
        Ok(())
    }

    fn write_empty_page(&mut self) -> Result<()> {
        let state = self.state()?;
        let blank_id = create_blank_page(&mut state.doc, &state.blank_media_box, state.pages_root);
        state.kids.push(Object::Reference(blank_id));
        Ok(())
    }

    fn write_trailer(&mut self) -> Result<()> {
        let state = self.state.as_mut().ok_or(ImposeError::NotScanned)?;
        if state.kids.len() != state.expected_slots {
            log::warn!(
                "header announced {} pages but {} were written",
                state.expected_slots,
                state.kids.len()
            );
        }

        let kids = std::mem::take(&mut state.kids);
        for kid in &kids {
            if let Object::Reference(id) = kid {
                state
                    .doc
                    .get_object_mut(*id)?
                    .as_dict_mut()?
                    .set("Parent", Object::Reference(state.pages_root));
            }
        }

        let mut pages_dict = state.doc.get_dictionary(state.pages_root)?.clone();
        pages_dict.set("Count", Object::Integer(kids.len() as i64));
        pages_dict.set("Kids", Object::Array(kids));
        state
            .doc
            .objects
            .insert(state.pages_root, Object::Dictionary(pages_dict));

        // Intermediate page tree nodes are no longer reachable
        let pruned = state.doc.prune_objects();
        log::debug!("pruned {} unreachable objects", pruned.len());

        state.doc.save_to(&mut self.output)?;
        self.output.flush()?;
        Ok(())
    }
}

/// Object id of the root `Pages` node.
///
/// The page tree is rewritten in place, so it must be an indirect object.
fn root_pages_id(doc: &Document) -> Result<ObjectId> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| ImposeError::MalformedDocument("trailer has no Root reference".into()))?;
    let catalog = doc.get_dictionary(catalog_id)?;
    let pages_id = catalog
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| {
            ImposeError::MalformedDocument("catalog Pages entry is not a reference".into())
        })?;
    Ok(pages_id)
}

/// Look up `key` on the page or its nearest ancestor that defines it
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn default_media_box() -> Vec<Object> {
    let (width, height) = DEFAULT_PAGE_DIMENSIONS;
    vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(width),
        Object::Real(height),
    ]
}

/// Create a blank page with the given media box
fn create_blank_page(doc: &mut Document, media_box: &[Object], parent_id: ObjectId) -> ObjectId {
    let content_id = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_id));
    page_dict.set("MediaBox", Object::Array(media_box.to_vec()));
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(Dictionary::new()));

    doc.add_object(page_dict)
}
