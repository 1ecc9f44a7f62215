//! Structured document backends
//!
//! A backend knows how to find page boundaries in a source document and how
//! to write a new document from those pages in any order:
//! 1. `scan_pages` once, before anything is written
//! 2. header, prolog and setup
//! 3. one `write_page` / `write_empty_page` per physical slot
//! 4. trailer, which finalizes the output

mod dsc;
mod pdf;

pub use dsc::DscDocument;
pub use pdf::PdfDocument;

use crate::slots::PageIndex;
use crate::types::*;

/// Collaborator driven by the imposition loop
pub trait PageStream {
    /// Scan the source and return its logical page count
    fn scan_pages(&mut self) -> Result<usize>;

    /// Write the document header, announcing `total_slots` output pages
    fn write_header(&mut self, total_slots: usize) -> Result<()>;

    fn write_prolog(&mut self) -> Result<()>;

    fn write_setup(&mut self) -> Result<()>;

    /// Copy logical page `page` of the source as the next output page
    fn write_page(&mut self, page: PageIndex) -> Result<()>;

    /// Write a blank page as the next output page
    fn write_empty_page(&mut self) -> Result<()>;

    /// Write the document trailer and flush the output
    fn write_trailer(&mut self) -> Result<()>;
}

pub(crate) fn check_page(index: PageIndex, pages: usize) -> Result<()> {
    if index >= pages {
        return Err(ImposeError::PageOutOfRange { index, pages });
    }
    Ok(())
}
