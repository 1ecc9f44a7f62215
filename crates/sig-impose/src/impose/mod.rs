//! Signature imposition - reordering pages for folding
//!
//! This module orchestrates the imposition process:
//! 1. Scan the source document for its pages
//! 2. Compute the physical slot order
//! 3. Emit header, prolog and setup
//! 4. Emit every slot, in order, as a page or a blank
//! 5. Emit the trailer

mod io;

pub use io::{read_input, write_output};

use crate::document::{DscDocument, PageStream, PdfDocument};
use crate::options::ImpositionOptions;
use crate::slots::{SignatureSize, Slot, SlotSequence, compute_slots};
use crate::stats::calculate_statistics;
use crate::types::*;

/// Main imposition function
pub async fn impose(input: Vec<u8>, options: &ImpositionOptions) -> Result<ImposedDocument> {
    options.validate()?;

    let options = options.clone();

    tokio::task::spawn_blocking(move || impose_bytes(input, &options)).await?
}

/// Reorder a complete in-memory document
pub fn impose_bytes(input: Vec<u8>, options: &ImpositionOptions) -> Result<ImposedDocument> {
    let signature = options.signature_size()?;
    let format = options.resolve_format(&input)?;
    log::debug!("imposing {} document ({} bytes)", format.name(), input.len());

    let (slots, output) = match format {
        DocumentFormat::PostScript => {
            let mut document = DscDocument::new(input, Vec::new());
            let slots = impose_pages(&mut document, signature)?;
            (slots, document.into_output())
        }
        DocumentFormat::Pdf => {
            let mut document = PdfDocument::new(input, Vec::new());
            let slots = impose_pages(&mut document, signature)?;
            (slots, document.into_output())
        }
    };

    Ok(ImposedDocument {
        bytes: output,
        format,
        statistics: calculate_statistics(slots.page_count(), Some(slots.signature())),
    })
}

/// Statistics for a document, without producing output
pub fn scan_statistics(input: Vec<u8>, options: &ImpositionOptions) -> Result<ImpositionStatistics> {
    let signature = options.signature_size()?;
    let page_count = match options.resolve_format(&input)? {
        DocumentFormat::PostScript => DscDocument::new(input, std::io::sink()).scan_pages()?,
        DocumentFormat::Pdf => PdfDocument::new(input, std::io::sink()).scan_pages()?,
    };
    Ok(calculate_statistics(page_count, signature))
}

/// Drive a document backend through one imposition pass.
///
/// The slot order is fixed before anything is written, so an invalid
/// signature never produces partial output.
pub fn impose_pages<S: PageStream>(
    stream: &mut S,
    signature: Option<SignatureSize>,
) -> Result<SlotSequence> {
    let page_count = stream.scan_pages()?;
    let slots = compute_slots(page_count, signature);
    log::debug!(
        "{} pages in signatures of {}: {} slots, {} blank",
        page_count,
        slots.signature(),
        slots.len(),
        slots.blank_count()
    );

    stream.write_header(slots.len())?;
    stream.write_prolog()?;
    stream.write_setup()?;

    for (ordinal, slot) in slots.iter().enumerate() {
        match *slot {
            Slot::Page(page) => stream.write_page(page)?,
            Slot::Blank => stream.write_empty_page()?,
        }
        log::info!("[{}]", ordinal + 1);
    }

    stream.write_trailer()?;
    log::info!("Wrote {} pages", slots.len());

    Ok(slots)
}
