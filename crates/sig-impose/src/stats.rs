use crate::slots::{SLOTS_PER_SHEET, SignatureSize, padded_count};
use crate::types::*;

/// Calculate statistics for imposing `source_pages` pages
pub fn calculate_statistics(
    source_pages: usize,
    signature: Option<SignatureSize>,
) -> ImpositionStatistics {
    let signature = SignatureSize::or_covering(signature, source_pages);

    // Pad to multiple of the signature size
    let padded = padded_count(source_pages, signature);
    let blank_pages_added = padded - source_pages;

    let signatures = padded / signature.pages();
    let output_sheets = padded / SLOTS_PER_SHEET;

    ImpositionStatistics {
        source_pages,
        signature_size: signature.pages(),
        signatures,
        sheets_per_signature: signature.sheets(),
        output_sheets,
        output_pages: padded,
        blank_pages_added,
    }
}
