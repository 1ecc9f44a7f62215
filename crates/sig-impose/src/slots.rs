//! Signature slot calculation
//!
//! Maps the logical pages of a document onto the physical slots of folded
//! signatures. Each sheet printed front and back and folded once carries four
//! slots; stacking `signature / 4` sheets and folding them together gives one
//! signature.
//!
//! For a single sheet (signature of 4) the physical order is `[3, 0, 1, 2]`:
//!
//! ```text
//! outside: [4 | 1]
//! inside:  [2 | 3]
//! ```
//!
//! Larger signatures nest sheets: the first sheet carries the outermost pages
//! (first and last of the signature), the last sheet the middle two.

use crate::types::{ImposeError, Result};

/// Physical slots carried by one folded sheet (front and back of two leaves)
pub const SLOTS_PER_SHEET: usize = 4;

/// 0-based ordinal of a logical page in the source document
pub type PageIndex = usize;

// =============================================================================
// Types
// =============================================================================

/// Number of logical pages folded together into one signature.
///
/// Always a positive multiple of 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureSize(usize);

impl SignatureSize {
    /// Validate a caller-supplied signature size
    pub fn new(pages: i64) -> Result<Self> {
        if pages < 1 || pages % SLOTS_PER_SHEET as i64 != 0 {
            return Err(ImposeError::InvalidSignature(pages));
        }
        usize::try_from(pages)
            .map(Self)
            .map_err(|_| ImposeError::InvalidSignature(pages))
    }

    /// One signature holding the whole document: `page_count` rounded up to
    /// the next multiple of 4 (never smaller than a single sheet).
    pub fn covering(page_count: usize) -> Self {
        let rounded = round_up(page_count, SLOTS_PER_SHEET);
        Self(rounded.max(SLOTS_PER_SHEET))
    }

    /// Use `explicit` when given, otherwise a signature covering the document
    pub fn or_covering(explicit: Option<SignatureSize>, page_count: usize) -> Self {
        explicit.unwrap_or_else(|| Self::covering(page_count))
    }

    pub fn pages(self) -> usize {
        self.0
    }

    pub fn sheets(self) -> usize {
        self.0 / SLOTS_PER_SHEET
    }
}

impl TryFrom<i64> for SignatureSize {
    type Error = ImposeError;

    fn try_from(pages: i64) -> Result<Self> {
        Self::new(pages)
    }
}

impl TryFrom<usize> for SignatureSize {
    type Error = ImposeError;

    fn try_from(pages: usize) -> Result<Self> {
        let signed = i64::try_from(pages).map_err(|_| ImposeError::InvalidSignature(i64::MAX))?;
        Self::new(signed)
    }
}

impl std::fmt::Display for SignatureSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a physical slot carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// A logical page of the source document
    Page(PageIndex),
    /// Padding at the end of the final signature
    Blank,
}

impl Slot {
    pub fn page(self) -> Option<PageIndex> {
        match self {
            Slot::Page(index) => Some(index),
            Slot::Blank => None,
        }
    }

    pub fn is_blank(self) -> bool {
        matches!(self, Slot::Blank)
    }
}

/// Physical slot assignments, in the order pages must be emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSequence {
    slots: Vec<Slot>,
    page_count: usize,
    signature: SignatureSize,
}

impl SlotSequence {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Same as `len`: the page count padded to whole signatures
    pub fn padded_count(&self) -> usize {
        self.slots.len()
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn signature(&self) -> SignatureSize {
        self.signature
    }

    pub fn blank_count(&self) -> usize {
        self.padded_count() - self.page_count
    }

    pub fn as_slice(&self) -> &[Slot] {
        &self.slots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    /// Slots grouped by signature
    pub fn signatures(&self) -> std::slice::Chunks<'_, Slot> {
        self.slots.chunks(self.signature.pages())
    }

    /// Slots grouped by physical sheet
    pub fn sheets(&self) -> std::slice::Chunks<'_, Slot> {
        self.slots.chunks(SLOTS_PER_SHEET)
    }
}

impl<'a> IntoIterator for &'a SlotSequence {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

impl IntoIterator for SlotSequence {
    type Item = Slot;
    type IntoIter = std::vec::IntoIter<Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}

// =============================================================================
// Slot Calculation
// =============================================================================

/// Compute the physical slot sequence for `page_count` pages.
///
/// Without an explicit signature the whole document becomes one signature.
pub fn compute_slots(page_count: usize, signature: Option<SignatureSize>) -> SlotSequence {
    let signature = SignatureSize::or_covering(signature, page_count);
    let padded = padded_count(page_count, signature);

    let slots = (0..padded)
        .map(|physical| {
            let logical = logical_page(physical, signature);
            if logical < page_count {
                Slot::Page(logical)
            } else {
                Slot::Blank
            }
        })
        .collect();

    SlotSequence {
        slots,
        page_count,
        signature,
    }
}

/// Checked entry point for callers holding raw integers.
///
/// The signature is validated first; no slots are computed on failure.
pub fn impose_slots(page_count: i64, signature: Option<i64>) -> Result<SlotSequence> {
    let signature = signature.map(SignatureSize::new).transpose()?;
    let page_count =
        usize::try_from(page_count).map_err(|_| ImposeError::InvalidPageCount(page_count))?;
    Ok(compute_slots(page_count, signature))
}

/// `page_count` rounded up to a whole number of signatures
pub fn padded_count(page_count: usize, signature: SignatureSize) -> usize {
    round_up(page_count, signature.pages())
}

/// Logical page carried by physical slot `physical`.
///
/// May exceed the document's page count for padding slots.
pub fn logical_page(physical: usize, signature: SignatureSize) -> usize {
    let size = signature.pages();
    let offset = physical % size;
    let base = physical - offset;

    match physical % SLOTS_PER_SHEET {
        // outside of the sheet: pages from the back half of the signature
        0 | 3 => base + size - 1 - offset.div_euclid(2),
        // inside of the sheet: pages from the front half
        _ => base + offset.div_euclid(2),
    }
}

fn round_up(value: usize, multiple: usize) -> usize {
    value + (multiple - value % multiple) % multiple
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(pages: i64) -> SignatureSize {
        SignatureSize::new(pages).unwrap()
    }

    fn order(sequence: &SlotSequence) -> Vec<Option<usize>> {
        sequence.iter().map(|slot| slot.page()).collect()
    }

    #[test]
    fn test_single_sheet_order() {
        let slots = compute_slots(4, Some(sig(4)));
        assert_eq!(order(&slots), vec![Some(3), Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_two_sheet_signature_order() {
        // Outer sheet carries 8,1 / 2,7; inner sheet carries 6,3 / 4,5
        let slots = compute_slots(8, Some(sig(8)));
        assert_eq!(
            order(&slots),
            vec![
                Some(7),
                Some(0),
                Some(1),
                Some(6),
                Some(5),
                Some(2),
                Some(3),
                Some(4)
            ]
        );
    }

    #[test]
    fn test_logical_page_padding_positions() {
        let four = sig(4);
        assert_eq!(logical_page(4, four), 7);
        assert_eq!(logical_page(5, four), 4);
        assert_eq!(logical_page(6, four), 5);
        assert_eq!(logical_page(7, four), 6);
    }

    #[test]
    fn test_signature_validation() {
        assert!(SignatureSize::new(4).is_ok());
        assert!(SignatureSize::new(32).is_ok());
        assert!(matches!(
            SignatureSize::new(0),
            Err(ImposeError::InvalidSignature(0))
        ));
        assert!(matches!(
            SignatureSize::new(-4),
            Err(ImposeError::InvalidSignature(-4))
        ));
        assert!(SignatureSize::try_from(6usize).is_err());
    }

    #[test]
    fn test_covering_signature() {
        assert_eq!(SignatureSize::covering(0).pages(), 4);
        assert_eq!(SignatureSize::covering(1).pages(), 4);
        assert_eq!(SignatureSize::covering(10).pages(), 12);
        assert_eq!(SignatureSize::covering(16).pages(), 16);
    }

    #[test]
    fn test_round_up() {
        assert_eq!(round_up(0, 4), 0);
        assert_eq!(round_up(5, 4), 8);
        assert_eq!(round_up(8, 8), 8);
    }
}
