mod constants;
pub mod document;
pub mod impose;
mod options;
pub mod slots;
mod stats;
mod types;

pub use document::{DscDocument, PageStream, PdfDocument};
pub use impose::{impose, impose_bytes, impose_pages, read_input, scan_statistics, write_output};
pub use options::*;
pub use slots::{
    PageIndex, SignatureSize, Slot, SlotSequence, compute_slots, impose_slots, logical_page,
    padded_count,
};
pub use stats::calculate_statistics;
pub use types::*;
