use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImposeError {
    #[error("Signature size must be positive and divisible by 4 (got {0})")]
    InvalidSignature(i64),
    #[error("Page count must not be negative (got {0})")]
    InvalidPageCount(i64),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Unrecognised document format (expected PostScript or PDF)")]
    UnknownFormat,
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
    #[error("Page {index} out of range (document has {pages} pages)")]
    PageOutOfRange { index: usize, pages: usize },
    #[error("Document must be scanned before pages are written")]
    NotScanned,
}

pub type Result<T> = std::result::Result<T, ImposeError>;

/// Structured document formats the imposer can reorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DocumentFormat {
    /// PostScript following the Document Structuring Conventions
    PostScript,
    Pdf,
}

impl DocumentFormat {
    /// Guess the format from the leading bytes of a document
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        // Some PostScript drivers prepend a PJL/ctrl-D preamble
        let start = bytes
            .iter()
            .position(|&b| b == b'%')
            .filter(|&pos| pos <= 16)?;
        let head = &bytes[start..];
        if head.starts_with(b"%PDF-") {
            Some(DocumentFormat::Pdf)
        } else if head.starts_with(b"%!") {
            Some(DocumentFormat::PostScript)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DocumentFormat::PostScript => "PostScript",
            DocumentFormat::Pdf => "PDF",
        }
    }
}

/// Statistics about the imposition
#[derive(Debug, Clone, PartialEq)]
pub struct ImpositionStatistics {
    /// Total number of source pages
    pub source_pages: usize,
    /// Pages folded together per signature
    pub signature_size: usize,
    /// Number of signatures
    pub signatures: usize,
    /// Folded sheets in each signature
    pub sheets_per_signature: usize,
    /// Total number of physical sheets
    pub output_sheets: usize,
    /// Output page count (physical slots)
    pub output_pages: usize,
    /// Number of blank pages added for padding
    pub blank_pages_added: usize,
}

/// Result of a complete imposition run
#[derive(Debug, Clone)]
pub struct ImposedDocument {
    /// The reordered document, ready to be written out
    pub bytes: Vec<u8>,
    pub format: DocumentFormat,
    pub statistics: ImpositionStatistics,
}
