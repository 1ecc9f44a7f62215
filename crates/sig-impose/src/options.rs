use crate::slots::SignatureSize;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Imposition configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImpositionOptions {
    /// Pages per signature; `None` folds the whole document as one signature
    pub signature: Option<usize>,

    /// Input format; `None` detects it from the document
    pub format: Option<DocumentFormat>,

    /// Suppress per-page progress output
    pub quiet: bool,
}

impl ImpositionOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ImposeError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ImposeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        self.signature_size().map(|_| ())
    }

    /// The explicit signature size, validated
    pub fn signature_size(&self) -> Result<Option<SignatureSize>> {
        self.signature.map(SignatureSize::try_from).transpose()
    }

    /// Resolve the document format, falling back to detection
    pub fn resolve_format(&self, bytes: &[u8]) -> Result<DocumentFormat> {
        match self.format {
            Some(format) => Ok(format),
            None => DocumentFormat::detect(bytes).ok_or(ImposeError::UnknownFormat),
        }
    }
}
