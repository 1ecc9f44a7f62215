//! Document I/O operations for imposition
//!
//! Input is read completely before imposition starts, which makes even a
//! pipe re-readable. Output is written in one piece after imposition
//! succeeded.

use crate::types::*;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Read a document from `path`, or from stdin when `None`
pub async fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => Ok(tokio::fs::read(path).await?),
        None => {
            let mut bytes = Vec::new();
            tokio::io::stdin().read_to_end(&mut bytes).await?;
            Ok(bytes)
        }
    }
}

/// Write a document to `path`, or to stdout when `None`
pub async fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => tokio::fs::write(path, bytes).await?,
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(bytes).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}
