//! PDF text layer extraction using pdf-extract.

use tracing::debug;

use super::Result;
use crate::error::SourceError;

/// Extract the embedded text of a PDF held in memory.
///
/// Scanned PDFs without a text layer come back empty; the caller decides
/// what that means.
pub fn extract_text(data: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| SourceError::Pdf(e.to_string()))?;

    debug!("PDF text layer: {} characters", text.len());
    Ok(text)
}
