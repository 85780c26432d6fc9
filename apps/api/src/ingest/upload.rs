//! Uploaded bytes to document text.

use tracing::debug;

use crate::ingest::extractor::ExtractError;

const PDF_MAGIC: &[u8] = b"%PDF-";
const UTF8_BOM: char = '\u{feff}';

/// PDF bytes go through `pdf-extract`; anything else is read as (lossy) UTF-8.
/// CPU-bound for PDFs: call from `spawn_blocking`.
pub fn document_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let text = if bytes.starts_with(PDF_MAGIC) {
        debug!("Extracting text from {} byte PDF", bytes.len());
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::Unreadable(e.to_string()))?
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };

    let text = text.trim_start_matches(UTF8_BOM).to_string();
    if text.trim().is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let text = document_text("\u{feff}# Jane\n## Skills".as_bytes()).unwrap();
        assert_eq!(text, "# Jane\n## Skills");
    }

    #[test]
    fn test_blank_upload_is_empty() {
        assert!(matches!(document_text(b"  \n\t"), Err(ExtractError::Empty)));
        assert!(matches!(document_text(b""), Err(ExtractError::Empty)));
    }
}
