//! Plain-text extraction from uploaded documents.
//!
//! PDF uploads are parsed structurally and their embedded text content is
//! pulled out; anything else is decoded as UTF-8 text. Extraction must yield
//! a non-empty string for summarization to proceed.

use thiserror::Error;

/// Media type treated as a portable-document upload.
const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Errors raised while deriving text from an uploaded document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Extraction succeeded but produced no text to summarize.
    #[error("No text extracted from document")]
    EmptyDocument,
    /// PDF structure could not be parsed.
    #[error("Failed to parse PDF document: {0}")]
    Pdf(#[from] pdf_extract::OutputError),
}

/// Derive trimmed plain text from raw document bytes.
///
/// The declared media type selects the decoding path: `application/pdf`
/// goes through structural PDF extraction, everything else through a lossy
/// UTF-8 decode. An empty result is an error, not an empty success.
pub fn extract_text(bytes: &[u8], media_type: Option<&str>) -> Result<String, ExtractionError> {
    let text = if is_pdf(media_type) {
        tracing::debug!(bytes = bytes.len(), "Extracting text from PDF upload");
        pdf_extract::extract_text_from_mem(bytes)?
    } else {
        tracing::debug!(bytes = bytes.len(), "Decoding upload as plain text");
        String::from_utf8_lossy(bytes).into_owned()
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }
    Ok(trimmed.to_string())
}

fn is_pdf(media_type: Option<&str>) -> bool {
    // Tolerate parameters such as `application/pdf; charset=binary`.
    media_type
        .map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .eq_ignore_ascii_case(PDF_MEDIA_TYPE)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_text_and_trims() {
        let text = extract_text(b"  Patient is stable.\n", Some("text/plain")).expect("text");
        assert_eq!(text, "Patient is stable.");
    }

    #[test]
    fn missing_media_type_defaults_to_plain_text() {
        let text = extract_text(b"hello", None).expect("text");
        assert_eq!(text, "hello");
    }

    #[test]
    fn empty_upload_is_rejected() {
        assert!(matches!(
            extract_text(b"", Some("text/plain")),
            Err(ExtractionError::EmptyDocument)
        ));
    }

    #[test]
    fn whitespace_only_upload_is_rejected() {
        assert!(matches!(
            extract_text(b"   \n\t  ", Some("text/plain")),
            Err(ExtractionError::EmptyDocument)
        ));
    }

    #[test]
    fn pdf_media_type_matching_ignores_parameters_and_case() {
        assert!(is_pdf(Some("application/pdf")));
        assert!(is_pdf(Some("Application/PDF; charset=binary")));
        assert!(!is_pdf(Some("text/plain")));
        assert!(!is_pdf(None));
    }

    #[test]
    fn invalid_utf8_decodes_lossily_instead_of_failing() {
        let text = extract_text(&[0x68, 0x69, 0xFF], Some("text/plain")).expect("text");
        assert!(text.starts_with("hi"));
    }
}
