//! Text extraction for uploaded resumes (PDF or plain text).

pub mod handlers;

use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF";

/// What the uploader told us about the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadHints<'a> {
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Failed to extract text from PDF")]
    Pdf(String),

    #[error("Failed to extract text from PDF")]
    Aborted(String),
}

impl ExtractionError {
    pub fn details(&self) -> &str {
        match self {
            ExtractionError::Pdf(d) | ExtractionError::Aborted(d) => d,
        }
    }
}

/// PDF by declared content type, `.pdf` extension, or the `%PDF` magic bytes.
pub fn is_pdf(data: &[u8], hints: UploadHints<'_>) -> bool {
    let declared = hints
        .content_type
        .is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf"));
    let named = hints
        .file_name
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"));
    declared || named || data.starts_with(PDF_MAGIC)
}

/// Returns the text content of an uploaded file.
///
/// PDF parsing is CPU-bound and runs on the blocking pool. Anything that is not
/// a PDF is decoded as UTF-8, replacing invalid sequences.
pub async fn extract_text(data: Vec<u8>, hints: UploadHints<'_>) -> Result<String, ExtractionError> {
    if !is_pdf(&data, hints) {
        debug!("Decoding {} bytes as text", data.len());
        return Ok(String::from_utf8_lossy(&data).into_owned());
    }

    debug!("Extracting text from {} byte PDF", data.len());
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| ExtractionError::Aborted(e.to_string()))?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_detection() {
        let none = UploadHints::default();
        assert!(is_pdf(b"%PDF-1.7\n...", none));
        assert!(!is_pdf(b"plain resume", none));
        assert!(is_pdf(
            b"",
            UploadHints {
                file_name: Some("CV.PDF"),
                content_type: None
            }
        ));
        assert!(is_pdf(
            b"",
            UploadHints {
                file_name: None,
                content_type: Some("application/pdf")
            }
        ));
        assert!(!is_pdf(
            b"hello",
            UploadHints {
                file_name: Some("resume.txt"),
                content_type: Some("text/plain")
            }
        ));
    }

    #[tokio::test]
    async fn test_plain_text_is_returned_verbatim() {
        let text = "Jane Park\nSenior Engineer, 7 years of Rust and Go";
        let extracted = extract_text(text.as_bytes().to_vec(), UploadHints::default())
            .await
            .unwrap();
        assert_eq!(extracted, text);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let extracted = extract_text(vec![b'o', b'k', 0xff], UploadHints::default())
            .await
            .unwrap();
        assert_eq!(extracted, "ok\u{fffd}");
    }

    #[tokio::test]
    async fn test_broken_pdf_is_an_error() {
        let result = extract_text(b"%PDF-1.4 not really a pdf".to_vec(), UploadHints::default()).await;
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Failed to extract text from PDF");
        assert!(!err.details().is_empty());
    }
}
