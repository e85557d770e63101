//! Document Extractor: turns an uploaded PDF into ordered plain text.
//!
//! Pages are read one at a time with `lopdf` so a page that fails to decode only
//! costs its own segment. When every page comes back empty the whole document is
//! re-read with `pdf-extract`, which copes with some font encodings `lopdf` does not.
//! Failure is fatal only at the document level (unreadable, corrupt, encrypted).

use bytes::Bytes;
use lopdf::Document;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;

/// A PDF supplied by the caller. Not retained beyond the request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub bytes: Bytes,
    pub file_name: Option<String>,
}

impl UploadedDocument {
    pub fn new(bytes: impl Into<Bytes>, file_name: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name,
        }
    }
}

/// Plain text of a document, page order preserved.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
    /// Pages the per-page pass found no text on. Not revised when the
    /// whole-document fallback supplies the text.
    pub empty_pages: usize,
}

/// Extracts text from every page of `document`, in page order.
pub fn extract(document: &UploadedDocument) -> Result<ExtractedText, AppError> {
    if document.bytes.is_empty() {
        return Err(AppError::MissingInput("Uploaded document is empty".to_string()));
    }

    let doc = Document::load_mem(&document.bytes)
        .map_err(|e| AppError::DocumentParse(format!("Not a readable PDF: {e}")))?;

    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(AppError::DocumentParse(
            "Encrypted PDFs are not supported".to_string(),
        ));
    }

    // BTreeMap keyed by page number, so iteration is in document order.
    let pages = doc.get_pages();
    let page_count = pages.len();

    let mut text = String::new();
    let mut empty_pages = 0;

    for &page_number in pages.keys() {
        let segment = match doc.extract_text(&[page_number]) {
            Ok(segment) => segment,
            Err(e) => {
                warn!("Page {page_number}: text extraction failed, treating as empty: {e}");
                String::new()
            }
        };

        if segment.trim().is_empty() {
            empty_pages += 1;
            continue;
        }

        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&segment);
    }

    if page_count > 0 && empty_pages == page_count {
        text = fall_back_if_blank(text, || extract_whole_document(&document.bytes));
    }

    info!(
        "Extracted {} chars from {} pages ({} empty){}",
        text.len(),
        page_count,
        empty_pages,
        document
            .file_name
            .as_deref()
            .map(|name| format!(" of '{name}'"))
            .unwrap_or_default()
    );

    Ok(ExtractedText {
        text,
        page_count,
        empty_pages,
    })
}

/// Runs `extract` on the blocking pool. A panic inside the PDF libraries is
/// reported as a parse failure of the document.
pub async fn extract_blocking(document: UploadedDocument) -> Result<ExtractedText, AppError> {
    tokio::task::spawn_blocking(move || extract(&document))
        .await
        .map_err(|e| AppError::DocumentParse(format!("PDF extraction aborted: {e}")))?
}

/// Replaces blank per-page text with the whole-document reading, when there is one.
fn fall_back_if_blank(text: String, whole_document: impl FnOnce() -> Option<String>) -> String {
    if !text.trim().is_empty() {
        return text;
    }
    match whole_document() {
        Some(fallback) => {
            debug!("Per-page extraction was empty; using whole-document fallback");
            fallback
        }
        None => text,
    }
}

fn extract_whole_document(bytes: &[u8]) -> Option<String> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    match result {
        Ok(Ok(text)) if !text.trim().is_empty() => Some(text),
        Ok(Ok(_)) => None,
        Ok(Err(e)) => {
            debug!("Whole-document fallback failed: {e}");
            None
        }
        Err(_) => {
            warn!("Whole-document fallback panicked");
            None
        }
    }
}
