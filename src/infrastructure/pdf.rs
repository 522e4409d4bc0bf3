use crate::domain::DomainError;

/// Extracts the text layer from PDF bytes. `pdf_extract` is CPU-bound, so
/// the work runs on the blocking pool.
///
/// PDFs with no extractable text (scanned images, encrypted files) come back
/// as a validation error rather than an empty document.
pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String, DomainError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| DomainError::internal(format!("PDF extraction task failed: {e}")))?
        .map_err(|e| DomainError::validation(format!("Could not read PDF: {e}")))?;

    if text.trim().is_empty() {
        return Err(DomainError::validation(
            "PDF contains no extractable text (it may be image-based or encrypted)",
        ));
    }

    Ok(text)
}
