//! Multipart document upload.

use std::path::Path;

use paya_core::StoredFile;
use reqwest::multipart::{Form, Part};
use reqwest::Method;

use crate::error::ApiError;
use crate::types::UploadEnvelope;

use super::MerchantClient;

/// Reads a file from disk into a multipart part named after the file.
pub(crate) async fn file_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "document".to_string(), |n| n.to_string_lossy().into_owned());
    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime_for(path))?;
    Ok(part)
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

impl MerchantClient {
    /// Uploads one onboarding document and returns the server's descriptor.
    ///
    /// `document_type` is the slot key (e.g. `cr12`, `photoIdFront`) and
    /// `category` is `business` or `director`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Io`] if the file cannot be read.
    /// - [`ApiError::Unauthorized`] on 401, [`ApiError::Api`] on any other
    ///   non-2xx status.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the response has no `file` descriptor.
    pub async fn upload_business_document(
        &self,
        path: &Path,
        document_type: &str,
        category: &str,
    ) -> Result<StoredFile, ApiError> {
        let form = Form::new()
            .part("document", file_part(path).await?)
            .text("documentType", document_type.to_string())
            .text("category", category.to_string());

        let url = self.endpoint(&["uploads", "business-doc"])?;
        let request = self.request(Method::POST, url).multipart(form);
        let envelope: UploadEnvelope = self
            .send_json(request, "POST /uploads/business-doc")
            .await?;

        tracing::info!(
            document_type,
            category,
            filename = envelope.file.filename.as_deref().unwrap_or_default(),
            "document uploaded"
        );
        Ok(envelope.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_is_derived_from_extension() {
        assert_eq!(mime_for(Path::new("cert.PDF")), "application/pdf");
        assert_eq!(mime_for(Path::new("selfie.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("notes")), "application/octet-stream");
    }
}
