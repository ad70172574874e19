//! HTTP API handlers for rcx-da

pub mod deals;
pub mod documents;
pub mod health;
pub mod rune;

pub use deals::deal_routes;
pub use documents::document_routes;
pub use health::health_routes;
pub use rune::rune_routes;

use axum::extract::Multipart;

use crate::error::{ApiError, ApiResult};
use crate::services::Upload;

/// Read the `file` field out of a multipart upload
///
/// Uploads without a `file` field, or with a malformed multipart body,
/// are validation failures.
pub(crate) async fn read_upload(mut multipart: Multipart) -> ApiResult<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .unwrap_or("document")
            .to_string();
        let content_type = field.content_type().map(String::from);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Failed to read upload: {}", e)))?;

        return Ok(Upload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(ApiError::Validation(
        "Missing multipart field 'file'".to_string(),
    ))
}
