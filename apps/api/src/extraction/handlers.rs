use axum::{extract::Multipart, Json};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{extract_text, UploadHints};

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
}

/// POST /extract-text
pub async fn handle_extract_text(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;

        info!(
            "Processing file: {}, type: {}, size: {}",
            file_name.as_deref().unwrap_or("<unnamed>"),
            content_type.as_deref().unwrap_or("<unknown>"),
            data.len()
        );

        let hints = UploadHints {
            file_name: file_name.as_deref(),
            content_type: content_type.as_deref(),
        };
        let text = extract_text(data.to_vec(), hints)
            .await
            .map_err(|e| AppError::Extraction {
                message: e.to_string(),
                details: e.details().to_string(),
            })?;

        info!("Extraction successful. Length: {}", text.len());
        return Ok(Json(ExtractResponse { text }));
    }

    Err(AppError::Validation("No valid file provided".to_string()))
}
