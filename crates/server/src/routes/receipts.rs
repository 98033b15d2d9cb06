use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;
use crate::uploads;

/// Values for the expense form, pre-filled from the scanned receipt.
#[derive(Debug, Serialize)]
pub struct ReceiptPrefill {
    /// Name the upload was stored under.
    pub filename: String,
    pub raw_text: String,
    pub amount: Option<String>,
    pub date: Option<String>,
}

pub async fn upload_receipt(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ReceiptPrefill>, ApiError> {
    let (filename, data) = read_file_field(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".into()))?;

    if filename.trim().is_empty() {
        return Err(ApiError::BadRequest("No selected file".into()));
    }
    let ext = uploads::allowed_extension(&filename)
        .ok_or_else(|| ApiError::UnsupportedMediaType("Unsupported file type".into()))?;

    let path = state.uploads.save(&ext, &data).await?;
    tracing::info!(original = %filename, stored = %path.display(), bytes = data.len(), "receipt uploaded");

    let result = state.ocr.extract(&path).await?;

    Ok(Json(ReceiptPrefill {
        filename: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        raw_text: result.raw_text,
        amount: result.amount,
        date: result.date,
    }))
}

/// The client-side file name and body of the first `file` field.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<(String, Bytes)>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(multipart_error)?;
        return Ok(Some((filename, data)));
    }
    Ok(None)
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge("Uploaded file is too large".into());
    }
    tracing::debug!(error = %e, "malformed multipart body");
    ApiError::BadRequest("Malformed upload".into())
}
