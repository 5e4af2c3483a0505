use crate::api::error::ApiError;
use crate::api::AppState;
use crate::models::{Mode, ProcessResponse, UploadedFile};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    routing::post,
    Json, Router,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/process", post(process_file))
}

/// `POST /api/process`: multipart form with a `file` part and a `mode` field.
#[tracing::instrument(skip(state, multipart))]
async fn process_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let mut multipart = multipart?;
    let (file, mode) = read_form(&mut multipart).await?;

    let mode = mode.ok_or_else(|| ApiError::InvalidArgument("missing 'mode' field".to_string()))?;
    let file = file.ok_or_else(|| ApiError::InvalidArgument("missing 'file' part".to_string()))?;

    if file.is_empty() {
        return Err(ApiError::InvalidArgument("uploaded file is empty".to_string()));
    }

    if file.len() > state.max_upload_bytes {
        return Err(ApiError::PayloadTooLarge);
    }

    let response = state.service.process(file, mode).await?;
    Ok(Json(response))
}

/// Reads the whole form. A bad mode is rejected as soon as it is seen.
async fn read_form(multipart: &mut Multipart) -> Result<(Option<UploadedFile>, Option<Mode>), ApiError> {
    let mut file = None;
    let mut mode = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;

                tracing::debug!(
                    file_name = file_name.as_deref().unwrap_or("<unnamed>"),
                    content_type = content_type.as_deref().unwrap_or("<none>"),
                    bytes = data.len(),
                    "received file part"
                );

                file = Some(UploadedFile::new(file_name, content_type, data));
            }
            Some("mode") => {
                let value = field.text().await?;
                mode = Some(value.parse::<Mode>()?);
            }
            other => {
                tracing::debug!(field = other.unwrap_or("<unnamed>"), "ignoring form field");
            }
        }
    }

    Ok((file, mode))
}
