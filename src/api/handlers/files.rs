//! File listing, upload and deletion handlers

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{debug, info};

use crate::api::extract::{ApiPath, ApiQuery};
use crate::api::types::{optional, required, FileDeleteQuery, SubjectQuery, SuccessResponse};
use crate::api::AppState;
use crate::error::{Error, Result};
use crate::types::{FileRecord, NewFile};

/// Uploader recorded when the form does not name one
pub const DEFAULT_UPLOADER: &str = "Unknown";

pub async fn list_files(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SubjectQuery>,
) -> Result<Json<Vec<FileRecord>>> {
    let subject = required(query.subject, "subject")?;
    let files = state.db().list_files(&subject)?;
    Ok(Json(files))
}

/// Accept a multipart form with a `file` part plus `subject` and `uploader`
pub async fn upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<FileRecord>> {
    let mut multipart = multipart?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut subject: Option<String> = None;
    let mut uploader: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Multipart error: {}", e)))?
    {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("file") => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::Validation(format!("Read error: {}", e)))?;
                file = Some((original_name, bytes.to_vec()));
            }
            Some("subject") => {
                subject = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| Error::Validation(format!("Read error: {}", e)))?,
                );
            }
            Some("uploader") => {
                uploader = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| Error::Validation(format!("Read error: {}", e)))?,
                );
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    let (original_name, bytes) = file.ok_or_else(|| Error::missing("file"))?;
    let subject = required(subject, "subject")?;
    let uploader = optional(uploader).unwrap_or_else(|| DEFAULT_UPLOADER.to_string());

    let stored_path = state.uploads().save(&original_name, &bytes).await?;

    let record = NewFile {
        subject,
        original_name,
        stored_path: stored_path.clone(),
        uploader,
    };
    let record = match state.db().store_file_metadata(&record) {
        Ok(record) => record,
        Err(err) => {
            state.uploads().remove_detached(state.tasks(), stored_path);
            return Err(err);
        }
    };
    info!(
        "Stored {} ({} bytes) for {} as file {}",
        record.original_name,
        bytes.len(),
        record.subject,
        record.id
    );
    Ok(Json(record))
}

/// Delete a file if the requesting user uploaded it or is the admin.
///
/// The stored object is removed in the background and the response does not
/// wait for it.
pub async fn delete_file(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<FileDeleteQuery>,
) -> Result<Json<SuccessResponse>> {
    let user = required(query.user, "user")?;
    let removed = state.db().delete_file(id, &user)?;
    info!("{} deleted file {} ({})", user, id, removed.original_name);

    state
        .uploads()
        .remove_detached(state.tasks(), removed.stored_path);
    Ok(Json(SuccessResponse::ok()))
}
