//! File upload, listing, download and delete handlers.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use filedrop_core::{FileId, FileSummary, validate_filename};
use filedrop_storage::StorageError;
use futures::TryStreamExt;
use serde::Serialize;

/// Multipart field carrying the uploaded file.
const UPLOAD_FIELD: &str = "file";

/// Upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: FileId,
    pub filename: String,
    pub path: String,
}

/// List response.
#[derive(Debug, Serialize)]
pub struct ListFilesResponse {
    pub files: Vec<FileSummary>,
}

/// Plain message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// A decoded upload: the client's filename and the raw bytes.
#[derive(Debug)]
pub struct UploadRequest {
    pub filename: String,
    pub bytes: Bytes,
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::BadRequest(format!("invalid multipart payload: {}", e.body_text()))
    }
}

/// Pull the `file` field out of a multipart body.
async fn read_upload(mut multipart: Multipart) -> ApiResult<UploadRequest> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| ApiError::BadRequest("file field has no filename".to_string()))?;
        validate_filename(&filename)?;

        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(UploadRequest { filename, bytes });
    }

    Err(ApiError::BadRequest(format!(
        "missing multipart field `{UPLOAD_FIELD}`"
    )))
}

fn parse_file_id(raw: &str) -> ApiResult<FileId> {
    raw.parse::<i64>()
        .map(FileId::new)
        .map_err(|_| ApiError::BadRequest(format!("invalid file id: {raw}")))
}

fn not_in_database() -> ApiError {
    ApiError::NotFound("File not found in database".to_string())
}

fn not_on_server() -> ApiError {
    ApiError::NotFound("File not found on server".to_string())
}

/// Build a `Content-Disposition: attachment` value for an arbitrary filename.
///
/// The quoted `filename` parameter is restricted to printable ASCII; the
/// exact name travels in the RFC 5987 `filename*` parameter.
fn attachment_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    let mut encoded = String::with_capacity(filename.len());
    for byte in filename.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'!' | b'#' | b'$' | b'&' | b'+' | b'-'
            | b'.' | b'^' | b'_' | b'`' | b'|' | b'~' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

/// POST /upload - Store a file and record it.
///
/// The file write and the record insert are not transactional: if the insert
/// fails the bytes stay on disk without a record.
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let upload = read_upload(multipart).await?;
    let size = upload.bytes.len() as u64;

    let path = state.storage.save(&upload.filename, upload.bytes).await?;
    let path = path.to_string_lossy().into_owned();

    let id = state.metadata.insert_file(&upload.filename, &path).await?;

    crate::metrics::FILES_UPLOADED.inc();
    crate::metrics::BYTES_UPLOADED.inc_by(size);
    tracing::info!(
        file_id = %id,
        filename = %upload.filename,
        path = %path,
        size,
        "File uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            id,
            filename: upload.filename,
            path,
        }),
    ))
}

/// GET /files - List every file record.
pub async fn list_files(State(state): State<AppState>) -> ApiResult<Json<ListFilesResponse>> {
    let files = state.metadata.list_files().await?;
    Ok(Json(ListFilesResponse { files }))
}

/// GET /files/{id} - Stream a file back as an attachment.
pub async fn download_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_file_id(&file_id)?;

    let record = state
        .metadata
        .get_file(id)
        .await?
        .ok_or_else(not_in_database)?;

    let blob = match state
        .storage
        .read_stream(std::path::Path::new(&record.filepath))
        .await
    {
        Ok(blob) => blob,
        Err(StorageError::NotFound(_)) => {
            tracing::warn!(
                file_id = %id,
                filepath = %record.filepath,
                "File record exists but file is missing on disk"
            );
            return Err(not_on_server());
        }
        Err(e) => return Err(e.into()),
    };

    crate::metrics::FILES_DOWNLOADED.inc();

    let body_stream = blob
        .stream
        .map_err(|e| std::io::Error::other(e.to_string()));

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "application/octet-stream".to_string()),
            (CONTENT_LENGTH, blob.size.to_string()),
            (CONTENT_DISPOSITION, attachment_disposition(&record.filename)),
        ],
        Body::from_stream(body_stream),
    )
        .into_response())
}

/// DELETE /files/{id} - Remove a file and its record.
///
/// If the file exists but cannot be removed, the request fails and the record
/// is kept. A file that is already missing does not block deleting the record.
pub async fn delete_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_file_id(&file_id)?;

    let record = state
        .metadata
        .get_file(id)
        .await?
        .ok_or_else(not_in_database)?;
    let path = std::path::Path::new(&record.filepath);

    if state.storage.exists(path).await? {
        match state.storage.remove(path).await {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => {
                tracing::error!(
                    file_id = %id,
                    filepath = %record.filepath,
                    error = %e,
                    "Failed to remove file, keeping record"
                );
                return Err(ApiError::Internal(format!("Failed to delete file: {e}")));
            }
        }
    }

    state.metadata.delete_file(id).await?;

    crate::metrics::FILES_DELETED.inc();
    tracing::info!(file_id = %id, filename = %record.filename, "File deleted");

    Ok(Json(MessageResponse {
        message: "File deleted successfully".to_string(),
    }))
}
