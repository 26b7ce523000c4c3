use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use bytes::Bytes;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{OkResponse, PhotoLogResponse, PhotoLogsResponse, PhotoNoteRequest};
use super::repo;
use super::services::{upload_photo, with_urls, PhotoUpload};
use crate::{
    auth::{
        access::{resolve_client_id, ClientQuery},
        extractors::AuthUser,
    },
    dates::day_or_today,
    error::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/photo-logs", get(list_photo_logs).post(create_photo_log))
        .route("/photo-logs/:id", patch(update_photo_note))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// GET /photo-logs?clientId
#[instrument(skip(state))]
pub async fn list_photo_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<ClientQuery>,
) -> AppResult<Json<PhotoLogsResponse>> {
    let client_id = resolve_client_id(&state.db, &user, q.client_id).await?;
    let logs = repo::list_photo_logs(&state.db, client_id).await?;
    let photo_logs = with_urls(&state, logs).await?;
    Ok(Json(PhotoLogsResponse { photo_logs }))
}

/// Fields of the upload form besides the image.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<(Bytes, String)>,
    date: Option<OffsetDateTime>,
    notes: Option<String>,
    client_id: Option<Uuid>,
}

async fn read_form(mut mp: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();
    while let Some(field) = mp.next_field().await.map_err(bad_form)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let content_type = field
                    .content_type()
                    .map(str::to_owned)
                    .unwrap_or_else(|| "application/octet-stream".into());
                let data = field.bytes().await.map_err(bad_form)?;
                form.file = Some((data, content_type));
            }
            Some("date") => {
                let raw = field.text().await.map_err(bad_form)?;
                let parsed = OffsetDateTime::parse(raw.trim(), &Rfc3339)
                    .map_err(|_| AppError::BadRequest("date must be an RFC 3339 timestamp".into()))?;
                form.date = Some(parsed);
            }
            Some("notes") => form.notes = Some(field.text().await.map_err(bad_form)?),
            Some("clientId") => {
                let raw = field.text().await.map_err(bad_form)?;
                let id = Uuid::parse_str(raw.trim())
                    .map_err(|_| AppError::BadRequest("clientId must be a UUID".into()))?;
                form.client_id = Some(id);
            }
            _ => {}
        }
    }
    Ok(form)
}

fn bad_form(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(e.to_string())
}

/// POST /photo-logs (multipart: file, date?, notes?, clientId?)
#[instrument(skip(state, mp))]
pub async fn create_photo_log(
    State(state): State<AppState>,
    user: AuthUser,
    mp: Multipart,
) -> AppResult<(StatusCode, Json<PhotoLogResponse>)> {
    let form = read_form(mp).await?;
    let (body, content_type) = form
        .file
        .ok_or_else(|| AppError::BadRequest("file is required".into()))?;
    let client_id = resolve_client_id(&state.db, &user, form.client_id).await?;

    let photo_log = upload_photo(
        &state,
        PhotoUpload {
            client_id,
            date: day_or_today(form.date),
            notes: form.notes,
            body,
            content_type,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(PhotoLogResponse { photo_log })))
}

/// PATCH /photo-logs/:id
#[instrument(skip(state, body))]
pub async fn update_photo_note(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    AppJson(body): AppJson<PhotoNoteRequest>,
) -> AppResult<Json<OkResponse>> {
    let coach_id = user.require_coach()?;
    let note = body
        .coach_note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    if !repo::set_coach_note(&state.db, id, coach_id, note).await? {
        return Err(AppError::NotFound("Photo log"));
    }
    info!(photo_id = %id, %coach_id, "photo note updated");
    Ok(Json(OkResponse { ok: true }))
}
