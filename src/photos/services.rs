use anyhow::Context;
use bytes::Bytes;
use serde::Serialize;
use time::Date;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::repo::{self, NewPhotoLog};
use super::repo_types::PhotoLog;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Lifetime of the presigned URLs handed out with photo listings.
pub const URL_TTL_SECS: u64 = 30 * 60;

pub struct PhotoUpload {
    pub client_id: Uuid,
    pub date: Date,
    pub notes: Option<String>,
    pub body: Bytes,
    pub content_type: String,
}

#[derive(Debug, Serialize)]
pub struct PhotoLogView {
    #[serde(flatten)]
    pub log: PhotoLog,
    pub url: String,
}

/// Stores the image, then records it. The object is removed again when the
/// row cannot be written.
#[instrument(skip(st, upload), fields(client_id = %upload.client_id, size = upload.body.len()))]
pub async fn upload_photo(st: &AppState, upload: PhotoUpload) -> AppResult<PhotoLogView> {
    if upload.body.is_empty() {
        return Err(AppError::Validation("file is empty".into()));
    }
    let ext = ext_from_mime(&upload.content_type).ok_or_else(|| {
        AppError::Validation(format!("unsupported image type {}", upload.content_type))
    })?;

    let id = Uuid::new_v4();
    let key = format!("photos/{}/{}.{}", upload.client_id, id, ext);
    st.storage
        .put_object(&key, upload.body, &upload.content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;

    let notes = upload
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let row = NewPhotoLog {
        id,
        client_id: upload.client_id,
        date: upload.date,
        s3_key: &key,
        content_type: &upload.content_type,
        notes,
    };
    let log = match repo::insert_photo_log(&st.db, &row).await {
        Ok(log) => log,
        Err(e) => {
            if let Err(cleanup) = st.storage.delete_object(&key).await {
                warn!(error = %cleanup, %key, "orphaned photo object");
            }
            return Err(e.into());
        }
    };
    info!(photo_id = %id, %key, "photo uploaded");

    let url = presign(st, &log.s3_key).await?;
    Ok(PhotoLogView { log, url })
}

pub async fn with_urls(st: &AppState, logs: Vec<PhotoLog>) -> anyhow::Result<Vec<PhotoLogView>> {
    let mut out = Vec::with_capacity(logs.len());
    for log in logs {
        let url = presign(st, &log.s3_key).await?;
        out.push(PhotoLogView { log, url });
    }
    Ok(out)
}

async fn presign(st: &AppState, s3_key: &str) -> anyhow::Result<String> {
    st.storage
        .presign_get(s3_key, URL_TTL_SECS)
        .await
        .with_context(|| format!("presign url for s3_key {}", s3_key))
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::date, OffsetDateTime};

    fn log(key: &str) -> PhotoLog {
        PhotoLog {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            date: date!(2024 - 05 - 01),
            s3_key: key.into(),
            content_type: "image/png".into(),
            notes: None,
            coach_note: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn maps_image_mime_types() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(ext_from_mime("application/pdf"), None);
    }

    #[tokio::test]
    async fn listing_attaches_presigned_urls() {
        let state = AppState::fake();
        let views = with_urls(&state, vec![log("photos/a/1.png"), log("photos/a/2.png")])
            .await
            .unwrap();
        assert_eq!(views.len(), 2);
        assert!(views[0].url.ends_with("photos/a/1.png"));
        assert!(views[1].url.ends_with("photos/a/2.png"));

        let json = serde_json::to_value(&views[0]).unwrap();
        assert!(json.get("s3Key").is_none());
        assert!(json.get("url").is_some());
    }

    #[tokio::test]
    async fn rejects_non_images_before_upload() {
        let state = AppState::fake();
        let err = upload_photo(
            &state,
            PhotoUpload {
                client_id: Uuid::new_v4(),
                date: date!(2024 - 05 - 01),
                notes: None,
                body: Bytes::from_static(b"%PDF"),
                content_type: "application/pdf".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
