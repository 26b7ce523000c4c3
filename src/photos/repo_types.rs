use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates::iso_date;

/// A progress photo; the image itself lives in object storage under `s3_key`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PhotoLog {
    pub id: Uuid,
    pub client_id: Uuid,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(skip)]
    pub s3_key: String,
    pub content_type: String,
    pub notes: Option<String>,
    pub coach_note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
