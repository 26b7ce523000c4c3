use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates::iso_date;

/// Weekly questionnaire answers, keyed by the first day of the week they cover.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: Uuid,
    pub client_id: Uuid,
    #[serde(with = "iso_date")]
    pub week_of: Date,
    pub form_json: Value,
    pub coach_note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
