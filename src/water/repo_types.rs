use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates::iso_date;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WaterLog {
    pub id: Uuid,
    pub client_id: Uuid,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub amount_ml: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Water logged over a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct WaterTotals {
    pub count: i64,
    pub total_ml: i64,
}
