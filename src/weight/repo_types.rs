use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates::iso_date;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WeightLog {
    pub id: Uuid,
    pub client_id: Uuid,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub weight_kg: f64,
    pub body_fat_pct: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated measurement ready to store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewWeightLog {
    pub date: Date,
    pub weight_kg: f64,
    pub body_fat_pct: Option<f64>,
}
