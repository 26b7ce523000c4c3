use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::WaterLog;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWaterLogRequest {
    pub client_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub amount_ml: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterLogsResponse {
    pub water_logs: Vec<WaterLog>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterLogResponse {
    pub water_log: WaterLog,
}
