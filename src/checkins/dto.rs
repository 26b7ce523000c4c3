use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::CheckIn;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckInRequest {
    pub client_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub week_of: OffsetDateTime,
    pub form_json: Map<String, Value>,
    #[serde(default)]
    pub coach_note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInsResponse {
    pub check_ins: Vec<CheckIn>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub check_in: CheckIn,
}
