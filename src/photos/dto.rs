use serde::{Deserialize, Serialize};

use super::services::PhotoLogView;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoLogsResponse {
    pub photo_logs: Vec<PhotoLogView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoLogResponse {
    pub photo_log: PhotoLogView,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoNoteRequest {
    #[serde(default)]
    pub coach_note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}
