use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::WorkoutLog;

/// `details` must be a JSON object; anything else fails deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutLogRequest {
    pub client_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub title: String,
    pub details: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutLogsResponse {
    pub workouts: Vec<WorkoutLog>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutLogResponse {
    pub workout: WorkoutLog,
}
