use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Assignment, MealPlan};

/// `?date=<rfc3339>&clientId=<uuid>`; both optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateQuery {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentWithPlan {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub meal_plan: MealPlan,
}

#[derive(Debug, Serialize)]
pub struct CurrentAssignmentResponse {
    pub assignment: Option<AssignmentWithPlan>,
}
