use serde::Serialize;
use uuid::Uuid;

use super::stats::{ComplianceSummary, WeeklyRecap};
use crate::auth::repo_types::ClientProfile;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientWeeklyResponse {
    #[serde(flatten)]
    pub recap: WeeklyRecap,
    pub water_count: i64,
    pub water_total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&ClientProfile> for ClientRef {
    fn from(p: &ClientProfile) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            email: p.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummaryRow {
    #[serde(flatten)]
    pub client: ClientRef,
    #[serde(flatten)]
    pub summary: ComplianceSummary,
    pub calories_target: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ClientWeeklyRow {
    #[serde(flatten)]
    pub client: ClientRef,
    #[serde(flatten)]
    pub recap: WeeklyRecap,
}

#[derive(Debug, Serialize)]
pub struct ClientsResponse<T> {
    pub clients: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub missed: Vec<ClientRef>,
}
