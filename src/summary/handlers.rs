use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::dto::{
    AlertsResponse, ClientRef, ClientSummaryRow, ClientWeeklyResponse, ClientWeeklyRow,
    ClientsResponse,
};
use super::stats::{self, ComplianceSummary};
use crate::{
    auth::{access::client_profile_id, extractors::AuthUser, repo_types::ClientProfile},
    dates::{today, Window},
    error::AppResult,
    logs::{repo::facts_in, repo_types::LogFact},
    state::AppState,
    water::repo::totals_in,
};

const CLIENT_SUMMARY_DAYS: u32 = 14;
const WEEK_DAYS: u32 = 7;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meal-logs/summary", get(my_summary))
        .route("/meal-logs/weekly", get(my_weekly))
        .route("/clients/summary", get(clients_summary))
        .route("/clients/weekly", get(clients_weekly))
        .route("/clients/alerts", get(clients_alerts))
}

/// GET /meal-logs/summary
#[instrument(skip(state))]
pub async fn my_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ComplianceSummary>> {
    let user_id = user.require_client()?;
    let client_id = client_profile_id(&state.db, user_id).await?;

    let today = today();
    let window = Window::ending(today, CLIENT_SUMMARY_DAYS);
    let facts = facts_in(&state.db, &[client_id], window).await?;
    Ok(Json(stats::compliance_summary(client_id, &facts, today)))
}

/// GET /meal-logs/weekly
#[instrument(skip(state))]
pub async fn my_weekly(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ClientWeeklyResponse>> {
    let user_id = user.require_client()?;
    let client_id = client_profile_id(&state.db, user_id).await?;

    let window = Window::ending(today(), WEEK_DAYS);
    let facts = facts_in(&state.db, &[client_id], window).await?;
    let water = totals_in(&state.db, client_id, window).await?;

    Ok(Json(ClientWeeklyResponse {
        recap: stats::weekly_recap(&facts),
        water_count: water.count,
        water_total: water.total_ml,
    }))
}

/// Roster of the coach plus every log fact of the last `days` days.
async fn roster_with_facts(
    state: &AppState,
    coach_id: Uuid,
    days: u32,
) -> AppResult<(Vec<ClientProfile>, Vec<LogFact>)> {
    let clients = ClientProfile::list_for_coach(&state.db, coach_id).await?;
    if clients.is_empty() {
        return Ok((clients, Vec::new()));
    }
    let ids: Vec<Uuid> = clients.iter().map(|c| c.id).collect();
    let facts = facts_in(&state.db, &ids, Window::ending(today(), days)).await?;
    debug!(%coach_id, clients = clients.len(), facts = facts.len(), "roster loaded");
    Ok((clients, facts))
}

/// GET /clients/summary
#[instrument(skip(state))]
pub async fn clients_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ClientsResponse<ClientSummaryRow>>> {
    let coach_id = user.require_coach()?;
    let (clients, facts) = roster_with_facts(&state, coach_id, WEEK_DAYS).await?;

    let mut summaries = stats::summaries_by_client(&facts, today());
    let clients = clients
        .iter()
        .map(|c| ClientSummaryRow {
            client: ClientRef::from(c),
            summary: summaries.remove(&c.id).unwrap_or_default(),
            calories_target: c.calories_target,
        })
        .collect();
    Ok(Json(ClientsResponse { clients }))
}

/// GET /clients/weekly
#[instrument(skip(state))]
pub async fn clients_weekly(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ClientsResponse<ClientWeeklyRow>>> {
    let coach_id = user.require_coach()?;
    let (clients, facts) = roster_with_facts(&state, coach_id, WEEK_DAYS).await?;

    let mut recaps = stats::recaps_by_client(&facts);
    let clients = clients
        .iter()
        .map(|c| ClientWeeklyRow {
            client: ClientRef::from(c),
            recap: recaps.remove(&c.id).unwrap_or_default(),
        })
        .collect();
    Ok(Json(ClientsResponse { clients }))
}

/// GET /clients/alerts: clients with no meal log today.
#[instrument(skip(state))]
pub async fn clients_alerts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<AlertsResponse>> {
    let coach_id = user.require_coach()?;
    let (clients, facts) = roster_with_facts(&state, coach_id, 1).await?;

    let ids: Vec<Uuid> = clients.iter().map(|c| c.id).collect();
    let missing = stats::missing_today(&ids, &facts, today());
    let missed = clients
        .iter()
        .filter(|c| missing.contains(&c.id))
        .map(ClientRef::from)
        .collect();
    Ok(Json(AlertsResponse { missed }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::{Principal, Role};
    use crate::error::AppError;

    fn as_role(role: Role) -> AuthUser {
        AuthUser(Principal {
            user_id: Uuid::new_v4(),
            role,
        })
    }

    #[tokio::test]
    async fn coach_routes_reject_clients() {
        let state = AppState::fake();
        let err = clients_alerts(State(state.clone()), as_role(Role::Client))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        let err = clients_summary(State(state), as_role(Role::Client))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn client_routes_reject_coaches() {
        let state = AppState::fake();
        let err = my_summary(State(state), as_role(Role::Coach))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }
}
