use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, instrument};

use super::dto::{
    AlternativesRequest, AlternativesResponse, FoodItems, FoodSearchQuery, FoodSearchResponse,
    SearchSource,
};
use super::repo;
use super::scoring::{calorie_window, clamp_limit, rank};
use crate::{error::AppResult, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(search_foods))
        .route("/foods/alternatives", post(alternatives))
}

/// GET /foods?q&source=local|usda
#[instrument(skip(state))]
pub async fn search_foods(
    State(state): State<AppState>,
    Query(q): Query<FoodSearchQuery>,
) -> AppResult<Json<FoodSearchResponse>> {
    let term = q.term();
    let items = match q.source() {
        _ if term.is_empty() => FoodItems::Local(Vec::new()),
        SearchSource::Usda => FoodItems::Usda(state.food_source.search(term).await?),
        SearchSource::Local => FoodItems::Local(repo::search_local(&state.db, term).await?),
    };
    Ok(Json(FoodSearchResponse { items }))
}

/// POST /foods/alternatives; an absent or unreadable body ranks without a target.
#[instrument(skip(state, body))]
pub async fn alternatives(
    State(state): State<AppState>,
    body: Option<Json<AlternativesRequest>>,
) -> AppResult<Json<AlternativesResponse>> {
    let req = body.map(|Json(b)| b).unwrap_or_default();
    let (min, max) = calorie_window(req.target.calories, req.tolerance_calories);

    let candidates = repo::candidates_in_range(&state.db, min, max).await?;
    debug!(min, max, candidates = candidates.len(), "alternative candidates");

    let items = rank(candidates, &req.target, clamp_limit(req.limit));
    Ok(Json(AlternativesResponse { items }))
}
