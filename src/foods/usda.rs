//! Lookup against the USDA FoodData Central search API.

use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::config::UsdaConfig;
use crate::error::AppError;

const SEARCH_URL: &str = "https://api.nal.usda.gov/fdc/v1/foods/search";
const PAGE_SIZE: &str = "20";

const NUTRIENT_KCAL: i64 = 1008;
const NUTRIENT_PROTEIN: i64 = 1003;
const NUTRIENT_CARBS: i64 = 1005;
const NUTRIENT_FAT: i64 = 1004;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("USDA API key not configured")]
    NotConfigured,
    #[error("USDA request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("USDA search failed with status {0}")]
    Status(u16),
}

impl From<UpstreamError> for AppError {
    fn from(e: UpstreamError) -> Self {
        let message = e.to_string();
        match e {
            UpstreamError::NotConfigured => AppError::BadRequest(message),
            UpstreamError::Request(_) | UpstreamError::Status(_) => AppError::Upstream(message),
        }
    }
}

/// A food as reported by an external database. Missing nutrients stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodHit {
    pub name: String,
    pub brand: Option<String>,
    pub source: &'static str,
    pub serving_size: f64,
    pub serving_unit: String,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
}

#[async_trait]
pub trait FoodSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<FoodHit>, UpstreamError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<UsdaFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsdaFood {
    description: Option<String>,
    brand_owner: Option<String>,
    serving_size: Option<f64>,
    serving_size_unit: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<UsdaNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsdaNutrient {
    nutrient_id: Option<i64>,
    value: Option<f64>,
}

impl UsdaFood {
    fn nutrient(&self, id: i64) -> Option<f64> {
        self.food_nutrients
            .iter()
            .find(|n| n.nutrient_id == Some(id))
            .and_then(|n| n.value)
    }
}

impl From<UsdaFood> for FoodHit {
    fn from(f: UsdaFood) -> Self {
        FoodHit {
            calories: f.nutrient(NUTRIENT_KCAL),
            protein: f.nutrient(NUTRIENT_PROTEIN),
            carbs: f.nutrient(NUTRIENT_CARBS),
            fats: f.nutrient(NUTRIENT_FAT),
            name: f.description.unwrap_or_else(|| "Unknown food".into()),
            brand: f.brand_owner,
            source: "USDA",
            serving_size: f.serving_size.unwrap_or(100.0),
            serving_unit: f.serving_size_unit.unwrap_or_else(|| "g".into()),
        }
    }
}

pub struct UsdaClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl UsdaClient {
    pub fn new(cfg: &UsdaConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build USDA http client")?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl FoodSource for UsdaClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<FoodHit>, UpstreamError> {
        let api_key = self.api_key.as_deref().ok_or(UpstreamError::NotConfigured)?;

        let response = self
            .http
            .get(SEARCH_URL)
            .query(&[("query", query), ("pageSize", PAGE_SIZE), ("api_key", api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "USDA search failed");
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.foods.into_iter().map(FoodHit::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn picks_nutrients_by_id() {
        let body: SearchResponse = serde_json::from_value(serde_json::json!({
            "foods": [{
                "description": "Oats, rolled",
                "brandOwner": "Acme",
                "servingSize": 40.0,
                "servingSizeUnit": "g",
                "foodNutrients": [
                    {"nutrientId": 1003, "value": 13.2},
                    {"nutrientId": 1008, "value": 379.0},
                    {"nutrientId": 1004, "value": 6.5},
                    {"nutrientId": 9999, "value": 1.0}
                ]
            }]
        }))
        .unwrap();
        let hit = FoodHit::from(body.foods.into_iter().next().unwrap());
        assert_eq!(hit.name, "Oats, rolled");
        assert_eq!(hit.brand.as_deref(), Some("Acme"));
        assert_eq!(hit.calories, Some(379.0));
        assert_eq!(hit.protein, Some(13.2));
        assert_eq!(hit.fats, Some(6.5));
        assert_eq!(hit.carbs, None);
        assert_eq!(hit.serving_size, 40.0);
    }

    #[test]
    fn fills_defaults_for_sparse_entries() {
        let body: SearchResponse =
            serde_json::from_value(serde_json::json!({ "foods": [{}] })).unwrap();
        let hit = FoodHit::from(body.foods.into_iter().next().unwrap());
        assert_eq!(hit.name, "Unknown food");
        assert_eq!(hit.serving_size, 100.0);
        assert_eq!(hit.serving_unit, "g");
        assert_eq!(hit.calories, None);

        let empty: SearchResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(empty.foods.is_empty());
    }

    #[tokio::test]
    async fn refuses_without_api_key() {
        let client = UsdaClient::new(&UsdaConfig {
            api_key: None,
            timeout_secs: 1,
        })
        .unwrap();
        let err = client.search("oats").await.unwrap_err();
        assert!(matches!(err, UpstreamError::NotConfigured));
        assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_failures_map_to_bad_gateway() {
        assert_eq!(
            AppError::from(UpstreamError::Status(500)).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
