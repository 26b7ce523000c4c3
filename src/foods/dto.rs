use serde::{Deserialize, Serialize};

use super::repo_types::Food;
use super::scoring::{MacroTarget, ScoredFood};
use super::usda::FoodHit;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativesRequest {
    #[serde(flatten)]
    pub target: MacroTarget,
    pub tolerance_calories: Option<f64>,
    pub limit: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct AlternativesResponse {
    pub items: Vec<ScoredFood>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FoodSearchQuery {
    pub q: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSource {
    Local,
    Usda,
}

impl FoodSearchQuery {
    /// Anything but `usda` (any case) searches the local catalogue.
    pub fn source(&self) -> SearchSource {
        match self.source.as_deref() {
            Some(s) if s.eq_ignore_ascii_case("usda") => SearchSource::Usda,
            _ => SearchSource::Local,
        }
    }

    pub fn term(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FoodItems {
    Local(Vec<Food>),
    Usda(Vec<FoodHit>),
}

#[derive(Debug, Serialize)]
pub struct FoodSearchResponse {
    pub items: FoodItems,
}
