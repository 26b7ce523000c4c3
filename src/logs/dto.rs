use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::reconcile::ConsumptionItem;
use super::repo_types::{MealLog, MealStatus};
use crate::plans::repo_types::{Assignment, PlanDay};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePlanMealLogRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub meal_plan_meal_id: Uuid,
    /// Derived from the items when omitted.
    pub status: Option<MealStatus>,
    #[serde(default)]
    pub items: Vec<ConsumptionItem>,
}

/// The day a client should be eating, with what they logged so far.
#[derive(Debug, Serialize)]
pub struct DayLogsResponse {
    pub assignment: Option<Assignment>,
    pub day: Option<PlanDay>,
    pub logs: Vec<MealLog>,
}

#[derive(Debug, Serialize)]
pub struct MealLogsResponse {
    pub meals: Vec<MealLog>,
}

/// A food of an extra meal; everything is required since there is no plan to
/// fall back on.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtraMealItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
}

impl From<ExtraMealItem> for ConsumptionItem {
    fn from(i: ExtraMealItem) -> Self {
        ConsumptionItem {
            meal_plan_food_id: None,
            name: i.name,
            consumed_quantity: Some(i.quantity),
            unit: Some(i.unit),
            calories: Some(i.calories),
            protein: Some(i.protein),
            carbs: Some(i.carbs),
            fats: Some(i.fats),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExtraMealRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub name: String,
    pub items: Vec<ExtraMealItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLogResponse {
    pub log_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachNoteRequest {
    #[serde(default)]
    pub coach_note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}
