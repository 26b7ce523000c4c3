use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates::iso_date;

/// Client-declared outcome of a meal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "meal_status", rename_all = "UPPERCASE")]
pub enum MealStatus {
    Planned,
    Eaten,
    Skipped,
}

/// How consumed calories compared with planned calories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "compliance_status", rename_all = "UPPERCASE")]
pub enum ComplianceStatus {
    Unknown,
    Under,
    Met,
    Over,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MealLog {
    pub id: Uuid,
    pub client_id: Uuid,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub meal_plan_assignment_id: Option<Uuid>,
    pub meal_plan_day_id: Option<Uuid>,
    pub meal_plan_meal_id: Option<Uuid>,
    pub name: String,
    pub status: MealStatus,
    pub planned_calories_total: Option<i32>,
    pub consumed_calories_total: Option<i32>,
    pub compliance_status: ComplianceStatus,
    pub coach_note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[sqlx(skip)]
    pub items: Vec<MealLogItem>,
}

/// One food of a meal log: what was planned (absent for extras) and what was
/// actually eaten.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MealLogItem {
    pub id: Uuid,
    pub meal_log_id: Uuid,
    pub meal_plan_food_id: Option<Uuid>,
    pub name: String,
    pub planned_quantity: Option<f64>,
    pub planned_unit: Option<String>,
    pub planned_calories: Option<i32>,
    pub planned_protein: Option<i32>,
    pub planned_carbs: Option<i32>,
    pub planned_fats: Option<i32>,
    pub consumed_quantity: Option<f64>,
    pub consumed_calories: Option<i32>,
    pub consumed_protein: Option<i32>,
    pub consumed_carbs: Option<i32>,
    pub consumed_fats: Option<i32>,
    pub is_extra: bool,
}

/// The fields the summaries read from a meal log.
#[derive(Debug, Clone, FromRow)]
pub struct LogFact {
    pub client_id: Uuid,
    pub date: Date,
    pub consumed_calories_total: Option<i32>,
    pub compliance_status: ComplianceStatus,
}
