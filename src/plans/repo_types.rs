use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates::iso_date;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "plan_status", rename_all = "UPPERCASE")]
pub enum PlanStatus {
    Draft,
    Active,
    Archived,
}

/// Slot of a meal within a day; a day holds at most one of each.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "meal_name")]
pub enum MealName {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealName::Breakfast => "Breakfast",
            MealName::Lunch => "Lunch",
            MealName::Dinner => "Dinner",
            MealName::Snack => "Snack",
        }
    }
}

/// A food the coach planned, with macros for the planned quantity.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlannedFood {
    pub id: Uuid,
    pub meal_plan_meal_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlanMeal {
    pub id: Uuid,
    pub meal_plan_day_id: Uuid,
    pub name: MealName,
    pub time_label: Option<String>,
    pub sort_order: i32,
    #[sqlx(skip)]
    pub foods: Vec<PlannedFood>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlanDay {
    pub id: Uuid,
    pub meal_plan_id: Uuid,
    pub day_index: i32,
    pub title: String,
    #[sqlx(skip)]
    pub meals: Vec<PlanMeal>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: Uuid,
    pub coach_id: Uuid,
    pub name: String,
    pub status: PlanStatus,
    #[sqlx(skip)]
    pub days: Vec<PlanDay>,
}

/// Binding of a plan to a client over `[start_date, end_date]`; an absent
/// end date leaves the assignment open.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub meal_plan_id: Uuid,
    pub client_id: Uuid,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date::option")]
    pub end_date: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Assignment {
    pub fn covers(&self, date: Date) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| date <= end)
    }
}

/// A meal looked up on its own, with the ids needed to key its log.
#[derive(Debug, Clone)]
pub struct MealWithPlan {
    pub meal: PlanMeal,
    pub meal_plan_id: Uuid,
}
