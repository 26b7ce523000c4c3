use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Where a catalogue food came from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "food_source", rename_all = "UPPERCASE")]
pub enum FoodOrigin {
    Local,
    Usda,
}

/// A catalogue food; macros are per serving.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub source: FoodOrigin,
    pub serving_size: f64,
    pub serving_unit: String,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
}
