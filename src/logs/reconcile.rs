//! Turns what a client says they ate into log items, measured against the
//! foods planned for the meal.

use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::plans::repo_types::PlannedFood;

/// One submitted food. Referencing a planned food makes it a planned item;
/// macros given explicitly override the planned ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionItem {
    pub meal_plan_food_id: Option<Uuid>,
    pub name: String,
    pub consumed_quantity: Option<f64>,
    pub unit: Option<String>,
    pub calories: Option<i32>,
    pub protein: Option<i32>,
    pub carbs: Option<i32>,
    pub fats: Option<i32>,
}

/// A log item ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledItem {
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

#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub items: Vec<ReconciledItem>,
    /// Sum of the meal's planned calories, whatever was submitted.
    pub planned_total: i32,
    /// Sum of consumed calories over every item, extras included.
    pub consumed_total: i32,
}

/// Rejects the whole submission if any item is malformed.
pub fn validate_items(items: &[ConsumptionItem]) -> Result<(), AppError> {
    for (i, item) in items.iter().enumerate() {
        if item.name.trim().is_empty() {
            return Err(AppError::Validation(format!("items[{i}].name is required")));
        }
        if let Some(q) = item.consumed_quantity {
            if !q.is_finite() || q <= 0.0 {
                return Err(AppError::Validation(format!(
                    "items[{i}].consumedQuantity must be positive"
                )));
            }
        }
        for (field, value) in [
            ("calories", item.calories),
            ("protein", item.protein),
            ("carbs", item.carbs),
            ("fats", item.fats),
        ] {
            if value.is_some_and(|v| v < 0) {
                return Err(AppError::Validation(format!(
                    "items[{i}].{field} must not be negative"
                )));
            }
        }
    }
    Ok(())
}

/// Fails only when a scaled macro or a total does not fit in a stored INT.
pub fn reconcile(
    planned: &[PlannedFood],
    items: &[ConsumptionItem],
) -> Result<Reconciliation, AppError> {
    let items = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let food = item
                .meal_plan_food_id
                .and_then(|id| planned.iter().find(|f| f.id == id));
            match food {
                Some(food) => planned_item(i, food, item),
                None => Ok(extra_item(item)),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let planned_total = total(planned.iter().map(|f| f.calories), "planned calories")?;
    let consumed_total = total(
        items.iter().filter_map(|i| i.consumed_calories),
        "consumed calories",
    )?;

    Ok(Reconciliation {
        items,
        planned_total,
        consumed_total,
    })
}

fn total(values: impl Iterator<Item = i32>, what: &str) -> Result<i32, AppError> {
    let sum: i64 = values.map(i64::from).sum();
    i32::try_from(sum).map_err(|_| AppError::Validation(format!("{what} total is too large")))
}

fn planned_item(
    i: usize,
    food: &PlannedFood,
    item: &ConsumptionItem,
) -> Result<ReconciledItem, AppError> {
    // Each macro is scaled and rounded on its own; the rounded macros need not
    // add up to the rounded calories.
    let factor = match item.consumed_quantity {
        Some(q) if food.quantity > 0.0 => q / food.quantity,
        _ => 1.0,
    };
    let scaled = |field: &str, explicit: Option<i32>, planned: i32| -> Result<Option<i32>, AppError> {
        if let Some(v) = explicit {
            return Ok(Some(v));
        }
        let v = (f64::from(planned) * factor).round();
        if (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&v) {
            Ok(Some(v as i32))
        } else {
            Err(AppError::Validation(format!("items[{i}].{field} is too large")))
        }
    };

    Ok(ReconciledItem {
        meal_plan_food_id: Some(food.id),
        name: item.name.trim().to_string(),
        planned_quantity: Some(food.quantity),
        planned_unit: Some(food.unit.clone()),
        planned_calories: Some(food.calories),
        planned_protein: Some(food.protein),
        planned_carbs: Some(food.carbs),
        planned_fats: Some(food.fats),
        consumed_quantity: item.consumed_quantity.or(Some(food.quantity)),
        consumed_calories: scaled("calories", item.calories, food.calories)?,
        consumed_protein: scaled("protein", item.protein, food.protein)?,
        consumed_carbs: scaled("carbs", item.carbs, food.carbs)?,
        consumed_fats: scaled("fats", item.fats, food.fats)?,
        is_extra: false,
    })
}

fn extra_item(item: &ConsumptionItem) -> ReconciledItem {
    ReconciledItem {
        meal_plan_food_id: None,
        name: item.name.trim().to_string(),
        planned_quantity: None,
        planned_unit: item.unit.clone(),
        planned_calories: None,
        planned_protein: None,
        planned_carbs: None,
        planned_fats: None,
        consumed_quantity: item.consumed_quantity,
        consumed_calories: item.calories,
        consumed_protein: item.protein,
        consumed_carbs: item.carbs,
        consumed_fats: item.fats,
        is_extra: true,
    }
}
