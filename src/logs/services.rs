use serde::Serialize;
use sqlx::PgPool;
use time::Date;
use tracing::{info, instrument};
use uuid::Uuid;

use super::compliance::{classify, derive_status};
use super::reconcile::{reconcile, validate_items, ConsumptionItem, Reconciliation};
use super::repo::{self, NewMealLog};
use super::repo_types::{ComplianceStatus, MealStatus};
use crate::error::{AppError, AppResult};
use crate::plans::repo as plans_repo;

/// A client's report of one plan meal on one date.
#[derive(Debug, Clone)]
pub struct PlanMealSubmission {
    pub client_id: Uuid,
    pub date: Date,
    pub meal_id: Uuid,
    pub status: Option<MealStatus>,
    pub items: Vec<ConsumptionItem>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLog {
    pub log_id: Uuid,
    pub compliance_status: ComplianceStatus,
    /// False when no assignment of the meal's plan covered the date and the
    /// meal was recorded as an extra.
    pub planned: bool,
}

/// Saves a plan-meal log: reconcile, classify, upsert, replace items, all in
/// one transaction. Saving again for the same meal and date overwrites.
#[instrument(skip(db, submission), fields(client_id = %submission.client_id, meal_id = %submission.meal_id))]
pub async fn save_plan_meal_log(
    db: &PgPool,
    submission: PlanMealSubmission,
) -> AppResult<SavedLog> {
    validate_items(&submission.items)?;

    let mut tx = db.begin().await?;

    let found = plans_repo::find_meal(&mut tx, submission.meal_id)
        .await?
        .ok_or(AppError::NotFound("Meal plan meal"))?;
    let assignment = plans_repo::current_for_plan(
        &mut tx,
        submission.client_id,
        found.meal_plan_id,
        submission.date,
    )
    .await?;

    let meal = &found.meal;
    let saved = match assignment {
        Some(assignment) => {
            let r = reconcile(&meal.foods, &submission.items)?;
            let compliance = classify(Some(r.planned_total), Some(r.consumed_total));
            let status = submission.status.unwrap_or_else(|| derive_status(&r.items));
            let header = NewMealLog {
                client_id: submission.client_id,
                date: submission.date,
                assignment_id: Some(assignment.id),
                day_id: Some(meal.meal_plan_day_id),
                meal_id: Some(meal.id),
                name: meal.name.as_str(),
                status,
                planned_total: Some(r.planned_total),
                consumed_total: Some(r.consumed_total),
                compliance,
            };
            let log_id = repo::upsert_plan_log(&mut tx, &header).await?;
            repo::replace_items(&mut tx, log_id, &r.items).await?;
            SavedLog {
                log_id,
                compliance_status: compliance,
                planned: true,
            }
        }
        None => {
            // Outside any assignment of this plan: nothing to measure against.
            let r = reconcile(&[], &submission.items)?;
            let status = submission.status.unwrap_or_else(|| derive_status(&r.items));
            let log_id = write_extra(
                &mut tx,
                submission.client_id,
                submission.date,
                meal.name.as_str(),
                status,
                &r,
            )
            .await?;
            SavedLog {
                log_id,
                compliance_status: ComplianceStatus::Unknown,
                planned: false,
            }
        }
    };

    tx.commit().await?;
    info!(log_id = %saved.log_id, compliance = ?saved.compliance_status, "meal log saved");
    Ok(saved)
}

/// A meal eaten outside the plan.
#[derive(Debug, Clone)]
pub struct ExtraMealSubmission {
    pub client_id: Uuid,
    pub date: Date,
    pub name: String,
    pub items: Vec<ConsumptionItem>,
}

#[instrument(skip(db, submission), fields(client_id = %submission.client_id))]
pub async fn log_extra_meal(db: &PgPool, submission: ExtraMealSubmission) -> AppResult<Uuid> {
    if submission.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if submission.items.is_empty() {
        return Err(AppError::Validation("at least one item is required".into()));
    }
    validate_items(&submission.items)?;
    if let Some(i) = submission
        .items
        .iter()
        .position(|i| i.unit.as_deref().map_or(true, |u| u.trim().is_empty()))
    {
        return Err(AppError::Validation(format!("items[{i}].unit is required")));
    }

    let r = reconcile(&[], &submission.items)?;
    let mut tx = db.begin().await?;
    let log_id = write_extra(
        &mut tx,
        submission.client_id,
        submission.date,
        submission.name.trim(),
        MealStatus::Eaten,
        &r,
    )
    .await?;
    tx.commit().await?;

    info!(%log_id, "extra meal logged");
    Ok(log_id)
}

async fn write_extra(
    conn: &mut sqlx::PgConnection,
    client_id: Uuid,
    date: Date,
    name: &str,
    status: MealStatus,
    r: &Reconciliation,
) -> AppResult<Uuid> {
    let header = NewMealLog {
        client_id,
        date,
        assignment_id: None,
        day_id: None,
        meal_id: None,
        name,
        status,
        planned_total: None,
        consumed_total: Some(r.consumed_total),
        compliance: ComplianceStatus::Unknown,
    };
    let log_id = repo::insert_extra_log(conn, &header).await?;
    repo::replace_items(conn, log_id, &r.items).await?;
    Ok(log_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use time::macros::date;

    fn item(name: &str, calories: Option<i32>) -> ConsumptionItem {
        ConsumptionItem {
            meal_plan_food_id: None,
            name: name.into(),
            consumed_quantity: Some(1.0),
            unit: Some("pc".into()),
            calories,
            protein: None,
            carbs: None,
            fats: None,
        }
    }

    // The fake pool never connects, so these only pass if validation runs
    // before the store is touched.
    #[tokio::test]
    async fn invalid_plan_items_rejected_before_store() {
        let state = AppState::fake();
        let err = save_plan_meal_log(
            &state.db,
            PlanMealSubmission {
                client_id: Uuid::new_v4(),
                date: date!(2024 - 05 - 01),
                meal_id: Uuid::new_v4(),
                status: None,
                items: vec![item("Oats", Some(300)), item("Eggs", Some(-10))],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn extra_meal_requires_name_items_and_units() {
        let state = AppState::fake();
        let base = ExtraMealSubmission {
            client_id: Uuid::new_v4(),
            date: date!(2024 - 05 - 01),
            name: "Late snack".into(),
            items: vec![item("Chips", Some(150))],
        };

        let mut no_name = base.clone();
        no_name.name = "  ".into();
        assert!(matches!(
            log_extra_meal(&state.db, no_name).await,
            Err(AppError::Validation(_))
        ));

        let mut no_items = base.clone();
        no_items.items.clear();
        assert!(matches!(
            log_extra_meal(&state.db, no_items).await,
            Err(AppError::Validation(_))
        ));

        let mut no_unit = base;
        no_unit.items[0].unit = None;
        let err = log_extra_meal(&state.db, no_unit).await.unwrap_err();
        assert!(err.to_string().contains("items[0].unit"));
    }

    #[tokio::test]
    async fn extra_meal_totals_must_fit_before_store() {
        let state = AppState::fake();
        let err = log_extra_meal(
            &state.db,
            ExtraMealSubmission {
                client_id: Uuid::new_v4(),
                date: date!(2024 - 05 - 01),
                name: "Feast".into(),
                items: vec![item("A", Some(2_000_000_000)), item("B", Some(2_000_000_000))],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
