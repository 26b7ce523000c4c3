use std::collections::HashMap;

use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use time::Date;
use uuid::Uuid;

use super::reconcile::ReconciledItem;
use crate::dates::Window;
use super::repo_types::{ComplianceStatus, LogFact, MealLog, MealLogItem, MealStatus};

const LOG_COLUMNS: &str = r#"
    id, client_id, date, meal_plan_assignment_id, meal_plan_day_id, meal_plan_meal_id,
    name, status, planned_calories_total, consumed_calories_total, compliance_status,
    coach_note, created_at, updated_at
"#;

/// Log header as computed by the engine.
#[derive(Debug, Clone)]
pub struct NewMealLog<'a> {
    pub client_id: Uuid,
    pub date: Date,
    pub assignment_id: Option<Uuid>,
    pub day_id: Option<Uuid>,
    pub meal_id: Option<Uuid>,
    pub name: &'a str,
    pub status: MealStatus,
    pub planned_total: Option<i32>,
    pub consumed_total: Option<i32>,
    pub compliance: ComplianceStatus,
}

/// Inserts or updates the log keyed by (client, date, plan meal). The
/// assignment and day stay as first recorded.
pub async fn upsert_plan_log(
    conn: &mut PgConnection,
    log: &NewMealLog<'_>,
) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO meal_logs (
            id, client_id, date, meal_plan_assignment_id, meal_plan_day_id, meal_plan_meal_id,
            name, status, planned_calories_total, consumed_calories_total, compliance_status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (client_id, date, meal_plan_meal_id) DO UPDATE SET
            status = EXCLUDED.status,
            planned_calories_total = EXCLUDED.planned_calories_total,
            consumed_calories_total = EXCLUDED.consumed_calories_total,
            compliance_status = EXCLUDED.compliance_status,
            updated_at = now()
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(log.client_id)
    .bind(log.date)
    .bind(log.assignment_id)
    .bind(log.day_id)
    .bind(log.meal_id)
    .bind(log.name)
    .bind(log.status)
    .bind(log.planned_total)
    .bind(log.consumed_total)
    .bind(log.compliance)
    .fetch_one(&mut *conn)
    .await
    .context("upsert meal log")?;
    Ok(id)
}

/// Inserts a log that is not tied to any plan meal.
pub async fn insert_extra_log(
    conn: &mut PgConnection,
    log: &NewMealLog<'_>,
) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO meal_logs (
            id, client_id, date, name, status,
            planned_calories_total, consumed_calories_total, compliance_status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(log.client_id)
    .bind(log.date)
    .bind(log.name)
    .bind(log.status)
    .bind(log.planned_total)
    .bind(log.consumed_total)
    .bind(log.compliance)
    .fetch_one(&mut *conn)
    .await
    .context("insert extra meal log")?;
    Ok(id)
}

/// Drops every item of the log and writes `items` in their place.
pub async fn replace_items(
    conn: &mut PgConnection,
    log_id: Uuid,
    items: &[ReconciledItem],
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM meal_log_items WHERE meal_log_id = $1")
        .bind(log_id)
        .execute(&mut *conn)
        .await
        .context("delete meal log items")?;

    for item in items {
        sqlx::query(
            r#"
            INSERT INTO meal_log_items (
                id, meal_log_id, meal_plan_food_id, name,
                planned_quantity, planned_unit, planned_calories, planned_protein,
                planned_carbs, planned_fats,
                consumed_quantity, consumed_calories, consumed_protein,
                consumed_carbs, consumed_fats, is_extra
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(log_id)
        .bind(item.meal_plan_food_id)
        .bind(&item.name)
        .bind(item.planned_quantity)
        .bind(&item.planned_unit)
        .bind(item.planned_calories)
        .bind(item.planned_protein)
        .bind(item.planned_carbs)
        .bind(item.planned_fats)
        .bind(item.consumed_quantity)
        .bind(item.consumed_calories)
        .bind(item.consumed_protein)
        .bind(item.consumed_carbs)
        .bind(item.consumed_fats)
        .bind(item.is_extra)
        .execute(&mut *conn)
        .await
        .context("insert meal log item")?;
    }
    Ok(())
}

/// Logs of a client, newest first, optionally limited to one date and to a
/// set of plan meals.
pub async fn list_logs(
    db: &PgPool,
    client_id: Uuid,
    date: Option<Date>,
    meal_ids: Option<&[Uuid]>,
) -> Result<Vec<MealLog>, sqlx::Error> {
    let mut logs = sqlx::query_as::<_, MealLog>(&format!(
        r#"
        SELECT {LOG_COLUMNS}
        FROM meal_logs
        WHERE client_id = $1
          AND ($2::date IS NULL OR date = $2)
          AND ($3::uuid[] IS NULL OR meal_plan_meal_id = ANY($3))
        ORDER BY date DESC, created_at ASC
        "#
    ))
    .bind(client_id)
    .bind(date)
    .bind(meal_ids)
    .fetch_all(db)
    .await?;

    if logs.is_empty() {
        return Ok(logs);
    }

    let ids: Vec<Uuid> = logs.iter().map(|l| l.id).collect();
    let items = sqlx::query_as::<_, MealLogItem>(
        r#"
        SELECT id, meal_log_id, meal_plan_food_id, name,
               planned_quantity, planned_unit, planned_calories, planned_protein,
               planned_carbs, planned_fats,
               consumed_quantity, consumed_calories, consumed_protein,
               consumed_carbs, consumed_fats, is_extra
        FROM meal_log_items
        WHERE meal_log_id = ANY($1)
        ORDER BY is_extra ASC, name ASC
        "#,
    )
    .bind(&ids)
    .fetch_all(db)
    .await?;

    let mut by_log: HashMap<Uuid, Vec<MealLogItem>> = HashMap::new();
    for item in items {
        by_log.entry(item.meal_log_id).or_default().push(item);
    }
    for log in &mut logs {
        log.items = by_log.remove(&log.id).unwrap_or_default();
    }
    Ok(logs)
}

/// Sets the coach note on a log of one of the coach's clients. Returns false
/// when no such log exists.
pub async fn set_coach_note(
    db: &PgPool,
    log_id: Uuid,
    coach_id: Uuid,
    note: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE meal_logs l
           SET coach_note = $3, updated_at = now()
          FROM client_profiles c
         WHERE l.id = $1 AND c.id = l.client_id AND c.coach_id = $2
        "#,
    )
    .bind(log_id)
    .bind(coach_id)
    .bind(note)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Summary inputs for the given clients dated inside `window`.
pub async fn facts_in(
    db: &PgPool,
    client_ids: &[Uuid],
    window: Window,
) -> Result<Vec<LogFact>, sqlx::Error> {
    sqlx::query_as::<_, LogFact>(
        r#"
        SELECT client_id, date, consumed_calories_total, compliance_status
        FROM meal_logs
        WHERE client_id = ANY($1) AND date BETWEEN $2 AND $3
        ORDER BY date DESC
        "#,
    )
    .bind(client_ids)
    .bind(window.start)
    .bind(window.end)
    .fetch_all(db)
    .await
}
