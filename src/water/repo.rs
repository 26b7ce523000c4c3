use anyhow::Context;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::{WaterLog, WaterTotals};
use crate::dates::Window;

pub async fn insert_water_log(
    db: &PgPool,
    client_id: Uuid,
    date: Date,
    amount_ml: i32,
) -> anyhow::Result<WaterLog> {
    sqlx::query_as::<_, WaterLog>(
        r#"
        INSERT INTO water_logs (id, client_id, date, amount_ml)
        VALUES ($1, $2, $3, $4)
        RETURNING id, client_id, date, amount_ml, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(client_id)
    .bind(date)
    .bind(amount_ml)
    .fetch_one(db)
    .await
    .context("insert water log")
}

/// Newest first, optionally limited to one date.
pub async fn list_water_logs(
    db: &PgPool,
    client_id: Uuid,
    date: Option<Date>,
) -> Result<Vec<WaterLog>, sqlx::Error> {
    sqlx::query_as::<_, WaterLog>(
        r#"
        SELECT id, client_id, date, amount_ml, created_at
          FROM water_logs
         WHERE client_id = $1
           AND ($2::date IS NULL OR date = $2)
         ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(client_id)
    .bind(date)
    .fetch_all(db)
    .await
}

pub async fn totals_in(
    db: &PgPool,
    client_id: Uuid,
    window: Window,
) -> Result<WaterTotals, sqlx::Error> {
    sqlx::query_as::<_, WaterTotals>(
        r#"
        SELECT COUNT(*) AS count, COALESCE(SUM(amount_ml), 0)::int8 AS total_ml
          FROM water_logs
         WHERE client_id = $1 AND date BETWEEN $2 AND $3
        "#,
    )
    .bind(client_id)
    .bind(window.start)
    .bind(window.end)
    .fetch_one(db)
    .await
}
