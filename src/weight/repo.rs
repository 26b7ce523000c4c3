use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewWeightLog, WeightLog};

pub async fn insert_weight_log(
    db: &PgPool,
    client_id: Uuid,
    log: NewWeightLog,
) -> anyhow::Result<WeightLog> {
    sqlx::query_as::<_, WeightLog>(
        r#"
        INSERT INTO weight_logs (id, client_id, date, weight_kg, body_fat_pct)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, client_id, date, weight_kg, body_fat_pct, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(client_id)
    .bind(log.date)
    .bind(log.weight_kg)
    .bind(log.body_fat_pct)
    .fetch_one(db)
    .await
    .context("insert weight log")
}

/// Newest first.
pub async fn list_weight_logs(db: &PgPool, client_id: Uuid) -> Result<Vec<WeightLog>, sqlx::Error> {
    sqlx::query_as::<_, WeightLog>(
        r#"
        SELECT id, client_id, date, weight_kg, body_fat_pct, created_at
          FROM weight_logs
         WHERE client_id = $1
         ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(client_id)
    .fetch_all(db)
    .await
}
