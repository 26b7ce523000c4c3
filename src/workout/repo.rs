use anyhow::Context;
use serde_json::{Map, Value};
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::WorkoutLog;

pub async fn insert_workout_log(
    db: &PgPool,
    client_id: Uuid,
    date: Date,
    title: &str,
    details: Map<String, Value>,
) -> anyhow::Result<WorkoutLog> {
    sqlx::query_as::<_, WorkoutLog>(
        r#"
        INSERT INTO workout_logs (id, client_id, date, title, details)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, client_id, date, title, details, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(client_id)
    .bind(date)
    .bind(title)
    .bind(Value::Object(details))
    .fetch_one(db)
    .await
    .context("insert workout log")
}

/// Newest first.
pub async fn list_workout_logs(db: &PgPool, client_id: Uuid) -> Result<Vec<WorkoutLog>, sqlx::Error> {
    sqlx::query_as::<_, WorkoutLog>(
        r#"
        SELECT id, client_id, date, title, details, created_at
          FROM workout_logs
         WHERE client_id = $1
         ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(client_id)
    .fetch_all(db)
    .await
}
