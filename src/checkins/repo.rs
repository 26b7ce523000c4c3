use anyhow::Context;
use serde_json::{Map, Value};
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::CheckIn;

pub async fn insert_check_in(
    db: &PgPool,
    client_id: Uuid,
    week_of: Date,
    form: Map<String, Value>,
    coach_note: Option<&str>,
) -> anyhow::Result<CheckIn> {
    sqlx::query_as::<_, CheckIn>(
        r#"
        INSERT INTO check_ins (id, client_id, week_of, form_json, coach_note)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, client_id, week_of, form_json, coach_note, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(client_id)
    .bind(week_of)
    .bind(Value::Object(form))
    .bind(coach_note)
    .fetch_one(db)
    .await
    .context("insert check-in")
}

/// Most recent week first.
pub async fn list_check_ins(db: &PgPool, client_id: Uuid) -> Result<Vec<CheckIn>, sqlx::Error> {
    sqlx::query_as::<_, CheckIn>(
        r#"
        SELECT id, client_id, week_of, form_json, coach_note, created_at
          FROM check_ins
         WHERE client_id = $1
         ORDER BY week_of DESC, created_at DESC
        "#,
    )
    .bind(client_id)
    .fetch_all(db)
    .await
}
