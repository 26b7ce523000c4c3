use anyhow::Context;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::PhotoLog;

/// Row as written by an upload.
pub struct NewPhotoLog<'a> {
    pub id: Uuid,
    pub client_id: Uuid,
    pub date: Date,
    pub s3_key: &'a str,
    pub content_type: &'a str,
    pub notes: Option<&'a str>,
}

pub async fn insert_photo_log(db: &PgPool, photo: &NewPhotoLog<'_>) -> anyhow::Result<PhotoLog> {
    sqlx::query_as::<_, PhotoLog>(
        r#"
        INSERT INTO photo_logs (id, client_id, date, s3_key, content_type, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, client_id, date, s3_key, content_type, notes, coach_note, created_at
        "#,
    )
    .bind(photo.id)
    .bind(photo.client_id)
    .bind(photo.date)
    .bind(photo.s3_key)
    .bind(photo.content_type)
    .bind(photo.notes)
    .fetch_one(db)
    .await
    .context("insert photo log")
}

/// Newest first.
pub async fn list_photo_logs(db: &PgPool, client_id: Uuid) -> Result<Vec<PhotoLog>, sqlx::Error> {
    sqlx::query_as::<_, PhotoLog>(
        r#"
        SELECT id, client_id, date, s3_key, content_type, notes, coach_note, created_at
          FROM photo_logs
         WHERE client_id = $1
         ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(client_id)
    .fetch_all(db)
    .await
}

/// Sets the coach note on a photo of one of the coach's clients. Returns
/// false when no such photo exists.
pub async fn set_coach_note(
    db: &PgPool,
    photo_id: Uuid,
    coach_id: Uuid,
    note: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE photo_logs p
           SET coach_note = $3
          FROM client_profiles c
         WHERE p.id = $1 AND c.id = p.client_id AND c.coach_id = $2
        "#,
    )
    .bind(photo_id)
    .bind(coach_id)
    .bind(note)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}
