use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::{ClientProfile, User};

impl User {
    /// Find a user by id.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }
}

const CLIENT_COLUMNS: &str = r#"
    SELECT c.id, c.user_id, c.coach_id, c.name, u.email, c.calories_target
    FROM client_profiles c
    JOIN users u ON u.id = c.user_id
"#;

impl ClientProfile {
    /// The profile belonging to a client user.
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ClientProfile>(&format!("{CLIENT_COLUMNS} WHERE c.user_id = $1"))
            .bind(user_id)
            .fetch_optional(db)
            .await
    }

    /// A client profile, only if it is coached by `coach_id`.
    pub async fn find_for_coach(
        db: &PgPool,
        client_id: Uuid,
        coach_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ClientProfile>(&format!(
            "{CLIENT_COLUMNS} WHERE c.id = $1 AND c.coach_id = $2"
        ))
        .bind(client_id)
        .bind(coach_id)
        .fetch_optional(db)
        .await
    }

    /// Every client of a coach, ordered by name.
    pub async fn list_for_coach(db: &PgPool, coach_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ClientProfile>(&format!(
            "{CLIENT_COLUMNS} WHERE c.coach_id = $1 ORDER BY c.name ASC"
        ))
        .bind(coach_id)
        .fetch_all(db)
        .await
    }
}
