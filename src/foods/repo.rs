use sqlx::PgPool;

use super::repo_types::Food;

const FOOD_COLUMNS: &str =
    "id, name, brand, source, serving_size, serving_unit, calories, protein, carbs, fats";

const MAX_CANDIDATES: i64 = 200;
const MAX_SEARCH_RESULTS: i64 = 25;

/// Local foods whose calories fall in `[min, max]`.
pub async fn candidates_in_range(
    db: &PgPool,
    min_calories: i32,
    max_calories: i32,
) -> Result<Vec<Food>, sqlx::Error> {
    sqlx::query_as::<_, Food>(&format!(
        r#"
        SELECT {FOOD_COLUMNS}
          FROM foods
         WHERE source = 'LOCAL' AND calories BETWEEN $1 AND $2
         ORDER BY name ASC
         LIMIT $3
        "#
    ))
    .bind(min_calories)
    .bind(max_calories)
    .bind(MAX_CANDIDATES)
    .fetch_all(db)
    .await
}

/// Local foods whose name contains `query`, ignoring case.
pub async fn search_local(db: &PgPool, query: &str) -> Result<Vec<Food>, sqlx::Error> {
    let pattern = format!("%{}%", escape_like(query));
    sqlx::query_as::<_, Food>(&format!(
        r#"
        SELECT {FOOD_COLUMNS}
          FROM foods
         WHERE source = 'LOCAL' AND name ILIKE $1 ESCAPE '\'
         ORDER BY name ASC
         LIMIT $2
        "#
    ))
    .bind(pattern)
    .bind(MAX_SEARCH_RESULTS)
    .fetch_all(db)
    .await
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("oat"), "oat");
        assert_eq!(escape_like("100%_pure\\"), "100\\%\\_pure\\\\");
    }
}
