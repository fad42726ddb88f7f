use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::MealRecord;

/// Newest meals first, one page.
pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<MealRecord>> {
    let rows = sqlx::query_as::<_, MealRecord>(
        r#"
        SELECT id, meal_image_url, meal_output, created_at
        FROM meals
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
    "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list meals by user")?;
    Ok(rows)
}
