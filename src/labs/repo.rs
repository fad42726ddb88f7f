use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::LabResultRecord;

/// All lab results of a user, oldest first. The series grouper relies on
/// this ordering to decide which point is current.
pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<LabResultRecord>> {
    let rows = sqlx::query_as::<_, LabResultRecord>(
        r#"
        SELECT id, results_json, created_at
          FROM lab_results
         WHERE user_id = $1
         ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list lab results by user")?;
    Ok(rows)
}
