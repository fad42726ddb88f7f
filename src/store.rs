use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::labs::{repo as lab_repo, repo_types::LabResultRecord};
use crate::meals::{repo as meal_repo, repo_types::MealRecord};

/// Where raw analysis records come from. Handlers only see this trait so
/// they can be exercised without a database.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_meals(&self, user_id: Uuid, limit: i64, offset: i64)
        -> anyhow::Result<Vec<MealRecord>>;
    /// Oldest first.
    async fn list_lab_results(&self, user_id: Uuid) -> anyhow::Result<Vec<LabResultRecord>>;
}

#[derive(Clone)]
pub struct PgRecordStore {
    db: PgPool,
}

impl PgRecordStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list_meals(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<MealRecord>> {
        meal_repo::list_by_user(&self.db, user_id, limit, offset).await
    }

    async fn list_lab_results(&self, user_id: Uuid) -> anyhow::Result<Vec<LabResultRecord>> {
        lab_repo::list_by_user(&self.db, user_id).await
    }
}

/// In-memory store holding one user's records.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub meals: Vec<MealRecord>,
    pub lab_results: Vec<LabResultRecord>,
}

#[cfg(test)]
#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_meals(
        &self,
        _user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<MealRecord>> {
        let mut meals = self.meals.clone();
        meals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(meals
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn list_lab_results(&self, _user_id: Uuid) -> anyhow::Result<Vec<LabResultRecord>> {
        let mut results = self.lab_results.clone();
        results.sort_by_key(|r| r.created_at);
        Ok(results)
    }
}
