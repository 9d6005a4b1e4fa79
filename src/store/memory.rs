use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::store::models::{Progress, User};
use crate::store::{FoundOrCreated, ProgressStore, StoreError};

/// In-process store keyed the same way as the database tables; backs the
/// integration tests and local experiments without a Postgres instance.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    progress: RwLock<HashMap<(String, String), Progress>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn load_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(StoreError::Custom(format!(
                "user {} already exists",
                user.id
            )));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        self.users
            .write()
            .await
            .insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn load_progress(
        &self,
        user_id: &str,
        language: &str,
    ) -> Result<Option<Progress>, StoreError> {
        let key = (user_id.to_string(), language.to_string());
        Ok(self.progress.read().await.get(&key).cloned())
    }

    async fn find_or_create_progress(
        &self,
        user: &User,
        language: &str,
        now: DateTime<Utc>,
    ) -> Result<FoundOrCreated, StoreError> {
        let key = (user.id.clone(), language.to_string());
        let mut guard = self.progress.write().await;
        if let Some(existing) = guard.get(&key) {
            return Ok(FoundOrCreated::Found(existing.clone()));
        }
        let created = Progress::new(user, language, now);
        guard.insert(key, created.clone());
        Ok(FoundOrCreated::Created(created))
    }

    async fn save_progress(&self, progress: &Progress) -> Result<(), StoreError> {
        let key = (progress.user_id.clone(), progress.language.clone());
        self.progress.write().await.insert(key, progress.clone());
        Ok(())
    }

    async fn list_progress(&self, user_id: &str) -> Result<Vec<Progress>, StoreError> {
        let guard = self.progress.read().await;
        let mut records: Vec<Progress> = guard
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.language.cmp(&b.language));
        Ok(records)
    }
}
