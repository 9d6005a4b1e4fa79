pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::store::models::{Progress, User};

#[derive(Debug, Clone)]
pub enum FoundOrCreated {
    Found(Progress),
    Created(Progress),
}

impl FoundOrCreated {
    pub fn into_progress(self) -> Progress {
        match self {
            Self::Found(progress) | Self::Created(progress) => progress,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn load_user(&self, id: &str) -> Result<Option<User>, StoreError>;

    async fn create_user(&self, user: &User) -> Result<(), StoreError>;

    async fn save_user(&self, user: &User) -> Result<(), StoreError>;

    async fn load_progress(
        &self,
        user_id: &str,
        language: &str,
    ) -> Result<Option<Progress>, StoreError>;

    /// Lazy creation for a (user, language) pair not seen before; the created
    /// record takes its level from the user's declared proficiency.
    async fn find_or_create_progress(
        &self,
        user: &User,
        language: &str,
        now: DateTime<Utc>,
    ) -> Result<FoundOrCreated, StoreError>;

    async fn save_progress(&self, progress: &Progress) -> Result<(), StoreError>;

    async fn list_progress(&self, user_id: &str) -> Result<Vec<Progress>, StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("{0}")]
    Custom(String),
}
