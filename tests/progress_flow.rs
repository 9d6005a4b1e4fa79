use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use lingualink_backend_rust::services::progress::{record_activity, streak_view, ProgressError};
use lingualink_backend_rust::store::memory::MemoryStore;
use lingualink_backend_rust::store::models::{
    ActivityType, LanguagePreference, ProficiencyLevel, Progress, User,
};
use lingualink_backend_rust::store::{FoundOrCreated, ProgressStore, StoreError};

fn day(d: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, hour, 0, 0).unwrap()
}

async fn seed_user(store: &MemoryStore, id: &str) -> User {
    let user = User::new(
        id.to_string(),
        vec![LanguagePreference {
            language: "es".to_string(),
            level: ProficiencyLevel::Intermediate,
        }],
        day(1, 8),
    );
    store.create_user(&user).await.unwrap();
    user
}

#[tokio::test]
async fn test_first_activity_creates_progress_and_advances_everything() {
    let store = MemoryStore::new();
    seed_user(&store, "u1").await;

    let recorded = record_activity(&store, "u1", "es", ActivityType::Practice, 20, day(1, 9))
        .await
        .unwrap();

    assert_eq!(recorded.progress.streak_data.current_streak, 1);
    assert_eq!(recorded.progress.streak_data.longest_streak, 1);
    assert_eq!(recorded.progress.practice_minutes, 20);
    assert_eq!(recorded.progress.weekly_goal.completion, 20);
    assert_eq!(recorded.progress.current_level, ProficiencyLevel::Intermediate);
    assert_eq!(recorded.streak.count, 1);
    assert_eq!(recorded.points, 10);

    let saved = store.load_user("u1").await.unwrap().unwrap();
    assert_eq!(saved.streak.count, 1);
    assert_eq!(saved.points, 10);
}

#[tokio::test]
async fn test_second_activity_same_day_only_accumulates() {
    let store = MemoryStore::new();
    seed_user(&store, "u1").await;

    record_activity(&store, "u1", "es", ActivityType::Practice, 20, day(1, 9))
        .await
        .unwrap();
    let recorded = record_activity(&store, "u1", "es", ActivityType::Conversation, 0, day(1, 18))
        .await
        .unwrap();

    assert_eq!(recorded.progress.streak_data.current_streak, 1);
    assert_eq!(recorded.progress.conversations_held, 1);
    assert_eq!(recorded.progress.monthly_goal.completion, 1);
    assert_eq!(recorded.progress.streak_data.last_practice_date, Some(day(1, 18)));
    assert_eq!(recorded.streak.count, 1);
    assert_eq!(recorded.points, 10);
}

#[tokio::test]
async fn test_next_day_extends_streak_and_scales_points() {
    let store = MemoryStore::new();
    seed_user(&store, "u1").await;

    record_activity(&store, "u1", "es", ActivityType::Practice, 20, day(1, 9))
        .await
        .unwrap();
    let recorded = record_activity(&store, "u1", "es", ActivityType::Practice, 15, day(2, 9))
        .await
        .unwrap();

    assert_eq!(recorded.progress.streak_data.current_streak, 2);
    assert_eq!(recorded.progress.streak_data.longest_streak, 2);
    assert_eq!(recorded.progress.practice_minutes, 35);
    assert_eq!(recorded.streak.count, 2);
    assert_eq!(recorded.points, 30);
}

#[tokio::test]
async fn test_gap_resets_language_streak_but_keeps_longest() {
    let store = MemoryStore::new();
    seed_user(&store, "u1").await;

    record_activity(&store, "u1", "es", ActivityType::Practice, 10, day(1, 9))
        .await
        .unwrap();
    record_activity(&store, "u1", "es", ActivityType::Practice, 10, day(2, 9))
        .await
        .unwrap();
    record_activity(&store, "u1", "es", ActivityType::Practice, 10, day(3, 9))
        .await
        .unwrap();

    let recorded = record_activity(&store, "u1", "es", ActivityType::Practice, 10, day(6, 9))
        .await
        .unwrap();

    assert_eq!(recorded.progress.streak_data.current_streak, 1);
    assert_eq!(recorded.progress.streak_data.longest_streak, 3);
}

#[tokio::test]
async fn test_streak_view_resets_stale_global_streak() {
    let store = MemoryStore::new();
    seed_user(&store, "u1").await;

    record_activity(&store, "u1", "es", ActivityType::Practice, 10, day(1, 9))
        .await
        .unwrap();

    let view = streak_view(&store, "u1", day(3, 9)).await.unwrap();
    assert_eq!(view.streak.count, 0);
    assert_eq!(view.points, 10);

    // The reset is persisted, not just reported.
    let saved = store.load_user("u1").await.unwrap().unwrap();
    assert_eq!(saved.streak.count, 0);
    assert_eq!(saved.streak.last_updated, Some(day(3, 9)));
}

#[tokio::test]
async fn test_streak_view_within_a_day_leaves_streak_alone() {
    let store = MemoryStore::new();
    seed_user(&store, "u1").await;

    record_activity(&store, "u1", "es", ActivityType::Practice, 10, day(1, 9))
        .await
        .unwrap();

    let view = streak_view(&store, "u1", day(2, 8)).await.unwrap();
    assert_eq!(view.streak.count, 1);
    assert_eq!(view.per_language_summaries.len(), 1);
    assert_eq!(view.per_language_summaries[0].language, "es");
    assert_eq!(view.per_language_summaries[0].practice_minutes, 10);
}

#[tokio::test]
async fn test_read_reset_blocks_same_day_advance() {
    // Reading the dashboard before recording stamps today on the zeroed
    // streak, so the same day's activity no longer advances it or pays out.
    // Recording first would have extended the streak instead.
    let store = MemoryStore::new();
    seed_user(&store, "u1").await;

    record_activity(&store, "u1", "es", ActivityType::Practice, 10, day(1, 9))
        .await
        .unwrap();

    let view = streak_view(&store, "u1", day(3, 9)).await.unwrap();
    assert_eq!(view.streak.count, 0);

    let recorded = record_activity(&store, "u1", "es", ActivityType::Practice, 10, day(3, 10))
        .await
        .unwrap();
    assert_eq!(recorded.streak.count, 0);
    assert_eq!(recorded.points, 10);
    assert_eq!(recorded.progress.streak_data.current_streak, 1);
}

#[tokio::test]
async fn test_languages_track_independent_streaks() {
    let store = MemoryStore::new();
    seed_user(&store, "u1").await;

    record_activity(&store, "u1", "es", ActivityType::Practice, 10, day(1, 9))
        .await
        .unwrap();
    record_activity(&store, "u1", "es", ActivityType::Practice, 10, day(2, 9))
        .await
        .unwrap();
    let recorded = record_activity(&store, "u1", "ja", ActivityType::Practice, 10, day(2, 10))
        .await
        .unwrap();

    // Unknown declared proficiency falls back to beginner.
    assert_eq!(recorded.progress.current_level, ProficiencyLevel::Beginner);
    assert_eq!(recorded.progress.streak_data.current_streak, 1);
    // The global streak advanced once per day, not once per language.
    assert_eq!(recorded.streak.count, 2);
    assert_eq!(recorded.points, 30);

    let es = store.load_progress("u1", "es").await.unwrap().unwrap();
    assert_eq!(es.streak_data.current_streak, 2);

    let view = streak_view(&store, "u1", day(2, 11)).await.unwrap();
    assert_eq!(view.per_language_summaries.len(), 2);
}

#[tokio::test]
async fn test_unknown_user_is_rejected_before_writes() {
    let store = MemoryStore::new();

    let err = record_activity(&store, "ghost", "es", ActivityType::Practice, 10, day(1, 9))
        .await
        .unwrap_err();
    assert!(matches!(err, ProgressError::UserNotFound));

    assert!(store.load_progress("ghost", "es").await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_input_is_rejected_before_loads() {
    let store = MemoryStore::new();
    seed_user(&store, "u1").await;

    let err = record_activity(&store, "u1", "   ", ActivityType::Practice, 10, day(1, 9))
        .await
        .unwrap_err();
    assert!(matches!(err, ProgressError::InvalidInput(_)));

    let err = record_activity(&store, "u1", "es", ActivityType::Practice, -5, day(1, 9))
        .await
        .unwrap_err();
    assert!(matches!(err, ProgressError::InvalidInput(_)));

    let user = store.load_user("u1").await.unwrap().unwrap();
    assert_eq!(user.streak.count, 0);
    assert_eq!(user.points, 0);
    assert!(store.load_progress("u1", "es").await.unwrap().is_none());
}

/// Store wrapper that fails every user write; progress writes go through.
struct UserWriteFailure {
    inner: MemoryStore,
}

#[async_trait]
impl ProgressStore for UserWriteFailure {
    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }

    async fn load_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.inner.load_user(id).await
    }

    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        self.inner.create_user(user).await
    }

    async fn save_user(&self, _user: &User) -> Result<(), StoreError> {
        Err(StoreError::Custom("user write refused".to_string()))
    }

    async fn load_progress(
        &self,
        user_id: &str,
        language: &str,
    ) -> Result<Option<Progress>, StoreError> {
        self.inner.load_progress(user_id, language).await
    }

    async fn find_or_create_progress(
        &self,
        user: &User,
        language: &str,
        now: DateTime<Utc>,
    ) -> Result<FoundOrCreated, StoreError> {
        self.inner.find_or_create_progress(user, language, now).await
    }

    async fn save_progress(&self, progress: &Progress) -> Result<(), StoreError> {
        self.inner.save_progress(progress).await
    }

    async fn list_progress(&self, user_id: &str) -> Result<Vec<Progress>, StoreError> {
        self.inner.list_progress(user_id).await
    }
}

#[tokio::test]
async fn test_progress_write_lands_before_user_write_fails() {
    let store = UserWriteFailure {
        inner: MemoryStore::new(),
    };
    seed_user(&store.inner, "u1").await;

    let err = record_activity(&store, "u1", "es", ActivityType::Practice, 10, day(1, 9))
        .await
        .unwrap_err();
    assert!(matches!(err, ProgressError::Storage(_)));

    // Progress first, then user: the per-language half is already durable.
    let progress = store.inner.load_progress("u1", "es").await.unwrap().unwrap();
    assert_eq!(progress.streak_data.current_streak, 1);
    assert_eq!(progress.practice_minutes, 10);

    let user = store.inner.load_user("u1").await.unwrap().unwrap();
    assert_eq!(user.streak.count, 0);
    assert_eq!(user.points, 0);
}

#[tokio::test]
async fn test_goal_completion_never_rolls_over() {
    let store = MemoryStore::new();
    seed_user(&store, "u1").await;

    let mut now = day(1, 9);
    for _ in 0..20 {
        record_activity(&store, "u1", "es", ActivityType::Practice, 30, now)
            .await
            .unwrap();
        now = now + Duration::days(1);
    }

    let progress = store.load_progress("u1", "es").await.unwrap().unwrap();
    // Three weeks of practice, no weekly reset anywhere.
    assert_eq!(progress.weekly_goal.completion, 600);
    assert_eq!(progress.practice_minutes, 600);
}
