use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::services::{goals, points, streaks};
use crate::store::models::{
    ActivityType, LanguageStreak, MonthlyGoal, ProficiencyLevel, Progress, UserStreak, WeeklyGoal,
};
use crate::store::{ProgressStore, StoreError};

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("user not found")]
    UserNotFound,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedActivity {
    pub streak: UserStreak,
    pub progress: Progress,
    pub points: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSummary {
    pub language: String,
    pub level: ProficiencyLevel,
    pub vocab_count: i64,
    pub conversations_held: i64,
    pub practice_minutes: i64,
    pub streak_data: LanguageStreak,
    pub weekly_goal: WeeklyGoal,
    pub monthly_goal: MonthlyGoal,
}

impl From<Progress> for LanguageSummary {
    fn from(progress: Progress) -> Self {
        Self {
            language: progress.language,
            level: progress.current_level,
            vocab_count: progress.vocabulary_count,
            conversations_held: progress.conversations_held,
            practice_minutes: progress.practice_minutes,
            streak_data: progress.streak_data,
            weekly_goal: progress.weekly_goal,
            monthly_goal: progress.monthly_goal,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakView {
    pub streak: UserStreak,
    pub per_language_summaries: Vec<LanguageSummary>,
    pub points: i64,
}

/// Records one activity for a (user, language) pair: per-language streak,
/// goal counters, then the global streak with its daily points credit.
/// Progress is written before the user row; there is no cross-entity
/// transaction, so a failure between the two writes leaves the per-language
/// update applied and the global one not.
pub async fn record_activity(
    store: &dyn ProgressStore,
    user_id: &str,
    language: &str,
    activity: ActivityType,
    minutes: i64,
    now: DateTime<Utc>,
) -> Result<RecordedActivity, ProgressError> {
    let language = language.trim();
    if language.is_empty() {
        return Err(ProgressError::InvalidInput(
            "language is required".to_string(),
        ));
    }
    if minutes < 0 {
        return Err(ProgressError::InvalidInput(
            "minutes must be non-negative".to_string(),
        ));
    }

    let mut user = store
        .load_user(user_id)
        .await?
        .ok_or(ProgressError::UserNotFound)?;

    let found = store.find_or_create_progress(&user, language, now).await?;
    if found.was_created() {
        tracing::debug!(user = user_id, language, "created progress record");
    }
    let mut progress = found.into_progress();

    streaks::advance_language_streak(&mut progress.streak_data, now);
    goals::apply_activity(&mut progress, activity, minutes);

    if streaks::advance_global_streak(&mut user.streak, now) {
        user.points += points::daily_reward(user.streak.count);
    }

    store.save_progress(&progress).await?;
    store.save_user(&user).await?;

    tracing::debug!(
        user = user_id,
        language,
        activity = activity.as_str(),
        streak = user.streak.count,
        "recorded activity"
    );

    Ok(RecordedActivity {
        streak: user.streak.clone(),
        points: user.points,
        progress,
    })
}

/// Dashboard read. Carries a write side effect: a global streak left
/// untouched for more than a full day is zeroed and saved back before the
/// view is assembled.
pub async fn streak_view(
    store: &dyn ProgressStore,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<StreakView, ProgressError> {
    let mut user = store
        .load_user(user_id)
        .await?
        .ok_or(ProgressError::UserNotFound)?;

    if streaks::reset_stale_global_streak(&mut user.streak, now) {
        tracing::debug!(user = user_id, "global streak went stale, reset to 0");
        store.save_user(&user).await?;
    }

    let records = store.list_progress(user_id).await?;

    Ok(StreakView {
        streak: user.streak,
        points: user.points,
        per_language_summaries: records.into_iter().map(LanguageSummary::from).collect(),
    })
}
