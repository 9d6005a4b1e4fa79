use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::db::DatabaseProxy;
use crate::store::models::{
    LanguagePreference, LanguageStreak, MonthlyGoal, ProficiencyLevel, Progress, User, UserStreak,
    WeeklyGoal,
};
use crate::store::{FoundOrCreated, ProgressStore, StoreError};

#[derive(Clone)]
pub struct PgStore {
    proxy: Arc<DatabaseProxy>,
}

impl PgStore {
    pub fn new(proxy: Arc<DatabaseProxy>) -> Self {
        Self { proxy }
    }

    fn pool(&self) -> &sqlx::PgPool {
        self.proxy.pool()
    }
}

#[async_trait]
impl ProgressStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool()).await?;
        Ok(())
    }

    async fn load_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT "id","learningLanguages","streakCount","streakLastUpdated","points",
                   "createdAt","updatedAt"
            FROM "users"
            WHERE "id" = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|row| row_to_user(&row)))
    }

    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let preferences = serde_json::to_value(&user.learning_languages)
            .map_err(|e| StoreError::Custom(e.to_string()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO "users" ("id","learningLanguages","streakCount","streakLastUpdated",
                                 "points","createdAt","updatedAt")
            VALUES ($1,$2,$3,$4,$5,$6,$7)
            ON CONFLICT ("id") DO NOTHING
            "#,
        )
        .bind(&user.id)
        .bind(&preferences)
        .bind(user.streak.count)
        .bind(user.streak.last_updated.map(|ts| ts.naive_utc()))
        .bind(user.points)
        .bind(user.created_at.naive_utc())
        .bind(user.updated_at.naive_utc())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Custom(format!(
                "user {} already exists",
                user.id
            )));
        }
        Ok(())
    }

    async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        let preferences = serde_json::to_value(&user.learning_languages)
            .map_err(|e| StoreError::Custom(e.to_string()))?;
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE "users" SET
                "learningLanguages" = $2,
                "streakCount" = $3,
                "streakLastUpdated" = $4,
                "points" = $5,
                "updatedAt" = $6
            WHERE "id" = $1
            "#,
        )
        .bind(&user.id)
        .bind(&preferences)
        .bind(user.streak.count)
        .bind(user.streak.last_updated.map(|ts| ts.naive_utc()))
        .bind(user.points)
        .bind(now)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn load_progress(
        &self,
        user_id: &str,
        language: &str,
    ) -> Result<Option<Progress>, StoreError> {
        let sql = progress_select_sql(r#"WHERE "userId" = $1 AND "language" = $2"#);
        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(language)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.map(|row| row_to_progress(&row)))
    }

    async fn find_or_create_progress(
        &self,
        user: &User,
        language: &str,
        now: DateTime<Utc>,
    ) -> Result<FoundOrCreated, StoreError> {
        if let Some(existing) = self.load_progress(&user.id, language).await? {
            return Ok(FoundOrCreated::Found(existing));
        }

        let progress = Progress::new(user, language, now);
        let result = sqlx::query(
            r#"
            INSERT INTO "language_progress" (
                "id","userId","language","practiceMinutes","conversationsHeld",
                "vocabularyCount","currentLevel","currentStreak","longestStreak",
                "lastPracticeDate","weeklyGoalMinutes","weeklyGoalCompletion",
                "monthlyGoalConversations","monthlyGoalCompletion","createdAt","updatedAt"
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16)
            ON CONFLICT ("userId","language") DO NOTHING
            "#,
        )
        .bind(&progress.id)
        .bind(&progress.user_id)
        .bind(&progress.language)
        .bind(progress.practice_minutes)
        .bind(progress.conversations_held)
        .bind(progress.vocabulary_count)
        .bind(progress.current_level.as_str())
        .bind(progress.streak_data.current_streak)
        .bind(progress.streak_data.longest_streak)
        .bind(progress.streak_data.last_practice_date.map(|ts| ts.naive_utc()))
        .bind(progress.weekly_goal.minutes)
        .bind(progress.weekly_goal.completion)
        .bind(progress.monthly_goal.conversations)
        .bind(progress.monthly_goal.completion)
        .bind(progress.created_at.naive_utc())
        .bind(progress.updated_at.naive_utc())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            // Lost a creation race; the winner's row is authoritative.
            let existing = self
                .load_progress(&user.id, language)
                .await?
                .ok_or_else(|| StoreError::Custom("progress row vanished".to_string()))?;
            return Ok(FoundOrCreated::Found(existing));
        }

        Ok(FoundOrCreated::Created(progress))
    }

    async fn save_progress(&self, progress: &Progress) -> Result<(), StoreError> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            UPDATE "language_progress" SET
                "practiceMinutes" = $2,
                "conversationsHeld" = $3,
                "vocabularyCount" = $4,
                "currentLevel" = $5,
                "currentStreak" = $6,
                "longestStreak" = $7,
                "lastPracticeDate" = $8,
                "weeklyGoalMinutes" = $9,
                "weeklyGoalCompletion" = $10,
                "monthlyGoalConversations" = $11,
                "monthlyGoalCompletion" = $12,
                "updatedAt" = $13
            WHERE "id" = $1
            "#,
        )
        .bind(&progress.id)
        .bind(progress.practice_minutes)
        .bind(progress.conversations_held)
        .bind(progress.vocabulary_count)
        .bind(progress.current_level.as_str())
        .bind(progress.streak_data.current_streak)
        .bind(progress.streak_data.longest_streak)
        .bind(progress.streak_data.last_practice_date.map(|ts| ts.naive_utc()))
        .bind(progress.weekly_goal.minutes)
        .bind(progress.weekly_goal.completion)
        .bind(progress.monthly_goal.conversations)
        .bind(progress.monthly_goal.completion)
        .bind(now)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn list_progress(&self, user_id: &str) -> Result<Vec<Progress>, StoreError> {
        let sql = progress_select_sql(r#"WHERE "userId" = $1 ORDER BY "language" ASC"#);
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(self.pool())
            .await?;

        Ok(rows.iter().map(row_to_progress).collect())
    }
}

fn progress_select_sql(suffix: &str) -> String {
    format!(
        r#"
        SELECT "id","userId","language","practiceMinutes","conversationsHeld",
               "vocabularyCount","currentLevel","currentStreak","longestStreak",
               "lastPracticeDate","weeklyGoalMinutes","weeklyGoalCompletion",
               "monthlyGoalConversations","monthlyGoalCompletion","createdAt","updatedAt"
        FROM "language_progress"
        {suffix}
        "#
    )
}

fn row_to_user(row: &PgRow) -> User {
    let preferences: Vec<LanguagePreference> = row
        .try_get::<serde_json::Value, _>("learningLanguages")
        .ok()
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default();

    User {
        id: row.try_get("id").unwrap_or_default(),
        learning_languages: preferences,
        streak: UserStreak {
            count: row.try_get("streakCount").unwrap_or(0),
            last_updated: optional_utc(row, "streakLastUpdated"),
        },
        points: row.try_get("points").unwrap_or(0),
        created_at: required_utc(row, "createdAt"),
        updated_at: required_utc(row, "updatedAt"),
    }
}

fn row_to_progress(row: &PgRow) -> Progress {
    Progress {
        id: row.try_get("id").unwrap_or_default(),
        user_id: row.try_get("userId").unwrap_or_default(),
        language: row.try_get("language").unwrap_or_default(),
        practice_minutes: row.try_get("practiceMinutes").unwrap_or(0),
        conversations_held: row.try_get("conversationsHeld").unwrap_or(0),
        vocabulary_count: row.try_get("vocabularyCount").unwrap_or(0),
        current_level: ProficiencyLevel::parse(
            &row.try_get::<String, _>("currentLevel").unwrap_or_default(),
        ),
        streak_data: LanguageStreak {
            current_streak: row.try_get("currentStreak").unwrap_or(0),
            longest_streak: row.try_get("longestStreak").unwrap_or(0),
            last_practice_date: optional_utc(row, "lastPracticeDate"),
        },
        weekly_goal: WeeklyGoal {
            minutes: row.try_get("weeklyGoalMinutes").unwrap_or(0),
            completion: row.try_get("weeklyGoalCompletion").unwrap_or(0),
        },
        monthly_goal: MonthlyGoal {
            conversations: row.try_get("monthlyGoalConversations").unwrap_or(0),
            completion: row.try_get("monthlyGoalCompletion").unwrap_or(0),
        },
        created_at: required_utc(row, "createdAt"),
        updated_at: required_utc(row, "updatedAt"),
    }
}

fn optional_utc(row: &PgRow, column: &str) -> Option<DateTime<Utc>> {
    row.try_get::<Option<NaiveDateTime>, _>(column)
        .ok()
        .flatten()
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

fn required_utc(row: &PgRow, column: &str) -> DateTime<Utc> {
    row.try_get::<NaiveDateTime, _>(column)
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
        .unwrap_or_else(|_| Utc::now())
}
