use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WEEKLY_GOAL_MINUTES: i64 = 150;
pub const DEFAULT_MONTHLY_GOAL_CONVERSATIONS: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Fluent,
}

impl ProficiencyLevel {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            "fluent" => Self::Fluent,
            _ => Self::Beginner,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Fluent => "fluent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Practice,
    Conversation,
    Vocabulary,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Practice => "practice",
            Self::Conversation => "conversation",
            Self::Vocabulary => "vocabulary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagePreference {
    pub language: String,
    pub level: ProficiencyLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStreak {
    pub count: i64,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub learning_languages: Vec<LanguagePreference>,
    pub streak: UserStreak,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: String, learning_languages: Vec<LanguagePreference>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            learning_languages,
            streak: UserStreak::default(),
            points: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn declared_level(&self, language: &str) -> Option<ProficiencyLevel> {
        self.learning_languages
            .iter()
            .find(|pref| pref.language == language)
            .map(|pref| pref.level)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageStreak {
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_practice_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGoal {
    pub minutes: i64,
    pub completion: i64,
}

impl Default for WeeklyGoal {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_WEEKLY_GOAL_MINUTES,
            completion: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyGoal {
    pub conversations: i64,
    pub completion: i64,
}

impl Default for MonthlyGoal {
    fn default() -> Self {
        Self {
            conversations: DEFAULT_MONTHLY_GOAL_CONVERSATIONS,
            completion: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub id: String,
    pub user_id: String,
    pub language: String,
    pub practice_minutes: i64,
    pub conversations_held: i64,
    pub vocabulary_count: i64,
    pub current_level: ProficiencyLevel,
    pub streak_data: LanguageStreak,
    pub weekly_goal: WeeklyGoal,
    pub monthly_goal: MonthlyGoal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Progress {
    pub fn new(user: &User, language: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            language: language.to_string(),
            practice_minutes: 0,
            conversations_held: 0,
            vocabulary_count: 0,
            current_level: user
                .declared_level(language)
                .unwrap_or(ProficiencyLevel::Beginner),
            streak_data: LanguageStreak::default(),
            weekly_goal: WeeklyGoal::default(),
            monthly_goal: MonthlyGoal::default(),
            created_at: now,
            updated_at: now,
        }
    }
}
