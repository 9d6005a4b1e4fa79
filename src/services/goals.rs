use crate::store::models::{ActivityType, Progress};

/// Accumulates activity into the lifetime and goal counters. Vocabulary
/// activities touch no counters here; the vocabulary list itself is owned
/// elsewhere. Completion values only ever grow; zeroing them on a weekly or
/// monthly schedule is an external responsibility.
pub fn apply_activity(progress: &mut Progress, activity: ActivityType, minutes: i64) {
    match activity {
        ActivityType::Practice => {
            progress.practice_minutes += minutes;
            progress.weekly_goal.completion += minutes;
        }
        ActivityType::Conversation => {
            progress.conversations_held += 1;
            progress.monthly_goal.completion += 1;
        }
        ActivityType::Vocabulary => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{LanguagePreference, ProficiencyLevel, User};
    use chrono::{TimeZone, Utc};

    fn sample_progress() -> Progress {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let user = User::new(
            "u1".to_string(),
            vec![LanguagePreference {
                language: "es".to_string(),
                level: ProficiencyLevel::Beginner,
            }],
            now,
        );
        Progress::new(&user, "es", now)
    }

    #[test]
    fn test_practice_accumulates_minutes() {
        let mut progress = sample_progress();
        apply_activity(&mut progress, ActivityType::Practice, 20);
        apply_activity(&mut progress, ActivityType::Practice, 15);

        assert_eq!(progress.practice_minutes, 35);
        assert_eq!(progress.weekly_goal.completion, 35);
        assert_eq!(progress.conversations_held, 0);
        assert_eq!(progress.monthly_goal.completion, 0);
    }

    #[test]
    fn test_conversation_counts_once_regardless_of_minutes() {
        let mut progress = sample_progress();
        apply_activity(&mut progress, ActivityType::Conversation, 45);

        assert_eq!(progress.conversations_held, 1);
        assert_eq!(progress.monthly_goal.completion, 1);
        assert_eq!(progress.practice_minutes, 0);
        assert_eq!(progress.weekly_goal.completion, 0);
    }

    #[test]
    fn test_vocabulary_touches_no_counters() {
        let mut progress = sample_progress();
        apply_activity(&mut progress, ActivityType::Vocabulary, 10);

        assert_eq!(progress.practice_minutes, 0);
        assert_eq!(progress.conversations_held, 0);
        assert_eq!(progress.weekly_goal.completion, 0);
        assert_eq!(progress.monthly_goal.completion, 0);
        assert_eq!(progress.vocabulary_count, 0);
    }

    #[test]
    fn test_zero_minute_practice_is_a_noop_on_totals() {
        let mut progress = sample_progress();
        apply_activity(&mut progress, ActivityType::Practice, 0);

        assert_eq!(progress.practice_minutes, 0);
        assert_eq!(progress.weekly_goal.completion, 0);
    }
}
