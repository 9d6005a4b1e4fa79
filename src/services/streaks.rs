use chrono::{DateTime, Duration, Utc};

use crate::calendar;
use crate::store::models::{LanguageStreak, UserStreak};

/// Per-language transition. Same UTC day: no change. Exactly one day since the
/// last activity: extend. Anything older (or no prior activity): back to 1.
/// The practice timestamp advances on every call.
pub fn advance_language_streak(streak: &mut LanguageStreak, now: DateTime<Utc>) {
    let today = calendar::day_of(now);

    match streak.last_practice_date.map(calendar::day_of) {
        Some(last) if last == today => {}
        Some(last) if calendar::days_between(last, today) == 1 => {
            streak.current_streak += 1;
        }
        _ => {
            streak.current_streak = 1;
        }
    }

    streak.longest_streak = streak.longest_streak.max(streak.current_streak);
    streak.last_practice_date = Some(now);
}

/// Global (cross-language) transition: advances at most once per UTC day.
/// Returns true when the count moved, which is the only trigger for a
/// points credit. This path never resets; see `reset_stale_global_streak`.
pub fn advance_global_streak(streak: &mut UserStreak, now: DateTime<Utc>) -> bool {
    let today = calendar::day_of(now);

    let advanced = match streak.last_updated {
        None => true,
        Some(ts) => calendar::day_of(ts) < today,
    };

    if advanced {
        streak.count += 1;
        streak.last_updated = Some(now);
    }
    advanced
}

/// Read-side staleness check: a user who let more than a full day elapse
/// loses the global streak. This path measures elapsed time while the write
/// path compares calendar days, and the stamp on reset means a later
/// same-day activity will not re-advance the count.
pub fn reset_stale_global_streak(streak: &mut UserStreak, now: DateTime<Utc>) -> bool {
    let Some(last) = streak.last_updated else {
        return false;
    };

    if now.signed_duration_since(last) > Duration::days(1) {
        streak.count = 0;
        streak.last_updated = Some(now);
        return true;
    }
    false
}
