//! Store keys owned by the ledger.
//!
//! Per-day keys use ISO 8601 (`YYYY-MM-DD`) so they never depend on locale.

use chrono::NaiveDate;

use crate::item::ItemKind;

pub const TOTAL_FIRE_POINTS: &str = "totalFirePoints";
pub const HAPPINESS: &str = "moimoiHappiness";
pub const USER_STREAK: &str = "userStreak";
pub const LAST_ACTIVE_DATE: &str = "lastActiveDate";
pub const USER_TASKS: &str = "userTasks";
pub const USER_HABITS: &str = "userHabits";
pub const ONBOARDING_COMPLETE: &str = "onboardingComplete";

pub const FIRES_PREFIX: &str = "fires_";
const LAST_COMPLETION_SUFFIX: &str = "_last_completion";

const DAY_FORMAT: &str = "%Y-%m-%d";

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DAY_FORMAT).ok()
}

/// `fires_<YYYY-MM-DD>`
pub fn fires_key(day: NaiveDate) -> String {
    format!("{FIRES_PREFIX}{}", format_day(day))
}

/// `<kind>_<id>_last_completion`
pub fn last_completion_key(kind: ItemKind, id: &str) -> String {
    format!("{}_{id}{LAST_COMPLETION_SUFFIX}", kind.as_str())
}

pub fn is_last_completion_key(key: &str) -> bool {
    key.ends_with(LAST_COMPLETION_SUFFIX)
}

pub fn items_key(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Task => USER_TASKS,
        ItemKind::Habit => USER_HABITS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_keys_are_iso() {
        let day = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
        assert_eq!(fires_key(day), "fires_2026-01-09");
        assert_eq!(parse_day("2026-01-09"), Some(day));
        assert_eq!(parse_day("Fri Jan 09 2026"), None);
    }

    #[test]
    fn completion_guard_key_layout() {
        let key = last_completion_key(ItemKind::Habit, "1700000000000");
        assert_eq!(key, "habit_1700000000000_last_completion");
        assert!(is_last_completion_key(&key));
        assert!(!is_last_completion_key("habit_1700000000000"));
    }
}
