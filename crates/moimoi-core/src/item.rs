//! Tasks and habits.
//!
//! Both are the same record shape; habits additionally carry a per-habit
//! completion streak. They are stored as JSON arrays under `userTasks` and
//! `userHabits`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Task,
    Habit,
}

impl ItemKind {
    pub const ALL: [ItemKind; 2] = [ItemKind::Task, ItemKind::Habit];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Task => "task",
            ItemKind::Habit => "habit",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "task" | "tasks" => Ok(ItemKind::Task),
            "habit" | "habits" => Ok(ItemKind::Habit),
            other => Err(format!("unknown item kind: {other}")),
        }
    }
}

/// A user-defined task or habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    #[serde(alias = "name")]
    pub text: String,
    /// Completion state for "today". Not reset automatically at midnight.
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Consecutive completions; habits only.
    #[serde(default)]
    pub streak: u32,
}

impl Item {
    pub fn new(id: impl Into<String>, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
            created_at,
            streak: 0,
        }
    }

    /// Calendar day of creation as seen in `tz`.
    pub fn created_day<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.created_at.with_timezone(tz).date_naive()
    }
}

/// Creation-timestamp id, bumped until it is unique among `existing`.
pub fn next_id(existing: &[Item], now: DateTime<Utc>) -> String {
    let mut candidate = now.timestamp_millis();
    while existing.iter().any(|item| item.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn next_id_skips_taken_timestamps() {
        let now = at(1_700_000_000_000);
        let existing = vec![
            Item::new("1700000000000", "a", now),
            Item::new("1700000000001", "b", now),
        ];
        assert_eq!(next_id(&existing, now), "1700000000002");
        assert_eq!(next_id(&[], now), "1700000000000");
    }

    #[test]
    fn deserializes_legacy_name_field_and_missing_flags() {
        let json = r#"{"id":"42","name":"Drink water","createdAt":"2026-03-01T08:00:00Z"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.text, "Drink water");
        assert!(!item.completed);
        assert_eq!(item.streak, 0);
        assert_eq!(item.created_day(&Utc), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    }

    #[test]
    fn created_day_follows_time_zone() {
        let item = Item::new("1", "Late", Utc.with_ymd_and_hms(2026, 3, 1, 22, 30, 0).unwrap());
        let tokyo = chrono::FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(item.created_day(&Utc), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(item.created_day(&tokyo), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }

    #[test]
    fn serializes_camel_case() {
        let item = Item::new("1", "Read", at(0));
        let value = serde_json::to_value(&item).unwrap();
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["completed"], serde_json::Value::Bool(false));
    }

    #[test]
    fn kind_parses_plural_and_case() {
        assert_eq!("Habits".parse::<ItemKind>().unwrap(), ItemKind::Habit);
        assert_eq!("task".parse::<ItemKind>().unwrap(), ItemKind::Task);
        assert!("chore".parse::<ItemKind>().is_err());
    }
}
