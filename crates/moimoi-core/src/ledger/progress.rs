//! Read-side derivations: progress snapshot, companion mood, calendar view,
//! and milestone achievements.

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Persisted engagement counters for the installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub fire_points_total: u64,
    pub happiness: u32,
    pub streak_days: u32,
    pub last_active_date: Option<NaiveDate>,
}

impl UserProgress {
    pub fn fresh(initial_happiness: u32) -> Self {
        Self {
            fire_points_total: 0,
            happiness: initial_happiness.min(100),
            streak_days: 0,
            last_active_date: None,
        }
    }
}

/// Companion mood band derived from happiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Ecstatic,
    Happy,
    Content,
    Sad,
    Miserable,
}

impl Mood {
    pub fn from_happiness(happiness: u32) -> Self {
        match happiness {
            80.. => Mood::Ecstatic,
            60..=79 => Mood::Happy,
            40..=59 => Mood::Content,
            20..=39 => Mood::Sad,
            _ => Mood::Miserable,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCount {
    pub completed: usize,
    pub total: usize,
}

impl CompletionCount {
    pub fn of(items: &[Item]) -> Self {
        Self {
            completed: items.iter().filter(|i| i.completed).count(),
            total: items.len(),
        }
    }

    /// 0 .. 100, rounded down. Empty lists count as 0%.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.completed * 100 / self.total) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub day: NaiveDate,
    pub fire_points_total: u64,
    pub fires_earned_today: u32,
    /// Fires still grantable today through the task flow; `None` when uncapped.
    pub task_fires_remaining: Option<u32>,
    pub habit_fires_remaining: Option<u32>,
    pub happiness: u32,
    pub mood: Mood,
    pub streak_days: u32,
    pub last_active_date: Option<NaiveDate>,
    pub tasks: CompletionCount,
    pub habits: CompletionCount,
    pub onboarded: bool,
}

/// One cell of the calendar view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub day: NaiveDate,
    pub created: usize,
    pub completed: usize,
}

/// Buckets `items` by creation day in `tz` for every day in `from..=to`.
pub fn calendar<Tz: TimeZone>(items: &[Item], from: NaiveDate, to: NaiveDate, tz: &Tz) -> Vec<CalendarDay> {
    from.iter_days()
        .take_while(|day| *day <= to)
        .map(|day| {
            let bucket = items.iter().filter(|i| i.created_day(tz) == day);
            let (created, completed) =
                bucket.fold((0, 0), |(c, d), i| (c + 1, d + usize::from(i.completed)));
            CalendarDay {
                day,
                created,
                completed,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    FirstFire,
    TenFires,
    FiftyFires,
    HundredFires,
    ThreeDayStreak,
    WeekStreak,
    MonthStreak,
}

impl Achievement {
    pub const ALL: [Achievement; 7] = [
        Achievement::FirstFire,
        Achievement::TenFires,
        Achievement::FiftyFires,
        Achievement::HundredFires,
        Achievement::ThreeDayStreak,
        Achievement::WeekStreak,
        Achievement::MonthStreak,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Achievement::FirstFire => "First spark",
            Achievement::TenFires => "Campfire",
            Achievement::FiftyFires => "Bonfire",
            Achievement::HundredFires => "Wildfire",
            Achievement::ThreeDayStreak => "Three in a row",
            Achievement::WeekStreak => "Full week",
            Achievement::MonthStreak => "Unstoppable",
        }
    }

    fn unlocked_by(&self, snapshot: &ProgressSnapshot) -> bool {
        match self {
            Achievement::FirstFire => snapshot.fire_points_total >= 1,
            Achievement::TenFires => snapshot.fire_points_total >= 10,
            Achievement::FiftyFires => snapshot.fire_points_total >= 50,
            Achievement::HundredFires => snapshot.fire_points_total >= 100,
            Achievement::ThreeDayStreak => snapshot.streak_days >= 3,
            Achievement::WeekStreak => snapshot.streak_days >= 7,
            Achievement::MonthStreak => snapshot.streak_days >= 30,
        }
    }
}

/// Milestones reached by the current balance and streak.
pub fn achievements(snapshot: &ProgressSnapshot) -> Vec<Achievement> {
    Achievement::ALL
        .into_iter()
        .filter(|a| a.unlocked_by(snapshot))
        .collect()
}
