//! Integration tests for the reward ledger over the SQLite store.
//!
//! Covers a multi-day run through the public API and state surviving a
//! close and reopen of the database file.

use chrono::{NaiveDate, TimeZone, Utc};
use moimoi_core::{
    find_template, Config, Database, ItemKind, KvStore, Rejection, RewardLedger, SpendOutcome,
    ToggleOutcome,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

#[test]
fn test_multi_day_run_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("moimoi.db");
    let created = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();

    {
        let db = Database::open_at(&path).unwrap();
        let ledger = RewardLedger::open(db, &Config::default()).unwrap();
        let templates = [find_template("water").unwrap(), find_template("walk").unwrap()];
        let report = ledger.complete_onboarding(&templates, created).unwrap();
        assert!(report.durability.is_persisted());

        let task = ledger.add_item(ItemKind::Task, "Buy groceries", created).unwrap();
        let habit_id = report.habits[0].id.clone();

        // Day 1: one task and one habit.
        for (kind, id) in [(ItemKind::Task, &task.id), (ItemKind::Habit, &habit_id)] {
            let outcome = ledger.toggle_completion(kind, id, day(1)).unwrap();
            assert!(matches!(outcome, ToggleOutcome::Completed(_)));
        }

        // Day 2: toggling the habit again first un-completes it.
        let outcome = ledger.toggle_completion(ItemKind::Habit, &habit_id, day(2)).unwrap();
        assert!(matches!(outcome, ToggleOutcome::Uncompleted(_)));
        let outcome = ledger.toggle_completion(ItemKind::Habit, &habit_id, day(2)).unwrap();
        let ToggleOutcome::Completed(report) = outcome else {
            panic!("expected completion on day 2");
        };
        assert_eq!(report.fire_points_total, 3);
        assert_eq!(report.streak.current, 2);
        assert_eq!(report.item.streak, 1);
    }

    let db = Database::open_at(&path).unwrap();
    assert_eq!(db.get("fires_2026-03-01").unwrap().as_deref(), Some("2"));
    assert_eq!(db.get("fires_2026-03-02").unwrap().as_deref(), Some("1"));

    let ledger = RewardLedger::open(db, &Config::default()).unwrap();
    let progress = ledger.user_progress().unwrap();
    assert_eq!(progress.fire_points_total, 3);
    assert_eq!(progress.streak_days, 2);
    assert_eq!(progress.last_active_date, Some(day(2)));
    assert_eq!(ledger.items(ItemKind::Habit).unwrap().len(), 2);

    // The reopened ledger still remembers today's completion.
    let habit_id = ledger.items(ItemKind::Habit).unwrap()[0].id.clone();
    assert_eq!(
        ledger.toggle_completion(ItemKind::Habit, &habit_id, day(2)).unwrap(),
        ToggleOutcome::Rejected(Rejection::AlreadyCompletedToday)
    );

    assert!(matches!(
        ledger.spend_fire_points(3).unwrap(),
        SpendOutcome::Spent { remaining: 0, .. }
    ));
}

#[test]
fn test_clear_all_data_on_sqlite() {
    let db = Database::open_memory().unwrap();
    let ledger = RewardLedger::open(db, &Config::default()).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 4, 7, 30, 0).unwrap();

    let task = ledger.add_item(ItemKind::Task, "Write report", now).unwrap();
    ledger.toggle_completion(ItemKind::Task, &task.id, day(4)).unwrap();
    assert!(ledger.clear_all_data().unwrap() >= 6);

    let snapshot = ledger.progress(day(4)).unwrap();
    assert_eq!(snapshot.fire_points_total, 0);
    assert_eq!(snapshot.fires_earned_today, 0);
    assert_eq!(snapshot.tasks.total, 0);
    assert_eq!(snapshot.streak_days, 0);
}

#[test]
fn test_streak_breaks_after_missed_day() {
    let db = Database::open_memory().unwrap();
    let ledger = RewardLedger::open(db, &Config::default()).unwrap();

    assert_eq!(ledger.update_streak(day(5)).unwrap().current, 1);
    assert_eq!(ledger.update_streak(day(6)).unwrap().current, 2);
    assert_eq!(ledger.update_streak(day(7)).unwrap().current, 3);
    assert_eq!(ledger.update_streak(day(9)).unwrap().current, 1);
}
