//! Reward ledger: fire points, daily caps, streaks and companion happiness.
//!
//! The ledger is the single owner of every reward-related key in the store.
//! All operations take `&self` and run under one internal mutex, so two
//! toggles of the same item (a double tap) are serialized and the second
//! observes the first's effects.
//!
//! ## Completion flow
//!
//! ```text
//! not completed --toggle--> completed   (+1 fire, +bonus happiness, streak day)
//! completed     --toggle--> rejected    (same day: AlreadyCompletedToday)
//! completed     --toggle--> not completed (earlier day)
//! completed     --uncomplete--> not completed (any day, nothing revoked)
//! ```
//!
//! Writes are issued in sequence before an operation returns. A failed
//! write is logged and the value is kept as pending; reports say whether
//! everything reached the store via [`Durability`].

mod decay;
pub mod keys;
mod outcome;
mod progress;


pub use decay::HappinessDecayTimer;
pub use outcome::{
    CompletionReport, DecayTick, Durability, OnboardingReport, Rejection, SpendOutcome,
    StreakUpdate, ToggleOutcome, UncompleteReport,
};
pub use progress::{
    achievements, calendar, Achievement, CalendarDay, CompletionCount, Mood, ProgressSnapshot,
    UserProgress,
};

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::{debug, info, warn};

use crate::error::{CoreError, Result, StoreError, ValidationError};
use crate::events::LedgerEvent;
use crate::item::{next_id, Item, ItemKind};
use crate::onboarding::HabitTemplate;
use crate::storage::{Config, HappinessConfig, KvStore, RewardsConfig};

pub struct RewardLedger<S> {
    inner: Mutex<Inner<S>>,
    rewards: RewardsConfig,
    happiness: HappinessConfig,
}

struct Inner<S> {
    store: S,
    progress: UserProgress,
    tasks: Vec<Item>,
    habits: Vec<Item>,
    onboarded: bool,
    /// Latest values that have not reached the store yet, by key.
    /// `None` is a removal that has not reached the store.
    pending: BTreeMap<String, Option<String>>,
    ticks_since_persist: u32,
    events: Vec<LedgerEvent>,
}

impl<S: KvStore> RewardLedger<S> {
    /// Load ledger state from `store`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or holds a value that
    /// does not decode.
    pub fn open(store: S, config: &Config) -> Result<Self> {
        let mut inner = Inner {
            store,
            progress: UserProgress::fresh(config.happiness.initial),
            tasks: Vec::new(),
            habits: Vec::new(),
            onboarded: false,
            pending: BTreeMap::new(),
            ticks_since_persist: 0,
            events: Vec::new(),
        };
        inner.load(config.happiness.initial)?;
        debug!(
            fire_points = inner.progress.fire_points_total,
            happiness = inner.progress.happiness,
            streak = inner.progress.streak_days,
            "reward ledger loaded"
        );

        Ok(Self {
            inner: Mutex::new(inner),
            rewards: config.rewards.clone(),
            happiness: config.happiness.clone(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner<S>>> {
        self.inner
            .lock()
            .map_err(|_| CoreError::Store(StoreError::Poisoned))
    }

    pub fn happiness_config(&self) -> &HappinessConfig {
        &self.happiness
    }

    // ── Completion ───────────────────────────────────────────────────

    /// Toggle the completion state of an item on `today`.
    ///
    /// Rejections leave every value untouched, and so do errors: all store
    /// reads happen before the first mutation.
    pub fn toggle_completion(&self, kind: ItemKind, id: &str, today: NaiveDate) -> Result<ToggleOutcome> {
        let mut inner = self.lock()?;
        let idx = inner.position(kind, id)?;
        let last_completion = inner.read_day(&keys::last_completion_key(kind, id))?;
        let fires_today = inner.fires_on(today)?;

        if inner.items(kind)[idx].completed {
            if last_completion == Some(today) {
                debug!(%kind, id, "toggle rejected: already completed today");
                return Ok(ToggleOutcome::Rejected(Rejection::AlreadyCompletedToday));
            }
            let report = inner.uncomplete(kind, idx)?;
            return Ok(ToggleOutcome::Uncompleted(report));
        }

        // Re-completing after an undo on the same day must not pay out twice.
        let grant = last_completion != Some(today);
        if grant {
            if let Some(limit) = self.rewards.daily_fire_limit(kind) {
                if fires_today >= limit {
                    debug!(%kind, id, earned = fires_today, limit, "toggle rejected: daily fire limit");
                    return Ok(ToggleOutcome::Rejected(Rejection::DailyLimitReached { limit }));
                }
            }
        }

        let report = inner.complete(kind, idx, today, fires_today, grant, self.happiness.completion_bonus)?;
        Ok(ToggleOutcome::Completed(report))
    }

    /// Explicitly mark an item not completed, whatever day it was completed on.
    ///
    /// Fire points, happiness and streak days are not revoked; a habit's own
    /// streak drops by one.
    pub fn uncomplete(&self, kind: ItemKind, id: &str) -> Result<UncompleteReport> {
        let mut inner = self.lock()?;
        let idx = inner.position(kind, id)?;
        if !inner.items(kind)[idx].completed {
            return Ok(UncompleteReport {
                kind,
                item: inner.items(kind)[idx].clone(),
                changed: false,
                durability: Durability::Persisted,
            });
        }
        inner.uncomplete(kind, idx)
    }

    /// Apply the daily streak rule for an engagement on `today`.
    pub fn update_streak(&self, today: NaiveDate) -> Result<StreakUpdate> {
        let mut inner = self.lock()?;
        Ok(inner.advance_streak(today))
    }

    // ── Happiness ────────────────────────────────────────────────────

    /// One decay tick: happiness drops by 1, floored at 0.
    ///
    /// The value is written every `persist_every_ticks` ticks; in between it
    /// is pending and reported as [`Durability::InMemoryOnly`].
    pub fn decay_happiness(&self) -> Result<DecayTick> {
        let mut inner = self.lock()?;
        let previous = inner.progress.happiness;
        let happiness = previous.saturating_sub(1);
        inner.progress.happiness = happiness;
        inner.ticks_since_persist += 1;

        let durability = if inner.ticks_since_persist >= self.happiness.persist_every_ticks {
            inner.ticks_since_persist = 0;
            inner.put(keys::HAPPINESS, happiness.to_string())
        } else {
            inner.defer(keys::HAPPINESS, happiness.to_string())
        };

        if happiness != previous {
            inner.events.push(LedgerEvent::HappinessChanged {
                from: previous,
                to: happiness,
            });
        }
        Ok(DecayTick {
            previous,
            happiness,
            durability,
        })
    }

    /// Retry every pending write.
    pub fn flush(&self) -> Result<Durability> {
        let mut inner = self.lock()?;
        inner.ticks_since_persist = 0;
        let pending = std::mem::take(&mut inner.pending);
        for (key, value) in pending {
            match value {
                Some(value) => inner.put(&key, value),
                None => inner.erase(&key),
            };
        }
        Ok(if inner.pending.is_empty() {
            Durability::Persisted
        } else {
            Durability::InMemoryOnly
        })
    }

    /// True when nothing is waiting to be written.
    pub fn is_durable(&self) -> Result<bool> {
        Ok(self.lock()?.pending.is_empty())
    }

    pub fn pending_keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.pending.keys().cloned().collect())
    }

    // ── Currency ─────────────────────────────────────────────────────

    /// Spend fire points on a cosmetic purchase.
    pub fn spend_fire_points(&self, amount: u64) -> Result<SpendOutcome> {
        if amount == 0 {
            return Err(ValidationError::InvalidValue {
                field: "amount".to_string(),
                message: "must be > 0".to_string(),
            }
            .into());
        }

        let mut inner = self.lock()?;
        let balance = inner.progress.fire_points_total;
        if balance < amount {
            return Ok(SpendOutcome::Rejected(Rejection::InsufficientPoints {
                balance,
                requested: amount,
            }));
        }

        let remaining = balance - amount;
        inner.progress.fire_points_total = remaining;
        let durability = inner.put(keys::TOTAL_FIRE_POINTS, remaining.to_string());
        inner
            .events
            .push(LedgerEvent::FirePointsSpent { amount, remaining });
        info!(amount, remaining, "fire points spent");

        Ok(SpendOutcome::Spent {
            amount,
            remaining,
            durability,
        })
    }

    // ── Items ────────────────────────────────────────────────────────

    pub fn items(&self, kind: ItemKind) -> Result<Vec<Item>> {
        Ok(self.lock()?.items(kind).clone())
    }

    pub fn item(&self, kind: ItemKind, id: &str) -> Result<Item> {
        let inner = self.lock()?;
        let idx = inner.position(kind, id)?;
        Ok(inner.items(kind)[idx].clone())
    }

    pub fn add_item(&self, kind: ItemKind, text: &str, now: DateTime<Utc>) -> Result<Item> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText.into());
        }

        let mut inner = self.lock()?;
        let item = Item::new(next_id(inner.items(kind), now), text, now);
        inner.items_mut(kind).push(item.clone());
        inner.put_items(kind)?;
        debug!(%kind, id = %item.id, "item added");
        Ok(item)
    }

    /// Delete an item and its completion guard.
    pub fn delete_item(&self, kind: ItemKind, id: &str) -> Result<Item> {
        let mut inner = self.lock()?;
        let idx = inner.position(kind, id)?;
        let item = inner.items_mut(kind).remove(idx);
        inner.put_items(kind)?;

        inner.erase(&keys::last_completion_key(kind, id));
        debug!(%kind, id, "item deleted");
        Ok(item)
    }

    /// Clear completed flags (and habit streaks). Returns how many items changed.
    ///
    /// Completion guards are kept, so a reset item completed again on a day
    /// it was already rewarded for earns nothing.
    pub fn reset_items(&self, kind: ItemKind) -> Result<usize> {
        let mut inner = self.lock()?;
        let mut changed = 0;
        for item in inner.items_mut(kind).iter_mut() {
            if item.completed || item.streak > 0 {
                item.completed = false;
                item.streak = 0;
                changed += 1;
            }
        }
        if changed > 0 {
            inner.put_items(kind)?;
        }
        debug!(%kind, changed, "items reset");
        Ok(changed)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Seed habits from templates and write default progress values.
    ///
    /// Only a ledger with no items and no earned progress can be onboarded.
    pub fn complete_onboarding(&self, templates: &[HabitTemplate], now: DateTime<Utc>) -> Result<OnboardingReport> {
        let mut inner = self.lock()?;
        if inner.onboarded {
            return Err(ValidationError::AlreadyOnboarded.into());
        }
        if inner.has_activity() {
            return Err(ValidationError::ActivityBeforeOnboarding.into());
        }

        inner.progress = UserProgress::fresh(self.happiness.initial);
        let happiness = inner.progress.happiness;
        let mut durability = inner.put(keys::TOTAL_FIRE_POINTS, "0".to_string());
        durability = durability.and(inner.put(keys::HAPPINESS, happiness.to_string()));
        durability = durability.and(inner.put(keys::USER_STREAK, "0".to_string()));
        durability = durability.and(inner.erase(keys::LAST_ACTIVE_DATE));

        let mut habits = Vec::with_capacity(templates.len());
        for template in templates {
            let item = Item::new(next_id(&inner.habits, now), template.name, now);
            inner.habits.push(item.clone());
            habits.push(item);
        }
        durability = durability.and(inner.put_items(ItemKind::Habit)?);
        durability = durability.and(inner.put(keys::ONBOARDING_COMPLETE, "true".to_string()));
        inner.onboarded = true;

        info!(habits = habits.len(), "onboarding completed");
        Ok(OnboardingReport { habits, durability })
    }

    /// Remove every key the ledger owns and reset to defaults.
    /// Returns the number of keys removed.
    ///
    /// The key scan happens before anything changes. Removals that fail
    /// stay pending, so reads already see the cleared state.
    pub fn clear_all_data(&self) -> Result<usize> {
        let mut inner = self.lock()?;

        let mut doomed: Vec<String> = [
            keys::TOTAL_FIRE_POINTS,
            keys::HAPPINESS,
            keys::USER_STREAK,
            keys::LAST_ACTIVE_DATE,
            keys::USER_TASKS,
            keys::USER_HABITS,
            keys::ONBOARDING_COMPLETE,
        ]
        .into_iter()
        .map(str::to_string)
        .collect();
        doomed.extend(inner.store.keys_with_prefix(keys::FIRES_PREFIX)?);
        for kind in ItemKind::ALL {
            let prefix = format!("{kind}_");
            doomed.extend(
                inner
                    .store
                    .keys_with_prefix(&prefix)?
                    .into_iter()
                    .filter(|k| keys::is_last_completion_key(k)),
            );
        }

        let mut present = Vec::with_capacity(doomed.len());
        for key in doomed {
            if inner.store.get(&key)?.is_some() {
                present.push(key);
            }
        }

        inner.progress = UserProgress::fresh(self.happiness.initial);
        inner.tasks.clear();
        inner.habits.clear();
        inner.onboarded = false;
        inner.pending.clear();
        inner.ticks_since_persist = 0;
        inner.events.clear();
        inner.events.push(LedgerEvent::DataCleared);

        let mut durability = Durability::Persisted;
        for key in &present {
            durability = durability.and(inner.erase(key));
        }

        let removed = present.len();
        info!(removed, persisted = durability.is_persisted(), "all ledger data cleared");
        Ok(removed)
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn user_progress(&self) -> Result<UserProgress> {
        Ok(self.lock()?.progress.clone())
    }

    pub fn fires_earned_on(&self, day: NaiveDate) -> Result<u32> {
        self.lock()?.fires_on(day)
    }

    pub fn progress(&self, today: NaiveDate) -> Result<ProgressSnapshot> {
        let inner = self.lock()?;
        let fires_earned_today = inner.fires_on(today)?;
        let remaining = |kind| {
            self.rewards
                .daily_fire_limit(kind)
                .map(|limit| limit.saturating_sub(fires_earned_today))
        };

        Ok(ProgressSnapshot {
            day: today,
            fire_points_total: inner.progress.fire_points_total,
            fires_earned_today,
            task_fires_remaining: remaining(ItemKind::Task),
            habit_fires_remaining: remaining(ItemKind::Habit),
            happiness: inner.progress.happiness,
            mood: Mood::from_happiness(inner.progress.happiness),
            streak_days: inner.progress.streak_days,
            last_active_date: inner.progress.last_active_date,
            tasks: CompletionCount::of(&inner.tasks),
            habits: CompletionCount::of(&inner.habits),
            onboarded: inner.onboarded,
        })
    }

    /// Per-day counts for `from..=to`, with creation days taken in `tz`.
    pub fn calendar<Tz: TimeZone>(
        &self,
        kind: ItemKind,
        from: NaiveDate,
        to: NaiveDate,
        tz: &Tz,
    ) -> Result<Vec<CalendarDay>> {
        Ok(calendar(self.lock()?.items(kind), from, to, tz))
    }

    /// Take all events queued since the last drain.
    pub fn drain_events(&self) -> Result<Vec<LedgerEvent>> {
        Ok(std::mem::take(&mut self.lock()?.events))
    }
}

impl<S: KvStore> Inner<S> {
    fn load(&mut self, initial_happiness: u32) -> Result<()> {
        self.progress = UserProgress {
            fire_points_total: self.read_u64(keys::TOTAL_FIRE_POINTS)?.unwrap_or(0),
            happiness: self
                .read_u64(keys::HAPPINESS)?
                .map(|h| h.min(100) as u32)
                .unwrap_or_else(|| initial_happiness.min(100)),
            streak_days: self.read_u32(keys::USER_STREAK)?.unwrap_or(0),
            last_active_date: self.read_day(keys::LAST_ACTIVE_DATE)?,
        };
        self.tasks = self.read_items(ItemKind::Task)?;
        self.habits = self.read_items(ItemKind::Habit)?;
        self.onboarded = self.read(keys::ONBOARDING_COMPLETE)?.as_deref() == Some("true");
        Ok(())
    }

    // ── Store access ─────────────────────────────────────────────────

    fn read(&self, key: &str) -> Result<Option<String>> {
        if let Some(value) = self.pending.get(key) {
            return Ok(value.clone());
        }
        Ok(self.store.get(key)?)
    }

    fn read_u64(&self, key: &str) -> Result<Option<u64>> {
        self.read(key)?
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| CoreError::CorruptValue {
                    key: key.to_string(),
                    message: format!("'{raw}': {e}"),
                })
            })
            .transpose()
    }

    fn read_u32(&self, key: &str) -> Result<Option<u32>> {
        self.read_u64(key)?
            .map(|n| {
                u32::try_from(n).map_err(|e| CoreError::CorruptValue {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    fn read_day(&self, key: &str) -> Result<Option<NaiveDate>> {
        self.read(key)?
            .map(|raw| {
                keys::parse_day(&raw).ok_or_else(|| CoreError::CorruptValue {
                    key: key.to_string(),
                    message: format!("'{raw}' is not a YYYY-MM-DD date"),
                })
            })
            .transpose()
    }

    fn read_items(&self, kind: ItemKind) -> Result<Vec<Item>> {
        let key = keys::items_key(kind);
        match self.read(key)? {
            None => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json).map_err(|e| CoreError::CorruptValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn fires_on(&self, day: NaiveDate) -> Result<u32> {
        Ok(self.read_u32(&keys::fires_key(day))?.unwrap_or(0))
    }

    /// Write now; on failure keep the value pending.
    fn put(&mut self, key: &str, value: String) -> Durability {
        match self.store.set(key, &value) {
            Ok(()) => {
                self.pending.remove(key);
                Durability::Persisted
            }
            Err(e) => {
                warn!(key, error = %e, "store write failed; value kept in memory");
                self.pending.insert(key.to_string(), Some(value));
                Durability::InMemoryOnly
            }
        }
    }

    /// Remove now; on failure keep the removal pending.
    fn erase(&mut self, key: &str) -> Durability {
        match self.store.remove(key) {
            Ok(()) => {
                self.pending.remove(key);
                Durability::Persisted
            }
            Err(e) => {
                warn!(key, error = %e, "store remove failed; removal kept in memory");
                self.pending.insert(key.to_string(), None);
                Durability::InMemoryOnly
            }
        }
    }

    /// Record a value without writing it yet.
    fn defer(&mut self, key: &str, value: String) -> Durability {
        self.pending.insert(key.to_string(), Some(value));
        Durability::InMemoryOnly
    }

    fn put_items(&mut self, kind: ItemKind) -> Result<Durability> {
        let json = serde_json::to_string(self.items(kind))?;
        Ok(self.put(keys::items_key(kind), json))
    }

    // ── Items ────────────────────────────────────────────────────────

    fn items(&self, kind: ItemKind) -> &Vec<Item> {
        match kind {
            ItemKind::Task => &self.tasks,
            ItemKind::Habit => &self.habits,
        }
    }

    fn items_mut(&mut self, kind: ItemKind) -> &mut Vec<Item> {
        match kind {
            ItemKind::Task => &mut self.tasks,
            ItemKind::Habit => &mut self.habits,
        }
    }

    fn has_activity(&self) -> bool {
        !self.tasks.is_empty()
            || !self.habits.is_empty()
            || self.progress.fire_points_total > 0
            || self.progress.streak_days > 0
            || self.progress.last_active_date.is_some()
    }

    fn position(&self, kind: ItemKind, id: &str) -> Result<usize> {
        self.items(kind)
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| {
                ValidationError::ItemNotFound {
                    kind,
                    id: id.to_string(),
                }
                .into()
            })
    }

    // ── Transitions ──────────────────────────────────────────────────

    fn complete(
        &mut self,
        kind: ItemKind,
        idx: usize,
        today: NaiveDate,
        fires_today: u32,
        grant: bool,
        happiness_bonus: u32,
    ) -> Result<CompletionReport> {
        {
            let item = &mut self.items_mut(kind)[idx];
            item.completed = true;
            if kind == ItemKind::Habit {
                item.streak = item.streak.saturating_add(1);
            }
        }
        let mut durability = self.put_items(kind)?;
        let item = self.items(kind)[idx].clone();

        let mut fires_earned_today = fires_today;
        if grant {
            self.progress.fire_points_total = self.progress.fire_points_total.saturating_add(1);
            fires_earned_today = fires_earned_today.saturating_add(1);
            let total = self.progress.fire_points_total;
            durability = durability.and(self.put(keys::TOTAL_FIRE_POINTS, total.to_string()));
            durability = durability.and(self.put(&keys::fires_key(today), fires_earned_today.to_string()));
            durability = durability.and(self.put(
                &keys::last_completion_key(kind, &item.id),
                keys::format_day(today),
            ));
            self.events.push(LedgerEvent::FireEarned {
                total,
                earned_today: fires_earned_today,
                on: today,
            });

            let before = self.progress.happiness;
            let after = before.saturating_add(happiness_bonus).min(100);
            self.progress.happiness = after;
            self.ticks_since_persist = 0;
            durability = durability.and(self.put(keys::HAPPINESS, after.to_string()));
            if after != before {
                self.events.push(LedgerEvent::HappinessChanged { from: before, to: after });
            }
        }

        let streak = self.advance_streak(today);
        durability = durability.and(streak.durability);

        if grant {
            self.events.push(LedgerEvent::Celebration {
                kind,
                item_id: item.id.clone(),
                on: today,
            });
        }
        debug!(
            %kind,
            id = %item.id,
            grant,
            total = self.progress.fire_points_total,
            fires_earned_today,
            streak = streak.current,
            "item completed"
        );

        Ok(CompletionReport {
            kind,
            item,
            fire_granted: grant,
            fire_points_total: self.progress.fire_points_total,
            fires_earned_today,
            happiness: self.progress.happiness,
            streak,
            day: today,
            durability,
        })
    }

    fn uncomplete(&mut self, kind: ItemKind, idx: usize) -> Result<UncompleteReport> {
        {
            let item = &mut self.items_mut(kind)[idx];
            item.completed = false;
            if kind == ItemKind::Habit {
                item.streak = item.streak.saturating_sub(1);
            }
        }
        let durability = self.put_items(kind)?;
        let item = self.items(kind)[idx].clone();
        self.events.push(LedgerEvent::ItemUncompleted {
            kind,
            item_id: item.id.clone(),
        });
        debug!(%kind, id = %item.id, "item uncompleted");

        Ok(UncompleteReport {
            kind,
            item,
            changed: true,
            durability,
        })
    }

    fn advance_streak(&mut self, today: NaiveDate) -> StreakUpdate {
        let previous = self.progress.streak_days;
        let current = match self.progress.last_active_date {
            Some(last) if last == today => {
                return StreakUpdate {
                    previous,
                    current: previous,
                    durability: Durability::Persisted,
                };
            }
            Some(last) if last.succ_opt() == Some(today) => previous.saturating_add(1),
            _ => 1,
        };

        self.progress.streak_days = current;
        self.progress.last_active_date = Some(today);
        let durability = self
            .put(keys::USER_STREAK, current.to_string())
            .and(self.put(keys::LAST_ACTIVE_DATE, keys::format_day(today)));

        if current > previous {
            self.events.push(LedgerEvent::StreakIncreased {
                from: previous,
                to: current,
                on: today,
            });
        } else {
            self.events.push(LedgerEvent::StreakReset {
                from: previous,
                on: today,
            });
        }

        StreakUpdate {
            previous,
            current,
            durability,
        }
    }
}
