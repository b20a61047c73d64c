use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::item::{Item, ItemKind};

/// Whether every write issued by a call reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Durability {
    Persisted,
    /// Applied in memory; at least one value is waiting for [`super::RewardLedger::flush`].
    InMemoryOnly,
}

impl Durability {
    pub fn and(self, other: Durability) -> Durability {
        match (self, other) {
            (Durability::Persisted, Durability::Persisted) => Durability::Persisted,
            _ => Durability::InMemoryOnly,
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, Durability::Persisted)
    }
}

/// Expected, user-facing reasons an operation was not performed.
/// Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    AlreadyCompletedToday,
    DailyLimitReached { limit: u32 },
    InsufficientPoints { balance: u64, requested: u64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::AlreadyCompletedToday => {
                write!(f, "Already completed today. Come back tomorrow!")
            }
            Rejection::DailyLimitReached { limit } => {
                write!(f, "Daily fire limit reached ({limit}). Try again tomorrow.")
            }
            Rejection::InsufficientPoints { balance, requested } => {
                write!(f, "Not enough fire points: have {balance}, need {requested}.")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakUpdate {
    pub previous: u32,
    pub current: u32,
    pub durability: Durability,
}

impl StreakUpdate {
    pub fn increased(&self) -> bool {
        self.current > self.previous
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionReport {
    pub kind: ItemKind,
    pub item: Item,
    /// False when the item was already rewarded today and is being re-completed.
    pub fire_granted: bool,
    pub fire_points_total: u64,
    pub fires_earned_today: u32,
    pub happiness: u32,
    pub streak: StreakUpdate,
    pub day: NaiveDate,
    pub durability: Durability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UncompleteReport {
    pub kind: ItemKind,
    pub item: Item,
    /// False when the item was not completed to begin with.
    pub changed: bool,
    pub durability: Durability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToggleOutcome {
    Completed(CompletionReport),
    Uncompleted(UncompleteReport),
    Rejected(Rejection),
}

impl ToggleOutcome {
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            ToggleOutcome::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecayTick {
    pub previous: u32,
    pub happiness: u32,
    pub durability: Durability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SpendOutcome {
    Spent {
        amount: u64,
        remaining: u64,
        durability: Durability,
    },
    Rejected(Rejection),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnboardingReport {
    pub habits: Vec<Item>,
    pub durability: Durability,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durability_is_sticky() {
        use Durability::*;
        assert_eq!(Persisted.and(Persisted), Persisted);
        assert_eq!(Persisted.and(InMemoryOnly), InMemoryOnly);
        assert_eq!(InMemoryOnly.and(Persisted), InMemoryOnly);
    }

    #[test]
    fn rejected_outcome_serializes_reason() {
        let outcome = ToggleOutcome::Rejected(Rejection::DailyLimitReached { limit: 5 });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "rejected");
        assert_eq!(json["reason"], "daily_limit_reached");
        assert_eq!(json["limit"], 5);
    }
}
