use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::item::ItemKind;

/// Every ledger state change produces an Event.
/// The UI drains them to drive celebrations and gauges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LedgerEvent {
    /// A rewarded completion; the UI shows its celebration.
    Celebration {
        kind: ItemKind,
        item_id: String,
        on: NaiveDate,
    },
    FireEarned {
        total: u64,
        earned_today: u32,
        on: NaiveDate,
    },
    StreakIncreased {
        from: u32,
        to: u32,
        on: NaiveDate,
    },
    /// Streak restarted at 1 after a gap.
    StreakReset {
        from: u32,
        on: NaiveDate,
    },
    HappinessChanged {
        from: u32,
        to: u32,
    },
    ItemUncompleted {
        kind: ItemKind,
        item_id: String,
    },
    FirePointsSpent {
        amount: u64,
        remaining: u64,
    },
    DataCleared,
}
