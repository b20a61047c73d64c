//! # Moimoi Core Library
//!
//! This library provides the bookkeeping behind Moimoi, a gamified habit and
//! task tracker. Completing tasks and habits earns fire points, keeps a daily
//! streak going and keeps the companion character happy. The CLI binary is a
//! thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Reward ledger**: single owner of fire points, daily caps, streaks and
//!   happiness; every mutation goes through it
//! - **Storage**: a string key-value store (SQLite or in-memory) and a
//!   TOML-based configuration
//! - **Decay timer**: a cancellable tokio task that ticks happiness down
//!   while the app is in the foreground
//!
//! ## Key Components
//!
//! - [`RewardLedger`]: completion toggles, streaks, happiness, spending
//! - [`KvStore`]: persistence seam, implemented by [`Database`] and [`MemoryStore`]
//! - [`Config`]: reward policy configuration
//! - [`HappinessDecayTimer`]: foreground decay lifecycle

pub mod error;
pub mod events;
pub mod item;
pub mod ledger;
pub mod onboarding;
pub mod storage;

pub use error::{ConfigError, CoreError, Result, StoreError, ValidationError};
pub use events::LedgerEvent;
pub use item::{Item, ItemKind};
pub use ledger::{
    CompletionReport, DecayTick, Durability, HappinessDecayTimer, ProgressSnapshot, Rejection,
    RewardLedger, SpendOutcome, StreakUpdate, ToggleOutcome, UncompleteReport, UserProgress,
};
pub use onboarding::{catalogue, find_template, HabitTemplate};
pub use storage::{Config, Database, KvStore, MemoryStore};
