pub mod calendar;
pub mod companion;
pub mod config;
pub mod data;
pub mod item;
pub mod onboard;
pub mod progress;

use chrono::{Local, NaiveDate};
use moimoi_core::{Config, Database, LedgerEvent, RewardLedger};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Exit code for a request the ledger turned down.
pub const REJECTED_EXIT_CODE: i32 = 2;

/// Local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Open the ledger over the default database with the saved config.
pub fn open_ledger() -> Result<RewardLedger<Database>, moimoi_core::CoreError> {
    let config = Config::load()?;
    let db = Database::open()?;
    RewardLedger::open(db, &config)
}

pub fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print queued ledger events as one-line notices on stderr.
pub fn report_events(ledger: &RewardLedger<Database>) -> CmdResult {
    for event in ledger.drain_events()? {
        match event {
            LedgerEvent::Celebration { kind, item_id, .. } => {
                eprintln!("🎉 {kind} {item_id} done!");
            }
            LedgerEvent::StreakIncreased { to, .. } => eprintln!("🔥 streak: {to} days"),
            LedgerEvent::StreakReset { from, .. } if from > 0 => {
                eprintln!("streak restarted (was {from} days)");
            }
            _ => {}
        }
    }
    Ok(())
}
