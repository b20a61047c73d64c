//! Calendar view for CLI.
//!
//! Items are bucketed by the local day they were created on.

use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use moimoi_core::ItemKind;

use super::{open_ledger, print_json, CmdResult};

#[derive(Args)]
pub struct CalendarArgs {
    /// Which items to show: task or habit
    #[arg(long, default_value = "task")]
    kind: ItemKind,
    /// First day (default: 6 days before today)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day (default: today)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CalendarArgs, today: NaiveDate) -> CmdResult {
    let to = args.to.unwrap_or(today);
    let from = args.from.unwrap_or(to - Duration::days(6));
    if from > to {
        return Err(format!("--from {from} is after --to {to}").into());
    }

    let ledger = open_ledger()?;
    let days = ledger.calendar(args.kind, from, to, &Local)?;
    if args.json {
        return print_json(&days);
    }
    for day in &days {
        println!(
            "{}  {:>2} created  {:>2} completed",
            day.day.format("%a %Y-%m-%d"),
            day.created,
            day.completed
        );
    }
    Ok(())
}
