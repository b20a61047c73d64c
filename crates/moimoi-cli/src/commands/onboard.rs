//! Onboarding commands for CLI.

use chrono::Utc;
use moimoi_core::{catalogue, find_template};

use super::{open_ledger, CmdResult};

pub fn run(ids: &[String]) -> CmdResult {
    let templates = ids
        .iter()
        .map(|id| find_template(id).ok_or_else(|| format!("unknown template: {id}")))
        .collect::<Result<Vec<_>, _>>()?;

    let ledger = open_ledger()?;
    let report = ledger.complete_onboarding(&templates, Utc::now())?;
    println!("Welcome to Moimoi! {} habit(s) added.", report.habits.len());
    for habit in &report.habits {
        println!("  {}  {}", habit.id, habit.text);
    }
    Ok(())
}

pub fn templates() -> CmdResult {
    for template in catalogue() {
        println!("{:<10} {:<14} {}", template.id, format!("{:?}", template.category), template.name);
    }
    Ok(())
}
