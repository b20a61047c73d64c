//! Fire points, happiness and streak commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use moimoi_core::ledger::{achievements, Achievement};
use moimoi_core::SpendOutcome;
use serde::Serialize;

use super::{open_ledger, print_json, CmdResult, REJECTED_EXIT_CODE};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Show today's progress
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Spend fire points
    Spend {
        /// Number of fire points
        amount: u64,
    },
    /// Apply happiness decay ticks and write the result
    Decay {
        /// Number of ticks (default: 1)
        #[arg(long, default_value = "1")]
        ticks: u32,
    },
}

pub fn run(action: ProgressAction, today: NaiveDate) -> CmdResult {
    let ledger = open_ledger()?;

    match action {
        ProgressAction::Show { json } => {
            let snapshot = ledger.progress(today)?;
            if json {
                return print_json(&snapshot);
            }
            println!("Day:         {}", snapshot.day);
            println!("Fire points: {}", snapshot.fire_points_total);
            match snapshot.task_fires_remaining {
                Some(left) => println!("Today:       {} earned, {left} left", snapshot.fires_earned_today),
                None => println!("Today:       {} earned", snapshot.fires_earned_today),
            }
            println!("Happiness:   {} ({:?})", snapshot.happiness, snapshot.mood);
            println!("Streak:      {} days", snapshot.streak_days);
            println!(
                "Tasks:       {}/{} ({}%)",
                snapshot.tasks.completed,
                snapshot.tasks.total,
                snapshot.tasks.percent()
            );
            println!(
                "Habits:      {}/{} ({}%)",
                snapshot.habits.completed,
                snapshot.habits.total,
                snapshot.habits.percent()
            );
        }
        ProgressAction::Spend { amount } => {
            let outcome = ledger.spend_fire_points(amount)?;
            print_json(&outcome)?;
            if let SpendOutcome::Rejected(rejection) = outcome {
                eprintln!("{rejection}");
                std::process::exit(REJECTED_EXIT_CODE);
            }
        }
        ProgressAction::Decay { ticks } => {
            let mut happiness = ledger.user_progress()?.happiness;
            for _ in 0..ticks {
                happiness = ledger.decay_happiness()?.happiness;
            }
            let durability = ledger.flush()?;
            if !durability.is_persisted() {
                return Err(format!("happiness {happiness} could not be written").into());
            }
            println!("happiness: {happiness}");
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct StreakView {
    streak_days: u32,
    last_active_date: Option<NaiveDate>,
    achievements: Vec<Achievement>,
}

pub fn streak(json: bool, today: NaiveDate) -> CmdResult {
    let ledger = open_ledger()?;
    let snapshot = ledger.progress(today)?;
    let view = StreakView {
        streak_days: snapshot.streak_days,
        last_active_date: snapshot.last_active_date,
        achievements: achievements(&snapshot),
    };

    if json {
        return print_json(&view);
    }
    println!("Streak: {} days", view.streak_days);
    if let Some(last) = view.last_active_date {
        println!("Last active: {last}");
    }
    for achievement in &view.achievements {
        println!("  * {}", achievement.label());
    }
    Ok(())
}
