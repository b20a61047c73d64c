//! Task and habit commands for CLI.

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use moimoi_core::{ItemKind, ToggleOutcome};

use super::{open_ledger, print_json, report_events, CmdResult, REJECTED_EXIT_CODE};

#[derive(Subcommand)]
pub enum ItemAction {
    /// Add an item
    Add {
        /// Item text
        text: String,
    },
    /// List items
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle completion (earns a fire when completing)
    Toggle {
        /// Item ID
        id: String,
    },
    /// Mark an item not completed
    Undo {
        /// Item ID
        id: String,
    },
    /// Delete an item
    Delete {
        /// Item ID
        id: String,
    },
    /// Clear every completion flag
    Reset,
}

pub fn run(kind: ItemKind, action: ItemAction, today: NaiveDate) -> CmdResult {
    let ledger = open_ledger()?;

    match action {
        ItemAction::Add { text } => {
            let item = ledger.add_item(kind, &text, Utc::now())?;
            println!("{} created: {}", capitalized(kind), item.id);
        }
        ItemAction::List { json } => {
            let items = ledger.items(kind)?;
            if json {
                print_json(&items)?;
            } else if items.is_empty() {
                println!("no {kind}s");
            } else {
                for item in &items {
                    let mark = if item.completed { "x" } else { " " };
                    match kind {
                        ItemKind::Habit => {
                            println!("[{mark}] {}  {} (streak {})", item.id, item.text, item.streak)
                        }
                        ItemKind::Task => println!("[{mark}] {}  {}", item.id, item.text),
                    }
                }
            }
        }
        ItemAction::Toggle { id } => {
            let outcome = ledger.toggle_completion(kind, &id, today)?;
            report_events(&ledger)?;
            print_json(&outcome)?;
            if let ToggleOutcome::Rejected(rejection) = outcome {
                eprintln!("{rejection}");
                std::process::exit(REJECTED_EXIT_CODE);
            }
        }
        ItemAction::Undo { id } => {
            let report = ledger.uncomplete(kind, &id)?;
            print_json(&report)?;
        }
        ItemAction::Delete { id } => {
            let item = ledger.delete_item(kind, &id)?;
            println!("{} deleted: {}", capitalized(kind), item.id);
        }
        ItemAction::Reset => {
            let changed = ledger.reset_items(kind)?;
            println!("{changed} {kind}(s) reset");
        }
    }
    Ok(())
}

fn capitalized(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Task => "Task",
        ItemKind::Habit => "Habit",
    }
}
