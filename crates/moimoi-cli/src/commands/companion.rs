//! Foreground companion for CLI.
//!
//! `watch` keeps the decay timer running until the duration elapses or the
//! process receives Ctrl-C, then flushes happiness.

use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use moimoi_core::HappinessDecayTimer;
use tracing::info;

use super::{open_ledger, CmdResult};

#[derive(Subcommand)]
pub enum CompanionAction {
    /// Keep the companion in the foreground
    Watch {
        /// Stop after this many seconds (default: until Ctrl-C)
        #[arg(long)]
        seconds: Option<u64>,
        /// Override the decay interval in seconds
        #[arg(long)]
        interval: Option<u64>,
    },
}

pub fn run(action: CompanionAction) -> CmdResult {
    match action {
        CompanionAction::Watch { seconds, interval } => {
            if interval == Some(0) {
                return Err("--interval must be > 0".into());
            }
            let ledger = Arc::new(open_ledger()?);
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;

            let before = ledger.user_progress()?.happiness;
            runtime.block_on(async {
                let timer = match interval {
                    Some(secs) => HappinessDecayTimer::start(Arc::clone(&ledger), Duration::from_secs(secs)),
                    None => HappinessDecayTimer::start_configured(Arc::clone(&ledger)),
                };
                info!(happiness = before, "companion in foreground");

                match seconds {
                    Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
                    None => tokio::signal::ctrl_c().await?,
                }
                timer.stop().await;
                Ok::<(), std::io::Error>(())
            })?;

            let after = ledger.user_progress()?.happiness;
            println!("happiness: {before} -> {after}");
            if !ledger.is_durable()? {
                return Err("happiness could not be written".into());
            }
        }
    }
    Ok(())
}
