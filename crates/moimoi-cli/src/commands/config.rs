//! Reward policy configuration for CLI.

use clap::Subcommand;
use moimoi_core::{Config, ConfigError};

use super::CmdResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dot-separated key
    Get {
        /// e.g. "rewards.task_daily_fire_limit", "happiness.completion_bonus"
        key: String,
    },
    /// Change one value ("none" or 0 removes a daily cap)
    Set {
        key: String,
        value: String,
    },
    /// Print the whole config as TOML
    List,
    /// Write the default config
    Reset,
}

pub fn run(action: ConfigAction) -> CmdResult {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List => {
            print!("{}", toml::to_string_pretty(&Config::load()?)?);
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
