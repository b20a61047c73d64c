//! TOML-based application configuration.
//!
//! Stores the reward policy knobs:
//! - Per-flow daily fire caps (tasks and habits are configured separately)
//! - Companion happiness bonus, decay cadence and persist cadence
//!
//! Configuration is stored at `~/.config/moimoi/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::item::ItemKind;

/// Fire-point policy.
///
/// Caps are written as `0` in the file when unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsConfig {
    /// Daily cap for the task flow. `None` means unbounded.
    #[serde(default = "default_task_daily_fire_limit", with = "unbounded_as_zero")]
    pub task_daily_fire_limit: Option<u32>,
    /// Daily cap for the habit flow. `None` means unbounded.
    #[serde(default, with = "unbounded_as_zero")]
    pub habit_daily_fire_limit: Option<u32>,
}

mod unbounded_as_zero {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(limit: &Option<u32>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u32(limit.unwrap_or(0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(Option::<u32>::deserialize(d)?.filter(|n| *n != 0))
    }
}

/// Companion happiness policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HappinessConfig {
    /// Happiness written at onboarding and used when nothing is stored.
    #[serde(default = "default_initial_happiness")]
    pub initial: u32,
    /// Bonus applied per rewarded completion.
    #[serde(default = "default_completion_bonus")]
    pub completion_bonus: u32,
    /// Seconds between decay ticks while the app is in the foreground.
    #[serde(default = "default_decay_interval_secs")]
    pub decay_interval_secs: u64,
    /// Decay ticks between writes of the happiness value.
    #[serde(default = "default_persist_every_ticks")]
    pub persist_every_ticks: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/moimoi/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rewards: RewardsConfig,
    #[serde(default)]
    pub happiness: HappinessConfig,
}

// Default functions
fn default_task_daily_fire_limit() -> Option<u32> {
    Some(5)
}
fn default_initial_happiness() -> u32 {
    100
}
fn default_completion_bonus() -> u32 {
    15
}
fn default_decay_interval_secs() -> u64 {
    60
}
fn default_persist_every_ticks() -> u32 {
    10
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            task_daily_fire_limit: default_task_daily_fire_limit(),
            habit_daily_fire_limit: None,
        }
    }
}

impl RewardsConfig {
    /// Cap for the flow `kind` completes through.
    pub fn daily_fire_limit(&self, kind: ItemKind) -> Option<u32> {
        match kind {
            ItemKind::Task => self.task_daily_fire_limit,
            ItemKind::Habit => self.habit_daily_fire_limit,
        }
    }
}

impl Default for HappinessConfig {
    fn default() -> Self {
        Self {
            initial: default_initial_happiness(),
            completion_bonus: default_completion_bonus(),
            decay_interval_secs: default_decay_interval_secs(),
            persist_every_ticks: default_persist_every_ticks(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                // "none" clears an optional cap.
                let new_value = if value.eq_ignore_ascii_case("none") {
                    serde_json::Value::Null
                } else {
                    match existing {
                        serde_json::Value::Bool(_) => serde_json::Value::Bool(
                            value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                        ),
                        serde_json::Value::Number(_) => {
                            let n = value
                                .parse::<u64>()
                                .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                            serde_json::Value::Number(n.into())
                        }
                        serde_json::Value::Object(_) => return Err(unknown()),
                        _ => serde_json::Value::String(value.into()),
                    }
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default (writing it out).
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing the default there if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Check ranges that serde alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.happiness.initial > 100 {
            return Err(invalid("happiness.initial", "must be within 0..=100"));
        }
        if self.happiness.completion_bonus > 100 {
            return Err(invalid("happiness.completion_bonus", "must be within 0..=100"));
        }
        if self.happiness.decay_interval_secs == 0 {
            return Err(invalid("happiness.decay_interval_secs", "must be > 0"));
        }
        if self.happiness.persist_every_ticks == 0 {
            return Err(invalid("happiness.persist_every_ticks", "must be > 0"));
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation. `self` is unchanged on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.rewards.habit_daily_fire_limit, None);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.rewards.task_daily_fire_limit, Some(5));
        assert_eq!(cfg.rewards.habit_daily_fire_limit, None);
        assert_eq!(cfg.happiness.initial, 100);
        assert_eq!(cfg.happiness.completion_bonus, 15);
        assert_eq!(cfg.happiness.decay_interval_secs, 60);
        assert_eq!(cfg.happiness.persist_every_ticks, 10);
    }

    #[test]
    fn daily_fire_limit_is_per_flow() {
        let cfg = RewardsConfig::default();
        assert_eq!(cfg.daily_fire_limit(ItemKind::Task), Some(5));
        assert_eq!(cfg.daily_fire_limit(ItemKind::Habit), None);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("rewards.task_daily_fire_limit").as_deref(), Some("5"));
        assert_eq!(cfg.get("rewards.habit_daily_fire_limit").as_deref(), Some("0"));
        assert_eq!(cfg.get("happiness.completion_bonus").as_deref(), Some("15"));
        assert!(cfg.get("happiness.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_sets_and_clears_optional_caps() {
        let mut cfg = Config::default();
        cfg.apply("rewards.habit_daily_fire_limit", "3").unwrap();
        assert_eq!(cfg.rewards.habit_daily_fire_limit, Some(3));

        cfg.apply("rewards.task_daily_fire_limit", "none").unwrap();
        assert_eq!(cfg.rewards.task_daily_fire_limit, None);

        cfg.apply("rewards.habit_daily_fire_limit", "0").unwrap();
        assert_eq!(cfg.rewards.habit_daily_fire_limit, None);
    }

    #[test]
    fn cleared_task_cap_survives_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.apply("rewards.task_daily_fire_limit", "none").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.rewards.task_daily_fire_limit, None);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("rewards.nonexistent", "1"),
            Err(crate::CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.apply("rewards", "1").is_err());
    }

    #[test]
    fn apply_rejects_out_of_range_and_leaves_config_untouched() {
        let mut cfg = Config::default();
        assert!(cfg.apply("happiness.initial", "150").is_err());
        assert!(cfg.apply("rewards.task_daily_fire_limit", "-1").is_err());
        assert!(cfg.apply("happiness.persist_every_ticks", "soon").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_writes_default_when_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_fills_missing_sections() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[happiness]\ncompletion_bonus = 20\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.happiness.completion_bonus, 20);
        assert_eq!(cfg.happiness.initial, 100);
        assert_eq!(cfg.rewards.task_daily_fire_limit, Some(5));
    }

    #[test]
    fn load_from_rejects_invalid_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[happiness]\ndecay_interval_secs = 0\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
