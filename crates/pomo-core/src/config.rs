//! User configuration for pomo
//!
//! Read once at startup from `~/.config/pomo/config.json`. Only the default
//! interval lengths live here; nothing the timer does is ever written back.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// pomo configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Focus interval length in minutes
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,

    /// Advisory break length in minutes
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
}

fn default_work_minutes() -> u32 {
    25
}

fn default_break_minutes() -> u32 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_file(test_name: &str) -> PathBuf {
        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        env::temp_dir().join(format!(
            "pomo_config_{}_{}_{}.json",
            std::process::id(),
            test_name,
            counter
        ))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = temp_file("missing");
        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.work_minutes, 25);
        assert_eq!(config.break_minutes, 5);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_file("partial");
        fs::write(&path, r#"{"work_minutes": 50}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.work_minutes, 50);
        assert_eq!(config.break_minutes, 5);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = temp_file("malformed");
        fs::write(&path, "work_minutes = 50").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config JSON"));

        let _ = fs::remove_file(&path);
    }
}
