//! Standard paths used by pomo

use std::path::PathBuf;

/// Standard pomo paths
pub struct Paths {
    /// Data directory (~/.local/share/pomo), holds the log file
    pub data: PathBuf,
    /// Config directory (~/.config/pomo)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("pomo");

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("pomo");

        Self { data, config }
    }

    /// Path of the JSON config file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Path of the tracing log file
    pub fn log_file(&self) -> PathBuf {
        self.data.join("pomo.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_their_dirs() {
        let paths = Paths::new();
        assert!(paths.config_file().starts_with(&paths.config));
        assert!(paths.log_file().starts_with(&paths.data));
        assert!(paths.config.ends_with("pomo"));
    }
}
