//! Runtime configuration defaults
//!
//! Display and scan tuning knobs with environment overrides. CLI flags
//! take precedence over these values.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChronoscanConfig {
    pub display: DisplayConfig,
    pub scan: ScanTuning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Default maximum events to print per listing.
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanTuning {
    /// Log a progress line every this many files.
    pub progress_interval: usize,
}

impl Default for ChronoscanConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig { limit: 50 },
            scan: ScanTuning {
                progress_interval: 500,
            },
        }
    }
}

impl ChronoscanConfig {
    /// Defaults overridden by environment variables where present.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CHRONOSCAN_DISPLAY_LIMIT") {
            if let Ok(limit) = val.parse::<usize>() {
                config.display.limit = limit;
            }
        }

        if let Ok(val) = std::env::var("CHRONOSCAN_PROGRESS_INTERVAL") {
            if let Ok(interval) = val.parse::<usize>() {
                config.scan.progress_interval = interval;
            }
        }

        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.display.limit == 0 {
            return Err("display limit must be greater than 0".to_string());
        }
        if self.scan.progress_interval == 0 {
            return Err("progress interval must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ChronoscanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.display.limit, 50);
        assert_eq!(config.scan.progress_interval, 500);
    }

    #[test]
    fn zeroed_values_fail_validation() {
        let mut config = ChronoscanConfig::default();
        config.display.limit = 0;
        assert!(config.validate().is_err());

        let mut config = ChronoscanConfig::default();
        config.scan.progress_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides_apply() {
        std::env::set_var("CHRONOSCAN_DISPLAY_LIMIT", "25");
        std::env::set_var("CHRONOSCAN_PROGRESS_INTERVAL", "100");

        let config = ChronoscanConfig::from_env();
        assert_eq!(config.display.limit, 25);
        assert_eq!(config.scan.progress_interval, 100);

        std::env::remove_var("CHRONOSCAN_DISPLAY_LIMIT");
        std::env::remove_var("CHRONOSCAN_PROGRESS_INTERVAL");
    }
}
