//! Logging configuration

use serde::Deserialize;

use super::error::ValidationError;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Log output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        // Full filter directives like "gym_ops=debug" are passed through as-is.
        let level = self.level.trim().to_lowercase();
        if level.is_empty() || (!level.contains('=') && !LEVELS.contains(&level.as_str())) {
            return Err(ValidationError::InvalidLogLevel(self.level.clone()));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_levels_and_directives() {
        for level in ["info", "DEBUG", "gym_ops=trace,warn"] {
            let config = LoggingConfig {
                level: level.to_string(),
                json: false,
            };
            assert!(config.validate().is_ok(), "{}", level);
        }
    }

    #[test]
    fn rejects_unknown_level() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            json: true,
        };
        assert!(config.validate().is_err());
    }
}
