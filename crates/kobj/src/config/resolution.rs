//! Resolution configuration types.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default minimum token-set similarity (0-100) for fuzzy membership.
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 85;

/// Environment variable overriding the default fuzzy threshold.
pub const FUZZY_THRESHOLD_ENV: &str = "KOBJ_FUZZY_THRESHOLD";

/// Settings for knowledge-object clustering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Inclusive similarity bound a fuzzy candidate must reach to join a cluster.
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: u8,
}

fn default_fuzzy_threshold() -> u8 {
    match std::env::var(FUZZY_THRESHOLD_ENV) {
        Ok(val) => match val.trim().parse::<u8>() {
            Ok(threshold) if threshold <= 100 => threshold,
            _ => {
                tracing::warn!(
                    "ignoring {}={:?}, expected an integer between 0 and 100",
                    FUZZY_THRESHOLD_ENV,
                    val
                );
                DEFAULT_FUZZY_THRESHOLD
            }
        },
        Err(_) => DEFAULT_FUZZY_THRESHOLD,
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
        }
    }
}

impl ResolutionConfig {
    pub fn with_threshold(fuzzy_threshold: u8) -> Self {
        Self { fuzzy_threshold }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fuzzy_threshold > 100 {
            return Err(ConfigError::InvalidThreshold(self.fuzzy_threshold));
        }
        Ok(())
    }

    /// Check if this is the default config.
    pub fn is_default(&self) -> bool {
        self.fuzzy_threshold == DEFAULT_FUZZY_THRESHOLD
    }
}
