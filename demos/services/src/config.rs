//! Demo configuration
//!
//! Defaults are tuned for the binary; tests build their own with the `with_*`
//! builders.

use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding the simulated API latency
pub const LATENCY_ENV_VAR: &str = "TODO_API_LATENCY_MS";

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The latency override is not a whole number of milliseconds
    #[error("Invalid {var}: {value:?} is not a number of milliseconds")]
    InvalidLatency {
        /// Variable that was read
        var: &'static str,
        /// Raw value found
        value: String,
    },
}

/// Settings for the in-memory todo API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesConfig {
    /// Delay applied to every API call
    pub latency: Duration,

    /// Titles the API starts with
    pub seed_todos: Vec<String>,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(50),
            seed_todos: vec!["Read the middleware docs".to_string(), "Write a thunk".to_string()],
        }
    }
}

impl ServicesConfig {
    /// Set the simulated latency
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Replace the seeded todos
    #[must_use]
    pub fn with_seed_todos<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seed_todos = titles.into_iter().map(Into::into).collect();
        self
    }

    /// Load configuration from environment
    ///
    /// Reads [`LATENCY_ENV_VAR`]; everything else keeps its default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLatency`] if the variable is set but is not
    /// a whole number of milliseconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(LATENCY_ENV_VAR) {
            let millis = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidLatency {
                var: LATENCY_ENV_VAR,
                value: raw.clone(),
            })?;
            config.latency = Duration::from_millis(millis);
        }

        Ok(config)
    }
}
