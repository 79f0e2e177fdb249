//! Engine configuration
//!
//! Settings are read from the process environment, optionally seeded from a
//! `.env` file in the working directory.

use std::env;

use crate::error::{EngineError, EngineResult};

/// Environment variable holding the maximum number of path segments the resolver will follow.
pub const MAX_DEPTH_ENV: &str = "FIELDRULES_MAX_DEPTH";

/// Default maximum path depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Runtime settings shared by every rule a validator evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Paths with more segments than this resolve to nothing.
    pub max_depth: usize,
}

impl Default for EngineConfig {
    /// Creates an EngineConfig with `max_depth = 64`.
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Loads the configuration from the environment.
    ///
    /// A `.env` file is loaded first when present. Unset variables fall back to
    /// the defaults; set but unparsable ones are reported as
    /// `EngineError::InvalidSetting`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fieldrules::config::EngineConfig;
    ///
    /// std::env::set_var("FIELDRULES_MAX_DEPTH", "8");
    /// let config = EngineConfig::from_env().expect("valid configuration");
    /// assert_eq!(config.max_depth, 8);
    /// ```
    pub fn from_env() -> EngineResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_DEPTH_ENV) {
            config.max_depth = match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => depth,
                _ => {
                    return Err(EngineError::InvalidSetting {
                        key: MAX_DEPTH_ENV.to_string(),
                        value: raw,
                    })
                }
            };
        }

        Ok(config)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
