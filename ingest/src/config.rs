//! Runtime configuration.
//!
//! Defaults are compiled in; each can be overridden from the environment
//! (a `.env` file is loaded by the CLI before [`IngestConfig::from_env`]).

use crate::error::{ConfigError, ConfigResult};
use crate::validation::{RequiredFieldSet, DEFAULT_REQUIRED_FIELDS};

/// Maximum accepted document size (in bytes).
///
/// 50 MB limit.
pub const MAX_INPUT_BYTES: usize = 50 * 1024 * 1024;

/// Number of normalized records echoed back in a report.
pub const SAMPLE_SIZE: usize = 2;

/// Overrides [`MAX_INPUT_BYTES`].
pub const ENV_MAX_BYTES: &str = "CSVNEST_MAX_BYTES";

/// Comma-separated list overriding the required field set.
pub const ENV_REQUIRED_FIELDS: &str = "CSVNEST_REQUIRED_FIELDS";

/// Overrides [`SAMPLE_SIZE`].
pub const ENV_SAMPLE_SIZE: &str = "CSVNEST_SAMPLE_SIZE";

/// Settings for one [`crate::Ingestor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub max_input_bytes: usize,
    pub required_fields: RequiredFieldSet,
    pub sample_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: MAX_INPUT_BYTES,
            required_fields: RequiredFieldSet::new(DEFAULT_REQUIRED_FIELDS),
            sample_size: SAMPLE_SIZE,
        }
    }
}

impl IngestConfig {
    /// Load from process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using `lookup` to resolve variables. Unset or blank variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_MAX_BYTES) {
            config.max_input_bytes = parse_positive(ENV_MAX_BYTES, &v)?;
        }
        if let Some(v) = get(ENV_SAMPLE_SIZE) {
            config.sample_size = v.trim().parse().map_err(|e| ConfigError::InvalidValue {
                var: ENV_SAMPLE_SIZE,
                value: v.clone(),
                reason: format!("{}", e),
            })?;
        }
        if let Some(v) = get(ENV_REQUIRED_FIELDS) {
            config.required_fields = RequiredFieldSet::new(v.split(','));
        }

        Ok(config)
    }

    pub fn with_required_fields(mut self, required: RequiredFieldSet) -> Self {
        self.required_fields = required;
        self
    }

    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = limit;
        self
    }

    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }
}

fn parse_positive(var: &'static str, value: &str) -> ConfigResult<usize> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        }),
        Ok(n) => Ok(n),
        Err(e) => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}
