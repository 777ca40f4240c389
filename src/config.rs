//! Runner configuration
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults (baseline policy: no limits)
//! 2. A TOML file (`cadence.toml` in the working directory, or an explicit path)
//! 3. Inline TOML passed to the builder
//! 4. `CADENCE_*` environment variables (after loading `.env`), e.g.
//!    `CADENCE_MAX_COROUTINES=16`

use serde::Deserialize;
use std::path::PathBuf;

use crate::errors::ConfigError;

const DEFAULT_MAX_RECORDED_FAULTS: usize = 64;
const DEFAULT_ENV_PREFIX: &str = "CADENCE";

/// Scheduling and admission policy for a runner
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Upper bound on running plus queued coroutines enforced by `try_start`
    pub max_coroutines: Option<usize>,

    /// Make `try_start` refuse a name that is already running or queued
    pub reject_duplicate_names: bool,

    /// Deepest frame stack a coroutine may build before it is faulted
    pub max_frame_depth: Option<usize>,

    /// Contain panics raised by a coroutine body to that coroutine
    pub catch_panics: bool,

    /// Faults kept for `drain_faults`; the oldest is dropped past this, 0 keeps none
    pub max_recorded_faults: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_coroutines: None,
            reject_duplicate_names: false,
            max_frame_depth: None,
            catch_panics: true,
            max_recorded_faults: DEFAULT_MAX_RECORDED_FAULTS,
        }
    }
}

impl RunnerConfig {
    pub fn builder() -> RunnerConfigBuilder {
        RunnerConfigBuilder::default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_coroutines == Some(0) {
            return Err(ConfigError::Invalid(
                "max_coroutines must be at least 1".to_string(),
            ));
        }
        if self.max_frame_depth == Some(0) {
            return Err(ConfigError::Invalid(
                "max_frame_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/* ===================== Builder ===================== */

#[derive(Debug, Default)]
pub struct RunnerConfigBuilder {
    config_path: Option<PathBuf>,
    inline_toml: Option<String>,
    env_prefix: Option<String>,
    skip_env: bool,
}

impl RunnerConfigBuilder {
    /// Load from this file instead of searching for `cadence.toml`
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Layer TOML text over the file source
    pub fn toml(mut self, source: impl Into<String>) -> Self {
        self.inline_toml = Some(source.into());
        self
    }

    /// Read `<prefix>_*` variables instead of `CADENCE_*`
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Ignore `.env` and `CADENCE_*` variables
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    pub fn build(self) -> Result<RunnerConfig, ConfigError> {
        let mut builder = ::config::Config::builder();

        builder = match &self.config_path {
            Some(path) => builder.add_source(::config::File::from(path.as_path()).required(true)),
            None => builder.add_source(::config::File::with_name("cadence").required(false)),
        };

        if let Some(source) = &self.inline_toml {
            builder =
                builder.add_source(::config::File::from_str(source, ::config::FileFormat::Toml));
        }

        if !self.skip_env {
            dotenvy::dotenv().ok();
            let prefix = self.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
            builder = builder.add_source(
                ::config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .try_parsing(true),
            );
        }

        let config: RunnerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        tracing::debug!(?config, "Loaded runner configuration");

        Ok(config)
    }
}
