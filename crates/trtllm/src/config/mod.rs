//! Executor configuration.
//!
//! Every engine option this crate forwards is an explicit field. Plain
//! fields default to the engine's documented defaults. `Option` fields
//! default to unset and are only forwarded when set, so the linked engine
//! release keeps its own default for them.
//!
//! Configuration can be built in code, parsed from TOML, or layered from an
//! optional file plus `TRTLLM__`-prefixed environment variables:
//!
//! ```text
//! TRTLLM__MAX_BEAM_WIDTH=4
//! TRTLLM__KV_CACHE__ENABLE_BLOCK_REUSE=true
//! TRTLLM__SCHEDULER__CAPACITY_POLICY=max-utilization
//! ```

mod kv_cache;
mod scheduler;

#[cfg(test)]
mod tests;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExecutorError, ExecutorResult};

pub use self::kv_cache::KvCacheConfig;
pub use self::scheduler::{BatchingType, CapacitySchedulerPolicy, SchedulerConfig};

/// Environment variable prefix used by [`ExecutorConfig::load`].
pub const ENV_PREFIX: &str = "TRTLLM";

/// Options used to construct an executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Beam width; also the upper bound on candidate sequences per result.
    /// Default: 1 (greedy / sampling)
    pub max_beam_width: u32,

    /// Maximum number of requests batched together.
    /// Default: unset (taken from the engine build)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_batch_size: Option<u32>,

    /// Maximum number of tokens per batch.
    /// Default: unset (taken from the engine build)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_num_tokens: Option<u32>,

    /// Default: in-flight batching
    pub batching_type: BatchingType,

    /// Split long contexts across iterations.
    /// Default: false
    pub enable_chunked_context: bool,

    /// Normalize log probabilities of beam candidates.
    /// Default: true
    pub normalize_log_probs: bool,

    /// Number of iterations of statistics kept by the engine.
    /// Default: 1000
    pub iter_stats_max_iterations: u32,

    /// Fraction of weights resident on the GPU, in [0, 1].
    /// Default: 1.0
    pub gpu_weights_percent: f32,

    pub scheduler: SchedulerConfig,

    pub kv_cache: KvCacheConfig,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_beam_width: 1,
            max_batch_size: None,
            max_num_tokens: None,
            batching_type: BatchingType::default(),
            enable_chunked_context: false,
            normalize_log_probs: true,
            iter_stats_max_iterations: 1000,
            gpu_weights_percent: 1.0,
            scheduler: SchedulerConfig::default(),
            kv_cache: KvCacheConfig::default(),
        }
    }
}

impl ExecutorConfig {
    /// Configuration with engine defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the beam width.
    pub fn with_max_beam_width(mut self, max_beam_width: u32) -> Self {
        self.max_beam_width = max_beam_width;
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> ExecutorResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            ExecutorError::InvalidConfig(format!("Failed to parse config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_file(path: &Path) -> ExecutorResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExecutorError::InvalidConfig(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from an optional file and the environment.
    ///
    /// Sources are applied in order, later ones overriding earlier ones:
    /// 1. Engine defaults
    /// 2. `path` (TOML), if given; the file must exist
    /// 3. Environment variables prefixed `TRTLLM__` with `__` as separator
    pub fn load(path: Option<&Path>) -> ExecutorResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ExecutorError::InvalidConfig(format!("Failed to load config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> ExecutorResult<()> {
        if self.max_beam_width == 0 {
            return Err(ExecutorError::InvalidConfig(
                "max_beam_width must be greater than 0".into(),
            ));
        }

        for (name, value) in [
            ("max_batch_size", self.max_batch_size),
            ("max_num_tokens", self.max_num_tokens),
            ("kv_cache.max_tokens", self.kv_cache.max_tokens),
        ] {
            if value == Some(0) {
                return Err(ExecutorError::InvalidConfig(format!(
                    "{} must be greater than 0 when set",
                    name
                )));
            }
        }

        if let Some(fraction) = self.kv_cache.free_gpu_memory_fraction {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(ExecutorError::InvalidConfig(format!(
                    "kv_cache.free_gpu_memory_fraction must be in (0, 1], got {}",
                    fraction
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.gpu_weights_percent) {
            return Err(ExecutorError::InvalidConfig(format!(
                "gpu_weights_percent must be in [0, 1], got {}",
                self.gpu_weights_percent
            )));
        }

        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> ExecutorResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ExecutorError::InvalidConfig(format!("Failed to serialize config: {}", e))
        })
    }
}
