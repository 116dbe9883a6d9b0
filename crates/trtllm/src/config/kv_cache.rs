//! KV cache options forwarded to the engine.

use serde::{Deserialize, Serialize};

/// KV cache sizing and reuse options.
///
/// When both `max_tokens` and `free_gpu_memory_fraction` are set the engine
/// uses whichever yields the smaller cache.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KvCacheConfig {
    /// Reuse cached blocks across requests sharing a prompt prefix.
    /// Default: unset (engine default of the linked release)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_block_reuse: Option<bool>,

    /// Upper bound on cached tokens.
    /// Default: unset (engine decides)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Fraction of free GPU memory given to the cache, in (0, 1].
    /// Default: unset (engine default of 0.9)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_gpu_memory_fraction: Option<f32>,
}
