//! Plain-Rust encodings of what crosses the native bridge.
//!
//! The bridge's shared structs only exist with the `trtllm` feature. The
//! mappings live here so they are built and tested everywhere; `native.rs`
//! copies them field by field into the cxx structs.

#![cfg_attr(not(feature = "trtllm"), allow(dead_code))]

use crate::config::ExecutorConfig;
use crate::error::{ExecutorError, ExecutorResult};
use crate::response::{NativeOutput, Response};
use crate::types::{NativeTokenId, RequestId};

/// Executor options as the shim expects them.
///
/// Numeric options use 0 (or a non-positive fraction) for "unset"; the shim
/// only calls an engine setter for options that are set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EngineOptions {
    pub max_beam_width: i32,
    pub max_batch_size: i32,
    pub max_num_tokens: i32,
    pub batching_type: i32,
    pub capacity_policy: i32,
    pub enable_chunked_context: bool,
    pub normalize_log_probs: bool,
    pub iter_stats_max_iterations: i32,
    pub gpu_weights_percent: f32,
    pub set_block_reuse: bool,
    pub enable_block_reuse: bool,
    pub kv_cache_max_tokens: i32,
    pub free_gpu_memory_fraction: f32,
}

impl EngineOptions {
    /// Encode a configuration, rejecting values wider than the engine's
    /// signed 32-bit sizes.
    pub(crate) fn from_config(config: &ExecutorConfig) -> ExecutorResult<Self> {
        Ok(Self {
            max_beam_width: to_i32("max_beam_width", config.max_beam_width)?,
            max_batch_size: to_i32("max_batch_size", config.max_batch_size.unwrap_or(0))?,
            max_num_tokens: to_i32("max_num_tokens", config.max_num_tokens.unwrap_or(0))?,
            batching_type: config.batching_type as i32,
            capacity_policy: config.scheduler.capacity_policy as i32,
            enable_chunked_context: config.enable_chunked_context,
            normalize_log_probs: config.normalize_log_probs,
            iter_stats_max_iterations: to_i32(
                "iter_stats_max_iterations",
                config.iter_stats_max_iterations,
            )?,
            gpu_weights_percent: config.gpu_weights_percent,
            set_block_reuse: config.kv_cache.enable_block_reuse.is_some(),
            enable_block_reuse: config.kv_cache.enable_block_reuse.unwrap_or(false),
            kv_cache_max_tokens: to_i32(
                "kv_cache.max_tokens",
                config.kv_cache.max_tokens.unwrap_or(0),
            )?,
            free_gpu_memory_fraction: config.kv_cache.free_gpu_memory_fraction.unwrap_or(0.0),
        })
    }
}

fn to_i32(name: &str, value: u32) -> ExecutorResult<i32> {
    i32::try_from(value).map_err(|_| {
        ExecutorError::InvalidConfig(format!("{} = {} exceeds the engine's range", name, value))
    })
}

/// One engine response as flattened by the shim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct ResponseParts {
    pub request_id: RequestId,
    pub has_error: bool,
    pub error_msg: String,
    pub is_final: bool,
    pub output_token_ids: Vec<Vec<NativeTokenId>>,
}

impl From<ResponseParts> for Response {
    fn from(parts: ResponseParts) -> Self {
        if parts.has_error {
            return Response::with_error(parts.request_id, parts.error_msg);
        }
        Response::with_output(
            parts.request_id,
            NativeOutput {
                is_final: parts.is_final,
                output_token_ids: parts.output_token_ids,
            },
        )
    }
}
