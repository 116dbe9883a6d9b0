//! TensorRT plugin registration.
//!
//! Engines built with TensorRT-LLM plugins can only be deserialized after
//! the plugins are registered with TensorRT. Registration happens at most
//! once per process.

#[cfg(feature = "trtllm")]
mod native;

use crate::error::{ExecutorError, ExecutorResult};

#[cfg(feature = "trtllm")]
use std::sync::OnceLock;

/// Outcome of the one-time registration (engine error text on failure).
#[cfg(feature = "trtllm")]
static PLUGINS_INIT: OnceLock<Result<bool, String>> = OnceLock::new();

/// Register the engine's TensorRT plugins.
///
/// The first call performs registration; later calls return the cached
/// outcome.
///
/// # Returns
///
/// - `Ok(true)` if the plugins are registered
/// - `Ok(false)` if the engine declined registration
///
/// # Errors
///
/// - `Engine` if registration raised an error
/// - `NativeUnavailable` without the `trtllm` feature
pub fn init_plugins() -> ExecutorResult<bool> {
    #[cfg(feature = "trtllm")]
    {
        let outcome = PLUGINS_INIT.get_or_init(|| {
            let outcome = native::init_trtllm_plugins();
            match &outcome {
                Ok(true) => tracing::info!(target: "trtllm::plugins", "TensorRT-LLM plugins registered"),
                Ok(false) => tracing::warn!(target: "trtllm::plugins", "TensorRT-LLM plugin registration declined"),
                Err(e) => tracing::error!(target: "trtllm::plugins", error = %e, "TensorRT-LLM plugin registration failed"),
            }
            outcome
        });
        outcome
            .clone()
            .map_err(|e| ExecutorError::engine("init_plugins", e))
    }

    #[cfg(not(feature = "trtllm"))]
    {
        Err(ExecutorError::NativeUnavailable(
            "plugin registration requires the `trtllm` feature".into(),
        ))
    }
}
