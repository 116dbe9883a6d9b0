//! cxx bridge to the TensorRT-LLM executor.
//!
//! The C++ side lives in `csrc/executor.{h,cpp}`. Engine objects only exist
//! on the C++ side of the bridge and are owned through `UniquePtr`, so
//! dropping the Rust wrapper destroys them. Responses are converted into
//! plain Rust records inside the shim; no engine response object outlives
//! the call that retrieved it.
//!
//! # Safety
//!
//! Engine exceptions are caught by cxx and surface as
//! [`ExecutorError::Engine`] carrying the exception text.

use std::path::{Path, PathBuf};

use cxx::UniquePtr;
use tracing::{debug, info};

use crate::backend::convert::{EngineOptions, ResponseParts};
use crate::backend::ExecutorBackend;
use crate::config::ExecutorConfig;
use crate::error::{ExecutorError, ExecutorResult};
use crate::request::{check_native_token, Request};
use crate::response::Response;
use crate::tensor::Tensor;
use crate::types::{ModelType, RequestId};

#[cxx::bridge(namespace = "trtllm::bridge")]
mod ffi {
    /// One candidate sequence in native token width.
    struct NativeTokens {
        ids: Vec<i32>,
    }

    /// Engine response flattened by the shim.
    struct ResponseRecord {
        request_id: u64,
        has_error: bool,
        error_msg: String,
        is_final: bool,
        output_token_ids: Vec<NativeTokens>,
    }

    /// Executor options. Zero (or a non-positive fraction) means unset.
    struct ConfigOptions {
        max_beam_width: i32,
        max_batch_size: i32,
        max_num_tokens: i32,
        batching_type: i32,
        capacity_policy: i32,
        enable_chunked_context: bool,
        normalize_log_probs: bool,
        iter_stats_max_iterations: i32,
        gpu_weights_percent: f32,
        set_block_reuse: bool,
        enable_block_reuse: bool,
        kv_cache_max_tokens: i32,
        free_gpu_memory_fraction: f32,
    }

    #[namespace = "tensorrt_llm::executor"]
    unsafe extern "C++" {
        include!("trtllm/csrc/executor.h");

        type Shape;

        type Tensor;

        type ExecutorConfig;

        type Request;

        #[cxx_name = "setStreaming"]
        fn set_streaming(self: Pin<&mut Request>, streaming: bool) -> Result<()>;

        #[cxx_name = "setEndId"]
        fn set_end_id(self: Pin<&mut Request>, end_id: i32) -> Result<()>;

        #[cxx_name = "setPadId"]
        fn set_pad_id(self: Pin<&mut Request>, pad_id: i32) -> Result<()>;

        type Executor;
    }

    unsafe extern "C++" {
        include!("trtllm/csrc/executor.h");

        fn shape(dims: &[i64]) -> Result<UniquePtr<Shape>>;

        fn tensor(data_type: i32, data: &[u8], shape: UniquePtr<Shape>)
            -> Result<UniquePtr<Tensor>>;

        fn executor_config(options: &ConfigOptions) -> Result<UniquePtr<ExecutorConfig>>;

        fn request(input_token_ids: &[i32], max_tokens: i32) -> Result<UniquePtr<Request>>;

        fn set_encoder_input_features(
            request: Pin<&mut Request>,
            features: UniquePtr<Tensor>,
        ) -> Result<()>;

        fn executor(
            model_path: &str,
            model_type: i32,
            executor_config: &ExecutorConfig,
        ) -> Result<UniquePtr<Executor>>;

        fn enqueue_request(executor: &Executor, request: &Request) -> Result<u64>;

        fn get_num_responses_ready(executor: &Executor, request_id: u64) -> Result<u32>;

        fn await_responses(executor: &Executor, request_id: u64) -> Result<Vec<ResponseRecord>>;
    }
}

/// Executor backend running the TensorRT-LLM engine in-process.
pub struct NativeBackend {
    executor: UniquePtr<ffi::Executor>,
    model_path: PathBuf,
    model_type: ModelType,
}

// SAFETY: NativeBackend exclusively owns its engine executor. The engine's
// executor API is internally synchronized (its own queues and worker
// threads), and every call made through the shim is one of its thread-safe
// entry points. No Rust-side state is mutated after construction.
unsafe impl Send for NativeBackend {}
unsafe impl Sync for NativeBackend {}

impl NativeBackend {
    /// Load the engine at `model_path`.
    ///
    /// No existence check is made; a missing or broken engine directory is
    /// reported by the engine itself.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if `config` fails validation
    /// - `InvalidModelPath` if the path is not valid UTF-8
    /// - `Engine` if the engine fails to load
    pub fn open(
        model_path: &Path,
        model_type: ModelType,
        config: &ExecutorConfig,
    ) -> ExecutorResult<Self> {
        config.validate()?;

        let path = model_path.to_str().ok_or_else(|| {
            ExecutorError::InvalidModelPath(model_path.display().to_string())
        })?;

        let options = config_options(&EngineOptions::from_config(config)?);
        let native_config = ffi::executor_config(&options)
            .map_err(|e| ExecutorError::engine("executor_config", e.what()))?;

        info!(
            target: "trtllm::native",
            model_path = %path,
            model_type = %model_type,
            max_beam_width = config.max_beam_width,
            "Loading engine"
        );

        let executor = ffi::executor(path, model_type.as_raw(), &native_config)
            .map_err(|e| ExecutorError::engine("open_executor", e.what()))?;
        if executor.is_null() {
            return Err(ExecutorError::engine(
                "open_executor",
                "engine returned a null executor",
            ));
        }

        Ok(Self {
            executor,
            model_path: model_path.to_path_buf(),
            model_type,
        })
    }

    #[inline]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    #[inline]
    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    fn native_request(request: &Request<'_>) -> ExecutorResult<UniquePtr<ffi::Request>> {
        let input_token_ids = request.native_input_token_ids()?;
        let max_tokens = request.native_max_tokens()?;
        let mut native = ffi::request(&input_token_ids, max_tokens)
            .map_err(|e| ExecutorError::engine("request", e.what()))?;
        if native.is_null() {
            return Err(ExecutorError::engine("request", "engine returned a null request"));
        }

        native
            .pin_mut()
            .set_streaming(request.streaming())
            .map_err(|e| ExecutorError::engine("set_streaming", e.what()))?;

        if let Some(end_id) = request.end_id() {
            native
                .pin_mut()
                .set_end_id(check_native_token(end_id)?)
                .map_err(|e| ExecutorError::engine("set_end_id", e.what()))?;
        }

        if let Some(pad_id) = request.pad_id() {
            native
                .pin_mut()
                .set_pad_id(check_native_token(pad_id)?)
                .map_err(|e| ExecutorError::engine("set_pad_id", e.what()))?;
        }

        if let Some(features) = request.encoder_input_features() {
            let tensor = native_tensor(features)?;
            ffi::set_encoder_input_features(native.pin_mut(), tensor)
                .map_err(|e| ExecutorError::engine("set_encoder_input_features", e.what()))?;
        }

        Ok(native)
    }
}

impl ExecutorBackend for NativeBackend {
    fn enqueue_request(&self, request: &Request<'_>) -> ExecutorResult<RequestId> {
        let native = Self::native_request(request)?;
        ffi::enqueue_request(&self.executor, &native)
            .map_err(|e| ExecutorError::engine("enqueue_request", e.what()))
    }

    fn num_responses_ready(&self, request_id: RequestId) -> ExecutorResult<u32> {
        ffi::get_num_responses_ready(&self.executor, request_id)
            .map_err(|e| ExecutorError::engine("get_num_responses_ready", e.what()))
    }

    fn await_responses(&self, request_id: RequestId) -> ExecutorResult<Vec<Response>> {
        let records = ffi::await_responses(&self.executor, request_id)
            .map_err(|e| ExecutorError::engine("await_responses", e.what()))?;
        Ok(records.into_iter().map(response_from_record).collect())
    }
}

impl Drop for NativeBackend {
    fn drop(&mut self) {
        debug!(
            target: "trtllm::native",
            model_path = %self.model_path.display(),
            "Shutting down engine"
        );
    }
}

impl std::fmt::Debug for NativeBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeBackend")
            .field("model_path", &self.model_path)
            .field("model_type", &self.model_type)
            .finish()
    }
}

fn response_from_record(record: ffi::ResponseRecord) -> Response {
    Response::from(ResponseParts {
        request_id: record.request_id,
        has_error: record.has_error,
        error_msg: record.error_msg,
        is_final: record.is_final,
        output_token_ids: record.output_token_ids.into_iter().map(|t| t.ids).collect(),
    })
}

/// Copy a borrowed tensor into an engine-owned CPU tensor.
fn native_tensor(tensor: &Tensor<'_>) -> ExecutorResult<UniquePtr<ffi::Tensor>> {
    let dims = tensor.shape().native_dims()?;
    let shape =
        ffi::shape(&dims).map_err(|e| ExecutorError::engine("shape", e.what()))?;
    ffi::tensor(tensor.data_type().as_raw(), tensor.as_bytes(), shape)
        .map_err(|e| ExecutorError::engine("tensor", e.what()))
}

fn config_options(options: &EngineOptions) -> ffi::ConfigOptions {
    ffi::ConfigOptions {
        max_beam_width: options.max_beam_width,
        max_batch_size: options.max_batch_size,
        max_num_tokens: options.max_num_tokens,
        batching_type: options.batching_type,
        capacity_policy: options.capacity_policy,
        enable_chunked_context: options.enable_chunked_context,
        normalize_log_probs: options.normalize_log_probs,
        iter_stats_max_iterations: options.iter_stats_max_iterations,
        gpu_weights_percent: options.gpu_weights_percent,
        set_block_reuse: options.set_block_reuse,
        enable_block_reuse: options.enable_block_reuse,
        kv_cache_max_tokens: options.kv_cache_max_tokens,
        free_gpu_memory_fraction: options.free_gpu_memory_fraction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_options_copies_every_field() {
        let options = EngineOptions::from_config(&ExecutorConfig::default()).unwrap();
        let native = config_options(&options);
        assert_eq!(native.max_beam_width, options.max_beam_width);
        assert_eq!(native.batching_type, options.batching_type);
        assert_eq!(native.set_block_reuse, options.set_block_reuse);
        assert_eq!(native.free_gpu_memory_fraction, options.free_gpu_memory_fraction);
    }

    #[test]
    fn test_response_from_record() {
        let record = ffi::ResponseRecord {
            request_id: 4,
            has_error: false,
            error_msg: String::new(),
            is_final: true,
            output_token_ids: vec![
                ffi::NativeTokens { ids: vec![5, 6] },
                ffi::NativeTokens { ids: vec![7] },
            ],
        };
        let result = response_from_record(record).get_result().unwrap();
        assert!(result.is_final());
        assert_eq!(result.output_token_ids(), &[vec![5, 6], vec![7]]);
    }

    #[test]
    fn test_native_backend_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NativeBackend>();
    }
}
