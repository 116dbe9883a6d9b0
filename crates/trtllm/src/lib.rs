#![deny(deprecated)]

//! Safe Rust bindings over the TensorRT-LLM executor API.
//!
//! This crate is glue: it builds the engine's configuration, request, shape
//! and tensor objects from plain Rust values, submits requests, polls and
//! awaits responses by request id, and converts each engine result into an
//! owned [`GenerationResult`]. Scheduling, batching, KV-cache management and
//! model execution all happen inside the engine.
//!
//! # Feature Flags
//!
//! - `trtllm`: compile and link the native engine bridge
//!   ([`NativeBackend`], [`Executor::open`], CUDA runtime handles, plugin
//!   registration). Requires TensorRT-LLM headers and libraries; see
//!   `build.rs`.
//!
//! Without `trtllm` the crate still builds everywhere. Native entry points
//! return [`ExecutorError::NativeUnavailable`], and any type implementing
//! [`ExecutorBackend`] can drive an [`Executor`].
//!
//! # Example
//!
//! ```ignore
//! use trtllm::{init_plugins, Executor, ExecutorConfig, ModelType, Request};
//!
//! init_plugins()?;
//! let executor = Executor::open("/engines/qwen", ModelType::DecoderOnly, &ExecutorConfig::new())?;
//!
//! let mut request = Request::new(&[1, 2, 3, 4], 100);
//! request.set_streaming(true);
//! let request_id = executor.enqueue_request(&request)?;
//!
//! loop {
//!     let response = executor.await_response(request_id)?;
//!     let result = response.get_result()?;
//!     println!("{:?}", result.output_token_ids());
//!     if result.is_final() {
//!         break;
//!     }
//! }
//! # Ok::<(), trtllm::ExecutorError>(())
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod executor;
pub mod plugins;
pub mod request;
pub mod response;
pub mod runtime;
pub mod tensor;
pub mod types;

// Scripted backend is TEST ONLY
#[cfg(test)]
pub(crate) mod stub;

pub use backend::ExecutorBackend;
#[cfg(feature = "trtllm")]
pub use backend::NativeBackend;
pub use config::{
    BatchingType, CapacitySchedulerPolicy, ExecutorConfig, KvCacheConfig, SchedulerConfig,
};
pub use error::{ExecutorError, ExecutorResult};
pub use executor::Executor;
#[cfg(feature = "trtllm")]
pub use executor::NativeExecutor;
pub use plugins::init_plugins;
pub use request::Request;
pub use response::{get_result, GenerationResult, NativeOutput, Response};
pub use runtime::{BufferManager, CudaStream};
pub use tensor::{Shape, Tensor, TensorElement};
pub use types::{DataType, ModelType, NativeTokenId, RequestId, TokenId};
