//! CUDA stream and buffer-manager handles.
//!
//! These wrap the engine's runtime objects for callers that manage their own
//! device memory next to an executor. Both are plain object construction;
//! all behavior belongs to the engine.
//!
//! # Feature Flags
//!
//! Without `trtllm` both constructors return
//! [`ExecutorError::NativeUnavailable`](crate::ExecutorError::NativeUnavailable).

#[cfg(feature = "trtllm")]
mod native;

#[cfg(feature = "trtllm")]
pub use native::{BufferManager, CudaStream};

// Stub handles for builds without the native engine
#[cfg(not(feature = "trtllm"))]
mod stub {
    use std::ffi::c_void;

    use crate::error::{ExecutorError, ExecutorResult};

    const UNAVAILABLE: &str = "CUDA runtime handles require the `trtllm` feature";

    /// Stub CudaStream for builds without the native engine.
    #[derive(Debug, Clone)]
    pub struct CudaStream;

    impl CudaStream {
        /// Always fails with `NativeUnavailable`.
        ///
        /// # Safety
        ///
        /// Same contract as the native constructor.
        pub unsafe fn from_raw(_stream: *mut c_void) -> ExecutorResult<Self> {
            Err(ExecutorError::NativeUnavailable(UNAVAILABLE.into()))
        }
    }

    /// Stub BufferManager for builds without the native engine.
    #[derive(Debug)]
    pub struct BufferManager;

    impl BufferManager {
        /// Always fails with `NativeUnavailable`.
        pub fn new(_stream: &CudaStream) -> ExecutorResult<Self> {
            Err(ExecutorError::NativeUnavailable(UNAVAILABLE.into()))
        }
    }
}

#[cfg(not(feature = "trtllm"))]
pub use stub::{BufferManager, CudaStream};
