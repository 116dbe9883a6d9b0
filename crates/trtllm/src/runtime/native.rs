//! cxx bridge to the engine's CUDA stream and buffer manager.

use std::ffi::c_void;

use cxx::{SharedPtr, UniquePtr};

use crate::error::{ExecutorError, ExecutorResult};

#[cxx::bridge(namespace = "trtllm::bridge")]
mod ffi {
    #[namespace = "tensorrt_llm::runtime"]
    unsafe extern "C++" {
        include!("trtllm/csrc/runtime.h");

        type CudaStream;

        type BufferManager;
    }

    unsafe extern "C++" {
        include!("trtllm/csrc/runtime.h");

        type StreamHandle;

        unsafe fn cuda_stream(stream: *mut StreamHandle) -> Result<SharedPtr<CudaStream>>;

        fn buffer_manager(stream: SharedPtr<CudaStream>) -> Result<UniquePtr<BufferManager>>;
    }
}

/// Shared handle to a CUDA stream owned by the caller.
///
/// Cloning shares the same engine stream object.
#[derive(Clone)]
pub struct CudaStream {
    ptr: SharedPtr<ffi::CudaStream>,
}

impl CudaStream {
    /// Wrap an existing `cudaStream_t`. A null pointer selects the default
    /// stream.
    ///
    /// # Safety
    ///
    /// `stream` must be a valid CUDA stream (or null) and must stay alive for
    /// as long as this handle, its clones, and any [`BufferManager`] built on
    /// it exist. Ownership stays with the caller.
    pub unsafe fn from_raw(stream: *mut c_void) -> ExecutorResult<Self> {
        let ptr = ffi::cuda_stream(stream.cast::<ffi::StreamHandle>())
            .map_err(|e| ExecutorError::engine("cuda_stream", e.what()))?;
        Ok(Self { ptr })
    }
}

impl std::fmt::Debug for CudaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CudaStream")
            .field("null", &self.ptr.is_null())
            .finish()
    }
}

/// Engine buffer manager bound to a [`CudaStream`].
pub struct BufferManager {
    ptr: UniquePtr<ffi::BufferManager>,
    stream: CudaStream,
}

impl BufferManager {
    /// Build a buffer manager allocating on `stream`.
    pub fn new(stream: &CudaStream) -> ExecutorResult<Self> {
        let ptr = ffi::buffer_manager(stream.ptr.clone())
            .map_err(|e| ExecutorError::engine("buffer_manager", e.what()))?;
        Ok(Self {
            ptr,
            stream: stream.clone(),
        })
    }

    /// Stream this manager allocates on.
    #[inline]
    pub fn stream(&self) -> &CudaStream {
        &self.stream
    }
}

impl std::fmt::Debug for BufferManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferManager")
            .field("null", &self.ptr.is_null())
            .field("stream", &self.stream)
            .finish()
    }
}
