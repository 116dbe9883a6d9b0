//! cxx bridge to the engine's plugin registration entry point.

#[cxx::bridge(namespace = "trtllm::bridge")]
mod ffi {
    unsafe extern "C++" {
        include!("trtllm/csrc/plugins.h");

        fn init_trtllm_plugins() -> Result<bool>;
    }
}

/// Register the engine's TensorRT plugins.
pub(super) fn init_trtllm_plugins() -> Result<bool, String> {
    ffi::init_trtllm_plugins().map_err(|e| e.what().to_string())
}
