//! Build script for the native TensorRT-LLM bridge.
//!
//! Compiles the cxx bridges and the C++ shim in `csrc/` and links the
//! TensorRT-LLM libraries. Does nothing unless the `trtllm` feature is
//! enabled.
//!
//! # Environment Variables
//!
//! - `TRTLLM_INCLUDE_DIR`: TensorRT-LLM headers (default: `/app/tensorrt_llm/include`)
//! - `TRTLLM_LIB_DIR`: directory holding `libtensorrt_llm.so` and
//!   `libnvinfer_plugin_tensorrt_llm.so`
//!   (default: `/usr/local/lib/python3.12/dist-packages/tensorrt_llm/libs`)
//! - `CUDA_PATH`: CUDA toolkit root (default: `/usr/local/cuda`)

#[cfg(feature = "trtllm")]
use std::env;
#[cfg(feature = "trtllm")]
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=csrc/");
    println!("cargo:rerun-if-env-changed=TRTLLM_INCLUDE_DIR");
    println!("cargo:rerun-if-env-changed=TRTLLM_LIB_DIR");
    println!("cargo:rerun-if-env-changed=CUDA_PATH");

    #[cfg(feature = "trtllm")]
    {
        compile_bridge();
    }
}

#[cfg(feature = "trtllm")]
fn compile_bridge() {
    let include_dir = env_path("TRTLLM_INCLUDE_DIR", "/app/tensorrt_llm/include");
    let lib_dir = env_path(
        "TRTLLM_LIB_DIR",
        "/usr/local/lib/python3.12/dist-packages/tensorrt_llm/libs",
    );
    let cuda_path = env_path("CUDA_PATH", "/usr/local/cuda");

    if !include_dir.exists() {
        panic!(
            "TensorRT-LLM headers not found at {}\n\
             Set TRTLLM_INCLUDE_DIR, or build without the 'trtllm' feature.",
            include_dir.display()
        );
    }

    println!("cargo:rerun-if-changed=src/backend/native.rs");
    println!("cargo:rerun-if-changed=src/runtime/native.rs");
    println!("cargo:rerun-if-changed=src/plugins/native.rs");

    cxx_build::bridges([
        "src/backend/native.rs",
        "src/runtime/native.rs",
        "src/plugins/native.rs",
    ])
    .file("csrc/executor.cpp")
    .include(&include_dir)
    .include(cuda_path.join("include"))
    .std("c++20")
    .flag_if_supported("-Wno-unused-parameter")
    .compile("trtllm-bridge");

    println!("cargo:rustc-link-search=native={}", lib_dir.display());
    println!("cargo:rustc-link-lib=dylib=tensorrt_llm");
    println!("cargo:rustc-link-lib=dylib=nvinfer_plugin_tensorrt_llm");

    for sub in ["lib64", "lib"] {
        let path = cuda_path.join(sub);
        if path.exists() {
            println!("cargo:rustc-link-search=native={}", path.display());
        }
    }
    println!("cargo:rustc-link-lib=dylib=cudart");
}

#[cfg(feature = "trtllm")]
fn env_path(var: &str, default: &str) -> PathBuf {
    env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
