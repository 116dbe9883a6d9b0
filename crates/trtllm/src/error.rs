//! Error types for executor bindings.
//!
//! Failures detected by the wrapped engine are relayed unchanged through
//! [`ExecutorError::Engine`] and [`ExecutorError::ResponseError`]. The other
//! variants cover the few checks this layer performs itself before a value
//! crosses into native code.

use thiserror::Error;

use crate::types::{DataType, RequestId, TokenId};

/// Result type alias for executor operations.
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Error type for all executor binding operations.
#[derive(Error, Debug)]
pub enum ExecutorError {
    // ========== Engine Errors ==========
    /// The engine raised an error while performing `operation`.
    #[error("Engine error during {operation}: {message}")]
    Engine {
        /// Binding operation that was running (e.g. "enqueue_request").
        operation: &'static str,
        /// Message reported by the engine.
        message: String,
    },

    /// A response carries an engine-side error instead of a result.
    #[error("Response for request {request_id} carries an engine error: {message}")]
    ResponseError { request_id: RequestId, message: String },

    /// The backend woke up without any responses for the request.
    #[error("Engine returned an empty response batch for request {0}")]
    EmptyResponseBatch(RequestId),

    /// The crate was built without the native engine.
    #[error("Native engine unavailable: {0}")]
    NativeUnavailable(String),

    // ========== Configuration Errors ==========
    /// Invalid executor configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Model path cannot be passed to the engine.
    #[error("Invalid model path: {0}")]
    InvalidModelPath(String),

    // ========== Tensor Errors ==========
    /// Data buffer length does not match shape and data type.
    #[error("Tensor shape mismatch: shape {dims:?} of {data_type:?} needs {expected} bytes, got {actual}")]
    ShapeMismatch {
        dims: Vec<u64>,
        data_type: DataType,
        expected: u64,
        actual: u64,
    },

    /// Data type without a known element size.
    #[error("Unsupported tensor data type: {0:?}")]
    UnsupportedDataType(DataType),

    /// Shape dimension does not fit the engine's signed 64-bit dimension type.
    #[error("Dimension {0} exceeds the engine's dimension range")]
    DimensionOverflow(u64),

    // ========== Token Errors ==========
    /// Engine emitted a token id that does not fit in a `u32`.
    #[error("Token id {token_id} in response for request {request_id} is outside the u32 range")]
    TokenIdOutOfRange { request_id: RequestId, token_id: i64 },

    /// Token id does not fit in the engine's signed 32-bit token type.
    #[error("Token id {0} exceeds the engine's signed 32-bit token range")]
    TokenIdTooLarge(TokenId),

    /// Output token budget does not fit the engine's signed 32-bit size type.
    #[error("max_tokens {0} exceeds the engine's signed 32-bit range")]
    MaxTokensTooLarge(u32),
}

impl ExecutorError {
    /// Create an engine error for `operation`.
    pub fn engine(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Engine {
            operation,
            message: message.into(),
        }
    }

    /// Whether this error originated inside the wrapped engine.
    #[inline]
    pub fn is_engine_error(&self) -> bool {
        matches!(self, Self::Engine { .. } | Self::ResponseError { .. })
    }
}
