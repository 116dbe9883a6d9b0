//! The engine seam.
//!
//! [`ExecutorBackend`] is the contract this crate expects from the wrapped
//! engine. Readiness, buffering, batching and scheduling all live behind it.
//! [`Executor`](crate::Executor) only relays calls and checks the results.
//!
//! # Feature Flags
//!
//! - `trtllm`: build [`NativeBackend`], the cxx bridge to the TensorRT-LLM
//!   executor. Without it no native backend exists and callers supply their
//!   own implementation.

pub(crate) mod convert;

#[cfg(feature = "trtllm")]
pub mod native;

#[cfg(feature = "trtllm")]
pub use native::NativeBackend;

use crate::error::ExecutorResult;
use crate::request::Request;
use crate::response::Response;
use crate::types::RequestId;

/// Engine operations relayed by [`Executor`](crate::Executor).
///
/// Implementations must be safe to call concurrently for distinct request
/// ids; any synchronization is the implementation's own.
pub trait ExecutorBackend: Send + Sync {
    /// Submit a request and return the id its responses are keyed by.
    fn enqueue_request(&self, request: &Request<'_>) -> ExecutorResult<RequestId>;

    /// Number of buffered, unread responses for `request_id`. Must not block.
    fn num_responses_ready(&self, request_id: RequestId) -> ExecutorResult<u32>;

    /// Block until at least one response for `request_id` is buffered, then
    /// remove and return every buffered response in engine order.
    fn await_responses(&self, request_id: RequestId) -> ExecutorResult<Vec<Response>>;
}

impl<B: ExecutorBackend + ?Sized> ExecutorBackend for Box<B> {
    fn enqueue_request(&self, request: &Request<'_>) -> ExecutorResult<RequestId> {
        (**self).enqueue_request(request)
    }

    fn num_responses_ready(&self, request_id: RequestId) -> ExecutorResult<u32> {
        (**self).num_responses_ready(request_id)
    }

    fn await_responses(&self, request_id: RequestId) -> ExecutorResult<Vec<Response>> {
        (**self).await_responses(request_id)
    }
}
