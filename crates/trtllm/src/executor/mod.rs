//! The executor handle.
//!
//! [`Executor`] is the single point of interaction with the engine for the
//! lifetime of an inference session. It owns a backend and relays request
//! submission, readiness polling and response retrieval to it.
//!
//! # Response draining
//!
//! [`Executor::await_responses`] drains every buffered response for a
//! request id and is the primary retrieval call. [`Executor::await_response`]
//! is a narrowing convenience: it drains the same batch but keeps only the
//! first response. Responses it discards are gone for good, so do not mix
//! the two for one request id unless losing responses is acceptable.
//!
//! # Thread Safety
//!
//! `Executor<B>` is `Send + Sync` because every backend is. Share it through
//! an `Arc` and use distinct request ids per caller; this layer adds no
//! locking of its own.


#[cfg(feature = "trtllm")]
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::backend::ExecutorBackend;
use crate::error::{ExecutorError, ExecutorResult};
use crate::request::Request;
use crate::response::Response;
use crate::types::RequestId;

#[cfg(feature = "trtllm")]
use crate::backend::NativeBackend;
#[cfg(feature = "trtllm")]
use crate::config::ExecutorConfig;
#[cfg(feature = "trtllm")]
use crate::types::ModelType;

/// Executor backed by the in-process TensorRT-LLM engine.
#[cfg(feature = "trtllm")]
pub type NativeExecutor = Executor<NativeBackend>;

/// Handle to a running engine instance.
///
/// # Example
///
/// ```ignore
/// use trtllm::{Executor, ExecutorConfig, ModelType, Request};
///
/// let config = ExecutorConfig::new();
/// let executor = Executor::open("/models/qwen2.5-3b", ModelType::DecoderOnly, &config)?;
///
/// let request_id = executor.enqueue_request(&Request::new(&[1, 2, 3], 16))?;
/// for response in executor.await_responses(request_id)? {
///     let result = response.get_result()?;
///     println!("{:?}", result.output_token_ids());
/// }
/// # Ok::<(), trtllm::ExecutorError>(())
/// ```
#[derive(Debug)]
pub struct Executor<B: ExecutorBackend> {
    backend: B,
}

#[cfg(feature = "trtllm")]
impl Executor<NativeBackend> {
    /// Load the engine at `model_path` and start it.
    ///
    /// No existence check is made beforehand; load failures are reported by
    /// the engine.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if `config` fails validation
    /// - `InvalidModelPath` if the path is not valid UTF-8
    /// - `Engine` if the engine fails to load
    pub fn open<P: AsRef<Path>>(
        model_path: P,
        model_type: ModelType,
        config: &ExecutorConfig,
    ) -> ExecutorResult<Self> {
        let backend = NativeBackend::open(model_path.as_ref(), model_type, config)?;
        Ok(Self::with_backend(backend))
    }
}

impl<B: ExecutorBackend> Executor<B> {
    /// Wrap an already running backend.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Submit a request.
    ///
    /// # Returns
    ///
    /// The id keying this request's responses.
    pub fn enqueue_request(&self, request: &Request<'_>) -> ExecutorResult<RequestId> {
        let request_id = self.backend.enqueue_request(request)?;
        debug!(
            target: "trtllm::executor",
            request_id,
            input_tokens = request.input_token_ids().len(),
            max_tokens = request.max_tokens(),
            streaming = request.streaming(),
            "Request enqueued"
        );
        Ok(request_id)
    }

    /// Number of buffered, unread responses for `request_id`.
    ///
    /// Never blocks. Between two calls with no intervening await for the same
    /// id the count does not decrease.
    pub fn get_num_responses_ready(&self, request_id: RequestId) -> ExecutorResult<usize> {
        let ready = self.backend.num_responses_ready(request_id)?;
        Ok(ready as usize)
    }

    /// Block until at least one response for `request_id` exists, then
    /// return every buffered response in engine order.
    ///
    /// No timeout is applied; the wait lasts as long as the engine takes.
    ///
    /// # Errors
    ///
    /// - Engine errors from the backend, unchanged
    /// - `EmptyResponseBatch` if the backend woke up with nothing
    pub fn await_responses(&self, request_id: RequestId) -> ExecutorResult<Vec<Response>> {
        let responses = self.backend.await_responses(request_id)?;
        if responses.is_empty() {
            return Err(ExecutorError::EmptyResponseBatch(request_id));
        }
        trace!(
            target: "trtllm::executor",
            request_id,
            count = responses.len(),
            "Responses received"
        );
        Ok(responses)
    }

    /// Block like [`await_responses`](Self::await_responses) and return only
    /// the first response.
    ///
    /// Any further responses drained in the same batch are discarded and
    /// will not be returned by later calls.
    pub fn await_response(&self, request_id: RequestId) -> ExecutorResult<Response> {
        let responses = self.await_responses(request_id)?;
        let discarded = responses.len() - 1;
        if discarded > 0 {
            warn!(
                target: "trtllm::executor",
                request_id,
                discarded,
                "Discarding extra responses drained by await_response"
            );
        }
        responses
            .into_iter()
            .next()
            .ok_or(ExecutorError::EmptyResponseBatch(request_id))
    }
}
