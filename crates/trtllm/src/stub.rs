//! Scripted in-memory backend.
//!
//! # WARNING: TEST ONLY
//!
//! Gated with `#[cfg(test)]` in `lib.rs`. It does not run a model: tests push
//! the responses the engine would have produced, and the backend buffers them
//! per request id exactly as the executor contract describes.

use std::collections::{HashMap, VecDeque};

use parking_lot::{Condvar, Mutex};

use crate::backend::ExecutorBackend;
use crate::error::{ExecutorError, ExecutorResult};
use crate::request::Request;
use crate::response::{NativeOutput, Response};
use crate::types::{NativeTokenId, RequestId, TokenId};

/// What the stub saw for one enqueued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnqueuedRequest {
    pub request_id: RequestId,
    pub input_token_ids: Vec<TokenId>,
    pub max_tokens: u32,
    pub streaming: bool,
}

#[derive(Debug, Default)]
struct State {
    next_id: RequestId,
    buffers: HashMap<RequestId, VecDeque<Response>>,
    enqueued: Vec<EnqueuedRequest>,
    reject_enqueue: Option<String>,
}

/// In-memory backend with per-request response buffers.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    state: Mutex<State>,
    ready: Condvar,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a response and wake any waiter.
    pub fn push(&self, response: Response) {
        let mut state = self.state.lock();
        state
            .buffers
            .entry(response.request_id())
            .or_default()
            .push_back(response);
        self.ready.notify_all();
    }

    /// Buffer a successful response.
    pub fn push_output(&self, request_id: RequestId, is_final: bool, beams: Vec<Vec<NativeTokenId>>) {
        self.push(Response::with_output(
            request_id,
            NativeOutput {
                is_final,
                output_token_ids: beams,
            },
        ));
    }

    /// Make every following enqueue fail with an engine error.
    pub fn reject_enqueue(&self, message: &str) {
        self.state.lock().reject_enqueue = Some(message.to_string());
    }

    /// Requests seen so far, in enqueue order.
    pub fn enqueued(&self) -> Vec<EnqueuedRequest> {
        self.state.lock().enqueued.clone()
    }
}

impl ExecutorBackend for ScriptedBackend {
    fn enqueue_request(&self, request: &Request<'_>) -> ExecutorResult<RequestId> {
        let mut state = self.state.lock();
        if let Some(message) = &state.reject_enqueue {
            return Err(ExecutorError::engine("enqueue_request", message.clone()));
        }

        state.next_id += 1;
        let request_id = state.next_id;
        state.enqueued.push(EnqueuedRequest {
            request_id,
            input_token_ids: request.input_token_ids().to_vec(),
            max_tokens: request.max_tokens(),
            streaming: request.streaming(),
        });
        Ok(request_id)
    }

    fn num_responses_ready(&self, request_id: RequestId) -> ExecutorResult<u32> {
        let state = self.state.lock();
        let count = state.buffers.get(&request_id).map_or(0, VecDeque::len);
        Ok(count as u32)
    }

    fn await_responses(&self, request_id: RequestId) -> ExecutorResult<Vec<Response>> {
        let mut state = self.state.lock();
        loop {
            if let Some(buffer) = state.buffers.get_mut(&request_id) {
                if !buffer.is_empty() {
                    return Ok(buffer.drain(..).collect());
                }
            }
            self.ready.wait(&mut state);
        }
    }
}
