//! Integration tests for the public executor API.
//!
//! The engine is replaced by `EchoBackend`, a caller-supplied
//! `ExecutorBackend` that answers every request with canned streaming
//! responses. This exercises the same seam a native engine plugs into.
//!
//! ```bash
//! # Without the native engine
//! cargo test -p trtllm
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use parking_lot::{Condvar, Mutex};
use trtllm::{
    get_result, Executor, ExecutorBackend, ExecutorConfig, ExecutorError, ExecutorResult,
    NativeOutput, Request, RequestId, Response, Shape, Tensor,
};

/// Responds to each request with one streamed response per prompt token,
/// echoing the prompt back. The last response is final.
#[derive(Default)]
struct EchoBackend {
    buffers: Mutex<(RequestId, HashMap<RequestId, Vec<Response>>)>,
    ready: Condvar,
}

impl ExecutorBackend for EchoBackend {
    fn enqueue_request(&self, request: &Request<'_>) -> ExecutorResult<RequestId> {
        if request.input_token_ids().is_empty() {
            return Err(ExecutorError::engine(
                "enqueue_request",
                "input token ids must not be empty",
            ));
        }

        let mut guard = self.buffers.lock();
        guard.0 += 1;
        let request_id = guard.0;

        let prompt: Vec<i32> = request.input_token_ids().iter().map(|&t| t as i32).collect();
        let steps = prompt.len().min(request.max_tokens() as usize).max(1);
        let responses = (1..=steps)
            .map(|n| {
                Response::with_output(
                    request_id,
                    NativeOutput {
                        is_final: n == steps,
                        output_token_ids: vec![prompt[..n.min(prompt.len())].to_vec()],
                    },
                )
            })
            .collect();
        guard.1.insert(request_id, responses);
        self.ready.notify_all();
        Ok(request_id)
    }

    fn num_responses_ready(&self, request_id: RequestId) -> ExecutorResult<u32> {
        let guard = self.buffers.lock();
        Ok(guard.1.get(&request_id).map_or(0, Vec::len) as u32)
    }

    fn await_responses(&self, request_id: RequestId) -> ExecutorResult<Vec<Response>> {
        let mut guard = self.buffers.lock();
        loop {
            if let Some(buffer) = guard.1.get_mut(&request_id) {
                if !buffer.is_empty() {
                    return Ok(std::mem::take(buffer));
                }
            }
            self.ready.wait(&mut guard);
        }
    }
}

#[test]
fn test_integration_generate_until_final() {
    let config = ExecutorConfig::new();
    let executor = Executor::with_backend(EchoBackend::default());

    let mut request = Request::new(&[1, 2, 3], 16);
    request.set_streaming(true);
    let request_id = executor.enqueue_request(&request).unwrap();

    let ready = executor.get_num_responses_ready(request_id).unwrap();
    assert_eq!(ready, 3);

    let responses = executor.await_responses(request_id).unwrap();
    assert_eq!(responses.len(), ready);

    let results: Vec<_> = responses.iter().map(|r| get_result(r).unwrap()).collect();
    for result in &results {
        assert!(result.output_token_ids().len() <= config.max_beam_width as usize);
    }
    assert_eq!(results[0].output_token_ids(), &[vec![1]]);
    assert_eq!(results[2].output_token_ids(), &[vec![1, 2, 3]]);
    assert!(!results[0].is_final());
    assert!(results[2].is_final());
}

#[test]
fn test_integration_await_response_takes_one_per_call() {
    let executor = Executor::with_backend(EchoBackend::default());
    let request_id = executor
        .enqueue_request(&Request::new(&[7, 8, 9, 10], 16))
        .unwrap();
    assert_eq!(executor.get_num_responses_ready(request_id).unwrap(), 4);

    let first = executor.await_response(request_id).unwrap();
    assert_eq!(first.get_result().unwrap().output_token_ids(), &[vec![7]]);

    // The other three were drained with the first and are gone
    assert_eq!(executor.get_num_responses_ready(request_id).unwrap(), 0);
}

#[test]
fn test_integration_engine_rejection_is_relayed() {
    let executor = Executor::with_backend(EchoBackend::default());
    let err = executor.enqueue_request(&Request::new(&[], 4)).unwrap_err();
    assert!(err.is_engine_error());
    assert!(err.to_string().contains("input token ids must not be empty"));
}

#[test]
fn test_integration_concurrent_callers() {
    let executor = Arc::new(Executor::with_backend(EchoBackend::default()));

    let handles: Vec<_> = (1..=8u32)
        .map(|n| {
            let executor = Arc::clone(&executor);
            thread::spawn(move || {
                let prompt: Vec<u32> = (0..n).collect();
                let request_id = executor.enqueue_request(&Request::new(&prompt, 32)).unwrap();
                let responses = executor.await_responses(request_id).unwrap();
                let last = responses.last().unwrap().get_result().unwrap();
                (prompt, last)
            })
        })
        .collect();

    for handle in handles {
        let (prompt, last) = handle.join().expect("caller thread panicked");
        assert!(last.is_final());
        assert_eq!(last.output_token_ids(), &[prompt]);
    }
}

#[test]
fn test_integration_request_with_encoder_features() {
    let features = vec![half::f16::from_f32(0.5); 2 * 80];
    let tensor = Tensor::of(&features, Shape::new(&[2, 80])).unwrap();

    let mut request = Request::new(&[50_258, 50_259], 8);
    request.set_encoder_input_features(tensor);
    request.set_end_id(50_257).unwrap();

    let executor = Executor::with_backend(EchoBackend::default());
    let request_id = executor.enqueue_request(&request).unwrap();
    let response = executor.await_response(request_id).unwrap();
    assert_eq!(response.request_id(), request_id);
}

#[cfg(not(feature = "trtllm"))]
#[test]
fn test_integration_native_entry_points_unavailable() {
    use trtllm::{init_plugins, CudaStream};

    assert!(matches!(init_plugins(), Err(ExecutorError::NativeUnavailable(_))));
    // SAFETY: the stub never dereferences the pointer
    let stream = unsafe { CudaStream::from_raw(std::ptr::null_mut()) };
    assert!(matches!(stream, Err(ExecutorError::NativeUnavailable(_))));
}
