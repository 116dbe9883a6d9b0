//! Engine responses and their normalized results.

use crate::error::{ExecutorError, ExecutorResult};
use crate::types::{NativeTokenId, RequestId, TokenId};

/// Result payload as produced by the engine, in its native token width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeOutput {
    pub is_final: bool,
    /// One entry per candidate sequence (beam), each in generation order.
    pub output_token_ids: Vec<Vec<NativeTokenId>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Output(NativeOutput),
    Error(String),
}

/// One engine-produced response for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    request_id: RequestId,
    outcome: Outcome,
}

impl Response {
    /// Response carrying a result.
    pub fn with_output(request_id: RequestId, output: NativeOutput) -> Self {
        Self {
            request_id,
            outcome: Outcome::Output(output),
        }
    }

    /// Response carrying an engine error.
    pub fn with_error(request_id: RequestId, message: impl Into<String>) -> Self {
        Self {
            request_id,
            outcome: Outcome::Error(message.into()),
        }
    }

    #[inline]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[inline]
    pub fn has_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    /// Engine error message, if this response failed.
    pub fn error_msg(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Error(msg) => Some(msg),
            Outcome::Output(_) => None,
        }
    }

    /// Normalize this response's result. See [`get_result`].
    pub fn get_result(&self) -> ExecutorResult<GenerationResult> {
        get_result(self)
    }
}

/// Normalized, owned result of one response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationResult {
    is_final: bool,
    output_token_ids: Vec<Vec<TokenId>>,
}

impl GenerationResult {
    pub fn new(is_final: bool, output_token_ids: Vec<Vec<TokenId>>) -> Self {
        Self {
            is_final,
            output_token_ids,
        }
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Candidate sequences, outer and inner order as emitted by the engine.
    #[inline]
    pub fn output_token_ids(&self) -> &[Vec<TokenId>] {
        &self.output_token_ids
    }

    pub fn into_output_token_ids(self) -> Vec<Vec<TokenId>> {
        self.output_token_ids
    }
}

/// Convert a response's native result into a [`GenerationResult`].
///
/// Every token id is copied in order. Ids are range checked rather than
/// truncated.
///
/// # Errors
///
/// - `ResponseError` if the engine reported an error for this response
/// - `TokenIdOutOfRange` if a native id is negative
///
/// # Example
///
/// ```
/// use trtllm::{get_result, NativeOutput, Response};
///
/// let response = Response::with_output(
///     1,
///     NativeOutput { is_final: true, output_token_ids: vec![vec![5, 6], vec![7]] },
/// );
/// let result = get_result(&response).unwrap();
/// assert!(result.is_final());
/// assert_eq!(result.output_token_ids(), &[vec![5, 6], vec![7]]);
/// ```
pub fn get_result(response: &Response) -> ExecutorResult<GenerationResult> {
    let output = match &response.outcome {
        Outcome::Output(output) => output,
        Outcome::Error(message) => {
            return Err(ExecutorError::ResponseError {
                request_id: response.request_id,
                message: message.clone(),
            })
        }
    };

    let output_token_ids = output
        .output_token_ids
        .iter()
        .map(|beam| {
            beam.iter()
                .map(|&id| {
                    TokenId::try_from(id).map_err(|_| ExecutorError::TokenIdOutOfRange {
                        request_id: response.request_id,
                        token_id: i64::from(id),
                    })
                })
                .collect::<ExecutorResult<Vec<_>>>()
        })
        .collect::<ExecutorResult<Vec<_>>>()?;

    Ok(GenerationResult {
        is_final: output.is_final,
        output_token_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(is_final: bool, beams: Vec<Vec<NativeTokenId>>) -> NativeOutput {
        NativeOutput {
            is_final,
            output_token_ids: beams,
        }
    }

    #[test]
    fn test_get_result_preserves_order() {
        let response = Response::with_output(9, output(true, vec![vec![5, 6], vec![7]]));
        let result = get_result(&response).unwrap();
        assert_eq!(
            result,
            GenerationResult::new(true, vec![vec![5, 6], vec![7]])
        );
    }

    #[test]
    fn test_get_result_keeps_duplicates() {
        let response = Response::with_output(1, output(false, vec![vec![3, 3, 1], vec![3, 3, 1]]));
        let result = response.get_result().unwrap();
        assert!(!result.is_final());
        assert_eq!(result.output_token_ids(), &[vec![3, 3, 1], vec![3, 3, 1]]);
    }

    #[test]
    fn test_get_result_empty_candidates() {
        let response = Response::with_output(2, output(false, vec![]));
        let result = response.get_result().unwrap();
        assert!(result.output_token_ids().is_empty());

        let response = Response::with_output(2, output(false, vec![vec![]]));
        assert_eq!(response.get_result().unwrap().output_token_ids(), &[Vec::<u32>::new()]);
    }

    #[test]
    fn test_get_result_full_native_range() {
        let response = Response::with_output(4, output(true, vec![vec![0, i32::MAX]]));
        let result = response.get_result().unwrap();
        assert_eq!(result.output_token_ids(), &[vec![0, i32::MAX as u32]]);
    }

    #[test]
    fn test_get_result_rejects_negative_token() {
        let response = Response::with_output(11, output(true, vec![vec![1], vec![2, -1]]));
        match response.get_result().unwrap_err() {
            ExecutorError::TokenIdOutOfRange {
                request_id,
                token_id,
            } => {
                assert_eq!(request_id, 11);
                assert_eq!(token_id, -1);
            }
            other => panic!("Expected TokenIdOutOfRange, got: {:?}", other),
        }
    }

    #[test]
    fn test_get_result_relays_engine_error() {
        let response = Response::with_error(5, "Request 5 was cancelled");
        assert!(response.has_error());
        assert_eq!(response.error_msg(), Some("Request 5 was cancelled"));

        match response.get_result().unwrap_err() {
            ExecutorError::ResponseError {
                request_id,
                message,
            } => {
                assert_eq!(request_id, 5);
                assert_eq!(message, "Request 5 was cancelled");
            }
            other => panic!("Expected ResponseError, got: {:?}", other),
        }
    }

    #[test]
    fn test_get_result_is_repeatable() {
        let response = Response::with_output(3, output(true, vec![vec![8, 9]]));
        assert_eq!(response.get_result().unwrap(), response.get_result().unwrap());
        assert_eq!(response.request_id(), 3);
        assert!(!response.has_error());
        assert_eq!(response.error_msg(), None);
    }

    #[test]
    fn test_into_output_token_ids() {
        let result = GenerationResult::new(true, vec![vec![1, 2]]);
        assert_eq!(result.into_output_token_ids(), vec![vec![1, 2]]);
    }
}
