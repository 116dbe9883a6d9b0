//! Inference requests.

use crate::error::{ExecutorError, ExecutorResult};
use crate::tensor::Tensor;
use crate::types::{NativeTokenId, TokenId};

/// One inference request, owned until it is enqueued.
///
/// The lifetime `'a` is that of the optional encoder input features, which
/// borrow caller memory.
///
/// # Example
///
/// ```
/// use trtllm::Request;
///
/// let mut request = Request::new(&[1, 2, 3], 16);
/// request.set_streaming(true);
/// request.set_end_id(2).unwrap();
/// assert_eq!(request.input_token_ids(), &[1, 2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct Request<'a> {
    input_token_ids: Vec<TokenId>,
    max_tokens: u32,
    streaming: bool,
    end_id: Option<TokenId>,
    pad_id: Option<TokenId>,
    encoder_input_features: Option<Tensor<'a>>,
}

impl<'a> Request<'a> {
    /// Build a request from prompt token ids and an output token budget.
    ///
    /// `max_tokens` is not bounded here. The engine takes a signed 32-bit
    /// budget, so values above `i32::MAX` are rejected at enqueue with
    /// `MaxTokensTooLarge`.
    pub fn new(input_token_ids: &[TokenId], max_tokens: u32) -> Self {
        Self {
            input_token_ids: input_token_ids.to_vec(),
            max_tokens,
            streaming: false,
            end_id: None,
            pad_id: None,
            encoder_input_features: None,
        }
    }

    /// Deliver partial results as they are generated.
    pub fn set_streaming(&mut self, streaming: bool) {
        self.streaming = streaming;
    }

    /// Token id that ends generation.
    ///
    /// # Errors
    ///
    /// `TokenIdTooLarge` if the id does not fit the engine's token type.
    pub fn set_end_id(&mut self, end_id: TokenId) -> ExecutorResult<()> {
        check_native_token(end_id)?;
        self.end_id = Some(end_id);
        Ok(())
    }

    /// Token id used for padding.
    ///
    /// # Errors
    ///
    /// `TokenIdTooLarge` if the id does not fit the engine's token type.
    pub fn set_pad_id(&mut self, pad_id: TokenId) -> ExecutorResult<()> {
        check_native_token(pad_id)?;
        self.pad_id = Some(pad_id);
        Ok(())
    }

    /// Attach encoder input features (e.g. audio features for
    /// encoder-decoder models).
    pub fn set_encoder_input_features(&mut self, features: Tensor<'a>) {
        self.encoder_input_features = Some(features);
    }

    #[inline]
    pub fn input_token_ids(&self) -> &[TokenId] {
        &self.input_token_ids
    }

    #[inline]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    #[inline]
    pub fn streaming(&self) -> bool {
        self.streaming
    }

    #[inline]
    pub fn end_id(&self) -> Option<TokenId> {
        self.end_id
    }

    #[inline]
    pub fn pad_id(&self) -> Option<TokenId> {
        self.pad_id
    }

    #[inline]
    pub fn encoder_input_features(&self) -> Option<&Tensor<'a>> {
        self.encoder_input_features.as_ref()
    }

    /// Prompt tokens in the engine's native width.
    #[cfg_attr(not(feature = "trtllm"), allow(dead_code))]
    pub(crate) fn native_input_token_ids(&self) -> ExecutorResult<Vec<NativeTokenId>> {
        self.input_token_ids
            .iter()
            .map(|&id| check_native_token(id))
            .collect()
    }

    /// Output token budget in the engine's signed 32-bit width.
    #[cfg_attr(not(feature = "trtllm"), allow(dead_code))]
    pub(crate) fn native_max_tokens(&self) -> ExecutorResult<i32> {
        i32::try_from(self.max_tokens)
            .map_err(|_| ExecutorError::MaxTokensTooLarge(self.max_tokens))
    }
}

/// Narrow a token id to the engine's signed 32-bit width.
pub(crate) fn check_native_token(id: TokenId) -> ExecutorResult<NativeTokenId> {
    NativeTokenId::try_from(id).map_err(|_| ExecutorError::TokenIdTooLarge(id))
}
