//! `trtllm generate`

use std::path::PathBuf;

use clap::Args;
use trtllm::{ModelType, TokenId};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Engine directory
    #[arg(short, long)]
    pub model: PathBuf,

    /// Model architecture: decoder-only, encoder-only or encoder-decoder
    #[arg(long, default_value = "decoder-only")]
    pub model_type: ModelType,

    /// TOML file layered under TRTLLM__* environment variables
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Prompt token ids, comma separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub tokens: Vec<TokenId>,

    /// Maximum number of output tokens
    #[arg(long, default_value_t = 16)]
    pub max_tokens: u32,

    /// Stream partial results
    #[arg(long)]
    pub streaming: bool,

    /// Token id that ends generation
    #[arg(long)]
    pub end_id: Option<TokenId>,

    /// Padding token id
    #[arg(long)]
    pub pad_id: Option<TokenId>,
}

pub fn handle_generate(args: GenerateArgs) -> i32 {
    match run(&args) {
        Ok(()) => 0,
        Err(err) => super::report("generate", err),
    }
}

#[cfg(feature = "trtllm")]
fn run(args: &GenerateArgs) -> anyhow::Result<()> {
    use std::time::Duration;

    use anyhow::{bail, Context};
    use trtllm::{init_plugins, Executor, ExecutorConfig};

    if !init_plugins()? {
        bail!("TensorRT-LLM plugins could not be registered");
    }

    let config = ExecutorConfig::load(args.config.as_deref()).context("loading configuration")?;
    let executor = Executor::open(&args.model, args.model_type, &config)
        .with_context(|| format!("opening engine at {}", args.model.display()))?;

    let request = build_request(args)?;
    let request_id = executor.enqueue_request(&request)?;
    tracing::info!(request_id, "Request submitted");

    loop {
        while executor.get_num_responses_ready(request_id)? == 0 {
            std::thread::sleep(Duration::from_millis(1));
        }

        for response in executor.await_responses(request_id)? {
            let result = response.get_result()?;
            for (beam, token_ids) in result.output_token_ids().iter().enumerate() {
                println!("[{}] beam {}: {:?}", request_id, beam, token_ids);
            }
            if result.is_final() {
                return Ok(());
            }
        }
    }
}

#[cfg(not(feature = "trtllm"))]
fn run(args: &GenerateArgs) -> anyhow::Result<()> {
    // Validate arguments so usage errors surface before the feature error
    build_request(args)?;
    anyhow::bail!(
        "this binary was built without the native engine; rebuild with `--features trtllm`"
    )
}

fn build_request(args: &GenerateArgs) -> anyhow::Result<trtllm::Request<'static>> {
    let mut request = trtllm::Request::new(&args.tokens, args.max_tokens);
    request.set_streaming(args.streaming);
    if let Some(end_id) = args.end_id {
        request.set_end_id(end_id)?;
    }
    if let Some(pad_id) = args.pad_id {
        request.set_pad_id(pad_id)?;
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: Vec<TokenId>) -> GenerateArgs {
        GenerateArgs {
            model: PathBuf::from("/engines/test"),
            model_type: ModelType::DecoderOnly,
            config: None,
            tokens,
            max_tokens: 16,
            streaming: true,
            end_id: Some(2),
            pad_id: None,
        }
    }

    #[test]
    fn test_build_request_from_args() {
        let request = build_request(&args(vec![1, 2, 3])).unwrap();
        assert_eq!(request.input_token_ids(), &[1, 2, 3]);
        assert_eq!(request.max_tokens(), 16);
        assert!(request.streaming());
        assert_eq!(request.end_id(), Some(2));
    }

    #[test]
    fn test_build_request_rejects_wide_end_id() {
        let mut a = args(vec![1]);
        a.end_id = Some(u32::MAX);
        assert!(build_request(&a).is_err());
    }

    #[cfg(not(feature = "trtllm"))]
    #[test]
    fn test_generate_without_engine_exits_with_error() {
        assert_eq!(handle_generate(args(vec![1])), 1);
    }
}
