//! Tests for ExecutorConfig::validate.

use crate::config::ExecutorConfig;
use crate::error::ExecutorError;

fn assert_invalid(config: &ExecutorConfig, field: &str) {
    match config.validate() {
        Err(ExecutorError::InvalidConfig(msg)) => {
            assert!(msg.contains(field), "Message should name {}: {}", field, msg);
        }
        other => panic!("Expected InvalidConfig for {}, got: {:?}", field, other),
    }
}

#[test]
fn test_zero_beam_width_rejected() {
    let config = ExecutorConfig::new().with_max_beam_width(0);
    assert_invalid(&config, "max_beam_width");
}

#[test]
fn test_zero_sizes_rejected_when_set() {
    let config = ExecutorConfig {
        max_batch_size: Some(0),
        ..Default::default()
    };
    assert_invalid(&config, "max_batch_size");

    let config = ExecutorConfig {
        max_num_tokens: Some(0),
        ..Default::default()
    };
    assert_invalid(&config, "max_num_tokens");

    let mut config = ExecutorConfig::default();
    config.kv_cache.max_tokens = Some(0);
    assert_invalid(&config, "kv_cache.max_tokens");
}

#[test]
fn test_memory_fraction_bounds() {
    for bad in [0.0f32, -0.5, 1.01, f32::NAN] {
        let mut config = ExecutorConfig::default();
        config.kv_cache.free_gpu_memory_fraction = Some(bad);
        assert_invalid(&config, "free_gpu_memory_fraction");
    }

    for good in [0.05f32, 0.9, 1.0] {
        let mut config = ExecutorConfig::default();
        config.kv_cache.free_gpu_memory_fraction = Some(good);
        assert!(config.validate().is_ok(), "fraction {} should be valid", good);
    }
}

#[test]
fn test_gpu_weights_percent_bounds() {
    for bad in [-0.1f32, 1.5, f32::NAN] {
        let config = ExecutorConfig {
            gpu_weights_percent: bad,
            ..Default::default()
        };
        assert_invalid(&config, "gpu_weights_percent");
    }

    let config = ExecutorConfig {
        gpu_weights_percent: 0.0,
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}
