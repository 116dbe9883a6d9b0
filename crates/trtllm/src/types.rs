//! Primitive types shared with the engine.
//!
//! Enum discriminants must match the engine's `tensorrt_llm::executor`
//! enums exactly; they are passed across the bridge as `i32`.

use std::fmt;
use std::str::FromStr;

/// Token id as exposed to callers.
pub type TokenId = u32;

/// Token id in the engine's native width (`TokenIdType` is `int32_t`).
pub type NativeTokenId = i32;

/// Opaque id correlating a submitted request with its buffered responses.
pub type RequestId = u64;

// ========== Data Type ==========

/// Element type of a tensor.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool = 0,
    Uint8 = 1,
    Int8 = 2,
    Int32 = 3,
    Int64 = 4,
    Bf16 = 5,
    Fp8 = 6,
    Fp16 = 7,
    Fp32 = 8,
    Unknown = 9,
}

impl DataType {
    /// Size of one element in bytes, `None` for [`DataType::Unknown`].
    #[must_use]
    pub const fn size_in_bytes(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Uint8 | Self::Int8 | Self::Fp8 => Some(1),
            Self::Bf16 | Self::Fp16 => Some(2),
            Self::Int32 | Self::Fp32 => Some(4),
            Self::Int64 => Some(8),
            Self::Unknown => None,
        }
    }

    /// Discriminant passed to the engine.
    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }
}

// ========== Model Type ==========

/// Architecture family of the engine being loaded.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelType {
    #[default]
    DecoderOnly = 0,
    EncoderOnly = 1,
    EncoderDecoder = 2,
}

impl ModelType {
    /// Discriminant passed to the engine.
    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Kebab-case name, as accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DecoderOnly => "decoder-only",
            Self::EncoderOnly => "encoder-only",
            Self::EncoderDecoder => "encoder-decoder",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "decoder-only" => Ok(Self::DecoderOnly),
            "encoder-only" => Ok(Self::EncoderOnly),
            "encoder-decoder" => Ok(Self::EncoderDecoder),
            other => Err(format!(
                "unknown model type '{}' (expected decoder-only, encoder-only or encoder-decoder)",
                other
            )),
        }
    }
}
