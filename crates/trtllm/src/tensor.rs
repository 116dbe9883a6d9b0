//! Shapes and borrowed tensors handed to the engine.
//!
//! A [`Tensor`] never owns its data. The buffer is borrowed for `'a`, so it
//! outlives every request the tensor is attached to. The native backend copies
//! the bytes into engine-owned memory when the request is enqueued.

use crate::error::{ExecutorError, ExecutorResult};
use crate::types::DataType;

// ========== Shape ==========

/// Ordered tensor dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    dims: Vec<u64>,
}

impl Shape {
    /// Build a shape from dimension sizes.
    ///
    /// No bound is placed on the number of dimensions; degenerate shapes are
    /// accepted here and left for the engine to reject.
    pub fn new(dims: &[u64]) -> Self {
        Self {
            dims: dims.to_vec(),
        }
    }

    /// Dimensions in construction order.
    #[inline]
    pub fn dims(&self) -> &[u64] {
        &self.dims
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Product of all dimensions, `None` on overflow.
    ///
    /// A rank-0 shape has volume 1.
    pub fn volume(&self) -> Option<u64> {
        self.dims.iter().try_fold(1u64, |acc, &d| acc.checked_mul(d))
    }

    /// Dimensions in the engine's signed 64-bit representation.
    #[cfg_attr(not(feature = "trtllm"), allow(dead_code))]
    pub(crate) fn native_dims(&self) -> ExecutorResult<Vec<i64>> {
        self.dims
            .iter()
            .map(|&d| i64::try_from(d).map_err(|_| ExecutorError::DimensionOverflow(d)))
            .collect()
    }
}

impl From<Vec<u64>> for Shape {
    fn from(dims: Vec<u64>) -> Self {
        Self { dims }
    }
}

// ========== Tensor Elements ==========

mod sealed {
    pub trait Sealed {}
}

/// Rust element types with a fixed engine [`DataType`].
///
/// Implemented only for padding-free primitive types, so a slice of them can
/// be viewed as raw bytes.
pub trait TensorElement: sealed::Sealed + Copy + 'static {
    /// Engine data type of this element.
    const DATA_TYPE: DataType;
}

macro_rules! tensor_element {
    ($($ty:ty => $dt:expr),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl TensorElement for $ty {
                const DATA_TYPE: DataType = $dt;
            }
        )*
    };
}

tensor_element! {
    bool => DataType::Bool,
    u8 => DataType::Uint8,
    i8 => DataType::Int8,
    i32 => DataType::Int32,
    i64 => DataType::Int64,
    half::bf16 => DataType::Bf16,
    half::f16 => DataType::Fp16,
    f32 => DataType::Fp32,
}

// ========== Tensor ==========

/// A typed, shaped view over caller-owned memory.
#[derive(Debug, Clone)]
pub struct Tensor<'a> {
    data_type: DataType,
    shape: Shape,
    data: &'a [u8],
}

impl<'a> Tensor<'a> {
    /// Wrap a typed slice, inferring the data type from `T`.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if `data.len()` differs from the shape volume.
    ///
    /// # Example
    ///
    /// ```
    /// use trtllm::{Shape, Tensor, DataType};
    ///
    /// let features = vec![0.5f32; 6];
    /// let tensor = Tensor::of(&features, Shape::new(&[2, 3])).unwrap();
    /// assert_eq!(tensor.data_type(), DataType::Fp32);
    /// assert_eq!(tensor.shape().dims(), &[2, 3]);
    /// ```
    pub fn of<T: TensorElement>(data: &'a [T], shape: Shape) -> ExecutorResult<Self> {
        // SAFETY: TensorElement is only implemented for padding-free
        // primitives, so every byte of the slice is initialized. The byte
        // view borrows `data` for the same lifetime.
        let bytes = unsafe {
            std::slice::from_raw_parts(data.as_ptr().cast::<u8>(), std::mem::size_of_val(data))
        };
        Self::from_bytes(T::DATA_TYPE, bytes, shape)
    }

    /// Wrap raw bytes with an explicit data type (e.g. FP8 payloads).
    ///
    /// # Errors
    ///
    /// - `UnsupportedDataType` for [`DataType::Unknown`]
    /// - `ShapeMismatch` if the byte length differs from
    ///   `volume * size_in_bytes`
    pub fn from_bytes(data_type: DataType, data: &'a [u8], shape: Shape) -> ExecutorResult<Self> {
        let elem_size =
            data_type.size_in_bytes().ok_or(ExecutorError::UnsupportedDataType(data_type))?;

        let expected = shape.volume().and_then(|v| v.checked_mul(elem_size as u64));
        let actual = data.len() as u64;
        if expected != Some(actual) {
            return Err(ExecutorError::ShapeMismatch {
                dims: shape.dims().to_vec(),
                data_type,
                expected: expected.unwrap_or(u64::MAX),
                actual,
            });
        }

        Ok(Self {
            data_type,
            shape,
            data,
        })
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Borrowed payload bytes.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }
}
