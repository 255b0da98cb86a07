//! Core tensor data structures.
//!
//! # Tensors for the JSD operators
//!
//! The kernels themselves only see flat `&[TensorFloat]` buffers. This module
//! provides the small owned container the autograd surface in
//! [`backprop`](crate::backprop) passes around:
//!
//! - [`Tensor`]: a shape plus flat row-major data
//! - [`WithGrad`]: a value paired with its accumulated gradient
//! - [`tensor!`](crate::tensor): literal construction from nested arrays
//!
//! ## Limitations
//! - Row-major only
//! - No broadcasting; operators compare element counts, not shapes
//!
//! ## Example
//!
//! ```rust
//! use bernoulli_jsd::tensors::Tensor;
//! let t = Tensor::new(vec![2, 3], vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
//! assert_eq!(t.shape, vec![2, 3]);
//! assert_eq!(t.len(), 6);
//! ```

use crate::TensorFloat;
use crate::error::{Error, Result};

/// Represents an N-dimensional tensor with a shape and flat row-major data.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub shape: Vec<usize>,
    pub data: Vec<TensorFloat>,
}

impl Tensor {
    /// Creates a new tensor with the given shape and flat data.
    ///
    /// # Panics
    /// Panics if the number of elements in `data` does not match the shape product.
    /// Use [`Tensor::try_new`] for the fallible form.
    pub fn new(shape: impl Into<Vec<usize>>, data: Vec<TensorFloat>) -> Self {
        let shape = shape.into();
        assert_eq!(
            shape.iter().product::<usize>(),
            data.len(),
            "shape {:?} is incompatible with {} data elements",
            shape,
            data.len()
        );
        Self { shape, data }
    }

    /// Creates a new tensor, returning [`Error::InvalidShape`] if `data` does
    /// not fill `shape` exactly.
    pub fn try_new(shape: impl Into<Vec<usize>>, data: Vec<TensorFloat>) -> Result<Self> {
        let shape = shape.into();
        if shape.iter().product::<usize>() != data.len() {
            return Err(Error::InvalidShape {
                shape,
                len: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// A zero-filled tensor of the given shape.
    pub fn zeros(shape: impl Into<Vec<usize>>) -> Self {
        let shape = shape.into();
        let len = shape.iter().product();
        Self {
            shape,
            data: vec![0.0; len],
        }
    }

    /// A 1-D tensor over `data`.
    pub fn from_slice(data: &[TensorFloat]) -> Self {
        Self {
            shape: vec![data.len()],
            data: data.to_vec(),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if the tensor holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A container for tracking gradients of values.
///
/// Typically used as `WithGrad<Tensor>`.
#[derive(Debug, Clone)]
pub struct WithGrad<T> {
    pub value: T,
    pub grad: T,
}

impl WithGrad<Tensor> {
    /// Wraps `value` with a zeroed gradient of the same shape.
    pub fn new(value: Tensor) -> Self {
        let grad = Tensor::zeros(value.shape.clone());
        Self { value, grad }
    }

    /// Adds `grad` into the stored gradient element-wise.
    ///
    /// # Errors
    /// [`Error::ShapeMismatch`] if `grad` has a different element count.
    pub fn accumulate(&mut self, grad: &Tensor) -> Result<()> {
        crate::error::ensure_len("accumulate", "grad", self.grad.len(), grad.len())?;
        for (g, &d) in self.grad.data.iter_mut().zip(&grad.data) {
            *g += d;
        }
        Ok(())
    }

    /// Resets the stored gradient to zero.
    pub fn zero_grad(&mut self) {
        self.grad.data.iter_mut().for_each(|g| *g = 0.0);
    }
}

/// Defines a tensor from nested literal arrays.
///
/// Supports arbitrary dimensionality as long as sublists are uniform in shape.
///
/// # Example
/// ```
/// use bernoulli_jsd::tensor;
/// let t = tensor!([[0.1, 0.2], [0.3, 0.4]]);
/// assert_eq!(t.shape, vec![2, 2]);
/// ```
#[macro_export]
macro_rules! tensor {
    ($lit:literal) => {
        $crate::tensors::Tensor::new(Vec::<usize>::new(), vec![$lit])
    };

    ([ $( $inner:tt ),+ $(,)? ]) => {{
        let children = vec![ $( $crate::tensor!($inner) ),+ ];
        let first_shape = &children[0].shape;
        assert!(children.iter().all(|c| c.shape == *first_shape),
            "ragged tensor literal (rows have mismatched shapes)");
        let mut shape = vec![children.len()];
        shape.extend_from_slice(first_shape);
        let mut data = Vec::with_capacity(children.len() * children[0].data.len());
        for c in children { data.extend(c.data); }
        $crate::tensors::Tensor::new(shape, data)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_rejects_ragged_data() {
        let err = Tensor::try_new(vec![2, 2], vec![0.1, 0.2, 0.3]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidShape {
                shape: vec![2, 2],
                len: 3
            }
        );
    }

    #[test]
    #[should_panic(expected = "incompatible")]
    fn new_panics_on_ragged_data() {
        let _ = Tensor::new(vec![3], vec![0.1]);
    }

    #[test]
    fn macro_builds_row_major_data() {
        let t = crate::tensor!([[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]);
        assert_eq!(t.shape, vec![2, 3]);
        assert_eq!(t.data, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
    }

    #[test]
    fn accumulate_adds_and_checks_length() {
        let mut w = WithGrad::new(Tensor::from_slice(&[0.2, 0.4]));
        w.accumulate(&Tensor::from_slice(&[1.0, -1.0])).unwrap();
        w.accumulate(&Tensor::from_slice(&[0.5, 0.5])).unwrap();
        assert_eq!(w.grad.data, vec![1.5, -0.5]);
        assert!(w.accumulate(&Tensor::from_slice(&[1.0])).is_err());

        w.zero_grad();
        assert!(w.grad.data.iter().all(|&g| g == 0.0));
    }
}
