//! Differentiable JSD operation over tensors.
//!
//! # Backpropagation Primitive
//!
//! Wraps the flat-buffer kernels in the forward-value-plus-backward-closure
//! pattern used by manual autograd code:
//!
//! 1. **Inputs** are a `WithGrad<Tensor>` for the prediction and a plain
//!    `Tensor` for the target, which never receives a gradient.
//! 2. **Forward Pass** computes the per-element divergence tensor.
//! 3. **Backward Pass** is a closure capturing the inputs it needs to map
//!    `dL/d(out)` to `dL/d(prediction)`.
//!
//! ## Usage Guidelines
//!
//! - Only element counts are compared; the output takes the prediction's shape.
//! - The backward closure implements `Fn`, so it can be invoked repeatedly.
//! - Length mismatches surface as [`Error::ShapeMismatch`](crate::error::Error::ShapeMismatch).

use crate::error::Result;
use crate::ops::dispatch;
use crate::tensors::{Tensor, WithGrad};

/// Backward closure mapping an upstream gradient to a gradient of the prediction.
pub type FnTensorTo<'a> = dyn Fn(&Tensor) -> Result<Tensor> + 'a;

/// Element-wise Jensen-Shannon divergence between Bernoulli predictions and targets.
///
/// # Returns
/// - `out`: Tensor of per-element divergences, shaped like `prediction.value`.
/// - `back`: Closure mapping `dL/d(out)` to `dL/d(prediction)`.
///
/// # Errors
/// Fails if `target` has a different element count than the prediction. The
/// closure fails if the upstream gradient does.
///
/// # Example
/// ```rust
/// use bernoulli_jsd::{backprop::bernoulli_jsd, tensor, tensors::WithGrad};
///
/// let mut pred = WithGrad::new(tensor!([0.1, 0.5]));
/// let target = tensor!([0.9, 0.5]);
/// let grad = {
///     let (loss, back) = bernoulli_jsd(&pred, &target)?;
///     assert!(loss.data[0] > 0.0);
///     back(&tensor!([1.0, 1.0]))?
/// };
/// pred.accumulate(&grad)?;
/// assert!(pred.grad.data[0] < 0.0);
/// # Ok::<(), bernoulli_jsd::error::Error>(())
/// ```
pub fn bernoulli_jsd<'a>(
    prediction: &'a WithGrad<Tensor>,
    target: &'a Tensor,
) -> Result<(Tensor, Box<FnTensorTo<'a>>)> {
    let pred = &prediction.value;
    let data = dispatch::bernoulli_jsd(&pred.data, &target.data)?;
    let out = Tensor {
        shape: pred.shape.clone(),
        data,
    };

    let back = move |grad_output: &Tensor| -> Result<Tensor> {
        let data = dispatch::bernoulli_jsd_gradient(&grad_output.data, &pred.data, &target.data)?;
        Ok(Tensor {
            shape: pred.shape.clone(),
            data,
        })
    };

    Ok((out, Box::new(back)))
}
