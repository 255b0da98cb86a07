//! Operation Dispatch Layer
//!
//! This module checks buffer lengths, then hands each operator to the loop
//! selected by the global [`Backend`].
//!
//! Length checks happen here, before any backend runs, so a mismatched call
//! fails with [`Error::ShapeMismatch`](crate::error::Error::ShapeMismatch)
//! and leaves the output buffer untouched.
//!
//! # Example
//! ```rust
//! use bernoulli_jsd::ops::dispatch::{bernoulli_jsd, bernoulli_jsd_gradient};
//!
//! let loss = bernoulli_jsd(&[0.5, 0.1], &[0.5, 0.9])?;
//! assert_eq!(loss[0], 0.0);
//! assert!(loss[1] > 0.0);
//!
//! let grad = bernoulli_jsd_gradient(&[1.0, 1.0], &[0.5, 0.1], &[0.5, 0.9])?;
//! assert_eq!(grad[0], 0.0);
//! # Ok::<(), bernoulli_jsd::error::Error>(())
//! ```

use crate::TensorFloat;
use crate::backend::{Backend, get_backend};
use crate::error::{Result, ensure_len};

/// Registered name of the forward operator.
pub const BERNOULLI_JSD: &str = "BernoulliJSD";

/// Registered name of the gradient operator.
pub const BERNOULLI_JSD_GRADIENT: &str = "BernoulliJSDGradient";

/// Computes the element-wise Bernoulli JSD into a caller-sized buffer.
///
/// `output[i]` receives the divergence between `Bernoulli(predicted[i])` and
/// `Bernoulli(target[i])`.
///
/// # Errors
/// [`Error::ShapeMismatch`](crate::error::Error::ShapeMismatch) if `target`
/// or `output` differ in length from `predicted`. Nothing is written.
pub fn bernoulli_jsd_into(
    predicted: &[TensorFloat],
    target: &[TensorFloat],
    output: &mut [TensorFloat],
) -> Result<()> {
    let n = predicted.len();
    ensure_len(BERNOULLI_JSD, "target", n, target.len())?;
    ensure_len(BERNOULLI_JSD, "output", n, output.len())?;

    let backend = get_backend();
    log::debug!("{BERNOULLI_JSD}: n={n} backend={backend}");

    match backend {
        Backend::Cpu => super::cpu::bernoulli_jsd(predicted, target, output),
        Backend::Sequential => super::cpu::bernoulli_jsd_sequential(predicted, target, output),
    }
    Ok(())
}

/// Computes the element-wise Bernoulli JSD into a freshly allocated buffer.
///
/// # Errors
/// [`Error::ShapeMismatch`](crate::error::Error::ShapeMismatch) if the inputs
/// differ in length.
pub fn bernoulli_jsd(predicted: &[TensorFloat], target: &[TensorFloat]) -> Result<Vec<TensorFloat>> {
    ensure_len(BERNOULLI_JSD, "target", predicted.len(), target.len())?;
    let mut output = vec![0.0; predicted.len()];
    bernoulli_jsd_into(predicted, target, &mut output)?;
    Ok(output)
}

/// Computes `grad_output[i] * d jsd / d predicted[i]` into a caller-sized buffer.
///
/// No gradient is produced for `target`.
///
/// # Errors
/// [`Error::ShapeMismatch`](crate::error::Error::ShapeMismatch) if any of
/// `grad_output`, `target` or `grad_input` differ in length from `predicted`.
/// Nothing is written.
pub fn bernoulli_jsd_gradient_into(
    grad_output: &[TensorFloat],
    predicted: &[TensorFloat],
    target: &[TensorFloat],
    grad_input: &mut [TensorFloat],
) -> Result<()> {
    let n = predicted.len();
    ensure_len(BERNOULLI_JSD_GRADIENT, "grad_output", n, grad_output.len())?;
    ensure_len(BERNOULLI_JSD_GRADIENT, "target", n, target.len())?;
    ensure_len(BERNOULLI_JSD_GRADIENT, "grad_input", n, grad_input.len())?;

    let backend = get_backend();
    log::debug!("{BERNOULLI_JSD_GRADIENT}: n={n} backend={backend}");

    match backend {
        Backend::Cpu => {
            super::cpu::bernoulli_jsd_gradient(grad_output, predicted, target, grad_input);
        }
        Backend::Sequential => {
            super::cpu::bernoulli_jsd_gradient_sequential(grad_output, predicted, target, grad_input);
        }
    }
    Ok(())
}

/// Computes the JSD gradient into a freshly allocated buffer.
///
/// # Errors
/// [`Error::ShapeMismatch`](crate::error::Error::ShapeMismatch) if the inputs
/// differ in length.
pub fn bernoulli_jsd_gradient(
    grad_output: &[TensorFloat],
    predicted: &[TensorFloat],
    target: &[TensorFloat],
) -> Result<Vec<TensorFloat>> {
    let mut grad_input = vec![0.0; predicted.len()];
    bernoulli_jsd_gradient_into(grad_output, predicted, target, &mut grad_input)?;
    Ok(grad_input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn forward_rejects_short_target_without_writing() {
        let mut out = [7.0; 3];
        let err = bernoulli_jsd_into(&[0.1, 0.2, 0.3], &[0.1, 0.2], &mut out).unwrap_err();
        assert_eq!(err, Error::shape_mismatch(BERNOULLI_JSD, "target", 3, 2));
        assert_eq!(out, [7.0; 3]);
    }

    #[test]
    fn forward_rejects_wrong_output_size() {
        let mut out = [0.0; 4];
        let err = bernoulli_jsd_into(&[0.1, 0.2, 0.3], &[0.1, 0.2, 0.3], &mut out).unwrap_err();
        assert_eq!(err, Error::shape_mismatch(BERNOULLI_JSD, "output", 3, 4));
    }

    #[test]
    fn gradient_checks_every_buffer() {
        let x = [0.1, 0.2];
        let mut gi = [0.0; 2];
        assert!(bernoulli_jsd_gradient_into(&[1.0], &x, &x, &mut gi).is_err());
        assert!(bernoulli_jsd_gradient_into(&[1.0, 1.0], &x, &[0.3], &mut gi).is_err());
        assert!(bernoulli_jsd_gradient_into(&[1.0, 1.0], &x, &x, &mut [0.0; 3]).is_err());
        assert!(bernoulli_jsd_gradient_into(&[1.0, 1.0], &x, &x, &mut gi).is_ok());
    }

    #[test]
    fn sequential_gradient_rejects_short_upstream_without_writing() {
        crate::backend::set_backend(crate::backend::Backend::Sequential);
        let mut gi = [-1.0; 3];
        let result = bernoulli_jsd_gradient_into(&[1.0, 1.0], &[0.1, 0.2, 0.3], &[0.9, 0.8, 0.7], &mut gi);
        crate::backend::set_backend(crate::backend::Backend::Cpu);

        assert_eq!(
            result.unwrap_err(),
            Error::shape_mismatch(BERNOULLI_JSD_GRADIENT, "grad_output", 3, 2)
        );
        assert_eq!(gi, [-1.0; 3]);
    }

    #[test]
    fn empty_inputs_produce_empty_outputs() {
        assert!(bernoulli_jsd(&[], &[]).unwrap().is_empty());
        assert!(bernoulli_jsd_gradient(&[], &[], &[]).unwrap().is_empty());
    }
}
