//! Parallel CPU kernels for the Bernoulli JSD operators
//!
//! # CPU Backend
//!
//! This module holds the element-wise loops behind `BernoulliJSD` and
//! `BernoulliJSDGradient`. The buffer loops are crate-private and assume
//! their buffers were already checked to have equal length; the checks live
//! in [`dispatch`](super::dispatch).
//!
//! ## Features
//!
//! - Parallel execution using [`rayon`](https://docs.rs/rayon)
//! - A sequential path selected by [`Backend::Sequential`](crate::backend::Backend)
//!
//! ## Implemented Ops
//!
//! - `bernoulli_jsd`: per-index JSD between two Bernoulli parameters
//! - `bernoulli_jsd_gradient`: gradient of the above with respect to the predicted parameter
//!
//! ## Design Goals
//!
//! - Deterministic results regardless of scheduling; no cross-index data flow
//! - Never resize the output, only write into the slots given

use rayon::prelude::*;

use crate::TensorFloat;
use crate::stability::{entropy, logit};

/// Minimum number of elements each rayon task processes.
pub const PARALLEL_MIN_LEN: usize = 4096;

/// JSD between `Bernoulli(p_mdl)` and `Bernoulli(p_emp)`: entropy of the
/// mixture minus the mean entropy of the two components.
#[inline]
pub fn jsd(p_mdl: TensorFloat, p_emp: TensorFloat) -> TensorFloat {
    let p_avg = (p_mdl + p_emp) / 2.0;
    entropy(p_avg) - (entropy(p_mdl) + entropy(p_emp)) / 2.0
}

/// `d jsd / d p_mdl`, using `d entropy(p) / dp = -logit(p)`.
#[inline]
pub fn jsd_grad(p_mdl: TensorFloat, p_emp: TensorFloat) -> TensorFloat {
    let p_avg = (p_mdl + p_emp) / 2.0;
    (logit(p_mdl) - logit(p_avg)) / 2.0
}

/// Writes `jsd(predicted[i], target[i])` into `out[i]` across the rayon pool.
pub(crate) fn bernoulli_jsd(predicted: &[TensorFloat], target: &[TensorFloat], out: &mut [TensorFloat]) {
    out.par_iter_mut()
        .with_min_len(PARALLEL_MIN_LEN)
        .zip(predicted.par_iter())
        .zip(target.par_iter())
        .for_each(|((l, &p_mdl), &p_emp)| {
            *l = jsd(p_mdl, p_emp);
        });
}

/// Writes `grad_output[i] * jsd_grad(predicted[i], target[i])` into
/// `grad_input[i]` across the rayon pool.
pub(crate) fn bernoulli_jsd_gradient(
    grad_output: &[TensorFloat],
    predicted: &[TensorFloat],
    target: &[TensorFloat],
    grad_input: &mut [TensorFloat],
) {
    grad_input
        .par_iter_mut()
        .with_min_len(PARALLEL_MIN_LEN)
        .zip(grad_output.par_iter())
        .zip(predicted.par_iter().zip(target.par_iter()))
        .for_each(|((gi, &go), (&p_mdl, &p_emp))| {
            *gi = go * jsd_grad(p_mdl, p_emp);
        });
}

/// Single-threaded counterpart of [`bernoulli_jsd`].
pub(crate) fn bernoulli_jsd_sequential(
    predicted: &[TensorFloat],
    target: &[TensorFloat],
    out: &mut [TensorFloat],
) {
    for ((l, &p_mdl), &p_emp) in out.iter_mut().zip(predicted).zip(target) {
        *l = jsd(p_mdl, p_emp);
    }
}

/// Single-threaded counterpart of [`bernoulli_jsd_gradient`].
pub(crate) fn bernoulli_jsd_gradient_sequential(
    grad_output: &[TensorFloat],
    predicted: &[TensorFloat],
    target: &[TensorFloat],
    grad_input: &mut [TensorFloat],
) {
    for ((gi, &go), (&p_mdl, &p_emp)) in grad_input
        .iter_mut()
        .zip(grad_output)
        .zip(predicted.iter().zip(target))
    {
        *gi = go * jsd_grad(p_mdl, p_emp);
    }
}
