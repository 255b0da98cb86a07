//! bernoulli_jsd: Jensen-Shannon divergence kernels for Bernoulli distributions.
//!
//! Computes, element by element over two equal-length probability arrays, the
//! JSD between `Bernoulli(predicted[i])` and `Bernoulli(target[i])`, and the
//! gradient of that divergence with respect to `predicted` for backpropagation.
//!
//! # Features
//!
//! - Numerically stable `entropy`/`logit` helpers with well-defined behavior at 0 and 1.
//! - Forward and backward kernels over flat buffers, rayon-parallel or sequential.
//! - A named operator table for graph runtimes (`BernoulliJSD`, `BernoulliJSDGradient`).
//! - A tensor-level op returning a backward closure.
//!
//! # Modules
//!
//! - [`stability`] - `entropy`, `logit` and the shared threshold.
//! - [`ops`] - Kernels, dispatch and the operator registry.
//! - [`backprop`] - Differentiable op over [`tensors::Tensor`].
//! - [`backend`] - Runtime selection of the execution backend.
//! - [`error`] - Error type and `Result` alias.
//!
//! # Example
//!
//! ```rust
//! use bernoulli_jsd::{bernoulli_jsd, bernoulli_jsd_gradient};
//!
//! let jsd = bernoulli_jsd(&[0.1, 0.5], &[0.9, 0.5])?;
//! assert!(jsd[0] > 0.0);
//! assert_eq!(jsd[1], 0.0);
//!
//! let grad = bernoulli_jsd_gradient(&[1.0, 1.0], &[0.1, 0.5], &[0.9, 0.5])?;
//! assert!(grad[0] < 0.0);
//! # Ok::<(), bernoulli_jsd::error::Error>(())
//! ```

pub mod backend;
pub mod backprop;
pub mod error;
pub mod ops;
pub mod stability;
pub mod tensors;

pub use error::{Error, Result};
pub use ops::dispatch::{
    bernoulli_jsd, bernoulli_jsd_gradient, bernoulli_jsd_gradient_into, bernoulli_jsd_into,
};
pub use ops::registry::OperatorRegistry;

/// The float used by every kernel (`f32`).
pub type TensorFloat = f32;
