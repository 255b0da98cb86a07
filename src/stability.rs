//! Numerically stable scalar helpers shared by the JSD kernels.
//!
//! Both helpers work on a single Bernoulli parameter `p` and never fail:
//! values outside `[0, 1]` are pushed through the same threshold logic as
//! values close to the boundaries.
//!
//! - [`logit`] clamps `p` away from `0` and `1` before taking the log-odds.
//! - [`entropy`] short-circuits to exactly `0.0` within [`LOG_THRESHOLD`] of
//!   either boundary instead of evaluating `0 * ln(0)`.

use crate::TensorFloat;

/// Distance from `0` and `1` below which the log terms are not evaluated.
///
/// Serves both as the clamp bound in [`logit`] and as the collapse threshold
/// in [`entropy`].
pub const LOG_THRESHOLD: TensorFloat = 1e-20;

/// Largest [`TensorFloat`] strictly below `1.0`.
const ONE_BELOW: TensorFloat = 1.0 - TensorFloat::EPSILON / 2.0;

/// Log-odds `ln(p / (1 - p))` with `p` clamped into `[ε, 1 - ε]`.
///
/// `1 - ε` rounds to `1.0` in single precision, so the upper bound falls back
/// to the largest float below one. The result is finite for every finite `p`.
///
/// # Example
/// ```rust
/// use bernoulli_jsd::stability::logit;
///
/// assert_eq!(logit(0.5), 0.0);
/// assert!(logit(1.0).is_finite());
/// assert!(logit(-3.0).is_finite());
/// ```
#[inline]
#[must_use]
pub fn logit(p: TensorFloat) -> TensorFloat {
    let hi = (1.0 - LOG_THRESHOLD).min(ONE_BELOW);
    let x = p.clamp(LOG_THRESHOLD, hi);
    (x / (1.0 - x)).ln()
}

/// Binary entropy `-p ln(p) - (1 - p) ln(1 - p)`, in nats.
///
/// Returns exactly `0.0` when `p < ε` or `1 - p < ε`.
///
/// # Example
/// ```rust
/// use bernoulli_jsd::stability::entropy;
///
/// assert!((entropy(0.5) - std::f32::consts::LN_2).abs() < 1e-6);
/// assert_eq!(entropy(0.0), 0.0);
/// assert_eq!(entropy(1.0), 0.0);
/// ```
#[inline]
#[must_use]
pub fn entropy(p: TensorFloat) -> TensorFloat {
    if p < LOG_THRESHOLD || 1.0 - p < LOG_THRESHOLD {
        return 0.0;
    }
    let q = 1.0 - p;
    -p * p.ln() - q * q.ln()
}
