//! # Operation Dispatch Layer
//!
//! This module defines the Bernoulli JSD operators and dispatches them across
//! the CPU execution backends.
//!
//! ## Submodules
//!
//! - [`cpu`] - Element-wise loops, rayon-parallel and sequential
//! - [`dispatch`] - Length checks and backend selection; the flat-buffer API
//! - [`registry`] - Operators by symbolic name, with schema and gradient wiring
//!
//! ## Backend Selection
//!
//! The dispatch layer reads the global [`Backend`](crate::backend::Backend)
//! on every call. Both backends compute the same values; the choice only
//! affects scheduling.
//!
//! ## Extending
//!
//! To add an operator:
//!
//! 1. Implement its loop in `cpu`
//! 2. Add a checked entry point to `dispatch`
//! 3. Describe it in `registry` so graph runtimes can find it by name
//!
//! ## Notes
//!
//! - Shape checks happen in `dispatch`, never inside the loops
//! - Kernels write only into caller-provided slots

pub mod cpu;
pub mod dispatch;
pub mod registry;
