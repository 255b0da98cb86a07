//! Named operator table.
//!
//! Graph runtimes look operators up by symbolic name, check arity against the
//! [`OpSchema`], run the kernel over flat buffers and, during the backward
//! pass, use the forward operator's [`GradientDef`] to find out which
//! gradient operator to run and which buffers to feed it.
//!
//! ```rust
//! use bernoulli_jsd::ops::registry::OperatorRegistry;
//!
//! let registry = OperatorRegistry::default();
//! let mut loss = [0.0; 2];
//! registry.run("BernoulliJSD", &[&[0.5, 0.1], &[0.5, 0.9]], &mut loss)?;
//! assert_eq!(loss[0], 0.0);
//!
//! let grads = registry.run_gradient("BernoulliJSD", &[&[0.5, 0.1], &[0.5, 0.9]], &[&[1.0, 1.0]])?;
//! assert!(grads[0].is_some());
//! assert!(grads[1].is_none());
//! # Ok::<(), bernoulli_jsd::error::Error>(())
//! ```

use std::collections::BTreeMap;

use crate::TensorFloat;
use crate::error::{Error, Result, ensure_len};

use super::dispatch::{
    BERNOULLI_JSD, BERNOULLI_JSD_GRADIENT, bernoulli_jsd_gradient_into, bernoulli_jsd_into,
};

/// Uniform kernel signature: flat read-only inputs, one caller-sized output.
///
/// The registry has already checked `inputs.len()` against the schema.
pub type KernelFn = fn(inputs: &[&[TensorFloat]], output: &mut [TensorFloat]) -> Result<()>;

/// Static description of an operator's interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpSchema {
    /// Symbolic name the operator is registered under.
    pub name: &'static str,
    /// Input buffer names, in call order.
    pub inputs: &'static [&'static str],
    /// Output buffer names, in call order.
    pub outputs: &'static [&'static str],
    /// Human-readable description.
    pub doc: &'static str,
}

impl OpSchema {
    /// Number of input buffers the kernel takes.
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Number of output buffers the kernel writes.
    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }
}

/// A buffer reference inside a gradient definition, relative to the forward op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradSlot {
    /// Gradient flowing into the forward op's output `i`.
    OutputGrad(usize),
    /// The forward op's input `i`.
    Input(usize),
    /// Gradient with respect to the forward op's input `i`.
    InputGrad(usize),
}

/// How to build the backward step of an operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientDef {
    /// Name of the gradient operator to run.
    pub op: &'static str,
    /// Buffers fed to the gradient operator, in its input order.
    pub inputs: &'static [GradSlot],
    /// Forward inputs that receive a gradient; each must be a [`GradSlot::InputGrad`].
    pub outputs: &'static [GradSlot],
}

/// A registered operator.
#[derive(Debug, Clone)]
pub struct OpDef {
    /// Name and arity.
    pub schema: OpSchema,
    /// Flat-buffer implementation.
    pub kernel: KernelFn,
    /// Backward wiring, `None` for operators that stop gradients.
    pub gradient: Option<GradientDef>,
}

/// Name-keyed operator table.
#[derive(Debug, Clone)]
pub struct OperatorRegistry {
    ops: BTreeMap<&'static str, OpDef>,
}

impl Default for OperatorRegistry {
    /// A registry holding `BernoulliJSD` and `BernoulliJSDGradient`.
    fn default() -> Self {
        let mut registry = Self::empty();
        for def in builtin_ops() {
            // names in builtin_ops() are distinct
            registry.ops.insert(def.schema.name, def);
        }
        registry
    }
}

impl OperatorRegistry {
    /// A registry with no operators.
    pub fn empty() -> Self {
        Self {
            ops: BTreeMap::new(),
        }
    }

    /// Adds `def` under its schema name.
    ///
    /// # Errors
    /// [`Error::DuplicateOperator`] if the name is taken.
    pub fn register(&mut self, def: OpDef) -> Result<()> {
        let name = def.schema.name;
        if self.ops.contains_key(name) {
            return Err(Error::DuplicateOperator { name });
        }
        log::trace!(
            "registering operator {name} ({} -> {})",
            def.schema.num_inputs(),
            def.schema.num_outputs()
        );
        self.ops.insert(name, def);
        Ok(())
    }

    /// Whether an operator is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.ops.keys().copied()
    }

    /// # Errors
    /// [`Error::UnknownOperator`] if nothing is registered under `name`.
    pub fn get(&self, name: &str) -> Result<&OpDef> {
        self.ops.get(name).ok_or_else(|| Error::unknown_operator(name))
    }

    /// The gradient definition of `name`.
    ///
    /// # Errors
    /// [`Error::UnknownOperator`], or [`Error::NoGradient`] if the operator
    /// does not propagate gradients.
    pub fn gradient_def(&self, name: &str) -> Result<&GradientDef> {
        let def = self.get(name)?;
        def.gradient.as_ref().ok_or(Error::NoGradient {
            op: def.schema.name,
        })
    }

    /// Runs operator `name` over `inputs`, writing its single output.
    ///
    /// # Errors
    /// [`Error::UnknownOperator`], [`Error::ArityMismatch`] if `inputs` does
    /// not match the schema or the operator has more than one output, and
    /// whatever the kernel reports.
    pub fn run(&self, name: &str, inputs: &[&[TensorFloat]], output: &mut [TensorFloat]) -> Result<()> {
        let def = self.get(name)?;
        let schema = &def.schema;
        if inputs.len() != schema.num_inputs() {
            return Err(Error::arity(schema.name, "inputs", schema.num_inputs(), inputs.len()));
        }
        if schema.num_outputs() != 1 {
            return Err(Error::arity(schema.name, "outputs", schema.num_outputs(), 1));
        }
        log::trace!("running operator {}", schema.name);
        (def.kernel)(inputs, output)
    }

    /// Runs the backward step of forward operator `name`.
    ///
    /// `inputs` are the forward inputs and `output_grads` the gradients
    /// flowing into the forward outputs. Returns one entry per forward input:
    /// `Some(grad)` for inputs the gradient definition produces, `None` for
    /// inputs that receive no gradient.
    ///
    /// # Errors
    /// [`Error::NoGradient`], [`Error::ArityMismatch`] if a slot refers to a
    /// buffer that was not supplied or the gradient definition lists more
    /// outputs than the gradient operator writes, and whatever the gradient
    /// kernel reports.
    pub fn run_gradient(
        &self,
        name: &str,
        inputs: &[&[TensorFloat]],
        output_grads: &[&[TensorFloat]],
    ) -> Result<Vec<Option<Vec<TensorFloat>>>> {
        let forward = &self.get(name)?.schema;
        if inputs.len() != forward.num_inputs() {
            return Err(Error::arity(forward.name, "inputs", forward.num_inputs(), inputs.len()));
        }
        if output_grads.len() != forward.num_outputs() {
            return Err(Error::arity(
                forward.name,
                "outputs",
                forward.num_outputs(),
                output_grads.len(),
            ));
        }

        let grad_def = self.gradient_def(name)?;
        let grad_schema = &self.get(grad_def.op)?.schema;
        if grad_def.outputs.len() != grad_schema.num_outputs() {
            return Err(Error::arity(
                grad_schema.name,
                "outputs",
                grad_schema.num_outputs(),
                grad_def.outputs.len(),
            ));
        }

        let mut grad_inputs = Vec::with_capacity(grad_def.inputs.len());
        for slot in grad_def.inputs {
            let buf = match *slot {
                GradSlot::OutputGrad(i) => output_grads.get(i),
                GradSlot::Input(i) => inputs.get(i),
                GradSlot::InputGrad(_) => None,
            };
            let Some(&buf) = buf else {
                return Err(Error::arity(
                    grad_schema.name,
                    "inputs",
                    grad_def.inputs.len(),
                    grad_inputs.len(),
                ));
            };
            grad_inputs.push(buf);
        }

        let mut grads: Vec<Option<Vec<TensorFloat>>> = vec![None; inputs.len()];
        for slot in grad_def.outputs {
            let GradSlot::InputGrad(i) = *slot else {
                return Err(Error::arity(grad_schema.name, "outputs", 0, grad_def.outputs.len()));
            };
            let Some(input) = inputs.get(i) else {
                return Err(Error::arity(forward.name, "inputs", i + 1, inputs.len()));
            };
            let mut grad = vec![0.0; input.len()];
            self.run(grad_def.op, &grad_inputs, &mut grad)?;
            grads[i] = Some(grad);
        }
        Ok(grads)
    }
}

const BERNOULLI_JSD_DOC: &str = "Computes the Jensen-Shannon divergence (JSD) between two \
Bernoulli distributions where each is parametrized by a single probability.";

const BERNOULLI_JSD_GRADIENT_DOC: &str = "Gradient of BernoulliJSD with respect to the \
predicted probabilities, scaled by the upstream gradient.";

fn bernoulli_jsd_kernel(inputs: &[&[TensorFloat]], output: &mut [TensorFloat]) -> Result<()> {
    let &[x, t] = inputs else {
        return Err(Error::arity(BERNOULLI_JSD, "inputs", 2, inputs.len()));
    };
    bernoulli_jsd_into(x, t, output)
}

fn bernoulli_jsd_gradient_kernel(inputs: &[&[TensorFloat]], output: &mut [TensorFloat]) -> Result<()> {
    let &[go, x, t] = inputs else {
        return Err(Error::arity(BERNOULLI_JSD_GRADIENT, "inputs", 3, inputs.len()));
    };
    ensure_len(BERNOULLI_JSD_GRADIENT, "dX", x.len(), output.len())?;
    bernoulli_jsd_gradient_into(go, x, t, output)
}

fn builtin_ops() -> [OpDef; 2] {
    [
        OpDef {
            schema: OpSchema {
                name: BERNOULLI_JSD,
                inputs: &["X", "T"],
                outputs: &["L"],
                doc: BERNOULLI_JSD_DOC,
            },
            kernel: bernoulli_jsd_kernel,
            gradient: Some(GradientDef {
                op: BERNOULLI_JSD_GRADIENT,
                inputs: &[GradSlot::OutputGrad(0), GradSlot::Input(0), GradSlot::Input(1)],
                outputs: &[GradSlot::InputGrad(0)],
            }),
        },
        OpDef {
            schema: OpSchema {
                name: BERNOULLI_JSD_GRADIENT,
                inputs: &["dL", "X", "T"],
                outputs: &["dX"],
                doc: BERNOULLI_JSD_GRADIENT_DOC,
            },
            kernel: bernoulli_jsd_gradient_kernel,
            gradient: None,
        },
    ]
}
