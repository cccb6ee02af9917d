//! ## Aggregate functions
//! Adapts [`Sketch`] to a SQL engine's aggregate-function lifecycle:
//!
//! | Function            | Accumulates                  | Emits              |
//! |---------------------|------------------------------|--------------------|
//! | `HLL_CREATE`        | raw elements                 | base64 sketch text |
//! | `HLL_COMPUTE`       | raw elements                 | estimate           |
//! | `HLL_MERGE`         | base64 sketch text           | base64 sketch text |
//! | `HLL_MERGE_COMPUTE` | base64 sketch text           | estimate           |
//!
//! The host drives `init` -> `accumulate`* -> (`clear` -> `accumulate`*)* ->
//! `finalize`. Each [`AggregateFunction`] owns exactly one sketch for its whole
//! lifetime; `clear` starts the next group and dropping the value releases it.

use enum_dispatch::enum_dispatch;
use tracing::{debug, trace, warn};

use crate::error::{AggregateError, SketchError};
use crate::sketch::{Sketch, DEFAULT_PRECISION};

/// Aggregate functions exposed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Create,
    Compute,
    Merge,
    MergeCompute,
}

impl AggregateKind {
    /// Every function, in registration order
    pub const ALL: [AggregateKind; 4] = [
        AggregateKind::Create,
        AggregateKind::Compute,
        AggregateKind::Merge,
        AggregateKind::MergeCompute,
    ];

    /// Return SQL function name
    pub fn name(self) -> &'static str {
        match self {
            AggregateKind::Create => "HLL_CREATE",
            AggregateKind::Compute => "HLL_COMPUTE",
            AggregateKind::Merge => "HLL_MERGE",
            AggregateKind::MergeCompute => "HLL_MERGE_COMPUTE",
        }
    }

    /// Look up function by its SQL name, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Return whether arguments are serialized sketches rather than raw elements
    pub fn merges_sketches(self) -> bool {
        matches!(self, AggregateKind::Merge | AggregateKind::MergeCompute)
    }
}

/// Argument types as declared by the host at init time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    String,
    Integer,
    Real,
    Decimal,
}

/// Value produced by [`Aggregate::finalize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateOutput {
    /// Base64 sketch text
    Sketch(String),
    /// Cardinality estimate
    Estimate(u64),
}

/// Lifecycle operations shared by every aggregate function.
#[enum_dispatch]
pub trait Aggregate {
    /// Consume one input row. `None` is SQL NULL.
    fn accumulate(&mut self, args: &[Option<&[u8]>]) -> Result<(), AggregateError>;
    /// Reset state before the next group
    fn clear(&mut self);
    /// Produce the result for the current group
    fn finalize(&self) -> AggregateOutput;
    /// Return accumulated sketch
    fn sketch(&self) -> &Sketch;
}

/// `HLL_CREATE`
#[derive(Debug, Clone)]
pub struct Create {
    sketch: Sketch,
}

/// `HLL_COMPUTE`
#[derive(Debug, Clone)]
pub struct Compute {
    sketch: Sketch,
}

/// `HLL_MERGE`
#[derive(Debug, Clone)]
pub struct Merge {
    sketch: Sketch,
}

/// `HLL_MERGE_COMPUTE`
#[derive(Debug, Clone)]
pub struct MergeCompute {
    sketch: Sketch,
}

/// One aggregate function instance owning its sketch.
#[enum_dispatch(Aggregate)]
#[derive(Debug, Clone)]
pub enum AggregateFunction {
    Create(Create),
    Compute(Compute),
    Merge(Merge),
    MergeCompute(MergeCompute),
}

impl AggregateFunction {
    /// Initialize `kind` with [`DEFAULT_PRECISION`]
    pub fn init(kind: AggregateKind, arg_types: &[ArgType]) -> Result<Self, AggregateError> {
        Self::init_with_precision(kind, arg_types, DEFAULT_PRECISION)
    }

    /// Initialize `kind` after validating the declared argument types.
    ///
    /// Element functions accept any argument type; the host passes the value's
    /// string form. Merge functions require string arguments.
    pub fn init_with_precision(
        kind: AggregateKind,
        arg_types: &[ArgType],
        precision: u8,
    ) -> Result<Self, AggregateError> {
        let function = kind.name();
        if arg_types.is_empty() {
            return Err(AggregateError::MissingArguments { function });
        }
        if kind.merges_sketches() {
            if let Some(position) = arg_types.iter().position(|&t| t != ArgType::String) {
                return Err(AggregateError::NonStringArgument {
                    function,
                    position: position + 1,
                });
            }
        }

        let sketch = Sketch::new(precision)?;
        debug!(function, precision, args = arg_types.len(), "init");

        Ok(match kind {
            AggregateKind::Create => Create { sketch }.into(),
            AggregateKind::Compute => Compute { sketch }.into(),
            AggregateKind::Merge => Merge { sketch }.into(),
            AggregateKind::MergeCompute => MergeCompute { sketch }.into(),
        })
    }

    /// Return which aggregate function this is
    pub fn kind(&self) -> AggregateKind {
        match self {
            AggregateFunction::Create(_) => AggregateKind::Create,
            AggregateFunction::Compute(_) => AggregateKind::Compute,
            AggregateFunction::Merge(_) => AggregateKind::Merge,
            AggregateFunction::MergeCompute(_) => AggregateKind::MergeCompute,
        }
    }
}

/// Add each argument as an element; NULL is added as the empty element
fn add_elements(
    _function: &'static str,
    sketch: &mut Sketch,
    args: &[Option<&[u8]>],
) -> Result<(), AggregateError> {
    for arg in args {
        sketch.add(arg.unwrap_or_default());
    }
    Ok(())
}

/// Merge each argument as base64 sketch text.
///
/// NULL, empty and unparsable arguments contribute nothing. A sketch of a
/// different precision is a configuration error and rejects the whole row
/// before any register is touched.
fn merge_sketches(
    function: &'static str,
    sketch: &mut Sketch,
    args: &[Option<&[u8]>],
) -> Result<(), AggregateError> {
    let mut others = Vec::with_capacity(args.len());
    for (position, arg) in args.iter().enumerate() {
        let text = match arg {
            Some(text) if !text.is_empty() => text,
            _ => continue,
        };
        match Sketch::from_base64(text) {
            Ok(other) if other.precision() != sketch.precision() => {
                return Err(SketchError::PrecisionMismatch {
                    expected: sketch.precision(),
                    actual: other.precision(),
                }
                .into());
            }
            Ok(other) => others.push(other),
            Err(err) => {
                warn!(function, position = position + 1, %err, "skipping malformed sketch");
            }
        }
    }

    for other in &others {
        sketch.merge(other)?;
    }
    Ok(())
}

fn clear_sketch(function: &'static str, sketch: &mut Sketch) {
    trace!(function, "clear");
    sketch.clear();
}

fn emit_sketch(sketch: &Sketch) -> AggregateOutput {
    AggregateOutput::Sketch(sketch.to_base64())
}

fn emit_estimate(sketch: &Sketch) -> AggregateOutput {
    AggregateOutput::Estimate(sketch.estimate())
}

/// Implement [`Aggregate`] for a function struct named after its [`AggregateKind`] variant
macro_rules! impl_aggregate {
    ($function:ident, $accumulate:ident, $emit:ident) => {
        impl Aggregate for $function {
            fn accumulate(&mut self, args: &[Option<&[u8]>]) -> Result<(), AggregateError> {
                $accumulate(AggregateKind::$function.name(), &mut self.sketch, args)
            }

            fn clear(&mut self) {
                clear_sketch(AggregateKind::$function.name(), &mut self.sketch);
            }

            fn finalize(&self) -> AggregateOutput {
                $emit(&self.sketch)
            }

            fn sketch(&self) -> &Sketch {
                &self.sketch
            }
        }
    };
}

impl_aggregate!(Create, add_elements, emit_sketch);
impl_aggregate!(Compute, add_elements, emit_estimate);
impl_aggregate!(Merge, merge_sketches, emit_sketch);
impl_aggregate!(MergeCompute, merge_sketches, emit_estimate);
