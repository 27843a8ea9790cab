//! The entry points used by the host interpreter.

use crate::arith::ArithOp;
use crate::compare::{compare_vectors, ComparePredicate};
use crate::config::{AssumePolicy, EvalConfig};
use crate::dispatch::{select, Operation};
use crate::error::EvalError;
use crate::intrinsics::{Intrinsic, IntrinsicRegistry};
use crate::memory::{Address, Memory};
use crate::value::{BoolVector, ScalarValue, Value, VectorValue};
use crate::width::Width;
use crate::writeback::{write_overflow_result, WritebackLayout};
use strata_layout::helpers::round_up;
use strata_layout::{FlagRepr, LayoutComputer, LayoutError, PairLayout};

/// Reads the runtime value of an operand.
///
/// The host interpreter implements this over its own frame or register
/// representation; values are trusted to carry the type the operand was
/// declared with.
pub trait ValueSource {
    type Operand;

    fn read_value(&self, operand: &Self::Operand) -> Result<Value, EvalError>;
}

/// Evaluates overflow arithmetic, vector comparisons and intrinsic calls.
///
/// An evaluator holds no mutable state after construction and can be shared
/// between threads.
#[derive(Debug, Clone)]
pub struct Evaluator {
    /// Writeback layouts in ascending width order
    layouts: [WritebackLayout; 4],

    registry: IntrinsicRegistry,

    assume_policy: AssumePolicy,
}

impl Evaluator {
    /// An evaluator using the default configuration on the host target.
    pub fn new() -> Result<Self, EvalError> {
        Self::with_config(&EvalConfig::default())
    }

    /// Computes the writeback layouts described by `config` for the host target.
    ///
    /// Hosts without a repc target description get the layouts of
    /// [`Evaluator::with_int_flag_layouts`] when the flag is an `i32`.
    pub fn with_config(config: &EvalConfig) -> Result<Self, EvalError> {
        let mut computer = match LayoutComputer::for_host(config.flag_repr) {
            Ok(computer) => computer,
            Err(LayoutError::UnsupportedHost) if config.flag_repr == FlagRepr::I32 => {
                log::debug!("no target description for this host, using 4-byte flag layouts");
                return Self::with_int_flag_layouts(config);
            }
            Err(err) => return Err(err.into()),
        };
        for (width, offset) in config.flag_offset_overrides()? {
            computer.set_flag_offset(width.bits(), offset);
        }
        let pairs = computer.all_pair_layouts()?;

        let mut layouts = Width::ALL.map(WritebackLayout::with_int_flag);
        for (slot, (width, pair)) in layouts.iter_mut().zip(Width::ALL.into_iter().zip(pairs.iter())) {
            *slot = WritebackLayout::from_pair(width, pair)?;
        }
        Self::from_layouts(layouts, config.assume_policy)
    }

    /// Builds `i32`-flag layouts without a target description: the flag follows
    /// the value slot, aligned to 4 bytes. `config.flag_offsets` still applies.
    pub fn with_int_flag_layouts(config: &EvalConfig) -> Result<Self, EvalError> {
        if config.flag_repr != FlagRepr::I32 {
            return Err(LayoutError::UnsupportedHost.into());
        }
        let overrides = config.flag_offset_overrides()?;
        let mut layouts = Width::ALL.map(WritebackLayout::with_int_flag);
        for (slot, width) in layouts.iter_mut().zip(Width::ALL) {
            let mut pair = int_flag_pair(width);
            if let Some(&(_, offset)) = overrides.iter().find(|(w, _)| *w == width) {
                pair = pair.with_flag_offset(width.bits(), offset)?;
            }
            *slot = WritebackLayout::from_pair(width, &pair)?;
        }
        Self::from_layouts(layouts, config.assume_policy)
    }

    /// An evaluator with explicit layouts, one per width in ascending order.
    pub fn from_layouts(layouts: [WritebackLayout; 4], assume_policy: AssumePolicy) -> Result<Self, EvalError> {
        for (layout, width) in layouts.iter().zip(Width::ALL) {
            if layout.width != width {
                return Err(EvalError::unsupported(
                    "writeback",
                    format!("layout for {} supplied in the {} slot", layout.width, width),
                ));
            }
            log::debug!(
                "{} writeback: flag {} at +{}, {} bytes written",
                width,
                layout.flag_width,
                layout.flag_offset,
                layout.extent
            );
        }
        Ok(Evaluator {
            layouts,
            registry: IntrinsicRegistry::new(),
            assume_policy,
        })
    }

    pub fn layout(&self, width: Width) -> &WritebackLayout {
        let index = match width {
            Width::W8 => 0,
            Width::W16 => 1,
            Width::W32 => 2,
            Width::W64 => 3,
        };
        &self.layouts[index]
    }

    pub fn registry(&self) -> &IntrinsicRegistry {
        &self.registry
    }

    pub fn assume_policy(&self) -> AssumePolicy {
        self.assume_policy
    }

    /// Computes `left <op> right` at `width` and writes `{result, overflow}` to `dest`.
    ///
    /// Returns `dest`. The operation and operand widths are checked before
    /// anything is written.
    pub fn evaluate_overflow_arithmetic<M>(
        &self,
        op: ArithOp,
        width: Width,
        left: ScalarValue,
        right: ScalarValue,
        mem: &mut M,
        dest: Address,
    ) -> Result<Address, EvalError>
    where
        M: Memory + ?Sized,
    {
        let specialization = select(Operation::Arith(op), left.shape(), right.shape())?;
        if specialization.width() != width {
            return Err(EvalError::unsupported(
                format!("{}.with.overflow.{}", op, width),
                format!("operands are {}", specialization.width()),
            ));
        }
        let result = specialization.arith(left, right)?;
        write_overflow_result(mem, dest, self.layout(width), &result)?;
        Ok(dest)
    }

    pub fn evaluate_vector_comparison(
        &self,
        predicate: ComparePredicate,
        left: &VectorValue,
        right: &VectorValue,
    ) -> Result<BoolVector, EvalError> {
        compare_vectors(predicate, left, right)
    }

    /// Calls the intrinsic `name` on `operands`, reading their values from `source`.
    ///
    /// Overflow intrinsics take the destination address first and return it;
    /// comparisons return a [`Value::BoolVector`]; `llvm.assume` returns
    /// [`Value::Unit`].
    pub fn call<S, M>(&self, name: &str, operands: &[S::Operand], source: &S, mem: &mut M) -> Result<Value, EvalError>
    where
        S: ValueSource + ?Sized,
        M: Memory + ?Sized,
    {
        let intrinsic = self.registry.resolve(name)?;
        if operands.len() != intrinsic.arity() {
            return Err(EvalError::Arity {
                intrinsic: name.to_string(),
                expected: intrinsic.arity(),
                found: operands.len(),
            });
        }
        let values = operands
            .iter()
            .map(|operand| source.read_value(operand))
            .collect::<Result<Vec<_>, _>>()?;

        match (intrinsic, values.as_slice()) {
            (
                Intrinsic::Arith { op, width },
                [Value::Address(dest), Value::Scalar(left), Value::Scalar(right)],
            ) => self
                .evaluate_overflow_arithmetic(op, width, *left, *right, mem, *dest)
                .map(Value::Address),
            (Intrinsic::Compare(predicate), [Value::Vector(left), Value::Vector(right)]) => self
                .evaluate_vector_comparison(predicate, left, right)
                .map(Value::BoolVector),
            (Intrinsic::Assume, [Value::Bool(condition)]) => {
                if !condition && self.assume_policy == AssumePolicy::Warn {
                    log::warn!("llvm.assume: condition is false");
                }
                Ok(Value::Unit)
            }
            _ => Err(EvalError::unsupported(
                name,
                format!(
                    "operands of type ({})",
                    values
                        .iter()
                        .map(|v| v.shape().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )),
        }
    }
}

/// `struct { iN value; int32_t overflow; }` with natural alignment.
fn int_flag_pair(width: Width) -> PairLayout {
    let align = width.bytes().max(4);
    let flag_offset = round_up(width.bytes(), 4);
    PairLayout {
        value_size: width.bytes(),
        flag_offset,
        flag_size: 4,
        size: round_up(flag_offset + 4, align),
        align,
    }
}
