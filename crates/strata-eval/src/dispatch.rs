//! Picks the kernel for an operation from the runtime shapes of its operands.
//!
//! Every supported `(operation, width)` pair maps to one [`Specialization`];
//! there is no per-width code, the width travels with the specialization and is
//! handed to the width-generic kernel.

use crate::arith::{ArithKernel, ArithOp, OverflowResult};
use crate::compare::{compare_lanes, ComparePredicate, LanePredicate};
use crate::error::EvalError;
use crate::value::{BoolVector, OperandShape, ScalarValue, VectorValue};
use crate::width::Width;
use std::fmt;

/// An operation before its operand widths are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Arith(ArithOp),
    Compare(ComparePredicate),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Arith(op) => write!(f, "{}.with.overflow", op),
            Operation::Compare(predicate) => write!(f, "icmp {}", predicate),
        }
    }
}

/// An operation bound to a concrete width (and, for vectors, a length).
#[derive(Debug, Clone, Copy)]
pub enum Specialization {
    Arith {
        op: ArithOp,
        width: Width,
        kernel: ArithKernel,
    },
    Compare {
        predicate: ComparePredicate,
        width: Width,
        len: usize,
        lane: LanePredicate,
    },
}

/// Selects the specialization of `operation` for operands of the given shapes.
///
/// Arithmetic needs two scalars of one width; comparison needs two non-empty
/// vectors of equal length and lane width. Vector operands that disagree in
/// length or lane width fail with [`EvalError::ShapeMismatch`]; every other
/// shape outside the supported matrix fails with
/// [`EvalError::UnsupportedOperation`].
pub fn select(operation: Operation, left: OperandShape, right: OperandShape) -> Result<Specialization, EvalError> {
    match operation {
        Operation::Arith(op) => match (left, right) {
            (OperandShape::Scalar(lw), OperandShape::Scalar(rw)) if lw == rw => Ok(Specialization::Arith {
                op,
                width: lw,
                kernel: op.kernel(),
            }),
            _ => Err(EvalError::unsupported(
                operation.to_string(),
                format!("expected two integer scalars of one width, found {} and {}", left, right),
            )),
        },
        Operation::Compare(predicate) => match (left, right) {
            (
                OperandShape::Vector { width: lw, len: ll },
                OperandShape::Vector { width: rw, len: rl },
            ) => {
                if lw != rw || ll != rl {
                    return Err(EvalError::ShapeMismatch {
                        left_len: ll,
                        left_width: lw,
                        right_len: rl,
                        right_width: rw,
                    });
                }
                if ll == 0 {
                    return Err(EvalError::unsupported(operation.to_string(), "vectors must have at least one lane"));
                }
                Ok(Specialization::Compare {
                    predicate,
                    width: lw,
                    len: ll,
                    lane: predicate.lane_predicate(),
                })
            }
            _ => Err(EvalError::unsupported(
                operation.to_string(),
                format!("expected two integer vectors, found {} and {}", left, right),
            )),
        },
    }
}

impl Specialization {
    pub fn operation(&self) -> Operation {
        match self {
            Specialization::Arith { op, .. } => Operation::Arith(*op),
            Specialization::Compare { predicate, .. } => Operation::Compare(*predicate),
        }
    }

    pub fn width(&self) -> Width {
        match self {
            Specialization::Arith { width, .. } | Specialization::Compare { width, .. } => *width,
        }
    }

    /// Runs an arithmetic specialization.
    pub fn arith(&self, left: ScalarValue, right: ScalarValue) -> Result<OverflowResult, EvalError> {
        let Specialization::Arith { op, width, kernel } = *self else {
            return Err(EvalError::unsupported(self.operation().to_string(), "not an arithmetic operation"));
        };
        if left.width() != width || right.width() != width {
            return Err(EvalError::unsupported(
                self.operation().to_string(),
                format!("specialized for {}, called with {} and {}", width, left.width(), right.width()),
            ));
        }
        let (bits, overflow) = kernel(width, left.bits(), right.bits());
        let value = ScalarValue::from_bits(width, bits);
        log::trace!(
            "{}.with.overflow.{} {:?}, {:?} -> {:?} (overflow: {})",
            op,
            width,
            left,
            right,
            value,
            overflow
        );
        Ok(OverflowResult { value, overflow })
    }

    /// Runs a comparison specialization.
    pub fn compare(&self, left: &VectorValue, right: &VectorValue) -> Result<BoolVector, EvalError> {
        let Specialization::Compare { predicate, width, len, lane } = *self else {
            return Err(EvalError::unsupported(self.operation().to_string(), "not a comparison"));
        };
        if left.width() != width || left.len() != len {
            return Err(EvalError::unsupported(
                self.operation().to_string(),
                format!("specialized for <{} x {}>, called with {}", len, width, left.shape()),
            ));
        }
        let result = compare_lanes(left, right, |a, b| lane(width, a, b))?;
        log::trace!("icmp {} <{} x {}> -> {:?}", predicate, len, width, result.as_slice());
        Ok(result)
    }
}
