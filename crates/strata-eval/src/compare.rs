//! Element-wise integer vector comparison.
//!
//! Lane iteration and result assembly live in [`compare_lanes`]; the ten
//! predicates only decide a single pair of lanes.

use crate::dispatch::{select, Operation};
use crate::error::EvalError;
use crate::value::{BoolVector, VectorValue};
use crate::width::Width;
use std::fmt;

/// Decides one lane: `(lane width, left bits, right bits) -> bool`.
///
/// Lane bits are zero-extended; signed predicates sign-extend them at the
/// lane width first.
pub type LanePredicate = fn(Width, u64, u64) -> bool;

/// Relational predicates of the `icmp` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComparePredicate {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
    Ult,
    Ule,
    Ugt,
    Uge,
}

impl ComparePredicate {
    pub const ALL: [ComparePredicate; 10] = [
        ComparePredicate::Eq,
        ComparePredicate::Ne,
        ComparePredicate::Slt,
        ComparePredicate::Sle,
        ComparePredicate::Sgt,
        ComparePredicate::Sge,
        ComparePredicate::Ult,
        ComparePredicate::Ule,
        ComparePredicate::Ugt,
        ComparePredicate::Uge,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            ComparePredicate::Eq => "eq",
            ComparePredicate::Ne => "ne",
            ComparePredicate::Slt => "slt",
            ComparePredicate::Sle => "sle",
            ComparePredicate::Sgt => "sgt",
            ComparePredicate::Sge => "sge",
            ComparePredicate::Ult => "ult",
            ComparePredicate::Ule => "ule",
            ComparePredicate::Ugt => "ugt",
            ComparePredicate::Uge => "uge",
        }
    }

    pub fn from_mnemonic(name: &str) -> Option<ComparePredicate> {
        ComparePredicate::ALL.into_iter().find(|p| p.mnemonic() == name)
    }

    pub fn lane_predicate(self) -> LanePredicate {
        match self {
            ComparePredicate::Eq => |_, a, b| a == b,
            ComparePredicate::Ne => |_, a, b| a != b,
            ComparePredicate::Slt => |w, a, b| w.sign_extend(a) < w.sign_extend(b),
            ComparePredicate::Sle => |w, a, b| w.sign_extend(a) <= w.sign_extend(b),
            ComparePredicate::Sgt => |w, a, b| w.sign_extend(a) > w.sign_extend(b),
            ComparePredicate::Sge => |w, a, b| w.sign_extend(a) >= w.sign_extend(b),
            ComparePredicate::Ult => |_, a, b| a < b,
            ComparePredicate::Ule => |_, a, b| a <= b,
            ComparePredicate::Ugt => |_, a, b| a > b,
            ComparePredicate::Uge => |_, a, b| a >= b,
        }
    }
}

impl fmt::Display for ComparePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Fails with [`EvalError::ShapeMismatch`] unless both vectors have the same length and lane width.
pub fn check_shape(left: &VectorValue, right: &VectorValue) -> Result<(), EvalError> {
    if left.len() != right.len() || left.width() != right.width() {
        return Err(EvalError::ShapeMismatch {
            left_len: left.len(),
            left_width: left.width(),
            right_len: right.len(),
            right_width: right.width(),
        });
    }
    Ok(())
}

/// Applies `decide` to each pair of lanes.
pub fn compare_lanes<F>(left: &VectorValue, right: &VectorValue, decide: F) -> Result<BoolVector, EvalError>
where
    F: Fn(u64, u64) -> bool,
{
    check_shape(left, right)?;
    Ok(left.lanes().zip(right.lanes()).map(|(a, b)| decide(a, b)).collect())
}

/// Compares `left` and `right` lane by lane under `predicate`.
pub fn compare_vectors(
    predicate: ComparePredicate,
    left: &VectorValue,
    right: &VectorValue,
) -> Result<BoolVector, EvalError> {
    select(Operation::Compare(predicate), left.shape(), right.shape())?.compare(left, right)
}
