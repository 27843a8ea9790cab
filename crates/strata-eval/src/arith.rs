//! Overflow-checked addition, subtraction and multiplication.
//!
//! Each algorithm is written once over a runtime [`Width`] and works on
//! zero-extended `u64` bit patterns. Sign tests are done against the width's
//! own sign bit; nothing relies on the host promoting narrow integers.

use crate::dispatch::{select, Operation};
use crate::error::EvalError;
use crate::value::ScalarValue;
use crate::width::Width;
use std::fmt;

/// Kernel signature: `(width, left bits, right bits) -> (result bits, overflow)`.
pub type ArithKernel = fn(Width, u64, u64) -> (u64, bool);

/// The arithmetic-with-overflow operations. Signedness is part of the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArithOp {
    SAdd,
    SSub,
    SMul,
    UAdd,
    USub,
    UMul,
}

impl ArithOp {
    pub const ALL: [ArithOp; 6] = [
        ArithOp::SAdd,
        ArithOp::SSub,
        ArithOp::SMul,
        ArithOp::UAdd,
        ArithOp::USub,
        ArithOp::UMul,
    ];

    pub fn is_signed(self) -> bool {
        matches!(self, ArithOp::SAdd | ArithOp::SSub | ArithOp::SMul)
    }

    /// Lower-case name as used in intrinsic symbols (`sadd`, `umul`, ...).
    pub fn mnemonic(self) -> &'static str {
        match self {
            ArithOp::SAdd => "sadd",
            ArithOp::SSub => "ssub",
            ArithOp::SMul => "smul",
            ArithOp::UAdd => "uadd",
            ArithOp::USub => "usub",
            ArithOp::UMul => "umul",
        }
    }

    pub fn from_mnemonic(name: &str) -> Option<ArithOp> {
        ArithOp::ALL.into_iter().find(|op| op.mnemonic() == name)
    }

    /// The width-generic kernel for this operation.
    pub fn kernel(self) -> ArithKernel {
        match self {
            ArithOp::SAdd => signed_add,
            ArithOp::SSub => signed_sub,
            ArithOp::SMul => signed_mul,
            ArithOp::UAdd => unsigned_add,
            ArithOp::USub => unsigned_sub,
            ArithOp::UMul => unsigned_mul,
        }
    }

    /// Runs the kernel on operands truncated to `width`.
    pub fn apply(self, width: Width, left: u64, right: u64) -> (u64, bool) {
        (self.kernel())(width, width.truncate(left), width.truncate(right))
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// The wrapped result of an operation together with its overflow flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverflowResult {
    pub value: ScalarValue,
    pub overflow: bool,
}

impl OverflowResult {
    pub fn width(&self) -> Width {
        self.value.width()
    }
}

/// Computes `left <op> right` at the operands' width.
///
/// Both operands must have the same width; anything else is reported as
/// [`EvalError::UnsupportedOperation`].
pub fn overflow_arith(op: ArithOp, left: ScalarValue, right: ScalarValue) -> Result<OverflowResult, EvalError> {
    select(Operation::Arith(op), left.shape(), right.shape())?.arith(left, right)
}

// Operands of the kernels below are already truncated to `w`.

fn signed_add(w: Width, a: u64, b: u64) -> (u64, bool) {
    let r = w.truncate(a.wrapping_add(b));
    // Overflow iff both operands share a sign that the result does not.
    (r, w.is_negative((a ^ r) & (b ^ r)))
}

fn signed_sub(w: Width, a: u64, b: u64) -> (u64, bool) {
    let r = w.truncate(a.wrapping_sub(b));
    // Overflow iff the operand signs differ and the result's sign differs from `a`.
    (r, w.is_negative((a ^ b) & (a ^ r)))
}

fn signed_mul(w: Width, a: u64, b: u64) -> (u64, bool) {
    if w == Width::W64 {
        return signed_mul_wide(a as i64, b as i64);
    }
    // At most 32 x 32 bits, so the full product fits in an i64.
    let product = w.sign_extend(a) * w.sign_extend(b);
    let r = w.truncate(product as u64);
    (r, w.sign_extend(r) != product)
}

/// 64-bit signed multiply without a 128-bit accumulator.
fn signed_mul_wide(a: i64, b: i64) -> (u64, bool) {
    let r = a.wrapping_mul(b);
    let overflow = if a == 0 || b == 0 {
        false
    } else if b == -1 {
        a == i64::MIN
    } else {
        // Exact iff dividing back recovers `a`; any wrap moves `r` by a multiple of 2^64.
        r / b != a
    };
    (r as u64, overflow)
}

fn unsigned_add(w: Width, a: u64, b: u64) -> (u64, bool) {
    let r = w.truncate(a.wrapping_add(b));
    (r, r < a)
}

fn unsigned_sub(w: Width, a: u64, b: u64) -> (u64, bool) {
    (w.truncate(a.wrapping_sub(b)), a < b)
}

fn unsigned_mul(w: Width, a: u64, b: u64) -> (u64, bool) {
    if w == Width::W64 {
        return unsigned_mul_wide(a, b);
    }
    let product = a * b;
    (w.truncate(product), product > w.mask())
}

/// 64-bit unsigned multiply by 32-bit half words.
fn unsigned_mul_wide(a: u64, b: u64) -> (u64, bool) {
    const LOW: u64 = 0xffff_ffff;
    let r = a.wrapping_mul(b);
    let (a_hi, a_lo) = (a >> 32, a & LOW);
    let (b_hi, b_lo) = (b >> 32, b & LOW);
    if a_hi != 0 && b_hi != 0 {
        return (r, true);
    }
    // One of the high halves is zero, so at most one term is non-zero.
    let cross = a_hi * b_lo + a_lo * b_hi;
    if cross > LOW {
        return (r, true);
    }
    let overflow = (a_lo * b_lo).checked_add(cross << 32).is_none();
    (r, overflow)
}
