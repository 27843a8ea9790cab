//! Name table for the intrinsics this crate evaluates.
//!
//! Symbols follow the bitcode naming scheme (`llvm.sadd.with.overflow.i32`,
//! `llvm.assume`). Vector comparisons are not calls in bitcode, but hosts that
//! route every operation through one table can look them up as `icmp.<pred>`.

use crate::arith::ArithOp;
use crate::compare::ComparePredicate;
use crate::error::EvalError;
use crate::width::Width;
use fxhash::FxHashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    /// `llvm.<op>.with.overflow.i<width>`: destination address and two scalars in,
    /// aggregate written back through the address.
    Arith { op: ArithOp, width: Width },
    /// `icmp.<pred>`: two vectors in, one boolean per lane out.
    Compare(ComparePredicate),
    /// `llvm.assume`: one boolean in, nothing out.
    Assume,
}

impl Intrinsic {
    /// Number of operands, including the destination of an aggregate result.
    pub fn arity(&self) -> usize {
        match self {
            Intrinsic::Arith { .. } => 3,
            Intrinsic::Compare(_) => 2,
            Intrinsic::Assume => 1,
        }
    }
}

impl fmt::Display for Intrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intrinsic::Arith { op, width } => write!(f, "llvm.{}.with.overflow.{}", op, width),
            Intrinsic::Compare(predicate) => write!(f, "icmp.{}", predicate),
            Intrinsic::Assume => f.write_str("llvm.assume"),
        }
    }
}

/// Maps intrinsic symbol names to [`Intrinsic`]s.
#[derive(Debug, Clone)]
pub struct IntrinsicRegistry {
    by_name: FxHashMap<String, Intrinsic>,
}

impl IntrinsicRegistry {
    /// A registry holding every supported intrinsic.
    pub fn new() -> Self {
        let mut registry = IntrinsicRegistry {
            by_name: FxHashMap::default(),
        };
        for op in ArithOp::ALL {
            for width in Width::ALL {
                registry.register(Intrinsic::Arith { op, width });
            }
        }
        for predicate in ComparePredicate::ALL {
            registry.register(Intrinsic::Compare(predicate));
        }
        registry.register(Intrinsic::Assume);
        registry
    }

    fn register(&mut self, intrinsic: Intrinsic) {
        self.by_name.insert(intrinsic.to_string(), intrinsic);
    }

    pub fn get(&self, name: &str) -> Option<Intrinsic> {
        self.by_name.get(name).copied()
    }

    /// Looks up `name`, failing with [`EvalError::UnknownIntrinsic`].
    pub fn resolve(&self, name: &str) -> Result<Intrinsic, EvalError> {
        self.get(name)
            .ok_or_else(|| EvalError::UnknownIntrinsic(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}

impl Default for IntrinsicRegistry {
    fn default() -> Self {
        Self::new()
    }
}
