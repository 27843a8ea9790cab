//! Operand and result values exchanged with the host interpreter.
//!
//! Integers are stored in the smallest native type of their width. Signedness
//! belongs to the operation, not the value: `ScalarValue::I8(-1)` and an
//! unsigned `255` are the same bit pattern.

use crate::memory::Address;
use crate::width::Width;
use std::fmt;

/// A fixed-width integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
}

impl ScalarValue {
    /// Builds a value of `width` from the low bits of `bits`.
    pub fn from_bits(width: Width, bits: u64) -> ScalarValue {
        match width {
            Width::W8 => ScalarValue::I8(bits as u8 as i8),
            Width::W16 => ScalarValue::I16(bits as u16 as i16),
            Width::W32 => ScalarValue::I32(bits as u32 as i32),
            Width::W64 => ScalarValue::I64(bits as i64),
        }
    }

    pub fn width(&self) -> Width {
        match self {
            ScalarValue::I8(_) => Width::W8,
            ScalarValue::I16(_) => Width::W16,
            ScalarValue::I32(_) => Width::W32,
            ScalarValue::I64(_) => Width::W64,
        }
    }

    /// Zero-extended two's-complement bit pattern.
    pub fn bits(&self) -> u64 {
        match *self {
            ScalarValue::I8(v) => v as u8 as u64,
            ScalarValue::I16(v) => v as u16 as u64,
            ScalarValue::I32(v) => v as u32 as u64,
            ScalarValue::I64(v) => v as u64,
        }
    }

    pub fn shape(&self) -> OperandShape {
        OperandShape::Scalar(self.width())
    }

    pub fn as_signed(&self) -> i64 {
        self.width().sign_extend(self.bits())
    }

    pub fn as_unsigned(&self) -> u64 {
        self.bits()
    }
}

macro_rules! scalar_from {
    ($($native:ty => $variant:ident as $stored:ty),* $(,)?) => {
        $(
            impl From<$native> for ScalarValue {
                fn from(value: $native) -> Self {
                    ScalarValue::$variant(value as $stored)
                }
            }
        )*
    };
}

scalar_from!(
    i8 => I8 as i8, u8 => I8 as i8,
    i16 => I16 as i16, u16 => I16 as i16,
    i32 => I32 as i32, u32 => I32 as i32,
    i64 => I64 as i64, u64 => I64 as i64,
);

/// A fixed-length vector of integers sharing one lane width.
///
/// The length is fixed at construction; there is no way to grow or shrink a
/// vector in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VectorValue {
    I8(Box<[i8]>),
    I16(Box<[i16]>),
    I32(Box<[i32]>),
    I64(Box<[i64]>),
}

impl VectorValue {
    /// Builds a vector of `width` lanes from the low bits of each element of `lanes`.
    pub fn from_bits<I>(width: Width, lanes: I) -> VectorValue
    where
        I: IntoIterator<Item = u64>,
    {
        let lanes = lanes.into_iter();
        match width {
            Width::W8 => VectorValue::I8(lanes.map(|b| b as u8 as i8).collect()),
            Width::W16 => VectorValue::I16(lanes.map(|b| b as u16 as i16).collect()),
            Width::W32 => VectorValue::I32(lanes.map(|b| b as u32 as i32).collect()),
            Width::W64 => VectorValue::I64(lanes.map(|b| b as i64).collect()),
        }
    }

    pub fn width(&self) -> Width {
        match self {
            VectorValue::I8(_) => Width::W8,
            VectorValue::I16(_) => Width::W16,
            VectorValue::I32(_) => Width::W32,
            VectorValue::I64(_) => Width::W64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            VectorValue::I8(lanes) => lanes.len(),
            VectorValue::I16(lanes) => lanes.len(),
            VectorValue::I32(lanes) => lanes.len(),
            VectorValue::I64(lanes) => lanes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero-extended bit pattern of lane `index`.
    pub fn lane(&self, index: usize) -> Option<u64> {
        match self {
            VectorValue::I8(lanes) => lanes.get(index).map(|&v| v as u8 as u64),
            VectorValue::I16(lanes) => lanes.get(index).map(|&v| v as u16 as u64),
            VectorValue::I32(lanes) => lanes.get(index).map(|&v| v as u32 as u64),
            VectorValue::I64(lanes) => lanes.get(index).map(|&v| v as u64),
        }
    }

    pub fn shape(&self) -> OperandShape {
        OperandShape::Vector {
            width: self.width(),
            len: self.len(),
        }
    }

    pub fn lanes(&self) -> Lanes<'_> {
        Lanes { vector: self, index: 0 }
    }
}

/// Iterator over the zero-extended lane bit patterns of a [`VectorValue`].
pub struct Lanes<'a> {
    vector: &'a VectorValue,
    index: usize,
}

impl Iterator for Lanes<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let bits = self.vector.lane(self.index)?;
        self.index += 1;
        Some(bits)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Lanes<'_> {}

macro_rules! vector_from {
    ($($native:ty => $variant:ident as $stored:ty),* $(,)?) => {
        $(
            impl From<Vec<$native>> for VectorValue {
                fn from(values: Vec<$native>) -> Self {
                    VectorValue::$variant(values.into_iter().map(|v| v as $stored).collect())
                }
            }
        )*
    };
}

vector_from!(
    i8 => I8 as i8, u8 => I8 as i8,
    i16 => I16 as i16, u16 => I16 as i16,
    i32 => I32 as i32, u32 => I32 as i32,
    i64 => I64 as i64, u64 => I64 as i64,
);

/// One boolean per lane; the result of a vector comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoolVector(Box<[bool]>);

impl BoolVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for BoolVector {
    fn from(values: Vec<bool>) -> Self {
        BoolVector(values.into_boxed_slice())
    }
}

impl FromIterator<bool> for BoolVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        BoolVector(iter.into_iter().collect())
    }
}

/// Any value that crosses the boundary with the host interpreter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(ScalarValue),
    Vector(VectorValue),
    Bool(bool),
    BoolVector(BoolVector),
    Address(Address),
    Unit,
}

impl Value {
    /// Runtime type of this value, as seen by dispatch.
    pub fn shape(&self) -> OperandShape {
        match self {
            Value::Scalar(s) => OperandShape::Scalar(s.width()),
            Value::Vector(v) => v.shape(),
            Value::Bool(_) => OperandShape::Bool,
            Value::BoolVector(v) => OperandShape::BoolVector(v.len()),
            Value::Address(_) => OperandShape::Address,
            Value::Unit => OperandShape::Unit,
        }
    }
}

/// The runtime type of an operand: enough to pick a specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandShape {
    Scalar(Width),
    Vector { width: Width, len: usize },
    Bool,
    BoolVector(usize),
    Address,
    Unit,
}

impl fmt::Display for OperandShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandShape::Scalar(width) => write!(f, "{}", width),
            OperandShape::Vector { width, len } => write!(f, "<{} x {}>", len, width),
            OperandShape::Bool => f.write_str("i1"),
            OperandShape::BoolVector(len) => write!(f, "<{} x i1>", len),
            OperandShape::Address => f.write_str("ptr"),
            OperandShape::Unit => f.write_str("void"),
        }
    }
}

impl From<ScalarValue> for Value {
    fn from(value: ScalarValue) -> Self {
        Value::Scalar(value)
    }
}

impl From<VectorValue> for Value {
    fn from(value: VectorValue) -> Self {
        Value::Vector(value)
    }
}

impl From<BoolVector> for Value {
    fn from(value: BoolVector) -> Self {
        Value::BoolVector(value)
    }
}

impl From<Address> for Value {
    fn from(value: Address) -> Self {
        Value::Address(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_bits_are_zero_extended() {
        assert_eq!(ScalarValue::I8(-1).bits(), 0xff);
        assert_eq!(ScalarValue::from(200u8), ScalarValue::I8(-56));
        assert_eq!(ScalarValue::I16(-25536).as_unsigned(), 40000);
        assert_eq!(ScalarValue::from_bits(Width::W32, 0x1_0000_0005), ScalarValue::I32(5));
        assert_eq!(ScalarValue::I64(i64::MIN).as_signed(), i64::MIN);
    }

    #[test]
    fn vector_lanes_iterate_in_order() {
        let v = VectorValue::from(vec![255u8, 1]);
        assert_eq!(v.width(), Width::W8);
        assert_eq!(v.lanes().collect::<Vec<_>>(), vec![255, 1]);
        assert_eq!(v.lanes().len(), 2);
        assert_eq!(v.lane(2), None);
    }

    #[test]
    fn vector_from_bits_truncates_lanes() {
        let v = VectorValue::from_bits(Width::W16, [0x1_ffff, 3]);
        assert_eq!(v, VectorValue::I16(vec![-1, 3].into_boxed_slice()));
    }

    #[test]
    fn value_shapes() {
        let v = Value::from(VectorValue::from(vec![1i32, 2, 3]));
        assert_eq!(v.shape(), OperandShape::Vector { width: Width::W32, len: 3 });
        assert_eq!(v.shape().to_string(), "<3 x i32>");
        assert_eq!(Value::Scalar(ScalarValue::I64(0)).shape().to_string(), "i64");
        assert_eq!(Value::BoolVector(BoolVector::from(vec![true])).shape().to_string(), "<1 x i1>");
    }
}
