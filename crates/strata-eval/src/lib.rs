//! Overflow-checked integer arithmetic and element-wise vector comparison for a
//! bitcode interpreter.
//!
//! The host interpreter hands over already-typed operands. Arithmetic results
//! are written back through a destination [`Address`] as a `{value, overflow}`
//! aggregate whose byte layout is fixed per width by a [`WritebackLayout`];
//! comparisons return a [`BoolVector`]. [`Evaluator`] bundles the layouts
//! with the intrinsic name table.
//!
//! ```
//! use strata_eval::{ArithOp, Evaluator, LinearMemory, Memory, ScalarValue, Width};
//!
//! let eval = Evaluator::new()?;
//! let mut mem = LinearMemory::new();
//! let dest = mem.allocate(8);
//! eval.evaluate_overflow_arithmetic(
//!     ArithOp::SAdd,
//!     Width::W16,
//!     ScalarValue::I16(30000),
//!     ScalarValue::I16(10000),
//!     &mut mem,
//!     dest,
//! )?;
//! assert_eq!(mem.read_int(dest, 0, Width::W16)? as u16 as i16, -25536);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod arith;
pub mod compare;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod evaluator;
pub mod intrinsics;
pub mod memory;
pub mod value;
pub mod width;
pub mod writeback;

pub use arith::{overflow_arith, ArithOp, OverflowResult};
pub use compare::{compare_vectors, ComparePredicate};
pub use config::{AssumePolicy, EvalConfig};
pub use dispatch::{select, Operation, Specialization};
pub use error::{ConfigError, EvalError, MemoryError};
pub use evaluator::{Evaluator, ValueSource};
pub use intrinsics::{Intrinsic, IntrinsicRegistry};
pub use memory::{Address, LinearMemory, Memory, RegionId};
pub use value::{BoolVector, OperandShape, ScalarValue, Value, VectorValue};
pub use width::Width;
pub use writeback::{read_overflow_result, write_overflow_result, WritebackLayout};

pub use strata_layout::{FlagRepr, LayoutError};
