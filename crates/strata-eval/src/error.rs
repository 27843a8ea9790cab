use crate::memory::Address;
use crate::width::Width;
use miette::Diagnostic;
use strata_layout::LayoutError;
use thiserror::Error;

/// Errors raised while evaluating an operation.
///
/// None of these are recoverable at this layer: every variant means the caller
/// handed over operands that upstream type checking should have rejected, so
/// the call fails before any result is produced or written.
#[derive(Error, Debug, Diagnostic)]
pub enum EvalError {
    /// An operation or width combination outside the supported matrix
    #[error("Unsupported operation {operation}: {detail}")]
    #[diagnostic(
        code("EVAL-001"),
        help("Operands reaching the evaluator must already be typed as i8, i16, i32 or i64")
    )]
    UnsupportedOperation { operation: String, detail: String },

    /// Vector operands that differ in length or lane width
    #[error("Vector shape mismatch: <{left_len} x {left_width}> vs <{right_len} x {right_width}>")]
    #[diagnostic(
        code("EVAL-002"),
        help("Both operands of a vector comparison must have the same length and lane width")
    )]
    ShapeMismatch {
        left_len: usize,
        left_width: Width,
        right_len: usize,
        right_width: Width,
    },

    /// The memory model refused a read or write
    #[error("Memory access failed: {0}")]
    #[diagnostic(code("EVAL-003"))]
    Memory(#[from] MemoryError),

    /// The writeback layout could not be computed
    #[error("Aggregate layout error: {0}")]
    #[diagnostic(code("EVAL-004"))]
    Layout(#[from] LayoutError),

    /// No intrinsic is registered under this name
    #[error("Unknown intrinsic: {0}")]
    #[diagnostic(code("EVAL-005"))]
    UnknownIntrinsic(String),

    /// An intrinsic called with the wrong number of operands
    #[error("Intrinsic {intrinsic} expects {expected} operands, found {found}")]
    #[diagnostic(code("EVAL-006"))]
    Arity {
        intrinsic: String,
        expected: usize,
        found: usize,
    },

    /// An evaluator configuration that failed validation
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

impl EvalError {
    pub fn unsupported(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        EvalError::UnsupportedOperation {
            operation: operation.into(),
            detail: detail.into(),
        }
    }
}

/// Errors reported by a [`Memory`](crate::memory::Memory) implementation.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// The accessed range extends past the end of its region
    #[error("Access of {len} bytes at {address} is out of bounds")]
    #[diagnostic(code("MEM-001"))]
    OutOfBounds { address: Address, len: u64 },

    /// The address names a region that was never allocated
    #[error("Unknown memory region {0}")]
    #[diagnostic(code("MEM-002"))]
    UnknownRegion(u32),
}

/// Errors that can occur when loading an [`EvalConfig`](crate::config::EvalConfig).
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Error reading evaluator configuration: {0}")]
    #[diagnostic(
        code("CONFIG-001"),
        help("Check that the configuration file exists and is readable")
    )]
    Read(String),

    /// The configuration is not valid TOML or has unknown keys or values
    #[error("Invalid evaluator configuration: {0}")]
    #[diagnostic(
        code("CONFIG-002"),
        help("Keys are `flag_repr`, `assume_policy` and the `[flag_offsets]` table")
    )]
    Parse(String),

    /// The configuration parsed but holds an unusable value
    #[error("Evaluator configuration rejected: {0}")]
    #[diagnostic(code("CONFIG-003"))]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Read(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
