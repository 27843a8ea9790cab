//! Memory layout of the `{integer, overflow flag}` aggregates produced by the
//! overflow-checked arithmetic intrinsics.
//!
//! The layout is computed with the `repc` crate so that it matches what a
//! native C caller would expect for `struct { iN value; flag_t overflow; }`
//! on the target. Individual widths can be overridden when the host
//! interpreter uses a different convention.

use miette::Diagnostic;
use repc::Target;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub mod helpers;
mod pair;

pub use helpers::{flag_builtin, value_builtin, SUPPORTED_WIDTHS};
pub use pair::PairLayout;

/// Storage representation of the overflow flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagRepr {
    /// One byte, `0` or `1`.
    I8,
    /// Four bytes, `0` or `1`.
    #[default]
    I32,
}

impl FlagRepr {
    /// Size of the flag slot in bytes.
    pub fn size_bytes(self) -> u64 {
        match self {
            FlagRepr::I8 => 1,
            FlagRepr::I32 => 4,
        }
    }
}

/// Errors that can occur during layout computation.
#[derive(Error, Debug, Diagnostic)]
pub enum LayoutError {
    #[error("No repc target description is available for this host")]
    #[diagnostic(
        code("LAYOUT-001"),
        help("Construct the layout computer with an explicit target")
    )]
    UnsupportedHost,

    #[error("Layout computation failed: {0}")]
    #[diagnostic(code("LAYOUT-002"))]
    Repc(#[from] repc::Error),

    #[error("Unsupported value width: {0} bits")]
    #[diagnostic(code("LAYOUT-003"), help("Supported widths are 8, 16, 32 and 64 bits"))]
    UnsupportedWidth(u32),

    #[error("Flag offset {offset} overlaps the {width}-bit value slot")]
    #[diagnostic(code("LAYOUT-004"))]
    OverlappingFlag { width: u32, offset: u64 },

    #[error("Flag offset {offset} for the {width}-bit aggregate is not aligned to {align} bytes")]
    #[diagnostic(code("LAYOUT-005"))]
    MisalignedFlag { width: u32, offset: u64, align: u64 },

    #[error("Other layout error: {0}")]
    #[diagnostic(code("LAYOUT-999"))]
    Other(String),
}

/// Computes and caches [`PairLayout`]s per value width.
pub struct LayoutComputer {
    /// Target platform for layout computation
    target: Target,

    /// How the overflow flag is stored
    flag_repr: FlagRepr,

    /// Explicit flag offsets keyed by value width in bits
    flag_offsets: HashMap<u32, u64>,

    /// Cache of computed layouts keyed by value width in bits
    pair_layouts: HashMap<u32, PairLayout>,
}

impl LayoutComputer {
    /// Creates a layout computer for the host target.
    pub fn for_host(flag_repr: FlagRepr) -> Result<Self, LayoutError> {
        let target = repc::HOST_TARGET.ok_or(LayoutError::UnsupportedHost)?;
        Ok(Self::with_target(target, flag_repr))
    }

    /// Creates a layout computer for an explicit target.
    pub fn with_target(target: Target, flag_repr: FlagRepr) -> Self {
        LayoutComputer {
            target,
            flag_repr,
            flag_offsets: HashMap::new(),
            pair_layouts: HashMap::new(),
        }
    }

    pub fn flag_repr(&self) -> FlagRepr {
        self.flag_repr
    }

    /// Pins the flag of the `width`-bit aggregate to `offset` bytes.
    ///
    /// The override is validated when the layout is next requested.
    pub fn set_flag_offset(&mut self, width: u32, offset: u64) {
        self.flag_offsets.insert(width, offset);
        self.pair_layouts.remove(&width);
    }

    /// Gets or computes the layout of the `width`-bit aggregate.
    pub fn pair_layout(&mut self, width: u32) -> Result<PairLayout, LayoutError> {
        if let Some(layout) = self.pair_layouts.get(&width) {
            return Ok(*layout);
        }
        let computed = self.compute_pair_layout(width)?;
        let layout = match self.flag_offsets.get(&width) {
            Some(&offset) => computed.with_flag_offset(width, offset)?,
            None => computed,
        };
        log::debug!(
            "aggregate layout for i{}: flag at +{} ({} bytes), size {}, align {}",
            width,
            layout.flag_offset,
            layout.flag_size,
            layout.size,
            layout.align
        );
        self.pair_layouts.insert(width, layout);
        Ok(layout)
    }

    /// Computes all four supported layouts, returned in ascending width order.
    pub fn all_pair_layouts(&mut self) -> Result<[PairLayout; 4], LayoutError> {
        Ok([
            self.pair_layout(8)?,
            self.pair_layout(16)?,
            self.pair_layout(32)?,
            self.pair_layout(64)?,
        ])
    }
}
