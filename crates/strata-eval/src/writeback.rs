//! Storing `{value, overflow}` aggregates through a destination address.
//!
//! The byte layout of the aggregate is a contract with the rest of the
//! interpreter and with native callers, so it is described by one
//! [`WritebackLayout`] per width and applied only here.

use crate::arith::OverflowResult;
use crate::error::EvalError;
use crate::memory::{Address, Memory};
use crate::value::ScalarValue;
use crate::width::Width;
use strata_layout::PairLayout;

/// Where the value and the flag of a `width`-bit aggregate are stored.
///
/// The value is always at offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WritebackLayout {
    pub width: Width,
    pub flag_offset: u64,
    pub flag_width: Width,
    /// Bytes from the base address through the end of the flag.
    pub extent: u64,
}

impl WritebackLayout {
    /// Layout with a 4-byte flag right after the value slot, rounded up to 4 bytes.
    pub fn with_int_flag(width: Width) -> Self {
        let flag_offset = width.bytes().max(4);
        WritebackLayout {
            width,
            flag_offset,
            flag_width: Width::W32,
            extent: flag_offset + 4,
        }
    }

    /// Converts a layout computed by `strata-layout`.
    pub fn from_pair(width: Width, pair: &PairLayout) -> Result<Self, EvalError> {
        let flag_width = u32::try_from(pair.flag_size * 8)
            .ok()
            .and_then(Width::from_bits)
            .ok_or_else(|| {
                EvalError::unsupported(
                    format!("{} writeback", width),
                    format!("flag slot of {} bytes", pair.flag_size),
                )
            })?;
        if pair.value_size != width.bytes() {
            return Err(EvalError::unsupported(
                format!("{} writeback", width),
                format!("value slot of {} bytes", pair.value_size),
            ));
        }
        Ok(WritebackLayout {
            width,
            flag_offset: pair.flag_offset,
            flag_width,
            extent: pair.written_extent(),
        })
    }
}

/// Stores `result` at `dest` using `layout`: the value first, then the flag as `1` or `0`.
///
/// The destination range is checked before the first store, so a failing call
/// writes nothing. The two stores are not atomic with respect to concurrent
/// readers of `dest`.
pub fn write_overflow_result<M>(
    mem: &mut M,
    dest: Address,
    layout: &WritebackLayout,
    result: &OverflowResult,
) -> Result<(), EvalError>
where
    M: Memory + ?Sized,
{
    if result.width() != layout.width {
        return Err(EvalError::unsupported(
            format!("{} writeback", layout.width),
            format!("result has width {}", result.width()),
        ));
    }
    mem.check_range(dest, layout.extent)?;
    mem.write_int(dest, 0, layout.width, result.value.bits())?;
    mem.write_int(dest, layout.flag_offset, layout.flag_width, u64::from(result.overflow))?;
    Ok(())
}

/// Loads an aggregate previously stored with [`write_overflow_result`].
///
/// Any non-zero flag reads back as `true`.
pub fn read_overflow_result<M>(mem: &M, dest: Address, layout: &WritebackLayout) -> Result<OverflowResult, EvalError>
where
    M: Memory + ?Sized,
{
    let bits = mem.read_int(dest, 0, layout.width)?;
    let flag = mem.read_int(dest, layout.flag_offset, layout.flag_width)?;
    Ok(OverflowResult {
        value: ScalarValue::from_bits(layout.width, bits),
        overflow: flag != 0,
    })
}
