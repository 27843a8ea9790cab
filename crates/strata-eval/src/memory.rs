//! The memory model seen by the evaluator.
//!
//! The interpreter owns memory; the evaluator only writes through addresses it
//! is handed. [`LinearMemory`] is a simple little-endian implementation for
//! hosts that do not bring their own.

use crate::error::MemoryError;
use crate::width::Width;
use std::fmt;

/// Identifies one allocation inside a memory model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u32);

/// An opaque location: a region handle plus a byte offset into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    region: RegionId,
    offset: u64,
}

impl Address {
    pub const fn new(region: RegionId, offset: u64) -> Self {
        Address { region, offset }
    }

    pub fn region(&self) -> RegionId {
        self.region
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The address `bytes` past this one, in the same region.
    pub fn with_offset(self, bytes: u64) -> Address {
        Address {
            region: self.region,
            offset: self.offset.wrapping_add(bytes),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}+{:#x}", self.region.0, self.offset)
    }
}

/// Byte-addressable storage for fixed-width integers.
pub trait Memory {
    /// Stores the low `width` bits of `bits` at `addr + offset`.
    fn write_int(&mut self, addr: Address, offset: u64, width: Width, bits: u64) -> Result<(), MemoryError>;

    /// Loads a zero-extended `width`-bit value from `addr + offset`.
    fn read_int(&self, addr: Address, offset: u64, width: Width) -> Result<u64, MemoryError>;

    /// Checks that `len` bytes starting at `addr` can be written.
    ///
    /// Called before a multi-write sequence so that an invalid destination
    /// fails before anything is stored.
    fn check_range(&self, _addr: Address, _len: u64) -> Result<(), MemoryError> {
        Ok(())
    }
}

impl<M: Memory + ?Sized> Memory for &mut M {
    fn write_int(&mut self, addr: Address, offset: u64, width: Width, bits: u64) -> Result<(), MemoryError> {
        (**self).write_int(addr, offset, width, bits)
    }

    fn read_int(&self, addr: Address, offset: u64, width: Width) -> Result<u64, MemoryError> {
        (**self).read_int(addr, offset, width)
    }

    fn check_range(&self, addr: Address, len: u64) -> Result<(), MemoryError> {
        (**self).check_range(addr, len)
    }
}

/// Little-endian memory made of independently allocated, zero-initialised regions.
#[derive(Debug, Default)]
pub struct LinearMemory {
    regions: Vec<Box<[u8]>>,
}

impl LinearMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a zeroed region of `size` bytes and returns its base address.
    pub fn allocate(&mut self, size: usize) -> Address {
        let region = RegionId(self.regions.len() as u32);
        self.regions.push(vec![0u8; size].into_boxed_slice());
        Address::new(region, 0)
    }

    /// Raw contents of the region containing `addr`.
    pub fn region_bytes(&self, addr: Address) -> Option<&[u8]> {
        self.regions.get(addr.region().0 as usize).map(|r| &r[..])
    }

    fn range(&self, addr: Address, len: u64) -> Result<(usize, std::ops::Range<usize>), MemoryError> {
        let index = addr.region().0 as usize;
        let region = self
            .regions
            .get(index)
            .ok_or(MemoryError::UnknownRegion(addr.region().0))?;
        let start = addr.offset();
        let end = start
            .checked_add(len)
            .filter(|&end| end <= region.len() as u64)
            .ok_or(MemoryError::OutOfBounds { address: addr, len })?;
        Ok((index, start as usize..end as usize))
    }
}

impl Memory for LinearMemory {
    fn write_int(&mut self, addr: Address, offset: u64, width: Width, bits: u64) -> Result<(), MemoryError> {
        let target = addr.with_offset(offset);
        let (index, range) = self.range(target, width.bytes())?;
        let bytes = bits.to_le_bytes();
        self.regions[index][range].copy_from_slice(&bytes[..width.bytes() as usize]);
        Ok(())
    }

    fn read_int(&self, addr: Address, offset: u64, width: Width) -> Result<u64, MemoryError> {
        let target = addr.with_offset(offset);
        let (index, range) = self.range(target, width.bytes())?;
        let mut bytes = [0u8; 8];
        bytes[..width.bytes() as usize].copy_from_slice(&self.regions[index][range]);
        Ok(u64::from_le_bytes(bytes))
    }

    fn check_range(&self, addr: Address, len: u64) -> Result<(), MemoryError> {
        self.range(addr, len).map(|_| ())
    }
}
