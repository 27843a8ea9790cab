use std::fmt;

/// Bit width of an integer value or vector lane.
///
/// All arithmetic in this crate is carried out on zero-extended `u64` bit
/// patterns; the helpers here do the width-specific truncation, sign tests and
/// sign extension with explicit masks so that results never depend on the
/// host's native integer width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
}

impl Width {
    pub const ALL: [Width; 4] = [Width::W8, Width::W16, Width::W32, Width::W64];

    /// Maps a bit count to a supported width.
    pub fn from_bits(bits: u32) -> Option<Width> {
        match bits {
            8 => Some(Width::W8),
            16 => Some(Width::W16),
            32 => Some(Width::W32),
            64 => Some(Width::W64),
            _ => None,
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
            Width::W64 => 64,
        }
    }

    pub const fn bytes(self) -> u64 {
        self.bits() as u64 / 8
    }

    /// All-ones pattern of this width, which is also the largest unsigned value.
    pub const fn mask(self) -> u64 {
        match self {
            Width::W64 => u64::MAX,
            w => (1u64 << w.bits()) - 1,
        }
    }

    pub const fn sign_bit(self) -> u64 {
        1u64 << (self.bits() - 1)
    }

    /// Bit pattern of the most negative signed value.
    pub const fn signed_min(self) -> u64 {
        self.sign_bit()
    }

    /// Bit pattern of the most positive signed value.
    pub const fn signed_max(self) -> u64 {
        self.mask() >> 1
    }

    #[inline]
    pub const fn truncate(self, bits: u64) -> u64 {
        bits & self.mask()
    }

    /// Tests the sign bit of `bits` at this width.
    #[inline]
    pub const fn is_negative(self, bits: u64) -> bool {
        bits & self.sign_bit() != 0
    }

    /// Interprets the low `self.bits()` bits of `bits` as a two's-complement value.
    #[inline]
    pub const fn sign_extend(self, bits: u64) -> i64 {
        let shift = 64 - self.bits();
        ((bits << shift) as i64) >> shift
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.bits())
    }
}
