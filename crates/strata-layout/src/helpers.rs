use crate::{FlagRepr, LayoutError};
use repc::layout::{BuiltinType, RecordField, Type, TypeVariant};

/// Value widths, in bits, that have an aggregate layout.
pub const SUPPORTED_WIDTHS: [u32; 4] = [8, 16, 32, 64];

/// Gets the C builtin type that stores a `width`-bit integer value.
pub fn value_builtin(width: u32) -> Result<BuiltinType, LayoutError> {
    match width {
        8 => Ok(BuiltinType::Char),
        16 => Ok(BuiltinType::Short),
        32 => Ok(BuiltinType::Int),
        64 => Ok(BuiltinType::LongLong),
        other => Err(LayoutError::UnsupportedWidth(other)),
    }
}

/// Gets the C builtin type that stores the overflow flag.
pub fn flag_builtin(repr: FlagRepr) -> BuiltinType {
    match repr {
        FlagRepr::I8 => BuiltinType::UnsignedChar,
        FlagRepr::I32 => BuiltinType::Int,
    }
}

pub(crate) fn builtin_type(builtin: BuiltinType) -> Type<()> {
    Type {
        layout: (),
        annotations: vec![],
        variant: TypeVariant::Builtin(builtin),
    }
}

pub(crate) fn record_field(ty: Type<()>) -> RecordField<()> {
    RecordField {
        layout: None, // Layout will be computed by repc
        annotations: vec![],
        named: true,
        bit_width: None,
        ty,
    }
}

/// Rounds `value` up to the next multiple of `align`.
pub fn round_up(value: u64, align: u64) -> u64 {
    if align <= 1 {
        return value;
    }
    value.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_up_to_alignment() {
        assert_eq!(round_up(0, 4), 0);
        assert_eq!(round_up(5, 4), 8);
        assert_eq!(round_up(8, 8), 8);
        assert_eq!(round_up(3, 1), 3);
    }

    #[test]
    fn rejects_unsupported_width() {
        assert!(matches!(value_builtin(12), Err(LayoutError::UnsupportedWidth(12))));
        for width in SUPPORTED_WIDTHS {
            assert!(value_builtin(width).is_ok());
        }
    }
}
