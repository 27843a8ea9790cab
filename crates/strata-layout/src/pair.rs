use crate::helpers::{builtin_type, flag_builtin, record_field, round_up, value_builtin};
use crate::{LayoutComputer, LayoutError};
use repc::layout::{Record, RecordKind, Type, TypeVariant};

/// Byte layout of one `{value, flag}` aggregate.
///
/// The value always lives at offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairLayout {
    pub value_size: u64,
    pub flag_offset: u64,
    pub flag_size: u64,
    pub size: u64,
    pub align: u64,
}

impl PairLayout {
    /// Returns a copy with the flag moved to `offset`, validated against the value slot.
    pub fn with_flag_offset(self, width: u32, offset: u64) -> Result<PairLayout, LayoutError> {
        if offset < self.value_size {
            return Err(LayoutError::OverlappingFlag { width, offset });
        }
        if offset % self.flag_size != 0 {
            return Err(LayoutError::MisalignedFlag { width, offset, align: self.flag_size });
        }
        Ok(PairLayout {
            flag_offset: offset,
            size: round_up((offset + self.flag_size).max(self.size), self.align),
            ..self
        })
    }

    /// Number of bytes touched by a writeback, from offset 0 through the flag.
    pub fn written_extent(&self) -> u64 {
        (self.value_size).max(self.flag_offset + self.flag_size)
    }
}

impl LayoutComputer {
    /// Computes the layout of `struct { iN value; flag_t overflow; }` with repc.
    pub(crate) fn compute_pair_layout(&mut self, width: u32) -> Result<PairLayout, LayoutError> {
        let value_ty = builtin_type(value_builtin(width)?);
        let flag_ty = builtin_type(flag_builtin(self.flag_repr));

        let pair_type = Type {
            layout: (),
            annotations: vec![],
            variant: TypeVariant::Record(Record {
                kind: RecordKind::Struct,
                fields: vec![record_field(value_ty), record_field(flag_ty)],
            }),
        };

        let computed_layout = repc::compute_layout(self.target, &pair_type)?;

        let repc_record = match computed_layout.variant {
            TypeVariant::Record(record) => record,
            _ => return Err(LayoutError::Other("Expected record type".to_string())),
        };

        let mut offsets = Vec::with_capacity(2);
        let mut sizes = Vec::with_capacity(2);
        for field in repc_record.fields.iter() {
            let field_layout = field
                .layout
                .ok_or_else(|| LayoutError::Other("repc returned a field without layout".to_string()))?;
            offsets.push(field_layout.offset_bits / 8);
            sizes.push(field.ty.layout.size_bits / 8);
        }
        if offsets.len() != 2 || offsets[0] != 0 {
            return Err(LayoutError::Other(format!(
                "Unexpected field offsets for i{} aggregate: {:?}",
                width, offsets
            )));
        }

        Ok(PairLayout {
            value_size: sizes[0],
            flag_offset: offsets[1],
            flag_size: sizes[1],
            size: computed_layout.layout.size_bits / 8,
            align: computed_layout.layout.field_alignment_bits / 8,
        })
    }
}
