// Layouts of the overflow aggregates on 64-bit hosts with a C-like ABI.
#![cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]

use strata_layout::{FlagRepr, LayoutComputer, LayoutError, PairLayout};

fn host(flag_repr: FlagRepr) -> LayoutComputer {
    LayoutComputer::for_host(flag_repr).expect("host target should be known to repc")
}

#[test]
fn int_flag_follows_aligned_value_slot() -> Result<(), LayoutError> {
    let mut computer = host(FlagRepr::I32);
    let [l8, l16, l32, l64] = computer.all_pair_layouts()?;

    assert_eq!(l8, PairLayout { value_size: 1, flag_offset: 4, flag_size: 4, size: 8, align: 4 });
    assert_eq!(l16, PairLayout { value_size: 2, flag_offset: 4, flag_size: 4, size: 8, align: 4 });
    assert_eq!(l32, PairLayout { value_size: 4, flag_offset: 4, flag_size: 4, size: 8, align: 4 });
    assert_eq!(l64, PairLayout { value_size: 8, flag_offset: 8, flag_size: 4, size: 16, align: 8 });
    Ok(())
}

#[test]
fn byte_flag_packs_after_value() -> Result<(), LayoutError> {
    let mut computer = host(FlagRepr::I8);
    let offsets: Vec<u64> = computer
        .all_pair_layouts()?
        .iter()
        .map(|layout| layout.flag_offset)
        .collect();
    assert_eq!(offsets, vec![1, 2, 4, 8]);
    Ok(())
}

#[test]
fn override_moves_flag_and_grows_size() -> Result<(), LayoutError> {
    let mut computer = host(FlagRepr::I32);
    computer.set_flag_offset(16, 8);
    let layout = computer.pair_layout(16)?;
    assert_eq!(layout.flag_offset, 8);
    assert_eq!(layout.size, 12);
    assert_eq!(layout.written_extent(), 12);
    Ok(())
}

#[test]
fn overridden_size_is_rounded_to_alignment() -> Result<(), LayoutError> {
    let mut computer = host(FlagRepr::I32);
    let natural = computer.pair_layout(64)?;
    assert_eq!(natural.align, 8);

    computer.set_flag_offset(64, 16);
    let moved = computer.pair_layout(64)?;
    assert_eq!(moved, PairLayout { value_size: 8, flag_offset: 16, flag_size: 4, size: 24, align: 8 });
    assert_eq!(moved.size % moved.align, 0);
    assert_eq!(moved.written_extent(), 20);
    Ok(())
}

#[test]
fn override_overlapping_value_is_rejected() {
    let mut computer = host(FlagRepr::I32);
    computer.set_flag_offset(64, 4);
    assert!(matches!(
        computer.pair_layout(64),
        Err(LayoutError::OverlappingFlag { width: 64, offset: 4 })
    ));
}

#[test]
fn override_misaligned_flag_is_rejected() {
    let mut computer = host(FlagRepr::I32);
    computer.set_flag_offset(8, 6);
    assert!(matches!(
        computer.pair_layout(8),
        Err(LayoutError::MisalignedFlag { width: 8, offset: 6, align: 4 })
    ));
}

#[test]
fn unsupported_width_is_reported() {
    let mut computer = host(FlagRepr::I8);
    assert!(matches!(computer.pair_layout(128), Err(LayoutError::UnsupportedWidth(128))));
}
