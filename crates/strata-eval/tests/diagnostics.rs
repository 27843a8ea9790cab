// Rendered messages and codes of the errors callers see.

use expect_test::expect;
use miette::Diagnostic;
use strata_eval::{
    compare_vectors, overflow_arith, ArithOp, ComparePredicate, EvalConfig, EvalError, IntrinsicRegistry,
    LinearMemory, Memory, ScalarValue, VectorValue, Width, WritebackLayout,
};

fn render(err: &dyn Diagnostic) -> String {
    let code = err.code().map(|c| c.to_string()).unwrap_or_default();
    format!("[{}] {}", code, err)
}

#[test]
fn unsupported_operation() {
    let err = overflow_arith(ArithOp::SMul, ScalarValue::I8(1), ScalarValue::I64(1)).unwrap_err();
    expect!["[EVAL-001] Unsupported operation smul.with.overflow: expected two integer scalars of one width, found i8 and i64"]
        .assert_eq(&render(&err));
}

#[test]
fn shape_mismatch() {
    let err = compare_vectors(
        ComparePredicate::Ult,
        &VectorValue::from(vec![1u8, 2]),
        &VectorValue::from(vec![1u8]),
    )
    .unwrap_err();
    expect!["[EVAL-002] Vector shape mismatch: <2 x i8> vs <1 x i8>"].assert_eq(&render(&err));
}

#[test]
fn memory_out_of_bounds() {
    let mut mem = LinearMemory::new();
    let dest = mem.allocate(6);
    let result = overflow_arith(ArithOp::SAdd, ScalarValue::I16(1), ScalarValue::I16(2)).expect("same width");
    let err = strata_eval::write_overflow_result(&mut mem, dest, &WritebackLayout::with_int_flag(Width::W16), &result)
        .unwrap_err();
    expect!["[EVAL-003] Memory access failed: Access of 8 bytes at r0+0x0 is out of bounds"].assert_eq(&render(&err));
    assert_eq!(mem.read_int(dest, 0, Width::W16).ok(), Some(0));
}

#[test]
fn unknown_intrinsic() {
    let err = IntrinsicRegistry::new().resolve("llvm.sdiv.with.overflow.i32").unwrap_err();
    expect!["[EVAL-005] Unknown intrinsic: llvm.sdiv.with.overflow.i32"].assert_eq(&render(&err));
}

#[test]
fn invalid_config_key() {
    let mut config = EvalConfig::default();
    config.flag_offsets.insert("128".to_string(), 16);
    let err = EvalError::from(config.flag_offset_overrides().unwrap_err());
    expect!["[CONFIG-003] Evaluator configuration rejected: flag_offsets key `128` is not one of 8, 16, 32 or 64"]
        .assert_eq(&render(&err));
}

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
#[test]
fn overlapping_flag_offset() {
    let config = EvalConfig::from_toml_str("[flag_offsets]\n64 = 4\n").expect("well-formed config");
    let err = strata_eval::Evaluator::with_config(&config).unwrap_err();
    expect!["[EVAL-004] Aggregate layout error: Flag offset 4 overlaps the 64-bit value slot"].assert_eq(&render(&err));
}
