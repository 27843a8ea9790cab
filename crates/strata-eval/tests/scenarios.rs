// End-to-end evaluation through `Evaluator` with the host's default layouts.

use strata_eval::{
    Address, ArithOp, AssumePolicy, BoolVector, ComparePredicate, EvalConfig, EvalError, Evaluator, LinearMemory,
    Memory, ScalarValue, Value, ValueSource, VectorValue, Width,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Operand slots of a call frame.
struct Frame(Vec<Value>);

impl ValueSource for Frame {
    type Operand = usize;

    fn read_value(&self, slot: &usize) -> Result<Value, EvalError> {
        self.0
            .get(*slot)
            .cloned()
            .ok_or_else(|| EvalError::unsupported("read_value", format!("no operand in slot {}", slot)))
    }
}

fn read_aggregate(mem: &LinearMemory, eval: &Evaluator, dest: Address, width: Width) -> (u64, u64) {
    let layout = eval.layout(width);
    let value = mem.read_int(dest, 0, width).expect("value slot");
    let flag = mem.read_int(dest, layout.flag_offset, layout.flag_width).expect("flag slot");
    (value, flag)
}

#[test]
fn i16_signed_add_overflows() -> Result<(), EvalError> {
    init_logging();
    let eval = Evaluator::new()?;
    let mut mem = LinearMemory::new();
    let dest = mem.allocate(8);
    eval.evaluate_overflow_arithmetic(
        ArithOp::SAdd,
        Width::W16,
        ScalarValue::I16(30000),
        ScalarValue::I16(10000),
        &mut mem,
        dest,
    )?;
    let (value, flag) = read_aggregate(&mem, &eval, dest, Width::W16);
    assert_eq!(value as u16 as i16, -25536);
    assert_eq!(flag, 1);
    Ok(())
}

#[test]
fn i8_unsigned_mul_overflows() -> Result<(), EvalError> {
    init_logging();
    let eval = Evaluator::new()?;
    let mut mem = LinearMemory::new();
    let dest = mem.allocate(8);
    eval.evaluate_overflow_arithmetic(
        ArithOp::UMul,
        Width::W8,
        ScalarValue::from(200u8),
        ScalarValue::from(2u8),
        &mut mem,
        dest,
    )?;
    assert_eq!(read_aggregate(&mem, &eval, dest, Width::W8), (144, 1));
    Ok(())
}

#[test]
fn i32_signed_sub_does_not_overflow() -> Result<(), EvalError> {
    init_logging();
    let eval = Evaluator::new()?;
    let mut mem = LinearMemory::new();
    let dest = mem.allocate(8);
    eval.evaluate_overflow_arithmetic(
        ArithOp::SSub,
        Width::W32,
        ScalarValue::I32(5),
        ScalarValue::I32(3),
        &mut mem,
        dest,
    )?;
    assert_eq!(read_aggregate(&mem, &eval, dest, Width::W32), (2, 0));
    Ok(())
}

#[test]
fn i8_vector_ult() -> Result<(), EvalError> {
    let eval = Evaluator::new()?;
    let result = eval.evaluate_vector_comparison(
        ComparePredicate::Ult,
        &VectorValue::from(vec![255u8, 1]),
        &VectorValue::from(vec![0u8, 2]),
    )?;
    assert_eq!(result, BoolVector::from(vec![false, true]));
    Ok(())
}

#[test]
fn call_overflow_intrinsic_by_name() -> Result<(), EvalError> {
    init_logging();
    let eval = Evaluator::new()?;
    let mut mem = LinearMemory::new();
    let dest = mem.allocate(16);
    let frame = Frame(vec![
        Value::Address(dest),
        Value::Scalar(ScalarValue::I64(i64::MAX)),
        Value::Scalar(ScalarValue::I64(1)),
    ]);

    let returned = eval.call("llvm.sadd.with.overflow.i64", &[0, 1, 2], &frame, &mut mem)?;
    assert_eq!(returned, Value::Address(dest));
    let (value, flag) = read_aggregate(&mem, &eval, dest, Width::W64);
    assert_eq!(value as i64, i64::MIN);
    assert_eq!(flag, 1);
    Ok(())
}

#[test]
fn call_comparison_by_name() -> Result<(), EvalError> {
    let eval = Evaluator::new()?;
    let mut mem = LinearMemory::new();
    let frame = Frame(vec![
        Value::Vector(VectorValue::from(vec![-1i32, 7])),
        Value::Vector(VectorValue::from(vec![0i32, 7])),
    ]);
    let result = eval.call("icmp.slt", &[0, 1], &frame, &mut mem)?;
    assert_eq!(result, Value::BoolVector(BoolVector::from(vec![true, false])));
    Ok(())
}

#[test]
fn assume_returns_unit_under_either_condition() -> Result<(), EvalError> {
    init_logging();
    let config = EvalConfig {
        assume_policy: AssumePolicy::Warn,
        ..EvalConfig::default()
    };
    let eval = Evaluator::with_config(&config)?;
    let mut mem = LinearMemory::new();
    let frame = Frame(vec![Value::Bool(false), Value::Bool(true)]);
    assert_eq!(eval.call("llvm.assume", &[0], &frame, &mut mem)?, Value::Unit);
    assert_eq!(eval.call("llvm.assume", &[1], &frame, &mut mem)?, Value::Unit);
    Ok(())
}

#[test]
fn call_rejects_bad_names_and_operands() -> Result<(), EvalError> {
    let eval = Evaluator::new()?;
    let mut mem = LinearMemory::new();
    let dest = mem.allocate(8);
    let frame = Frame(vec![
        Value::Address(dest),
        Value::Scalar(ScalarValue::I8(1)),
        Value::Scalar(ScalarValue::I16(1)),
    ]);

    assert!(matches!(
        eval.call("llvm.sdiv.with.overflow.i8", &[0, 1, 2], &frame, &mut mem),
        Err(EvalError::UnknownIntrinsic(_))
    ));
    assert!(matches!(
        eval.call("llvm.sadd.with.overflow.i8", &[1, 1], &frame, &mut mem),
        Err(EvalError::Arity { expected: 3, found: 2, .. })
    ));
    // Address in the wrong position.
    assert!(matches!(
        eval.call("llvm.sadd.with.overflow.i8", &[1, 0, 1], &frame, &mut mem),
        Err(EvalError::UnsupportedOperation { .. })
    ));
    // i16 operand for an i8 intrinsic.
    assert!(matches!(
        eval.call("llvm.sadd.with.overflow.i8", &[0, 1, 2], &frame, &mut mem),
        Err(EvalError::UnsupportedOperation { .. })
    ));
    assert_eq!(mem.region_bytes(dest), Some(&[0u8; 8][..]));
    Ok(())
}
