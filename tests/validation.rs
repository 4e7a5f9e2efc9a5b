mod support;

use num_complex::Complex64;
use strided_blas::{
    axpy, dot, gemv, herk, scal, syrk, trsm, BatchMut, BatchRef, BlasError, Context, Diag,
    PointerMode, ScalarArg, Side, Transpose, Uplo,
};
use support::*;

#[test]
fn test_zero_increment_is_an_error() {
    let ctx = Context::new();
    let x = vec![1.0f64; 4];
    let mut y = vec![0.0f64; 4];
    let err = axpy(
        &ctx,
        4,
        ScalarArg::Host(1.0),
        Some(BatchRef::Plain(&x)),
        0,
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidSize("incx"));
    let err = axpy(
        &ctx,
        4,
        ScalarArg::Host(1.0),
        Some(BatchRef::Plain(&x)),
        1,
        Some(BatchMut::Plain(&mut y)),
        0,
        1,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidSize("incy"));
}

#[test]
fn test_insufficient_leading_dimension() {
    let ctx = Context::new();
    let a = vec![1.0f64; 12];
    let x = vec![1.0f64; 4];
    let mut y = vec![0.0f64; 3];
    let err = gemv(
        &ctx,
        Transpose::NoTrans,
        3,
        4,
        ScalarArg::Host(1.0),
        Some(BatchRef::Plain(&a)),
        2, // must be >= m
        Some(BatchRef::Plain(&x)),
        1,
        ScalarArg::Host(0.0),
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidSize("lda"));
}

#[test]
fn test_negative_batch_stride_beats_quick_return() {
    let ctx = Context::new();
    let x = vec![1.0f64; 4];
    let mut y = vec![0.0f64; 4];
    // n == 0 would be a quick return, but the stride check comes first.
    let err = axpy(
        &ctx,
        0,
        ScalarArg::Host(1.0),
        Some(BatchRef::Strided {
            data: &x,
            stride: -4,
        }),
        1,
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidSize("x"));
}

#[test]
fn test_complex_syrk_rejects_conjtrans() {
    let ctx = Context::new();
    let a = vec![Complex64::new(1.0, 0.0); 4];
    let mut c = vec![Complex64::new(0.0, 0.0); 4];
    let err = syrk(
        &ctx,
        Uplo::Upper,
        Transpose::ConjTrans,
        2,
        2,
        ScalarArg::Host(Complex64::new(1.0, 0.0)),
        Some(BatchRef::Plain(&a)),
        2,
        ScalarArg::Host(Complex64::new(0.0, 0.0)),
        Some(BatchMut::Plain(&mut c)),
        2,
        1,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidValue("trans"));
}

#[test]
fn test_enum_restriction_beats_size_error() {
    let ctx = Context::new();
    // Both trans and lda are invalid; the enum check wins.
    let err = herk::<Complex64>(
        &ctx,
        Uplo::Upper,
        Transpose::Trans,
        4,
        3,
        ScalarArg::Host(1.0),
        None,
        0,
        ScalarArg::Host(0.0),
        None,
        0,
        1,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidValue("trans"));
}

#[test]
fn test_degenerate_dimensions_succeed_without_operands() {
    let ctx = Context::new();
    gemv::<f64>(
        &ctx,
        Transpose::NoTrans,
        0,
        5,
        ScalarArg::Host(1.0),
        None,
        1,
        None,
        1,
        ScalarArg::Host(2.0),
        None,
        1,
        3,
    )
    .unwrap();
    scal::<f64>(&ctx, 4, ScalarArg::Host(2.0), None, -1, 1).unwrap();
    axpy::<f64>(&ctx, 4, ScalarArg::Host(1.0), None, 1, None, 1, 0).unwrap();
}

#[test]
fn test_host_alpha_zero_relaxes_input_operands() {
    let ctx = Context::new();
    let mut y = vec![4.0f64, 8.0];
    // alpha == 0 with beta != 1: A and x may be absent, y is still scaled.
    gemv::<f64>(
        &ctx,
        Transpose::NoTrans,
        2,
        3,
        ScalarArg::Host(0.0),
        None,
        2,
        None,
        1,
        ScalarArg::Host(0.25),
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap();
    assert_eq!(y, vec![1.0, 2.0]);
    // alpha == 0 and beta == 1: pure no-op, even y may be absent.
    gemv::<f64>(
        &ctx,
        Transpose::NoTrans,
        2,
        3,
        ScalarArg::Host(0.0),
        None,
        2,
        None,
        1,
        ScalarArg::Host(1.0),
        None,
        1,
        1,
    )
    .unwrap();
}

#[test]
fn test_nonzero_alpha_requires_inputs() {
    let ctx = Context::new();
    let mut y = vec![0.0f64; 2];
    let err = gemv::<f64>(
        &ctx,
        Transpose::NoTrans,
        2,
        3,
        ScalarArg::Host(1.0),
        None,
        2,
        None,
        1,
        ScalarArg::Host(0.0),
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidPointer("a"));
}

#[test]
fn test_device_mode_requires_all_operands() {
    let mut ctx = Context::new();
    ctx.set_pointer_mode(PointerMode::Device);
    let alpha = 0.0f64;
    let beta = 1.0f64;
    let mut y = vec![0.0f64; 2];
    // The pointed-to alpha is zero, but validation may not look at it.
    let err = gemv::<f64>(
        &ctx,
        Transpose::NoTrans,
        2,
        3,
        ScalarArg::Device(&alpha),
        None,
        2,
        None,
        1,
        ScalarArg::Device(&beta),
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidPointer("a"));
}

#[test]
fn test_device_mode_computes_and_branches_at_runtime() {
    let mut ctx = Context::new();
    ctx.set_pointer_mode(PointerMode::Device);
    let x = vec![1.0f64, 2.0, 3.0];
    let mut y = vec![10.0f64, 20.0, 30.0];
    let alpha = 2.0f64;
    axpy(
        &ctx,
        3,
        ScalarArg::Device(&alpha),
        Some(BatchRef::Plain(&x)),
        1,
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap();
    assert_eq!(y, vec![12.0, 24.0, 36.0]);
    // A zero device alpha becomes a kernel-level no-op.
    let zero = 0.0f64;
    axpy(
        &ctx,
        3,
        ScalarArg::Device(&zero),
        Some(BatchRef::Plain(&x)),
        1,
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap();
    assert_eq!(y, vec![12.0, 24.0, 36.0]);
}

#[test]
fn test_device_alpha_zero_beta_one_preserves_output_bits() {
    let mut ctx = Context::new();
    ctx.set_pointer_mode(PointerMode::Device);
    let alpha = 0.0f64;
    let beta = 1.0f64;
    let a = vec![1.0f64; 6];
    let x = vec![1.0f64; 3];
    let payload = f64::from_bits(0x7ff8_0000_dead_beef);
    let mut y = vec![payload, -0.0];
    // alpha and beta load inside the kernel; the y = 1 * y pass must be
    // skipped entirely so even NaN payloads and signed zeros survive.
    gemv(
        &ctx,
        Transpose::NoTrans,
        2,
        3,
        ScalarArg::Device(&alpha),
        Some(BatchRef::Plain(&a)),
        2,
        Some(BatchRef::Plain(&x)),
        1,
        ScalarArg::Device(&beta),
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap();
    assert_eq!(y[0].to_bits(), payload.to_bits());
    assert_eq!(y[1].to_bits(), (-0.0f64).to_bits());
}

#[test]
fn test_pointer_mode_mismatch() {
    let ctx = Context::new();
    let alpha = 1.0f64;
    let x = vec![1.0f64; 2];
    let mut y = vec![0.0f64; 2];
    let err = axpy(
        &ctx,
        2,
        ScalarArg::Device(&alpha),
        Some(BatchRef::Plain(&x)),
        1,
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidValue("alpha"));

    let mut dev_ctx = Context::new();
    dev_ctx.set_pointer_mode(PointerMode::Device);
    let err = axpy(
        &dev_ctx,
        2,
        ScalarArg::Host(1.0),
        Some(BatchRef::Plain(&x)),
        1,
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidValue("alpha"));
}

#[test]
fn test_output_must_not_alias_across_instances() {
    let ctx = Context::new();
    let x = vec![1.0f64; 3];
    let mut y = vec![0.0f64; 3];
    // Broadcast (stride 0) output with batch_count > 1.
    let err = axpy(
        &ctx,
        3,
        ScalarArg::Host(1.0),
        Some(BatchRef::Strided { data: &x, stride: 0 }),
        1,
        Some(BatchMut::Strided {
            data: &mut y,
            stride: 0,
        }),
        1,
        2,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidSize("y"));
    // A plain output is a batch of one.
    let err = axpy(
        &ctx,
        3,
        ScalarArg::Host(1.0),
        Some(BatchRef::Plain(&x)),
        1,
        Some(BatchMut::Plain(&mut y)),
        1,
        2,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidSize("y"));
}

#[test]
fn test_pointer_batch_count_shortfall() {
    let ctx = Context::new();
    let x0 = vec![1.0f64; 3];
    let xs: Vec<&[f64]> = vec![&x0];
    let mut y = vec![0.0f64; 6];
    let err = axpy(
        &ctx,
        3,
        ScalarArg::Host(1.0),
        Some(BatchRef::Pointers(&xs)),
        1,
        Some(BatchMut::Strided {
            data: &mut y,
            stride: 3,
        }),
        1,
        2,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidPointer("x"));
}

#[test]
fn test_operand_span_shortfall() {
    let ctx = Context::new();
    // 5 elements at incx = 2 span 9 slots; only 8 supplied.
    let x = vec![1.0f64; 8];
    let mut y = vec![0.0f64; 5];
    let err = axpy(
        &ctx,
        5,
        ScalarArg::Host(1.0),
        Some(BatchRef::Plain(&x)),
        2,
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidSize("x"));
}

#[test]
fn test_dot_result_buffer_checked_before_quick_return() {
    let ctx = Context::new();
    let mut result = vec![0.0f64; 2];
    // Even the degenerate n == 0 call must have room for every batch result.
    let err = dot::<f64>(&ctx, 0, None, 1, None, 1, &mut result, 3).unwrap_err();
    assert_eq!(err, BlasError::InvalidSize("result"));
}

#[test]
fn test_trsm_alpha_zero_still_requires_b() {
    let ctx = Context::new();
    let err = trsm::<f64>(
        &ctx,
        Side::Left,
        Uplo::Upper,
        Transpose::NoTrans,
        Diag::NonUnit,
        2,
        2,
        ScalarArg::Host(0.0),
        None,
        2,
        None,
        2,
        1,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidPointer("b"));
}

#[test]
fn test_gemv_validation_leaves_output_untouched() {
    let ctx = Context::new();
    let x = vec![1.0f64; 8];
    let mut y = vec![7.0f64; 3];
    let before = y.clone();
    let err = gemv(
        &ctx,
        Transpose::NoTrans,
        3,
        4,
        ScalarArg::Host(1.0),
        None, // missing A
        3,
        Some(BatchRef::Plain(&x)),
        1,
        ScalarArg::Host(0.0),
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap_err();
    assert_eq!(err, BlasError::InvalidPointer("a"));
    assert_eq!(y, before);
}
