mod support;

use num_complex::{Complex32, Complex64};
use strided_blas::{
    asum, axpy, copy, dot, dotc, iamax, nrm2, scal, swap, BatchMut, BatchRef, Context, ScalarArg,
};
use support::*;

#[test]
fn test_scal_plain() {
    let ctx = Context::new();
    let mut r = rng(11);
    let orig = rand_vec_f64(&mut r, 17);
    let mut x = orig.clone();
    scal(&ctx, 17, ScalarArg::Host(1.75), Some(BatchMut::Plain(&mut x)), 1, 1).unwrap();
    for i in 0..17 {
        assert_close(x[i], 1.75 * orig[i], 1e-14);
    }
}

#[test]
fn test_scal_alpha_zero_overwrites_nan() {
    let ctx = Context::new();
    let mut x = vec![f64::NAN, f64::INFINITY, 3.0];
    scal(&ctx, 3, ScalarArg::Host(0.0), Some(BatchMut::Plain(&mut x)), 1, 1).unwrap();
    assert_eq!(x, vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_scal_negative_inc_is_noop() {
    let ctx = Context::new();
    let mut x = vec![1.0, 2.0, 3.0];
    scal(&ctx, 3, ScalarArg::Host(5.0), Some(BatchMut::Plain(&mut x)), -1, 1).unwrap();
    assert_eq!(x, vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_scal_strided_batch() {
    let ctx = Context::new();
    let mut r = rng(12);
    let orig = rand_vec_f64(&mut r, 50);
    let mut x = orig.clone();
    // 3 instances of 5 elements at incx = 2, instance stride 20.
    scal(
        &ctx,
        5,
        ScalarArg::Host(-2.0),
        Some(BatchMut::Strided {
            data: &mut x,
            stride: 20,
        }),
        2,
        3,
    )
    .unwrap();
    for b in 0..3 {
        for j in 0..5 {
            let idx = b * 20 + 2 * j;
            assert_close(x[idx], -2.0 * orig[idx], 1e-14);
        }
        // Odd offsets inside each instance are untouched.
        assert_eq!(x[b * 20 + 1], orig[b * 20 + 1]);
    }
}

#[test]
fn test_axpy_plain() {
    let ctx = Context::new();
    let mut r = rng(21);
    let x = rand_vec_f64(&mut r, 31);
    let y0 = rand_vec_f64(&mut r, 31);
    let mut y = y0.clone();
    axpy(
        &ctx,
        31,
        ScalarArg::Host(0.5),
        Some(BatchRef::Plain(&x)),
        1,
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap();
    for i in 0..31 {
        assert_close(y[i], 0.5 * x[i] + y0[i], 1e-14);
    }
}

#[test]
fn test_axpy_broadcast_input() {
    let ctx = Context::new();
    let x = vec![1.0, 2.0, 3.0];
    let mut y = vec![0.0; 6];
    // One x instance broadcast (stride 0) onto two y instances.
    axpy(
        &ctx,
        3,
        ScalarArg::Host(1.0),
        Some(BatchRef::Strided {
            data: &x,
            stride: 0,
        }),
        1,
        Some(BatchMut::Strided {
            data: &mut y,
            stride: 3,
        }),
        1,
        2,
    )
    .unwrap();
    assert_eq!(y, vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_axpy_pointer_batch() {
    let ctx = Context::new();
    let x0 = vec![1.0, 2.0];
    let x1 = vec![10.0, 20.0];
    let xs: Vec<&[f64]> = vec![&x0, &x1];
    let mut y0 = vec![1.0, 1.0];
    let mut y1 = vec![2.0, 2.0];
    let mut ys: Vec<&mut [f64]> = vec![&mut y0, &mut y1];
    axpy(
        &ctx,
        2,
        ScalarArg::Host(2.0),
        Some(BatchRef::Pointers(&xs)),
        1,
        Some(BatchMut::Pointers(&mut ys)),
        1,
        2,
    )
    .unwrap();
    assert_eq!(y0, vec![3.0, 5.0]);
    assert_eq!(y1, vec![22.0, 42.0]);
}

#[test]
fn test_copy_reverses_with_negative_incy() {
    let ctx = Context::new();
    let x = vec![1.0, 2.0, 3.0, 4.0];
    let mut y = vec![0.0; 4];
    copy(
        &ctx,
        4,
        Some(BatchRef::Plain(&x)),
        1,
        Some(BatchMut::Plain(&mut y)),
        -1,
        1,
    )
    .unwrap();
    assert_eq!(y, vec![4.0, 3.0, 2.0, 1.0]);
}

#[test]
fn test_swap() {
    let ctx = Context::new();
    let mut x = vec![1.0, 2.0, 3.0];
    let mut y = vec![9.0, 8.0, 7.0];
    swap(
        &ctx,
        3,
        Some(BatchMut::Plain(&mut x)),
        1,
        Some(BatchMut::Plain(&mut y)),
        1,
        1,
    )
    .unwrap();
    assert_eq!(x, vec![9.0, 8.0, 7.0]);
    assert_eq!(y, vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_dot_strided_and_negative_inc() {
    let ctx = Context::new();
    let mut r = rng(31);
    let x = rand_vec_f64(&mut r, 9);
    let y = rand_vec_f64(&mut r, 5);
    let mut result = vec![0.0f64];
    dot(
        &ctx,
        5,
        Some(BatchRef::Plain(&x)),
        2,
        Some(BatchRef::Plain(&y)),
        -1,
        &mut result,
        1,
    )
    .unwrap();
    let mut expected = 0.0;
    for j in 0..5 {
        expected += x[vidx(5, 2, j)] * y[vidx(5, -1, j)];
    }
    assert_close(result[0], expected, 1e-13);
}

#[test]
fn test_dotc_conjugates_first_operand() {
    let ctx = Context::new();
    let mut r = rng(32);
    let x = rand_vec_c64(&mut r, 8);
    let y = rand_vec_c64(&mut r, 8);
    let mut plain = vec![Complex64::new(0.0, 0.0)];
    let mut conj = vec![Complex64::new(0.0, 0.0)];
    dot(&ctx, 8, Some(BatchRef::Plain(&x)), 1, Some(BatchRef::Plain(&y)), 1, &mut plain, 1)
        .unwrap();
    dotc(&ctx, 8, Some(BatchRef::Plain(&x)), 1, Some(BatchRef::Plain(&y)), 1, &mut conj, 1)
        .unwrap();
    let expected_plain: Complex64 = x.iter().zip(&y).map(|(a, b)| a * b).sum();
    let expected_conj: Complex64 = x.iter().zip(&y).map(|(a, b)| a.conj() * b).sum();
    assert_close_c(plain[0], expected_plain, 1e-13);
    assert_close_c(conj[0], expected_conj, 1e-13);
}

#[test]
fn test_dot_batched_results() {
    let ctx = Context::new();
    let x = vec![1.0, 2.0, 10.0, 20.0];
    let y = vec![3.0, 4.0, 30.0, 40.0];
    let mut result = vec![0.0f64; 2];
    dot(
        &ctx,
        2,
        Some(BatchRef::Strided { data: &x, stride: 2 }),
        1,
        Some(BatchRef::Strided { data: &y, stride: 2 }),
        1,
        &mut result,
        2,
    )
    .unwrap();
    assert_eq!(result, vec![11.0, 1100.0]);
}

#[test]
fn test_dot_zero_length_writes_zero_results() {
    let ctx = Context::new();
    let mut result = vec![7.0f64; 3];
    dot::<f64>(&ctx, 0, None, 1, None, 1, &mut result, 3).unwrap();
    assert_eq!(result, vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_nrm2() {
    let ctx = Context::new();
    let x = vec![3.0, 4.0];
    let mut result = vec![0.0f64];
    nrm2(&ctx, 2, Some(BatchRef::Plain(&x)), 1, &mut result, 1).unwrap();
    assert_close(result[0], 5.0, 1e-15);
}

#[test]
fn test_asum_complex_uses_abs1() {
    let ctx = Context::new();
    let x = vec![Complex64::new(3.0, -4.0), Complex64::new(-1.0, 2.0)];
    let mut result = vec![0.0f64];
    asum(&ctx, 2, Some(BatchRef::Plain(&x)), 1, &mut result, 1).unwrap();
    // |3| + |-4| + |-1| + |2|
    assert_close(result[0], 10.0, 1e-15);
}

#[test]
fn test_iamax_returns_first_of_ties() {
    let ctx = Context::new();
    let x = vec![1.0, -5.0, 5.0, 2.0];
    let mut result = vec![0i64];
    iamax(&ctx, 4, Some(BatchRef::Plain(&x)), 1, &mut result, 1).unwrap();
    assert_eq!(result[0], 2); // 1-based index of -5.0
}

#[test]
fn test_iamax_degenerate_reports_zero() {
    let ctx = Context::new();
    let x = vec![1.0, 2.0];
    let mut result = vec![99i64];
    // Negative increment is a documented quick return for index reductions.
    iamax(&ctx, 2, Some(BatchRef::Plain(&x)), -1, &mut result, 1).unwrap();
    assert_eq!(result[0], 0);
}

#[test]
fn test_iamax_skips_nan() {
    let ctx = Context::new();
    let x = vec![2.0, f64::NAN, 7.0];
    let mut result = vec![0i64];
    iamax(&ctx, 3, Some(BatchRef::Plain(&x)), 1, &mut result, 1).unwrap();
    assert_eq!(result[0], 3);
}

#[test]
fn test_dot_single_precision() {
    let ctx = Context::new();
    let mut r = rng(41);
    let x = rand_vec_f32(&mut r, 64);
    let y = rand_vec_f32(&mut r, 64);
    let mut result = vec![0.0f32];
    dot(
        &ctx,
        64,
        Some(BatchRef::Plain(&x)),
        1,
        Some(BatchRef::Plain(&y)),
        1,
        &mut result,
        1,
    )
    .unwrap();
    let expected: f64 = up(&x).iter().zip(up(&y)).map(|(a, b)| a * b).sum();
    assert_close(result[0] as f64, expected, 1e-5);
}

#[test]
fn test_dotc_single_precision_complex() {
    let ctx = Context::new();
    let mut r = rng(42);
    let x = rand_vec_c32(&mut r, 32);
    let y = rand_vec_c32(&mut r, 32);
    let mut result = vec![Complex32::new(0.0, 0.0)];
    dotc(
        &ctx,
        32,
        Some(BatchRef::Plain(&x)),
        1,
        Some(BatchRef::Plain(&y)),
        1,
        &mut result,
        1,
    )
    .unwrap();
    let expected: Complex64 = upc(&x).iter().zip(upc(&y)).map(|(a, b)| a.conj() * b).sum();
    let got = Complex64::new(result[0].re as f64, result[0].im as f64);
    assert_close_c(got, expected, 1e-5);
}
