//! Level 2: rank-1 updates (general, symmetric, Hermitian).

use crate::batch::{neg_inc_offset, vec_index, BatchMut, BatchRef};
use crate::context::Context;
use crate::grid::{par_for_each, SendPtr};
use crate::guard;
use crate::layout::{general_offset, Uplo};
use crate::logging::{log_call, ArgValue, CallRecord};
use crate::scalar::{Scalar, ScalarArg};
use crate::validate::{self, Launch};
use crate::{BlasError, Result};

#[allow(clippy::too_many_arguments)]
fn ger_impl<T: Scalar>(
    ctx: &Context,
    name: &'static str,
    conjugate: bool,
    m: usize,
    n: usize,
    alpha: ScalarArg<'_, T>,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    y: Option<BatchRef<'_, T>>,
    incy: isize,
    a: Option<BatchMut<'_, T>>,
    lda: usize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            name,
            vec![
                ("m", m.into()),
                ("n", n.into()),
                ("alpha", ArgValue::scalar(&alpha)),
                ("incx", incx.into()),
                ("incy", incy.into()),
                ("lda", lda.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::ger_args(
        ctx,
        m,
        n,
        &alpha,
        x.as_ref(),
        incx,
        y.as_ref(),
        incy,
        a.as_ref(),
        lda,
        batch_count,
    )?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let alpha_v = alpha.load();
    if alpha_v.is_zero() {
        // Reachable only with a device-resident alpha.
        return Ok(());
    }
    let x = x.ok_or(BlasError::InvalidPointer("x"))?;
    let y = y.ok_or(BlasError::InvalidPointer("y"))?;
    let mut a = a.ok_or(BlasError::InvalidPointer("a"))?;
    guard::guard_vector(ctx, name, "x", true, m, incx, &x, batch_count)?;
    guard::guard_vector(ctx, name, "y", true, n, incy, &y, batch_count)?;
    let xbase = neg_inc_offset(m, incx);
    let ybase = neg_inc_offset(n, incy);
    for b in 0..batch_count {
        let xi = x.instance(b);
        let yi = y.instance(b);
        let ai = a.instance_mut(b);
        let ap = SendPtr(ai.as_mut_ptr());
        // Columns are disjoint in memory (lda >= m), so they parallelize.
        par_for_each(n, 2 * m, move |j| {
            let yv = yi[vec_index(ybase, j, incy)];
            let yv = if conjugate { yv.conj() } else { yv };
            let scale = alpha_v * yv;
            for i in 0..m {
                unsafe {
                    let slot = ap.at(general_offset(i, j, lda));
                    *slot = *slot + scale * xi[vec_index(xbase, i, incx)];
                }
            }
        });
    }
    guard::guard_general(ctx, name, "a", false, m, n, lda, &a, batch_count)?;
    Ok(())
}

/// A = alpha * x * y^T + A, A general m x n.
#[allow(clippy::too_many_arguments)]
pub fn ger<T: Scalar>(
    ctx: &Context,
    m: usize,
    n: usize,
    alpha: ScalarArg<'_, T>,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    y: Option<BatchRef<'_, T>>,
    incy: isize,
    a: Option<BatchMut<'_, T>>,
    lda: usize,
    batch_count: usize,
) -> Result<()> {
    ger_impl(ctx, "ger", false, m, n, alpha, x, incx, y, incy, a, lda, batch_count)
}

/// A = alpha * x * y^H + A, A general m x n.
#[allow(clippy::too_many_arguments)]
pub fn gerc<T: Scalar>(
    ctx: &Context,
    m: usize,
    n: usize,
    alpha: ScalarArg<'_, T>,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    y: Option<BatchRef<'_, T>>,
    incy: isize,
    a: Option<BatchMut<'_, T>>,
    lda: usize,
    batch_count: usize,
) -> Result<()> {
    ger_impl(ctx, "gerc", true, m, n, alpha, x, incx, y, incy, a, lda, batch_count)
}

/// A = alpha * x * x^T + A, A symmetric with one triangle stored.
#[allow(clippy::too_many_arguments)]
pub fn syr<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
    n: usize,
    alpha: ScalarArg<'_, T>,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    a: Option<BatchMut<'_, T>>,
    lda: usize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "syr",
            vec![
                ("uplo", uplo.as_char().into()),
                ("n", n.into()),
                ("alpha", ArgValue::scalar(&alpha)),
                ("incx", incx.into()),
                ("lda", lda.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch =
        validate::syr_args(ctx, uplo, n, &alpha, x.as_ref(), incx, a.as_ref(), lda, batch_count)?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let alpha_v = alpha.load();
    if alpha_v.is_zero() {
        return Ok(());
    }
    let x = x.ok_or(BlasError::InvalidPointer("x"))?;
    let mut a = a.ok_or(BlasError::InvalidPointer("a"))?;
    guard::guard_vector(ctx, "syr", "x", true, n, incx, &x, batch_count)?;
    let base = neg_inc_offset(n, incx);
    for b in 0..batch_count {
        let xi = x.instance(b);
        let ai = a.instance_mut(b);
        let ap = SendPtr(ai.as_mut_ptr());
        par_for_each(n, n, move |j| {
            let scale = alpha_v * xi[vec_index(base, j, incx)];
            let (lo, hi) = match uplo {
                Uplo::Upper => (0, j + 1),
                Uplo::Lower => (j, n),
            };
            for i in lo..hi {
                unsafe {
                    let slot = ap.at(general_offset(i, j, lda));
                    *slot = *slot + scale * xi[vec_index(base, i, incx)];
                }
            }
        });
    }
    guard::guard_triangle(ctx, "syr", "a", false, uplo, n, lda, &a, batch_count)?;
    Ok(())
}

/// A = alpha * x * x^H + A, A Hermitian with one triangle stored and a real
/// alpha. Diagonal stores are forced real.
#[allow(clippy::too_many_arguments)]
pub fn her<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
    n: usize,
    alpha: ScalarArg<'_, T::Real>,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    a: Option<BatchMut<'_, T>>,
    lda: usize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "her",
            vec![
                ("uplo", uplo.as_char().into()),
                ("n", n.into()),
                ("alpha", ArgValue::scalar(&alpha)),
                ("incx", incx.into()),
                ("lda", lda.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch =
        validate::syr_args(ctx, uplo, n, &alpha, x.as_ref(), incx, a.as_ref(), lda, batch_count)?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let alpha_v = T::from_real(alpha.load());
    if alpha_v.is_zero() {
        return Ok(());
    }
    let x = x.ok_or(BlasError::InvalidPointer("x"))?;
    let mut a = a.ok_or(BlasError::InvalidPointer("a"))?;
    guard::guard_vector(ctx, "her", "x", true, n, incx, &x, batch_count)?;
    let base = neg_inc_offset(n, incx);
    for b in 0..batch_count {
        let xi = x.instance(b);
        let ai = a.instance_mut(b);
        let ap = SendPtr(ai.as_mut_ptr());
        par_for_each(n, n, move |j| {
            let scale = alpha_v * xi[vec_index(base, j, incx)].conj();
            let (lo, hi) = match uplo {
                Uplo::Upper => (0, j + 1),
                Uplo::Lower => (j, n),
            };
            for i in lo..hi {
                unsafe {
                    let slot = ap.at(general_offset(i, j, lda));
                    let v = *slot + scale * xi[vec_index(base, i, incx)];
                    *slot = if i == j { v.force_real() } else { v };
                }
            }
        });
    }
    guard::guard_triangle(ctx, "her", "a", false, uplo, n, lda, &a, batch_count)?;
    Ok(())
}
