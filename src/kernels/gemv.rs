//! Level 2: general and general-banded matrix-vector products.

use crate::batch::{neg_inc_offset, vec_index, BatchMut, BatchRef};
use crate::context::Context;
use crate::grid::{par_for_each, reduce_chunked, SendPtr};
use crate::guard;
use crate::layout::{general_banded_offset, general_offset, Transpose};
use crate::logging::{log_call, ArgValue, CallRecord};
use crate::scalar::{Scalar, ScalarArg};
use crate::validate::{self, Launch};
use crate::{BlasError, Result};

use super::scale_strided;

/// y = alpha * op(A) * x + beta * y, A general m x n.
#[allow(clippy::too_many_arguments)]
pub fn gemv<T: Scalar>(
    ctx: &Context,
    trans: Transpose,
    m: usize,
    n: usize,
    alpha: ScalarArg<'_, T>,
    a: Option<BatchRef<'_, T>>,
    lda: usize,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    beta: ScalarArg<'_, T>,
    y: Option<BatchMut<'_, T>>,
    incy: isize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "gemv",
            vec![
                ("trans", trans.as_char().into()),
                ("m", m.into()),
                ("n", n.into()),
                ("alpha", ArgValue::scalar(&alpha)),
                ("lda", lda.into()),
                ("incx", incx.into()),
                ("beta", ArgValue::scalar(&beta)),
                ("incy", incy.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::gemv_args(
        ctx,
        trans,
        m,
        n,
        &alpha,
        a.as_ref(),
        lda,
        x.as_ref(),
        incx,
        &beta,
        y.as_ref(),
        incy,
        batch_count,
    )?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let (ydim, xdim) = match trans {
        Transpose::NoTrans => (m, n),
        _ => (n, m),
    };
    let mut y = y.ok_or(BlasError::InvalidPointer("y"))?;
    let alpha_v = alpha.load();
    let beta_v = beta.load();
    if alpha_v.is_zero() {
        for b in 0..batch_count {
            scale_strided(ydim, incy, y.instance_mut(b), beta_v);
        }
        guard::guard_vector(ctx, "gemv", "y", false, ydim, incy, &y, batch_count)?;
        return Ok(());
    }
    let a = a.ok_or(BlasError::InvalidPointer("a"))?;
    let x = x.ok_or(BlasError::InvalidPointer("x"))?;
    guard::guard_general(ctx, "gemv", "a", true, m, n, lda, &a, batch_count)?;
    guard::guard_vector(ctx, "gemv", "x", true, xdim, incx, &x, batch_count)?;
    let xbase = neg_inc_offset(xdim, incx);
    let ybase = neg_inc_offset(ydim, incy);
    for b in 0..batch_count {
        let ai = a.instance(b);
        let xi = x.instance(b);
        let yi = y.instance_mut(b);
        let yp = SendPtr(yi.as_mut_ptr());
        par_for_each(ydim, 2 * xdim, move |i| {
            let acc = reduce_chunked(xdim, |j| {
                let aij = match trans {
                    Transpose::NoTrans => ai[general_offset(i, j, lda)],
                    Transpose::Trans => ai[general_offset(j, i, lda)],
                    Transpose::ConjTrans => ai[general_offset(j, i, lda)].conj(),
                };
                aij * xi[vec_index(xbase, j, incx)]
            });
            unsafe {
                super::store_scaled(yp.at(vec_index(ybase, i, incy)), acc, alpha_v, beta_v);
            }
        });
    }
    guard::guard_vector(ctx, "gemv", "y", false, ydim, incy, &y, batch_count)?;
    Ok(())
}

/// y = alpha * op(A) * x + beta * y, A general-banded m x n with `kl`
/// sub-diagonals and `ku` super-diagonals stored in a `(kl + ku + 1) x n`
/// column-major band array.
#[allow(clippy::too_many_arguments)]
pub fn gbmv<T: Scalar>(
    ctx: &Context,
    trans: Transpose,
    m: usize,
    n: usize,
    kl: usize,
    ku: usize,
    alpha: ScalarArg<'_, T>,
    a: Option<BatchRef<'_, T>>,
    lda: usize,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    beta: ScalarArg<'_, T>,
    y: Option<BatchMut<'_, T>>,
    incy: isize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "gbmv",
            vec![
                ("trans", trans.as_char().into()),
                ("m", m.into()),
                ("n", n.into()),
                ("kl", kl.into()),
                ("ku", ku.into()),
                ("alpha", ArgValue::scalar(&alpha)),
                ("lda", lda.into()),
                ("incx", incx.into()),
                ("beta", ArgValue::scalar(&beta)),
                ("incy", incy.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::gbmv_args(
        ctx,
        trans,
        m,
        n,
        kl,
        ku,
        &alpha,
        a.as_ref(),
        lda,
        x.as_ref(),
        incx,
        &beta,
        y.as_ref(),
        incy,
        batch_count,
    )?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let (ydim, xdim) = match trans {
        Transpose::NoTrans => (m, n),
        _ => (n, m),
    };
    let mut y = y.ok_or(BlasError::InvalidPointer("y"))?;
    let alpha_v = alpha.load();
    let beta_v = beta.load();
    if alpha_v.is_zero() {
        for b in 0..batch_count {
            scale_strided(ydim, incy, y.instance_mut(b), beta_v);
        }
        guard::guard_vector(ctx, "gbmv", "y", false, ydim, incy, &y, batch_count)?;
        return Ok(());
    }
    let a = a.ok_or(BlasError::InvalidPointer("a"))?;
    let x = x.ok_or(BlasError::InvalidPointer("x"))?;
    guard::guard_general_band(ctx, "gbmv", "a", true, m, n, kl, ku, lda, &a, batch_count)?;
    guard::guard_vector(ctx, "gbmv", "x", true, xdim, incx, &x, batch_count)?;
    let xbase = neg_inc_offset(xdim, incx);
    let ybase = neg_inc_offset(ydim, incy);
    for b in 0..batch_count {
        let ai = a.instance(b);
        let xi = x.instance(b);
        let yi = y.instance_mut(b);
        let yp = SendPtr(yi.as_mut_ptr());
        par_for_each(ydim, 2 * (kl + ku + 1), move |i| {
            // Only the columns whose band covers this output row contribute.
            let (lo, hi) = match trans {
                // row i of A: columns j with i - kl <= j <= i + ku
                Transpose::NoTrans => (i.saturating_sub(kl), (i + ku + 1).min(xdim)),
                // column i of A: rows j with i - ku <= j <= i + kl
                _ => (i.saturating_sub(ku), (i + kl + 1).min(xdim)),
            };
            let mut acc = T::zero();
            for j in lo..hi {
                let aij = match trans {
                    Transpose::NoTrans => ai[general_banded_offset(ku, i, j, lda)],
                    Transpose::Trans => ai[general_banded_offset(ku, j, i, lda)],
                    Transpose::ConjTrans => ai[general_banded_offset(ku, j, i, lda)].conj(),
                };
                acc = acc + aij * xi[vec_index(xbase, j, incx)];
            }
            unsafe {
                super::store_scaled(yp.at(vec_index(ybase, i, incy)), acc, alpha_v, beta_v);
            }
        });
    }
    guard::guard_vector(ctx, "gbmv", "y", false, ydim, incy, &y, batch_count)?;
    Ok(())
}
