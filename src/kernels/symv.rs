//! Level 2: symmetric/Hermitian matrix-vector products in full, banded and
//! packed storage.
//!
//! Only the `uplo` triangle of A is stored; reads of the other triangle are
//! reflected to the transposed position and conjugated for the Hermitian
//! variants. A Hermitian diagonal is treated as real no matter what the
//! imaginary slots hold.

use crate::batch::{neg_inc_offset, vec_index, BatchMut, BatchRef};
use crate::context::Context;
use crate::grid::{par_for_each, reduce_chunked, SendPtr};
use crate::guard;
use crate::layout::{banded_sym_get, packed_get, sym_get, Uplo};
use crate::logging::{log_call, ArgValue, CallRecord};
use crate::scalar::{Scalar, ScalarArg};
use crate::validate::{self, Launch, SymStorage};
use crate::{BlasError, Result};

use super::scale_strided;

#[allow(clippy::too_many_arguments)]
fn sym_impl<T: Scalar>(
    ctx: &Context,
    name: &'static str,
    hermitian: bool,
    uplo: Uplo,
    n: usize,
    storage: SymStorage,
    alpha: ScalarArg<'_, T>,
    a: Option<BatchRef<'_, T>>,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    beta: ScalarArg<'_, T>,
    y: Option<BatchMut<'_, T>>,
    incy: isize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        let mut args: Vec<(&'static str, ArgValue)> =
            vec![("uplo", uplo.as_char().into()), ("n", n.into())];
        match storage {
            SymStorage::Full { lda } => args.push(("lda", lda.into())),
            SymStorage::Banded { k, lda } => {
                args.push(("k", k.into()));
                args.push(("lda", lda.into()));
            }
            SymStorage::Packed => {}
        }
        args.push(("alpha", ArgValue::scalar(&alpha)));
        args.push(("incx", incx.into()));
        args.push(("beta", ArgValue::scalar(&beta)));
        args.push(("incy", incy.into()));
        args.push(("batch_count", batch_count.into()));
        CallRecord::new(name, args)
    });
    let launch = validate::symv_args(
        ctx,
        uplo,
        n,
        storage,
        &alpha,
        a.as_ref(),
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
    let mut y = y.ok_or(BlasError::InvalidPointer("y"))?;
    let alpha_v = alpha.load();
    let beta_v = beta.load();
    if alpha_v.is_zero() {
        for b in 0..batch_count {
            scale_strided(n, incy, y.instance_mut(b), beta_v);
        }
        guard::guard_vector(ctx, name, "y", false, n, incy, &y, batch_count)?;
        return Ok(());
    }
    let a = a.ok_or(BlasError::InvalidPointer("a"))?;
    let x = x.ok_or(BlasError::InvalidPointer("x"))?;
    match storage {
        SymStorage::Full { lda } => {
            guard::guard_triangle(ctx, name, "a", true, uplo, n, lda, &a, batch_count)?
        }
        SymStorage::Banded { k, lda } => {
            guard::guard_banded(ctx, name, "a", true, uplo, n, k, lda, &a, batch_count)?
        }
        SymStorage::Packed => guard::guard_packed(ctx, name, "a", true, uplo, n, &a, batch_count)?,
    }
    guard::guard_vector(ctx, name, "x", true, n, incx, &x, batch_count)?;
    let xbase = neg_inc_offset(n, incx);
    let ybase = neg_inc_offset(n, incy);
    for b in 0..batch_count {
        let ai = a.instance(b);
        let xi = x.instance(b);
        let yi = y.instance_mut(b);
        let yp = SendPtr(yi.as_mut_ptr());
        match storage {
            SymStorage::Banded { k, lda } => {
                par_for_each(n, 2 * (2 * k + 1), move |i| {
                    let lo = i.saturating_sub(k);
                    let hi = (i + k + 1).min(n);
                    let mut acc = T::zero();
                    for j in lo..hi {
                        let aij = banded_sym_get(ai, uplo, k, lda, i, j, hermitian);
                        acc = acc + aij * xi[vec_index(xbase, j, incx)];
                    }
                    unsafe {
                        super::store_scaled(yp.at(vec_index(ybase, i, incy)), acc, alpha_v, beta_v);
                    }
                });
            }
            _ => {
                par_for_each(n, 2 * n, move |i| {
                    let acc = reduce_chunked(n, |j| {
                        let aij = match storage {
                            SymStorage::Full { lda } => sym_get(ai, uplo, lda, i, j, hermitian),
                            SymStorage::Packed => packed_get(ai, uplo, n, i, j, hermitian),
                            SymStorage::Banded { .. } => unreachable!(),
                        };
                        aij * xi[vec_index(xbase, j, incx)]
                    });
                    unsafe {
                        super::store_scaled(yp.at(vec_index(ybase, i, incy)), acc, alpha_v, beta_v);
                    }
                });
            }
        }
    }
    guard::guard_vector(ctx, name, "y", false, n, incy, &y, batch_count)?;
    Ok(())
}

/// y = alpha * A * x + beta * y, A symmetric with one triangle stored.
#[allow(clippy::too_many_arguments)]
pub fn symv<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
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
    sym_impl(
        ctx,
        "symv",
        false,
        uplo,
        n,
        SymStorage::Full { lda },
        alpha,
        a,
        x,
        incx,
        beta,
        y,
        incy,
        batch_count,
    )
}

/// y = alpha * A * x + beta * y, A Hermitian with one triangle stored.
#[allow(clippy::too_many_arguments)]
pub fn hemv<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
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
    sym_impl(
        ctx,
        "hemv",
        true,
        uplo,
        n,
        SymStorage::Full { lda },
        alpha,
        a,
        x,
        incx,
        beta,
        y,
        incy,
        batch_count,
    )
}

/// y = alpha * A * x + beta * y, A symmetric banded with bandwidth `k`.
#[allow(clippy::too_many_arguments)]
pub fn sbmv<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
    n: usize,
    k: usize,
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
    sym_impl(
        ctx,
        "sbmv",
        false,
        uplo,
        n,
        SymStorage::Banded { k, lda },
        alpha,
        a,
        x,
        incx,
        beta,
        y,
        incy,
        batch_count,
    )
}

/// y = alpha * A * x + beta * y, A Hermitian banded with bandwidth `k`.
#[allow(clippy::too_many_arguments)]
pub fn hbmv<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
    n: usize,
    k: usize,
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
    sym_impl(
        ctx,
        "hbmv",
        true,
        uplo,
        n,
        SymStorage::Banded { k, lda },
        alpha,
        a,
        x,
        incx,
        beta,
        y,
        incy,
        batch_count,
    )
}

/// y = alpha * A * x + beta * y, A symmetric in packed storage.
#[allow(clippy::too_many_arguments)]
pub fn spmv<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
    n: usize,
    alpha: ScalarArg<'_, T>,
    ap: Option<BatchRef<'_, T>>,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    beta: ScalarArg<'_, T>,
    y: Option<BatchMut<'_, T>>,
    incy: isize,
    batch_count: usize,
) -> Result<()> {
    sym_impl(
        ctx,
        "spmv",
        false,
        uplo,
        n,
        SymStorage::Packed,
        alpha,
        ap,
        x,
        incx,
        beta,
        y,
        incy,
        batch_count,
    )
}

/// y = alpha * A * x + beta * y, A Hermitian in packed storage.
#[allow(clippy::too_many_arguments)]
pub fn hpmv<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
    n: usize,
    alpha: ScalarArg<'_, T>,
    ap: Option<BatchRef<'_, T>>,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    beta: ScalarArg<'_, T>,
    y: Option<BatchMut<'_, T>>,
    incy: isize,
    batch_count: usize,
) -> Result<()> {
    sym_impl(
        ctx,
        "hpmv",
        true,
        uplo,
        n,
        SymStorage::Packed,
        alpha,
        ap,
        x,
        incx,
        beta,
        y,
        incy,
        batch_count,
    )
}
