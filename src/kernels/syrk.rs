//! Level 3: symmetric and Hermitian rank-k and rank-2k updates.
//!
//! Only the `uplo` triangle of C is referenced or written. The Hermitian
//! variants take real alpha/beta (rank-k) or real beta (rank-2k), reject the
//! plain-transpose form, and treat the diagonal of C as real on both read
//! and store.

use crate::batch::{BatchMut, BatchRef};
use crate::context::Context;
use crate::grid::{par_for_each, reduce_chunked, SendPtr};
use crate::guard;
use crate::layout::{general_offset, Transpose, Uplo};
use crate::logging::{log_call, ArgValue, CallRecord};
use crate::scalar::{Scalar, ScalarArg};
use crate::validate::{self, Launch};
use crate::{BlasError, Result};

use super::scale_triangle;

/// Factor element: `A[i, l]` of the n x k operand as operated on, with an
/// optional conjugation.
#[inline(always)]
fn factor_get<T: Scalar>(a: &[T], lda: usize, notrans: bool, i: usize, l: usize, conj: bool) -> T {
    let v = if notrans {
        a[general_offset(i, l, lda)]
    } else {
        a[general_offset(l, i, lda)]
    };
    if conj {
        v.conj()
    } else {
        v
    }
}

#[inline]
unsafe fn store_update<T: Scalar>(slot: *mut T, acc: T, beta: T, hermitian_diag: bool) {
    let old = if beta.is_zero() {
        T::zero()
    } else {
        let o = *slot;
        beta * if hermitian_diag { o.force_real() } else { o }
    };
    let v = acc + old;
    *slot = if hermitian_diag { v.force_real() } else { v };
}

#[allow(clippy::too_many_arguments)]
fn rank_k_kernel<T: Scalar>(
    hermitian: bool,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    let notrans = trans == Transpose::NoTrans;
    let conj_first = hermitian && !notrans;
    let conj_second = hermitian && notrans;
    let upper = uplo == Uplo::Upper;
    let cp = SendPtr(c.as_mut_ptr());
    par_for_each(n, n * k, move |j| {
        let (lo, hi) = if upper { (0, j + 1) } else { (j, n) };
        for i in lo..hi {
            let acc = reduce_chunked(k, |l| {
                factor_get(a, lda, notrans, i, l, conj_first)
                    * factor_get(a, lda, notrans, j, l, conj_second)
            });
            unsafe {
                store_update(
                    cp.at(general_offset(i, j, ldc)),
                    alpha * acc,
                    beta,
                    hermitian && i == j,
                );
            }
        }
    });
}

#[allow(clippy::too_many_arguments)]
fn rank_2k_kernel<T: Scalar>(
    hermitian: bool,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: T,
    a: &[T],
    lda: usize,
    b: &[T],
    ldb: usize,
    beta: T,
    c: &mut [T],
    ldc: usize,
) {
    let notrans = trans == Transpose::NoTrans;
    let conj_first = hermitian && !notrans;
    let conj_second = hermitian && notrans;
    let alpha2 = if hermitian { alpha.conj() } else { alpha };
    let upper = uplo == Uplo::Upper;
    let cp = SendPtr(c.as_mut_ptr());
    par_for_each(n, 2 * n * k, move |j| {
        let (lo, hi) = if upper { (0, j + 1) } else { (j, n) };
        for i in lo..hi {
            let acc = reduce_chunked(k, |l| {
                let t1 = factor_get(a, lda, notrans, i, l, conj_first)
                    * factor_get(b, ldb, notrans, j, l, conj_second);
                let t2 = factor_get(b, ldb, notrans, i, l, conj_first)
                    * factor_get(a, lda, notrans, j, l, conj_second);
                alpha * t1 + alpha2 * t2
            });
            unsafe {
                store_update(
                    cp.at(general_offset(i, j, ldc)),
                    acc,
                    beta,
                    hermitian && i == j,
                );
            }
        }
    });
}

fn factor_dims(trans: Transpose, n: usize, k: usize) -> (usize, usize) {
    match trans {
        Transpose::NoTrans => (n, k),
        _ => (k, n),
    }
}

/// C = alpha * op(A) * op(A)^T + beta * C, C symmetric.
#[allow(clippy::too_many_arguments)]
pub fn syrk<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: ScalarArg<'_, T>,
    a: Option<BatchRef<'_, T>>,
    lda: usize,
    beta: ScalarArg<'_, T>,
    c: Option<BatchMut<'_, T>>,
    ldc: usize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "syrk",
            vec![
                ("uplo", uplo.as_char().into()),
                ("trans", trans.as_char().into()),
                ("n", n.into()),
                ("k", k.into()),
                ("alpha", ArgValue::scalar(&alpha)),
                ("lda", lda.into()),
                ("beta", ArgValue::scalar(&beta)),
                ("ldc", ldc.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::syrk_args::<T, T, T>(
        ctx,
        uplo,
        trans,
        n,
        k,
        false,
        &alpha,
        a.as_ref(),
        lda,
        &beta,
        c.as_ref(),
        ldc,
        batch_count,
    )?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let mut c = c.ok_or(BlasError::InvalidPointer("c"))?;
    let alpha_v = alpha.load();
    let beta_v = beta.load();
    if alpha_v.is_zero() || k == 0 {
        for bi in 0..batch_count {
            scale_triangle(uplo == Uplo::Upper, n, ldc, c.instance_mut(bi), beta_v, false);
        }
        guard::guard_triangle(ctx, "syrk", "c", false, uplo, n, ldc, &c, batch_count)?;
        return Ok(());
    }
    let a = a.ok_or(BlasError::InvalidPointer("a"))?;
    let (ar, ac) = factor_dims(trans, n, k);
    guard::guard_general(ctx, "syrk", "a", true, ar, ac, lda, &a, batch_count)?;
    for bi in 0..batch_count {
        rank_k_kernel(
            false,
            uplo,
            trans,
            n,
            k,
            alpha_v,
            a.instance(bi),
            lda,
            beta_v,
            c.instance_mut(bi),
            ldc,
        );
    }
    guard::guard_triangle(ctx, "syrk", "c", false, uplo, n, ldc, &c, batch_count)?;
    Ok(())
}

/// C = alpha * op(A) * op(A)^H + beta * C, C Hermitian, alpha and beta real.
#[allow(clippy::too_many_arguments)]
pub fn herk<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: ScalarArg<'_, T::Real>,
    a: Option<BatchRef<'_, T>>,
    lda: usize,
    beta: ScalarArg<'_, T::Real>,
    c: Option<BatchMut<'_, T>>,
    ldc: usize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "herk",
            vec![
                ("uplo", uplo.as_char().into()),
                ("trans", trans.as_char().into()),
                ("n", n.into()),
                ("k", k.into()),
                ("alpha", ArgValue::scalar(&alpha)),
                ("lda", lda.into()),
                ("beta", ArgValue::scalar(&beta)),
                ("ldc", ldc.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::syrk_args::<T, T::Real, T::Real>(
        ctx,
        uplo,
        trans,
        n,
        k,
        true,
        &alpha,
        a.as_ref(),
        lda,
        &beta,
        c.as_ref(),
        ldc,
        batch_count,
    )?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let mut c = c.ok_or(BlasError::InvalidPointer("c"))?;
    let alpha_v = T::from_real(alpha.load());
    let beta_v = T::from_real(beta.load());
    if alpha_v.is_zero() || k == 0 {
        for bi in 0..batch_count {
            scale_triangle(uplo == Uplo::Upper, n, ldc, c.instance_mut(bi), beta_v, true);
        }
        guard::guard_triangle(ctx, "herk", "c", false, uplo, n, ldc, &c, batch_count)?;
        return Ok(());
    }
    let a = a.ok_or(BlasError::InvalidPointer("a"))?;
    let (ar, ac) = factor_dims(trans, n, k);
    guard::guard_general(ctx, "herk", "a", true, ar, ac, lda, &a, batch_count)?;
    for bi in 0..batch_count {
        rank_k_kernel(
            true,
            uplo,
            trans,
            n,
            k,
            alpha_v,
            a.instance(bi),
            lda,
            beta_v,
            c.instance_mut(bi),
            ldc,
        );
    }
    guard::guard_triangle(ctx, "herk", "c", false, uplo, n, ldc, &c, batch_count)?;
    Ok(())
}

/// C = alpha * op(A) * op(B)^T + alpha * op(B) * op(A)^T + beta * C.
#[allow(clippy::too_many_arguments)]
pub fn syr2k<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: ScalarArg<'_, T>,
    a: Option<BatchRef<'_, T>>,
    lda: usize,
    b: Option<BatchRef<'_, T>>,
    ldb: usize,
    beta: ScalarArg<'_, T>,
    c: Option<BatchMut<'_, T>>,
    ldc: usize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "syr2k",
            vec![
                ("uplo", uplo.as_char().into()),
                ("trans", trans.as_char().into()),
                ("n", n.into()),
                ("k", k.into()),
                ("alpha", ArgValue::scalar(&alpha)),
                ("lda", lda.into()),
                ("ldb", ldb.into()),
                ("beta", ArgValue::scalar(&beta)),
                ("ldc", ldc.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::syr2k_args::<T, T, T>(
        ctx,
        uplo,
        trans,
        n,
        k,
        false,
        &alpha,
        a.as_ref(),
        lda,
        b.as_ref(),
        ldb,
        &beta,
        c.as_ref(),
        ldc,
        batch_count,
    )?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let mut c = c.ok_or(BlasError::InvalidPointer("c"))?;
    let alpha_v = alpha.load();
    let beta_v = beta.load();
    if alpha_v.is_zero() || k == 0 {
        for bi in 0..batch_count {
            scale_triangle(uplo == Uplo::Upper, n, ldc, c.instance_mut(bi), beta_v, false);
        }
        guard::guard_triangle(ctx, "syr2k", "c", false, uplo, n, ldc, &c, batch_count)?;
        return Ok(());
    }
    let a = a.ok_or(BlasError::InvalidPointer("a"))?;
    let b = b.ok_or(BlasError::InvalidPointer("b"))?;
    let (fr, fc) = factor_dims(trans, n, k);
    guard::guard_general(ctx, "syr2k", "a", true, fr, fc, lda, &a, batch_count)?;
    guard::guard_general(ctx, "syr2k", "b", true, fr, fc, ldb, &b, batch_count)?;
    for bi in 0..batch_count {
        rank_2k_kernel(
            false,
            uplo,
            trans,
            n,
            k,
            alpha_v,
            a.instance(bi),
            lda,
            b.instance(bi),
            ldb,
            beta_v,
            c.instance_mut(bi),
            ldc,
        );
    }
    guard::guard_triangle(ctx, "syr2k", "c", false, uplo, n, ldc, &c, batch_count)?;
    Ok(())
}

/// C = alpha * op(A) * op(B)^H + conj(alpha) * op(B) * op(A)^H + beta * C,
/// C Hermitian, beta real.
#[allow(clippy::too_many_arguments)]
pub fn her2k<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    alpha: ScalarArg<'_, T>,
    a: Option<BatchRef<'_, T>>,
    lda: usize,
    b: Option<BatchRef<'_, T>>,
    ldb: usize,
    beta: ScalarArg<'_, T::Real>,
    c: Option<BatchMut<'_, T>>,
    ldc: usize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "her2k",
            vec![
                ("uplo", uplo.as_char().into()),
                ("trans", trans.as_char().into()),
                ("n", n.into()),
                ("k", k.into()),
                ("alpha", ArgValue::scalar(&alpha)),
                ("lda", lda.into()),
                ("ldb", ldb.into()),
                ("beta", ArgValue::scalar(&beta)),
                ("ldc", ldc.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::syr2k_args::<T, T, T::Real>(
        ctx,
        uplo,
        trans,
        n,
        k,
        true,
        &alpha,
        a.as_ref(),
        lda,
        b.as_ref(),
        ldb,
        &beta,
        c.as_ref(),
        ldc,
        batch_count,
    )?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let mut c = c.ok_or(BlasError::InvalidPointer("c"))?;
    let alpha_v = alpha.load();
    let beta_v = T::from_real(beta.load());
    if alpha_v.is_zero() || k == 0 {
        for bi in 0..batch_count {
            scale_triangle(uplo == Uplo::Upper, n, ldc, c.instance_mut(bi), beta_v, true);
        }
        guard::guard_triangle(ctx, "her2k", "c", false, uplo, n, ldc, &c, batch_count)?;
        return Ok(());
    }
    let a = a.ok_or(BlasError::InvalidPointer("a"))?;
    let b = b.ok_or(BlasError::InvalidPointer("b"))?;
    let (fr, fc) = factor_dims(trans, n, k);
    guard::guard_general(ctx, "her2k", "a", true, fr, fc, lda, &a, batch_count)?;
    guard::guard_general(ctx, "her2k", "b", true, fr, fc, ldb, &b, batch_count)?;
    for bi in 0..batch_count {
        rank_2k_kernel(
            true,
            uplo,
            trans,
            n,
            k,
            alpha_v,
            a.instance(bi),
            lda,
            b.instance(bi),
            ldb,
            beta_v,
            c.instance_mut(bi),
            ldc,
        );
    }
    guard::guard_triangle(ctx, "her2k", "c", false, uplo, n, ldc, &c, batch_count)?;
    Ok(())
}
