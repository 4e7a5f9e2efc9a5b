//! Level 2: triangular matrix-vector multiply and solve.
//!
//! Both operate in place on x. The multiply snapshots x into workspace so
//! output elements can be produced in parallel; the solve is a sequential
//! substitution per instance, ordered by the effective triangle of op(A).

use crate::batch::{neg_inc_offset, vec_index, BatchMut, BatchRef};
use crate::context::Context;
use crate::grid::{par_for_each, reduce_chunked, SendPtr};
use crate::guard;
use crate::layout::{general_offset, Diag, Transpose, Uplo};
use crate::logging::{log_call, CallRecord};
use crate::scalar::Scalar;
use crate::validate::{self, Launch};
use crate::{BlasError, Result};

/// Logical element `(i, j)` of op(A) for a triangular A in general storage.
/// Zero outside the effective triangle, one on an implicit unit diagonal.
#[inline]
pub(crate) fn tri_get<T: Scalar>(
    a: &[T],
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    lda: usize,
    i: usize,
    j: usize,
) -> T {
    let (r, c) = match trans {
        Transpose::NoTrans => (i, j),
        _ => (j, i),
    };
    let stored = match uplo {
        Uplo::Upper => r <= c,
        Uplo::Lower => r >= c,
    };
    if !stored {
        return T::zero();
    }
    if r == c && diag == Diag::Unit {
        return T::one();
    }
    let v = a[general_offset(r, c, lda)];
    if trans.conjugates() {
        v.conj()
    } else {
        v
    }
}

/// Whether op(A) is effectively upper triangular.
#[inline]
pub(crate) fn effective_upper(uplo: Uplo, trans: Transpose) -> bool {
    match (uplo, trans) {
        (Uplo::Upper, Transpose::NoTrans) => true,
        (Uplo::Lower, Transpose::NoTrans) => false,
        (Uplo::Upper, _) => false,
        (Uplo::Lower, _) => true,
    }
}

/// x = op(A) * x, A triangular.
#[allow(clippy::too_many_arguments)]
pub fn trmv<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    a: Option<BatchRef<'_, T>>,
    lda: usize,
    x: Option<BatchMut<'_, T>>,
    incx: isize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "trmv",
            vec![
                ("uplo", uplo.as_char().into()),
                ("trans", trans.as_char().into()),
                ("diag", diag.as_char().into()),
                ("n", n.into()),
                ("lda", lda.into()),
                ("incx", incx.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::trmv_args(n, a.as_ref(), lda, x.as_ref(), incx, batch_count)?;
    if ctx.is_size_query() {
        let elems = if launch == Launch::Go {
            n * batch_count
        } else {
            0
        };
        ctx.record_workspace_bytes(elems * std::mem::size_of::<T>());
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let a = a.ok_or(BlasError::InvalidPointer("a"))?;
    let mut x = x.ok_or(BlasError::InvalidPointer("x"))?;
    guard::guard_triangle(ctx, "trmv", "a", true, uplo, n, lda, &a, batch_count)?;
    guard::guard_vector(ctx, "trmv", "x", true, n, incx, &x, batch_count)?;
    let Some(mut ws) = ctx.take_workspace::<T>(n * batch_count)? else {
        return Ok(());
    };
    let base = neg_inc_offset(n, incx);
    for b in 0..batch_count {
        let xi = x.instance(b);
        let snap = &mut ws[b * n..(b + 1) * n];
        for (j, s) in snap.iter_mut().enumerate() {
            *s = xi[vec_index(base, j, incx)];
        }
    }
    let eff_upper = effective_upper(uplo, trans);
    for b in 0..batch_count {
        let ai = a.instance(b);
        let snap = &ws[b * n..(b + 1) * n];
        let xi = x.instance_mut(b);
        let xp = SendPtr(xi.as_mut_ptr());
        par_for_each(n, 2 * n, move |i| {
            let (lo, hi) = if eff_upper { (i, n) } else { (0, i + 1) };
            let acc = reduce_chunked(hi - lo, |t| {
                let j = lo + t;
                tri_get(ai, uplo, trans, diag, lda, i, j) * snap[j]
            });
            unsafe { *xp.at(vec_index(base, i, incx)) = acc };
        });
    }
    guard::guard_vector(ctx, "trmv", "x", false, n, incx, &x, batch_count)?;
    Ok(())
}

/// Solve op(A) * x = b for x, overwriting x (which holds b on entry).
///
/// No singularity check is performed; a zero on a non-unit diagonal
/// produces Inf/NaN exactly like the reference substitution.
#[allow(clippy::too_many_arguments)]
pub fn trsv<T: Scalar>(
    ctx: &Context,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: usize,
    a: Option<BatchRef<'_, T>>,
    lda: usize,
    x: Option<BatchMut<'_, T>>,
    incx: isize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "trsv",
            vec![
                ("uplo", uplo.as_char().into()),
                ("trans", trans.as_char().into()),
                ("diag", diag.as_char().into()),
                ("n", n.into()),
                ("lda", lda.into()),
                ("incx", incx.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::trmv_args(n, a.as_ref(), lda, x.as_ref(), incx, batch_count)?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let a = a.ok_or(BlasError::InvalidPointer("a"))?;
    let mut x = x.ok_or(BlasError::InvalidPointer("x"))?;
    guard::guard_triangle(ctx, "trsv", "a", true, uplo, n, lda, &a, batch_count)?;
    guard::guard_vector(ctx, "trsv", "x", true, n, incx, &x, batch_count)?;
    let base = neg_inc_offset(n, incx);
    let eff_upper = effective_upper(uplo, trans);
    for b in 0..batch_count {
        let ai = a.instance(b);
        let xi = x.instance_mut(b);
        solve_in_place(ai, uplo, trans, diag, lda, n, xi, base, incx, eff_upper);
    }
    guard::guard_vector(ctx, "trsv", "x", false, n, incx, &x, batch_count)?;
    Ok(())
}

/// Sequential forward/back substitution over one strided vector.
#[allow(clippy::too_many_arguments)]
pub(crate) fn solve_in_place<T: Scalar>(
    a: &[T],
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    lda: usize,
    n: usize,
    x: &mut [T],
    base: isize,
    incx: isize,
    eff_upper: bool,
) {
    let mut solve_row = |i: usize| {
        let (lo, hi) = if eff_upper { (i + 1, n) } else { (0, i) };
        let mut sum = T::zero();
        for j in lo..hi {
            sum = sum + tri_get(a, uplo, trans, diag, lda, i, j) * x[vec_index(base, j, incx)];
        }
        let idx = vec_index(base, i, incx);
        let rhs = x[idx] - sum;
        x[idx] = if diag == Diag::Unit {
            rhs
        } else {
            rhs / tri_get(a, uplo, trans, diag, lda, i, i)
        };
    };
    if eff_upper {
        for i in (0..n).rev() {
            solve_row(i);
        }
    } else {
        for i in 0..n {
            solve_row(i);
        }
    }
}
