//! Level 3: triangular solve with multiple right-hand sides.
//!
//! Left side solves op(A) X = alpha B column by column; right side solves
//! X op(A) = alpha B row by row. Columns (respectively rows) of B are
//! independent, so they form the parallel work items while the substitution
//! within each stays sequential.

use crate::batch::{BatchMut, BatchRef};
use crate::context::Context;
use crate::grid::{par_for_each, SendPtr};
use crate::guard;
use crate::layout::{general_offset, Diag, Side, Transpose, Uplo};
use crate::logging::{log_call, ArgValue, CallRecord};
use crate::scalar::{Scalar, ScalarArg};
use crate::validate::{self, Launch};
use crate::{BlasError, Result};

use super::trmv::{effective_upper, tri_get};

/// op(A) X = alpha B or X op(A) = alpha B, X overwriting B.
///
/// No singularity check; a zero on a non-unit diagonal propagates Inf/NaN.
/// With `alpha == 0`, B is zero-filled without reading A.
#[allow(clippy::too_many_arguments)]
pub fn trsm<T: Scalar>(
    ctx: &Context,
    side: Side,
    uplo: Uplo,
    transa: Transpose,
    diag: Diag,
    m: usize,
    n: usize,
    alpha: ScalarArg<'_, T>,
    a: Option<BatchRef<'_, T>>,
    lda: usize,
    b: Option<BatchMut<'_, T>>,
    ldb: usize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "trsm",
            vec![
                ("side", side.as_char().into()),
                ("uplo", uplo.as_char().into()),
                ("transa", transa.as_char().into()),
                ("diag", diag.as_char().into()),
                ("m", m.into()),
                ("n", n.into()),
                ("alpha", ArgValue::scalar(&alpha)),
                ("lda", lda.into()),
                ("ldb", ldb.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::trsm_args(
        ctx,
        side,
        m,
        n,
        &alpha,
        a.as_ref(),
        lda,
        b.as_ref(),
        ldb,
        batch_count,
    )?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let mut b = b.ok_or(BlasError::InvalidPointer("b"))?;
    let alpha_v = alpha.load();
    if alpha_v.is_zero() {
        for bi in 0..batch_count {
            super::scale_general(m, n, ldb, b.instance_mut(bi), T::zero());
        }
        guard::guard_general(ctx, "trsm", "b", false, m, n, ldb, &b, batch_count)?;
        return Ok(());
    }
    let a = a.ok_or(BlasError::InvalidPointer("a"))?;
    let ka = match side {
        Side::Left => m,
        Side::Right => n,
    };
    guard::guard_triangle(ctx, "trsm", "a", true, uplo, ka, lda, &a, batch_count)?;
    guard::guard_general(ctx, "trsm", "b", true, m, n, ldb, &b, batch_count)?;
    let eff_upper = effective_upper(uplo, transa);
    let unit = diag == Diag::Unit;
    for bi in 0..batch_count {
        let ai = a.instance(bi);
        let bm = b.instance_mut(bi);
        let bp = SendPtr(bm.as_mut_ptr());
        match side {
            Side::Left => {
                par_for_each(n, m * m, move |j| {
                    let solve = |i: usize| unsafe {
                        let (lo, hi) = if eff_upper { (i + 1, m) } else { (0, i) };
                        let mut sum = T::zero();
                        for l in lo..hi {
                            sum = sum
                                + tri_get(ai, uplo, transa, diag, lda, i, l)
                                    * *bp.at(general_offset(l, j, ldb));
                        }
                        let slot = bp.at(general_offset(i, j, ldb));
                        let v = alpha_v * *slot - sum;
                        *slot = if unit {
                            v
                        } else {
                            v / tri_get(ai, uplo, transa, diag, lda, i, i)
                        };
                    };
                    if eff_upper {
                        for i in (0..m).rev() {
                            solve(i);
                        }
                    } else {
                        for i in 0..m {
                            solve(i);
                        }
                    }
                });
            }
            Side::Right => {
                par_for_each(m, n * n, move |i| {
                    let solve = |j: usize| unsafe {
                        let (lo, hi) = if eff_upper { (0, j) } else { (j + 1, n) };
                        let mut sum = T::zero();
                        for l in lo..hi {
                            sum = sum
                                + *bp.at(general_offset(i, l, ldb))
                                    * tri_get(ai, uplo, transa, diag, lda, l, j);
                        }
                        let slot = bp.at(general_offset(i, j, ldb));
                        let v = alpha_v * *slot - sum;
                        *slot = if unit {
                            v
                        } else {
                            v / tri_get(ai, uplo, transa, diag, lda, j, j)
                        };
                    };
                    if eff_upper {
                        for j in 0..n {
                            solve(j);
                        }
                    } else {
                        for j in (0..n).rev() {
                            solve(j);
                        }
                    }
                });
            }
        }
    }
    guard::guard_general(ctx, "trsm", "b", false, m, n, ldb, &b, batch_count)?;
    Ok(())
}
