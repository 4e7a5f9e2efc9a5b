//! Level 3: general matrix-matrix multiply.

use crate::batch::{BatchMut, BatchRef};
use crate::context::Context;
use crate::grid::{par_for_each, reduce_chunked, SendPtr};
use crate::guard;
use crate::layout::{general_offset, Transpose};
use crate::logging::{log_call, ArgValue, CallRecord};
use crate::scalar::{Scalar, ScalarArg};
use crate::validate::{self, Launch};
use crate::{BlasError, Result};

use super::scale_general;

/// Element `(i, l)` of op(A).
#[inline(always)]
fn op_get<T: Scalar>(a: &[T], trans: Transpose, lda: usize, i: usize, l: usize) -> T {
    match trans {
        Transpose::NoTrans => a[general_offset(i, l, lda)],
        Transpose::Trans => a[general_offset(l, i, lda)],
        Transpose::ConjTrans => a[general_offset(l, i, lda)].conj(),
    }
}

/// C = alpha * op(A) * op(B) + beta * C, all general.
#[allow(clippy::too_many_arguments)]
pub fn gemm<T: Scalar>(
    ctx: &Context,
    transa: Transpose,
    transb: Transpose,
    m: usize,
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
            "gemm",
            vec![
                ("transa", transa.as_char().into()),
                ("transb", transb.as_char().into()),
                ("m", m.into()),
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
    let launch = validate::gemm_args(
        ctx,
        transa,
        transb,
        m,
        n,
        k,
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
            scale_general(m, n, ldc, c.instance_mut(bi), beta_v);
        }
        guard::guard_general(ctx, "gemm", "c", false, m, n, ldc, &c, batch_count)?;
        return Ok(());
    }
    let a = a.ok_or(BlasError::InvalidPointer("a"))?;
    let b = b.ok_or(BlasError::InvalidPointer("b"))?;
    let (a_rows, a_cols) = match transa {
        Transpose::NoTrans => (m, k),
        _ => (k, m),
    };
    let (b_rows, b_cols) = match transb {
        Transpose::NoTrans => (k, n),
        _ => (n, k),
    };
    guard::guard_general(ctx, "gemm", "a", true, a_rows, a_cols, lda, &a, batch_count)?;
    guard::guard_general(ctx, "gemm", "b", true, b_rows, b_cols, ldb, &b, batch_count)?;
    for bi in 0..batch_count {
        let ai = a.instance(bi);
        let bj = b.instance(bi);
        let ci = c.instance_mut(bi);
        let cp = SendPtr(ci.as_mut_ptr());
        par_for_each(m * n, 2 * k, move |item| {
            let i = item % m;
            let j = item / m;
            let acc = reduce_chunked(k, |l| {
                op_get(ai, transa, lda, i, l) * op_get(bj, transb, ldb, l, j)
            });
            unsafe {
                super::store_scaled(cp.at(general_offset(i, j, ldc)), acc, alpha_v, beta_v);
            }
        });
    }
    guard::guard_general(ctx, "gemm", "c", false, m, n, ldc, &c, batch_count)?;
    Ok(())
}
