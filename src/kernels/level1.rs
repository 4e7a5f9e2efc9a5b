//! Level 1: vector-vector operations and reductions.

use crate::batch::{neg_inc_offset, vec_index, BatchMut, BatchRef};
use crate::context::Context;
use crate::grid::{par_for_each, reduce_chunked, SendPtr};
use crate::guard;
use crate::logging::{log_call, ArgValue, CallRecord};
use crate::scalar::{Scalar, ScalarArg};
use crate::validate::{self, Launch};
use crate::{BlasError, Result};
use num_traits::{Float, Zero};

/// x = alpha * x. With `alpha == 0` every element is overwritten with an
/// exact zero, so NaN and Inf never survive a zero scale.
pub fn scal<T: Scalar>(
    ctx: &Context,
    n: usize,
    alpha: ScalarArg<'_, T>,
    x: Option<BatchMut<'_, T>>,
    incx: isize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "scal",
            vec![
                ("n", n.into()),
                ("alpha", ArgValue::scalar(&alpha)),
                ("incx", incx.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::scal_args(ctx, n, &alpha, x.as_ref(), incx, batch_count)?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let mut x = x.ok_or(BlasError::InvalidPointer("x"))?;
    guard::guard_vector(ctx, "scal", "x", true, n, incx, &x, batch_count)?;
    let alpha_v = alpha.load();
    let base = neg_inc_offset(n, incx);
    for b in 0..batch_count {
        let xi = x.instance_mut(b);
        let xp = SendPtr(xi.as_mut_ptr());
        par_for_each(n, 1, move |j| unsafe {
            let slot = xp.at(vec_index(base, j, incx));
            *slot = if alpha_v.is_zero() {
                T::zero()
            } else {
                alpha_v * *slot
            };
        });
    }
    guard::guard_vector(ctx, "scal", "x", false, n, incx, &x, batch_count)?;
    Ok(())
}

/// y = alpha * x + y.
pub fn axpy<T: Scalar>(
    ctx: &Context,
    n: usize,
    alpha: ScalarArg<'_, T>,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    y: Option<BatchMut<'_, T>>,
    incy: isize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "axpy",
            vec![
                ("n", n.into()),
                ("alpha", ArgValue::scalar(&alpha)),
                ("incx", incx.into()),
                ("incy", incy.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::axpy_args(ctx, n, &alpha, x.as_ref(), incx, y.as_ref(), incy, batch_count)?;
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
    let mut y = y.ok_or(BlasError::InvalidPointer("y"))?;
    guard::guard_vector(ctx, "axpy", "x", true, n, incx, &x, batch_count)?;
    let xbase = neg_inc_offset(n, incx);
    let ybase = neg_inc_offset(n, incy);
    for b in 0..batch_count {
        let xi = x.instance(b);
        let yi = y.instance_mut(b);
        let yp = SendPtr(yi.as_mut_ptr());
        par_for_each(n, 2, move |j| unsafe {
            let slot = yp.at(vec_index(ybase, j, incy));
            *slot = alpha_v * xi[vec_index(xbase, j, incx)] + *slot;
        });
    }
    guard::guard_vector(ctx, "axpy", "y", false, n, incy, &y, batch_count)?;
    Ok(())
}

/// y = x.
pub fn copy<T: Scalar>(
    ctx: &Context,
    n: usize,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    y: Option<BatchMut<'_, T>>,
    incy: isize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "copy",
            vec![
                ("n", n.into()),
                ("incx", incx.into()),
                ("incy", incy.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::copy_args(n, x.as_ref(), incx, y.as_ref(), incy, batch_count)?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let x = x.ok_or(BlasError::InvalidPointer("x"))?;
    let mut y = y.ok_or(BlasError::InvalidPointer("y"))?;
    let xbase = neg_inc_offset(n, incx);
    let ybase = neg_inc_offset(n, incy);
    for b in 0..batch_count {
        let xi = x.instance(b);
        let yi = y.instance_mut(b);
        let yp = SendPtr(yi.as_mut_ptr());
        par_for_each(n, 1, move |j| unsafe {
            *yp.at(vec_index(ybase, j, incy)) = xi[vec_index(xbase, j, incx)];
        });
    }
    Ok(())
}

/// Exchange x and y.
pub fn swap<T: Scalar>(
    ctx: &Context,
    n: usize,
    x: Option<BatchMut<'_, T>>,
    incx: isize,
    y: Option<BatchMut<'_, T>>,
    incy: isize,
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "swap",
            vec![
                ("n", n.into()),
                ("incx", incx.into()),
                ("incy", incy.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::swap_args(n, x.as_ref(), incx, y.as_ref(), incy, batch_count)?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        return Ok(());
    }
    let mut x = x.ok_or(BlasError::InvalidPointer("x"))?;
    let mut y = y.ok_or(BlasError::InvalidPointer("y"))?;
    let xbase = neg_inc_offset(n, incx);
    let ybase = neg_inc_offset(n, incy);
    for b in 0..batch_count {
        let xi = x.instance_mut(b);
        let xp = SendPtr(xi.as_mut_ptr());
        let yi = y.instance_mut(b);
        let yp = SendPtr(yi.as_mut_ptr());
        par_for_each(n, 1, move |j| unsafe {
            let xs = xp.at(vec_index(xbase, j, incx));
            let ys = yp.at(vec_index(ybase, j, incy));
            std::ptr::swap(xs, ys);
        });
    }
    Ok(())
}

fn dot_impl<T: Scalar>(
    ctx: &Context,
    name: &'static str,
    conjugate: bool,
    n: usize,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    y: Option<BatchRef<'_, T>>,
    incy: isize,
    result: &mut [T],
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            name,
            vec![
                ("n", n.into()),
                ("incx", incx.into()),
                ("incy", incy.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::dot_args(n, x.as_ref(), incx, y.as_ref(), incy, result.len(), batch_count)?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        result[..batch_count].fill(T::zero());
        return Ok(());
    }
    let x = x.ok_or(BlasError::InvalidPointer("x"))?;
    let y = y.ok_or(BlasError::InvalidPointer("y"))?;
    guard::guard_vector(ctx, name, "x", true, n, incx, &x, batch_count)?;
    guard::guard_vector(ctx, name, "y", true, n, incy, &y, batch_count)?;
    let xbase = neg_inc_offset(n, incx);
    let ybase = neg_inc_offset(n, incy);
    let rp = SendPtr(result.as_mut_ptr());
    par_for_each(batch_count, 2 * n, move |b| {
        let xi = x.instance(b);
        let yi = y.instance(b);
        let acc = reduce_chunked(n, |j| {
            let xv = xi[vec_index(xbase, j, incx)];
            let xv = if conjugate { xv.conj() } else { xv };
            xv * yi[vec_index(ybase, j, incy)]
        });
        unsafe { *rp.at(b) = acc };
    });
    Ok(())
}

/// result\[b\] = sum_j x_j * y_j, unconjugated.
pub fn dot<T: Scalar>(
    ctx: &Context,
    n: usize,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    y: Option<BatchRef<'_, T>>,
    incy: isize,
    result: &mut [T],
    batch_count: usize,
) -> Result<()> {
    dot_impl(ctx, "dot", false, n, x, incx, y, incy, result, batch_count)
}

/// result\[b\] = sum_j conj(x_j) * y_j.
pub fn dotc<T: Scalar>(
    ctx: &Context,
    n: usize,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    y: Option<BatchRef<'_, T>>,
    incy: isize,
    result: &mut [T],
    batch_count: usize,
) -> Result<()> {
    dot_impl(ctx, "dotc", true, n, x, incx, y, incy, result, batch_count)
}

/// Euclidean norm per batch instance.
pub fn nrm2<T: Scalar>(
    ctx: &Context,
    n: usize,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    result: &mut [T::Real],
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "nrm2",
            vec![
                ("n", n.into()),
                ("incx", incx.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::reduce_args(n, x.as_ref(), incx, result.len(), batch_count)?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        result[..batch_count].fill(T::Real::zero());
        return Ok(());
    }
    let x = x.ok_or(BlasError::InvalidPointer("x"))?;
    guard::guard_vector(ctx, "nrm2", "x", true, n, incx, &x, batch_count)?;
    let base = neg_inc_offset(n, incx);
    let rp = SendPtr(result.as_mut_ptr());
    par_for_each(batch_count, 2 * n, move |b| {
        let xi = x.instance(b);
        let sumsq: T::Real = reduce_chunked(n, |j| xi[vec_index(base, j, incx)].abs_sqr());
        unsafe { *rp.at(b) = sumsq.sqrt() };
    });
    Ok(())
}

/// Sum of |re| + |im| per batch instance.
pub fn asum<T: Scalar>(
    ctx: &Context,
    n: usize,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    result: &mut [T::Real],
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "asum",
            vec![
                ("n", n.into()),
                ("incx", incx.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::reduce_args(n, x.as_ref(), incx, result.len(), batch_count)?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        result[..batch_count].fill(T::Real::zero());
        return Ok(());
    }
    let x = x.ok_or(BlasError::InvalidPointer("x"))?;
    guard::guard_vector(ctx, "asum", "x", true, n, incx, &x, batch_count)?;
    let base = neg_inc_offset(n, incx);
    let rp = SendPtr(result.as_mut_ptr());
    par_for_each(batch_count, n, move |b| {
        let xi = x.instance(b);
        let total: T::Real = reduce_chunked(n, |j| xi[vec_index(base, j, incx)].abs1());
        unsafe { *rp.at(b) = total };
    });
    Ok(())
}

/// 1-based index of the first element with the largest |re| + |im| per
/// batch instance; 0 on a degenerate call.
pub fn iamax<T: Scalar>(
    ctx: &Context,
    n: usize,
    x: Option<BatchRef<'_, T>>,
    incx: isize,
    result: &mut [i64],
    batch_count: usize,
) -> Result<()> {
    log_call(ctx, || {
        CallRecord::new(
            "iamax",
            vec![
                ("n", n.into()),
                ("incx", incx.into()),
                ("batch_count", batch_count.into()),
            ],
        )
    });
    let launch = validate::reduce_args(n, x.as_ref(), incx, result.len(), batch_count)?;
    if ctx.is_size_query() {
        ctx.record_workspace_bytes(0);
        return Ok(());
    }
    if launch == Launch::QuickReturn {
        result[..batch_count].fill(0);
        return Ok(());
    }
    let x = x.ok_or(BlasError::InvalidPointer("x"))?;
    let base = neg_inc_offset(n, incx);
    let rp = SendPtr(result.as_mut_ptr());
    par_for_each(batch_count, n, move |b| {
        let xi = x.instance(b);
        // First element seeds the maximum, so an all-NaN vector reports 1
        // like the reference implementation.
        let mut best = xi[vec_index(base, 0, incx)].abs1();
        let mut best_idx: i64 = 1;
        for j in 1..n {
            let v = xi[vec_index(base, j, incx)].abs1();
            if v > best {
                best = v;
                best_idx = j as i64 + 1;
            }
        }
        unsafe { *rp.at(b) = best_idx };
    });
    Ok(())
}
